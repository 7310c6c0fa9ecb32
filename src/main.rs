fn main() {
    toml_lst::cli::run();
}
