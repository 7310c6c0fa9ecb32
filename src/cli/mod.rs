//! The `toml-lst` command-line interface.
//!
//! Parses arguments, installs logging, and dispatches to the subcommand
//! handlers. Failures are rendered as `miette` reports.

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use crate::cli::args::{Command, TomlLstArgs, TreeFormat};
use crate::cli::output::Status;
use crate::config::ParserOptions;
use crate::diagnostics::{print_error, TomlError};
use crate::err_msg;
use crate::parser::{verify_round_trip, ParserInput, TomlParser};

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    let args = TomlLstArgs::parse();
    init_tracing(args.verbose);

    let result = load_options(args.config.as_deref()).and_then(|options| match args.command {
        Command::Tree { file, format } => handle_tree(options, &file, format),
        Command::Print { file } => handle_print(options, &file),
        Command::Check { path, extensions } => handle_check(options, &path, extensions),
    });

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            print_error(e);
            process::exit(1);
        }
    }
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "toml_lst=debug",
            _ => "toml_lst=trace",
        })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_options(config: Option<&Path>) -> Result<ParserOptions, TomlError> {
    match config {
        Some(path) => ParserOptions::load(path),
        None => Ok(ParserOptions::default()),
    }
}

/// Handles the `tree` subcommand.
fn handle_tree(options: ParserOptions, file: &Path, format: TreeFormat) -> Result<bool, TomlError> {
    let document = TomlParser::new(options).parse_path(file)?;
    let rendered = output::render_tree(&document, format)?;
    println!("{}", rendered);
    Ok(true)
}

/// Handles the `print` subcommand.
fn handle_print(options: ParserOptions, file: &Path) -> Result<bool, TomlError> {
    let document = TomlParser::new(options).parse_path(file)?;
    let bytes = document.to_bytes()?;
    output::print_raw(&bytes).map_err(io_error)?;
    Ok(true)
}

/// Handles the `check` subcommand. Returns `false` if any file failed.
fn handle_check(
    mut options: ParserOptions,
    root: &Path,
    extensions: Vec<String>,
) -> Result<bool, TomlError> {
    if !extensions.is_empty() {
        options.extensions = extensions;
    }
    // Mismatches are diffed below rather than failing inside the parser.
    options.verify_round_trip = false;

    let files = discover(root, &options)?;
    debug!(root = %root.display(), files = files.len(), "discovered files");

    let mut stdout = output::stdout();
    let mut failed = 0;
    let mut inputs = Vec::with_capacity(files.len());
    for file in &files {
        match ParserInput::read(file) {
            Ok(input) => inputs.push(input),
            Err(e) => {
                warn!(path = %file.display(), "cannot read file");
                output::print_status(&mut stdout, file, Status::Failed).map_err(io_error)?;
                print_error(e);
                failed += 1;
            }
        }
    }

    let parser = TomlParser::new(options);
    let results = parser.parse_inputs(&inputs);
    for (input, result) in inputs.iter().zip(results) {
        let name = input.path.display().to_string();
        let document = match result {
            Ok(document) => document,
            Err(e) => {
                warn!(path = %name, "conversion failed");
                output::print_status(&mut stdout, &input.path, Status::Failed)
                    .map_err(io_error)?;
                print_error(e);
                failed += 1;
                continue;
            }
        };
        if let Err(e) = verify_round_trip(&document, &input.source.text, &name) {
            warn!(path = %name, "round trip mismatch");
            output::print_status(&mut stdout, &input.path, Status::Mismatch).map_err(io_error)?;
            output::print_round_trip_diff(&mut stdout, &input.source.text, &document.print())
                .map_err(io_error)?;
            print_error(e);
            failed += 1;
            continue;
        }
        output::print_status(&mut stdout, &input.path, Status::Ok).map_err(io_error)?;
    }

    output::print_summary(&mut stdout, files.len() - failed, failed).map_err(io_error)?;
    Ok(failed == 0)
}

/// A single file is taken as is. Directories are walked for matching extensions.
fn discover(root: &Path, options: &ParserOptions) -> Result<Vec<PathBuf>, TomlError> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            err_msg!(Io, "cannot walk {}: {}", root.display(), e).with_cause(e)
        })?;
        if entry.file_type().is_file() && options.matches_extension(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn io_error(e: std::io::Error) -> TomlError {
    err_msg!(Io, "cannot write output: {}", e).with_cause(e)
}
