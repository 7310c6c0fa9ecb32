//! Command-line arguments for `toml-lst`, declared with `clap` derive.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "toml-lst",
    version,
    about = "Lossless syntax trees for TOML files."
)]
pub struct TomlLstArgs {
    /// YAML file with parser options.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log conversion details to stderr. Repeat for more detail.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Dump the lossless tree of a file.
    Tree {
        #[arg(required = true)]
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = TreeFormat::Json)]
        format: TreeFormat,
    },
    /// Print a file back from its tree.
    Print {
        #[arg(required = true)]
        file: PathBuf,
    },
    /// Convert every TOML file under a path and verify that each prints back unchanged.
    Check {
        #[arg(default_value = ".")]
        path: PathBuf,
        /// File extensions to pick up, overriding the configured ones.
        #[arg(long = "extension", value_name = "EXT")]
        extensions: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TreeFormat {
    Json,
    Yaml,
}
