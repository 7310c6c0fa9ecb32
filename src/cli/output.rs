//! User-facing output for the CLI: tree dumps, per-file status lines and
//! coloured diffs.

use std::io::{self, IsTerminal, Write};
use std::path::Path;

use difference::{Changeset, Difference};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::cli::args::TreeFormat;
use crate::diagnostics::TomlError;
use crate::err_msg;
use crate::tree::Document;

/// Serializes a document in the requested format.
pub fn render_tree(document: &Document, format: TreeFormat) -> Result<String, TomlError> {
    match format {
        TreeFormat::Json => serde_json::to_string_pretty(document)
            .map_err(|e| err_msg!(Io, "cannot serialize tree: {}", e).with_cause(e)),
        TreeFormat::Yaml => serde_yaml::to_string(document)
            .map_err(|e| err_msg!(Io, "cannot serialize tree: {}", e).with_cause(e)),
    }
}

/// Writes `bytes` to stdout unchanged.
pub fn print_raw(bytes: &[u8]) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(bytes)?;
    stdout.flush()
}

/// Per-file outcome of `check`.
pub enum Status {
    Ok,
    Mismatch,
    Failed,
}

pub fn print_status(stdout: &mut StandardStream, path: &Path, status: Status) -> io::Result<()> {
    let (label, color) = match status {
        Status::Ok => ("ok", Color::Green),
        Status::Mismatch => ("mismatch", Color::Yellow),
        Status::Failed => ("FAILED", Color::Red),
    };
    stdout.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(stdout, "{:>8}", label)?;
    stdout.reset()?;
    writeln!(stdout, " {}", path.display())
}

pub fn print_summary(stdout: &mut StandardStream, passed: usize, failed: usize) -> io::Result<()> {
    let color = if failed == 0 { Color::Green } else { Color::Red };
    stdout.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    writeln!(stdout, "{} passed, {} failed", passed, failed)?;
    stdout.reset()
}

/// Line diff between what was read and what the tree printed.
pub fn print_round_trip_diff(
    stdout: &mut StandardStream,
    original: &str,
    printed: &str,
) -> io::Result<()> {
    let changeset = Changeset::new(original, printed, "\n");
    print_diff(stdout, &changeset.diffs)
}

/// Colour only when stdout is a terminal.
pub fn stdout() -> StandardStream {
    let choice = if io::stdout().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    StandardStream::stdout(choice)
}

fn print_diff(stdout: &mut StandardStream, diffs: &[Difference]) -> io::Result<()> {
    for diff in diffs {
        match diff {
            Difference::Same(x) => {
                stdout.reset()?;
                writeln!(stdout, " {}", x)?;
            }
            Difference::Add(x) => {
                stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
                writeln!(stdout, "+{}", x)?;
            }
            Difference::Rem(x) => {
                stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
                writeln!(stdout, "-{}", x)?;
            }
        }
    }
    stdout.reset()
}
