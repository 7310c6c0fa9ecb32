//! Parser options, loadable from YAML.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::diagnostics::TomlError;
use crate::err_msg;

/// Knobs for [`crate::TomlParser`] and the CLI.
///
/// Every field has a default, so a config file only names what it changes:
///
/// ```rust
/// use toml_lst::ParserOptions;
/// let options = ParserOptions::from_yaml_str("verify_round_trip: true").unwrap();
/// assert!(options.verify_round_trip);
/// assert!(options.compute_checksum);
/// assert_eq!(options.extensions, vec!["toml".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserOptions {
    /// Print every converted document and fail when it differs from the input.
    pub verify_round_trip: bool,
    /// Record a SHA-256 checksum of the input bytes on each document.
    pub compute_checksum: bool,
    /// File extensions picked up when a directory is scanned.
    pub extensions: Vec<String>,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            verify_round_trip: false,
            compute_checksum: true,
            extensions: vec!["toml".to_string()],
        }
    }
}

impl ParserOptions {
    pub fn from_yaml_str(text: &str) -> Result<Self, TomlError> {
        serde_yaml::from_str::<Option<Self>>(text)
            .map(Option::unwrap_or_default)
            .map_err(|e| err_msg!(Io, "invalid parser options: {}", e).with_cause(e))
    }

    pub fn load(path: &Path) -> Result<Self, TomlError> {
        let text = fs::read_to_string(path).map_err(|e| {
            err_msg!(Io, "cannot read options file {}: {}", path.display(), e).with_cause(e)
        })?;
        Self::from_yaml_str(&text)
    }

    /// Whether `path` has one of the configured extensions.
    pub fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }
}
