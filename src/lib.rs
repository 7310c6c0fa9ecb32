//! Lossless syntax trees for TOML.
//!
//! [`TomlParser`] turns TOML text into a [`tree::Document`] in which every
//! byte of the input, whitespace and comments included, is attached to some
//! node. Printing the tree reproduces the input exactly, so tools can edit
//! one value and write the file back without disturbing anything else.
//!
//! ```rust
//! use toml_lst::TomlParser;
//!
//! let source = "# settings\nport = 8080  # default\n";
//! let document = TomlParser::default().parse_str(source).unwrap();
//! let port = document.key_values().next().unwrap();
//! assert_eq!(port.key.name, "port");
//! assert_eq!(port.value.as_integer(), Some(8080));
//! assert_eq!(document.print(), source);
//! ```

pub use crate::config::ParserOptions;
pub use crate::diagnostics::{ErrorContext, ErrorType, TomlError};
pub use crate::parser::{ParserInput, TomlParser};

pub mod cli;
pub mod config;
pub mod convert;
pub mod diagnostics;
pub mod encoding;
pub mod parser;
pub mod printer;
pub mod syntax;
pub mod tree;
