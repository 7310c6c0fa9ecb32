//! Entry points: text or files in, [`Document`] trees out.
//!
//! Each call decodes, runs the grammar, and converts the parse tree with a
//! fresh [`LstBuilder`]. Documents share nothing, so batches are converted
//! in parallel.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::debug;

use crate::config::ParserOptions;
use crate::convert::LstBuilder;
use crate::diagnostics::{named_source, TomlError};
use crate::encoding::{self, EncodedSource};
use crate::syntax::{parse_document, Span};
use crate::tree::{Checksum, Document, FileAttributes};
use crate::{err_ctx, err_msg};

/// One unit of work for [`TomlParser`]: decoded text plus where it came from.
#[derive(Debug, Clone)]
pub struct ParserInput {
    pub path: PathBuf,
    pub source: EncodedSource,
    pub file_attributes: Option<FileAttributes>,
}

impl ParserInput {
    pub fn new(path: impl Into<PathBuf>, source: EncodedSource) -> Self {
        Self {
            path: path.into(),
            source,
            file_attributes: None,
        }
    }

    pub fn from_text(path: impl Into<PathBuf>, text: &str) -> Self {
        Self::new(path, EncodedSource::from_text(text))
    }

    /// Reads and decodes a file, capturing its attributes.
    pub fn read(path: &Path) -> Result<Self, TomlError> {
        let bytes = fs::read(path).map_err(|e| {
            err_msg!(Io, "cannot read {}: {}", path.display(), e).with_cause(e)
        })?;
        let file_attributes = fs::metadata(path)
            .ok()
            .map(|metadata| FileAttributes::from_metadata(&metadata));
        Ok(Self {
            path: path.to_path_buf(),
            source: EncodedSource::decode(&bytes),
            file_attributes,
        })
    }
}

/// Converts TOML sources into lossless trees.
#[derive(Debug, Clone, Default)]
pub struct TomlParser {
    options: ParserOptions,
}

impl TomlParser {
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Parses in-memory UTF-8 text.
    pub fn parse_str(&self, text: &str) -> Result<Document, TomlError> {
        let input = ParserInput::new(
            "<string>",
            EncodedSource {
                text: text.to_string(),
                charset_name: encoding::UTF_8.to_string(),
                bom_marked: false,
            },
        );
        self.parse_input(&input)
    }

    pub fn parse_path(&self, path: &Path) -> Result<Document, TomlError> {
        self.parse_input(&ParserInput::read(path)?)
    }

    pub fn parse_input(&self, input: &ParserInput) -> Result<Document, TomlError> {
        let text = input.source.text.as_str();
        let name = input.path.display().to_string();
        debug!(path = %name, charset = %input.source.charset_name, "parsing");

        let ctx = parse_document(text, &name)?;
        let checksum = if self.options.compute_checksum {
            let bytes = encoding::encode(
                text,
                &input.source.charset_name,
                input.source.bom_marked,
            )?;
            Some(Checksum::sha256(&bytes))
        } else {
            None
        };

        let document = LstBuilder::new(text, &input.path)
            .charset(input.source.charset_name.clone(), input.source.bom_marked)
            .checksum(checksum)
            .file_attributes(input.file_attributes.clone())
            .visit_document(ctx)?;

        if self.options.verify_round_trip {
            verify_round_trip(&document, text, &name)?;
        }
        Ok(document)
    }

    /// Converts every input in parallel. Results line up with `inputs`.
    pub fn parse_inputs(&self, inputs: &[ParserInput]) -> Vec<Result<Document, TomlError>> {
        inputs.par_iter().map(|input| self.parse_input(input)).collect()
    }

    /// Reads and converts every path in parallel. Results line up with `paths`.
    pub fn parse_paths(&self, paths: &[PathBuf]) -> Vec<Result<Document, TomlError>> {
        paths.par_iter().map(|path| self.parse_path(path)).collect()
    }
}

/// Fails when printing `document` does not give back `source`.
pub fn verify_round_trip(document: &Document, source: &str, name: &str) -> Result<(), TomlError> {
    let printed = document.print();
    if printed == source {
        return Ok(());
    }
    let offset = printed
        .char_indices()
        .zip(source.chars())
        .find(|((_, a), b)| a != b)
        .map(|((i, _), _)| i)
        .unwrap_or_else(|| printed.len().min(source.len()));
    let src = named_source(name, source);
    Err(err_ctx!(
        RoundTrip,
        format!(
            "printed document differs from the input at byte {} ({} bytes printed, {} read)",
            offset,
            printed.len(),
            source.len()
        ),
        &src,
        Span::point(offset),
        "the tree lost or duplicated source text here"
    ))
}
