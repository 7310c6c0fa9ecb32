//! Prints a tree back to source text.
//!
//! Each node writes its prefix followed by its own text, in the order the
//! builder consumed them, then the document writes its end-of-file space.
//! For a tree fresh from the parser the output equals the input exactly.

use std::fmt::{self, Write};

use crate::diagnostics::TomlError;
use crate::encoding;
use crate::tree::{Comment, Document, Expression, Key, KeyValue, Literal, Table, TomlValue};

/// Writes tree nodes into any [`fmt::Write`] sink.
pub struct TomlPrinter<'w, W: Write> {
    out: &'w mut W,
}

impl<'w, W: Write> TomlPrinter<'w, W> {
    pub fn new(out: &'w mut W) -> Self {
        Self { out }
    }

    pub fn visit_document(&mut self, document: &Document) -> fmt::Result {
        self.out.write_str(document.prefix.as_str())?;
        for expression in &document.expressions {
            self.visit_expression(expression)?;
        }
        self.out.write_str(document.eof.as_str())
    }

    pub fn visit_expression(&mut self, expression: &Expression) -> fmt::Result {
        self.out.write_str(expression.prefix.as_str())?;
        match &expression.value {
            Some(TomlValue::KeyValue(kv)) => self.visit_key_value(kv)?,
            Some(TomlValue::Table(table)) => self.visit_table(table)?,
            None => {}
        }
        if let Some(comment) = &expression.comment {
            self.visit_comment(comment)?;
        }
        Ok(())
    }

    pub fn visit_key_value(&mut self, kv: &KeyValue) -> fmt::Result {
        self.out.write_str(kv.prefix.as_str())?;
        self.visit_key(&kv.key)?;
        self.out.write_str(kv.after_key.as_str())?;
        self.out.write_char('=')?;
        self.visit_literal(&kv.value)
    }

    pub fn visit_key(&mut self, key: &Key) -> fmt::Result {
        self.out.write_str(key.prefix.as_str())?;
        self.out.write_str(&key.name)
    }

    pub fn visit_literal(&mut self, literal: &Literal) -> fmt::Result {
        self.out.write_str(literal.prefix.as_str())?;
        self.out.write_str(&literal.source)
    }

    pub fn visit_table(&mut self, table: &Table) -> fmt::Result {
        self.out.write_str(table.prefix.as_str())?;
        self.out.write_str(&table.source)
    }

    pub fn visit_comment(&mut self, comment: &Comment) -> fmt::Result {
        self.out.write_str(comment.prefix.as_str())?;
        self.out.write_str(&comment.text)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        TomlPrinter::new(f).visit_document(self)
    }
}

impl Document {
    /// The document as source text.
    pub fn print(&self) -> String {
        self.to_string()
    }

    /// The document encoded in its original charset, BOM included.
    pub fn to_bytes(&self) -> Result<Vec<u8>, TomlError> {
        encoding::encode(&self.print(), &self.charset_name, self.charset_bom_marked)
    }
}
