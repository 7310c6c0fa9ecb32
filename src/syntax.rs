//! The grammar front end.
//!
//! [`parser`] runs the PEG grammar over decoded text and [`context`] exposes
//! the resulting concrete parse tree as typed rule contexts. Nothing in this
//! module knows about whitespace attribution; that is the converter's job.

use serde::{Deserialize, Serialize};

pub mod context;
pub mod parser;

pub use context::{
    AlternativeMismatch, ArrayContext, ArrayTableContext, CommentContext, DocumentContext,
    ExpressionAlternative, ExpressionContext, InlineTableContext, KeyContext, KeyValueContext,
    ParseNode, RuleContext, StandardTableContext, TableAlternative, TableContext,
    TerminalContext, ValueAlternative, ValueContext,
};
pub use parser::{parse_document, Rule, TomlGrammar};

/// A half-open byte range in the source text.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn point(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<pest::Span<'_>> for Span {
    fn from(span: pest::Span<'_>) -> Self {
        Self {
            start: span.start(),
            end: span.end(),
        }
    }
}
