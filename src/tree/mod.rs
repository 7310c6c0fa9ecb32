//! The lossless semantic tree.
//!
//! Every node carries a unique id, the verbatim [`Space`] preceding it, and a
//! [`Markers`] bag for later stages. Concatenating every node's prefix and
//! its own text in tree order, followed by the document's end-of-file space,
//! yields the original source exactly.
//!
//! Trees are immutable once built. The `with_*` methods return new values.

use std::path::PathBuf;

use serde::Serialize;
use uuid::Uuid;

pub mod file;
pub mod markers;
pub mod space;

pub use file::{Checksum, FileAttributes};
pub use markers::{Marker, Markers};
pub use space::Space;

/// Fresh, process-wide unique node identity.
pub fn random_id() -> Uuid {
    Uuid::new_v4()
}

/// Accessors shared by every tree node.
pub trait TomlNode: Sized {
    fn id(&self) -> Uuid;

    fn prefix(&self) -> &Space;

    fn markers(&self) -> &Markers;

    fn with_prefix(self, prefix: Space) -> Self;

    fn with_markers(self, markers: Markers) -> Self;
}

macro_rules! impl_toml_node {
    ($($node:ty),* $(,)?) => {$(
        impl TomlNode for $node {
            fn id(&self) -> Uuid {
                self.id
            }

            fn prefix(&self) -> &Space {
                &self.prefix
            }

            fn markers(&self) -> &Markers {
                &self.markers
            }

            fn with_prefix(self, prefix: Space) -> Self {
                Self { prefix, ..self }
            }

            fn with_markers(self, markers: Markers) -> Self {
                Self { markers, ..self }
            }
        }
    )*};
}

impl_toml_node!(Document, Expression, KeyValue, Key, Literal, Table);

// ============================================================================
// DOCUMENT & EXPRESSIONS
// ============================================================================

/// Root of the tree: one TOML file.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub id: Uuid,
    pub path: PathBuf,
    pub prefix: Space,
    #[serde(skip)]
    pub markers: Markers,
    pub charset_name: String,
    pub charset_bom_marked: bool,
    pub checksum: Option<Checksum>,
    pub file_attributes: Option<FileAttributes>,
    pub expressions: Vec<Expression>,
    /// Whitespace and comments after the last expression.
    pub eof: Space,
}

impl Document {
    /// All top-level key/value pairs, in declaration order.
    pub fn key_values(&self) -> impl Iterator<Item = &KeyValue> {
        self.expressions.iter().filter_map(Expression::key_value)
    }

    /// All table headers, in declaration order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.expressions.iter().filter_map(Expression::table)
    }

    pub fn with_expressions(self, expressions: Vec<Expression>) -> Self {
        Self {
            expressions,
            ..self
        }
    }

    pub fn with_eof(self, eof: Space) -> Self {
        Self { eof, ..self }
    }
}

/// One top-level line: a key/value pair or a table header, plus an optional
/// inline comment.
#[derive(Debug, Clone, Serialize)]
pub struct Expression {
    pub id: Uuid,
    pub prefix: Space,
    #[serde(skip)]
    pub markers: Markers,
    pub value: Option<TomlValue>,
    pub comment: Option<Comment>,
}

impl Expression {
    pub fn key_value(&self) -> Option<&KeyValue> {
        match &self.value {
            Some(TomlValue::KeyValue(kv)) => Some(kv),
            _ => None,
        }
    }

    pub fn table(&self) -> Option<&Table> {
        match &self.value {
            Some(TomlValue::Table(table)) => Some(table),
            _ => None,
        }
    }
}

/// The semantic content of an [`Expression`].
#[derive(Debug, Clone, Serialize)]
pub enum TomlValue {
    KeyValue(KeyValue),
    Table(Table),
}

/// A `#` comment trailing an expression on the same line.
#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    /// Blanks between the expression and the `#`.
    pub prefix: Space,
    pub text: String,
    #[serde(skip)]
    pub markers: Markers,
}

// ============================================================================
// KEY/VALUE PAIRS
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct KeyValue {
    pub id: Uuid,
    pub prefix: Space,
    #[serde(skip)]
    pub markers: Markers,
    pub key: Key,
    /// Blanks between the key and `=`. The blanks after `=` are the value's prefix.
    pub after_key: Space,
    pub value: Literal,
}

/// A bare, quoted or dotted key, kept exactly as written.
#[derive(Debug, Clone, Serialize)]
pub struct Key {
    pub id: Uuid,
    pub prefix: Space,
    #[serde(skip)]
    pub markers: Markers,
    pub name: String,
}

/// A value, kept verbatim, plus a best-effort classification.
#[derive(Debug, Clone, Serialize)]
pub struct Literal {
    pub id: Uuid,
    pub prefix: Space,
    #[serde(skip)]
    pub markers: Markers,
    /// The literal exactly as written.
    pub source: String,
    pub kind: LiteralKind,
    /// Structured hint. `None` for arrays and inline tables, and for numbers
    /// that do not fit their Rust type.
    pub value: Option<LiteralValue>,
}

impl Literal {
    pub fn as_bool(&self) -> Option<bool> {
        match self.value {
            Some(LiteralValue::Boolean(b)) => Some(b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self.value {
            Some(LiteralValue::Integer(i)) => Some(i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self.value {
            Some(LiteralValue::Float(f)) => Some(f),
            _ => None,
        }
    }

    /// Raw string content between the delimiters, escapes untouched.
    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            Some(LiteralValue::String { content, .. }) => Some(content),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LiteralKind {
    String,
    Integer,
    Float,
    Boolean,
    DateTime,
    Array,
    InlineTable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LiteralValue {
    String { style: StringStyle, content: String },
    Integer(i64),
    Float(f64),
    Boolean(bool),
    DateTime { kind: DateTimeKind, text: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StringStyle {
    Basic,
    MultiLineBasic,
    Literal,
    MultiLineLiteral,
}

impl StringStyle {
    pub fn delimiter(&self) -> &'static str {
        match self {
            StringStyle::Basic => "\"",
            StringStyle::MultiLineBasic => "\"\"\"",
            StringStyle::Literal => "'",
            StringStyle::MultiLineLiteral => "'''",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DateTimeKind {
    OffsetDateTime,
    LocalDateTime,
    LocalDate,
    LocalTime,
}

// ============================================================================
// TABLES
// ============================================================================

/// A `[table]` or `[[array.of.tables]]` header.
///
/// The header is kept verbatim in `source`; `value` has no structured form yet.
#[derive(Debug, Clone, Serialize)]
pub struct Table {
    pub id: Uuid,
    pub prefix: Space,
    #[serde(skip)]
    pub markers: Markers,
    pub kind: TableKind,
    pub source: String,
    pub value: Option<TableValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TableKind {
    Standard,
    Array,
}

/// Structured table header payload. No variants exist yet, so a parsed
/// [`Table`] always carries `None`.
#[derive(Debug, Clone, Serialize)]
#[non_exhaustive]
pub enum TableValue {}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str) -> Key {
        Key {
            id: random_id(),
            prefix: Space::EMPTY,
            markers: Markers::EMPTY,
            name: name.to_string(),
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let a = key("a");
        let b = key("a");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_with_prefix_returns_new_value() {
        let original = key("name");
        let id = original.id();
        let moved = original.clone().with_prefix(Space::format("  "));
        assert_eq!(moved.prefix().as_str(), "  ");
        assert_eq!(moved.id(), id);
        assert!(original.prefix().is_empty());
        assert!(moved.markers().is_empty());
    }

    #[test]
    fn test_literal_hints() {
        let literal = Literal {
            id: random_id(),
            prefix: Space::EMPTY,
            markers: Markers::EMPTY,
            source: "'x'".into(),
            kind: LiteralKind::String,
            value: Some(LiteralValue::String {
                style: StringStyle::Literal,
                content: "x".into(),
            }),
        };
        assert_eq!(literal.as_str(), Some("x"));
        assert_eq!(literal.as_integer(), None);
        assert_eq!(StringStyle::Literal.delimiter(), "'");
    }
}
