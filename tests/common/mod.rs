//! Shared helpers for the integration tests.
#![allow(dead_code)]

use toml_lst::tree::{Document, TomlValue};
use toml_lst::TomlParser;

pub fn parse(source: &str) -> Document {
    TomlParser::default()
        .parse_str(source)
        .unwrap_or_else(|e| panic!("failed to parse {:?}: {}", source, e))
}

/// Every prefix and every piece of node text, in print order.
pub fn pieces(document: &Document) -> Vec<String> {
    let mut out = vec![document.prefix.to_string()];
    for expression in &document.expressions {
        out.push(expression.prefix.to_string());
        match &expression.value {
            Some(TomlValue::KeyValue(kv)) => {
                out.push(kv.prefix.to_string());
                out.push(kv.key.prefix.to_string());
                out.push(kv.key.name.clone());
                out.push(kv.after_key.to_string());
                out.push("=".to_string());
                out.push(kv.value.prefix.to_string());
                out.push(kv.value.source.clone());
            }
            Some(TomlValue::Table(table)) => {
                out.push(table.prefix.to_string());
                out.push(table.source.clone());
            }
            None => {}
        }
        if let Some(comment) = &expression.comment {
            out.push(comment.prefix.to_string());
            out.push(comment.text.clone());
        }
    }
    out.push(document.eof.to_string());
    out
}

/// Asserts that the pieces tile `source` from start to end with no gap and
/// no overlap.
pub fn assert_partition(document: &Document, source: &str) {
    let mut offset = 0;
    for piece in pieces(document) {
        assert!(
            source[offset..].starts_with(&piece),
            "piece {:?} does not continue {:?} at byte {}",
            piece,
            source,
            offset
        );
        offset += piece.len();
    }
    assert_eq!(offset, source.len(), "pieces do not cover {:?}", source);
}
