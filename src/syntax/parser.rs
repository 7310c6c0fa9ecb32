//! TOML grammar driver.
//!
//! Runs the PEG grammar over decoded text and hands back the root
//! [`DocumentContext`]. Grammar failures become [`TomlError::Parse`]
//! diagnostics pointing at the offending location.

use pest::{error::Error, Parser};
use pest_derive::Parser;

use crate::diagnostics::{named_source, TomlError};
use crate::err_ctx;
use crate::syntax::context::{DocumentContext, RuleContext};
use crate::syntax::Span;

#[derive(Parser)]
#[grammar = "syntax/grammar.pest"]
pub struct TomlGrammar;

/// Parses `source` into its concrete parse tree. `name` is only used to label
/// diagnostics.
pub fn parse_document<'i>(source: &'i str, name: &str) -> Result<DocumentContext<'i>, TomlError> {
    let mut pairs = TomlGrammar::parse(Rule::document, source)
        .map_err(|e| convert_parse_error(e, source, name))?;

    pairs
        .next()
        .map(RuleContext::new)
        .and_then(DocumentContext::from_context)
        .ok_or_else(|| {
            let src = named_source(name, source);
            err_ctx!(
                Grammar,
                "grammar produced no document node",
                &src,
                Span::point(0)
            )
        })
}

fn convert_parse_error(error: Error<Rule>, source: &str, name: &str) -> TomlError {
    let span = match error.location {
        pest::error::InputLocation::Pos(pos) => Span::point(pos),
        pest::error::InputLocation::Span((start, end)) => Span::new(start, end),
    };

    let message = match &error.variant {
        pest::error::ErrorVariant::ParsingError { positives, .. } if positives.is_empty() => {
            "unexpected input".to_string()
        }
        pest::error::ErrorVariant::ParsingError { positives, .. } => {
            let expected: Vec<String> = positives.iter().map(describe_rule).collect();
            format!("expected {}", expected.join(", "))
        }
        pest::error::ErrorVariant::CustomError { message } => message.clone(),
    };

    let help = if source[span.start.min(source.len())..].starts_with('=') {
        Some("a key is required before '='")
    } else if message.contains("newline") {
        Some("each key/value pair and table header must be on its own line")
    } else {
        None
    };

    let src = named_source(name, source);
    let err = match help {
        Some(help) => err_ctx!(Parse, message, &src, span, help),
        None => err_ctx!(Parse, message, &src, span),
    };
    err.with_cause(error)
}

fn describe_rule(rule: &Rule) -> String {
    match rule {
        Rule::EOI => "end of file".into(),
        Rule::key | Rule::simple_key | Rule::unquoted_key | Rule::quoted_key => "key".into(),
        Rule::equals => "'='".into(),
        Rule::value => "value".into(),
        Rule::comment => "comment".into(),
        Rule::expression | Rule::key_value => "key/value pair".into(),
        Rule::table | Rule::standard_table | Rule::array_table => "table header".into(),
        other => format!("{:?}", other).replace('_', " "),
    }
}
