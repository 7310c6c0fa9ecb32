//! Best-effort classification of scalar values.
//!
//! The result is a hint next to the verbatim text, not a normalized value:
//! string escapes are left alone and numbers that do not fit are left
//! unclassified.

use crate::syntax::{ParseNode, Rule, TerminalContext};
use crate::tree::{DateTimeKind, LiteralValue, StringStyle};

pub(crate) fn classify_string(ctx: &TerminalContext<'_>) -> Option<LiteralValue> {
    let style = match ctx.variant()? {
        Rule::basic_string => StringStyle::Basic,
        Rule::ml_basic_string => StringStyle::MultiLineBasic,
        Rule::literal_string => StringStyle::Literal,
        Rule::ml_literal_string => StringStyle::MultiLineLiteral,
        _ => return None,
    };
    let text = ctx.text();
    let delimiter = style.delimiter().len();
    let content = text.get(delimiter..text.len().checked_sub(delimiter)?)?;
    Some(LiteralValue::String {
        style,
        content: content.to_string(),
    })
}

pub(crate) fn classify_integer(text: &str) -> Option<LiteralValue> {
    let cleaned: String = text.chars().filter(|c| *c != '_').collect();
    let (radix, digits) = match cleaned.get(..2) {
        Some("0x") => (16, &cleaned[2..]),
        Some("0o") => (8, &cleaned[2..]),
        Some("0b") => (2, &cleaned[2..]),
        _ => (10, cleaned.as_str()),
    };
    i64::from_str_radix(digits, radix)
        .ok()
        .map(LiteralValue::Integer)
}

pub(crate) fn classify_float(text: &str) -> Option<LiteralValue> {
    let cleaned: String = text.chars().filter(|c| *c != '_').collect();
    let value = match cleaned.as_str() {
        "inf" | "+inf" => f64::INFINITY,
        "-inf" => f64::NEG_INFINITY,
        "nan" | "+nan" | "-nan" => f64::NAN,
        other => other.parse().ok()?,
    };
    Some(LiteralValue::Float(value))
}

pub(crate) fn classify_boolean(text: &str) -> Option<LiteralValue> {
    match text {
        "true" => Some(LiteralValue::Boolean(true)),
        "false" => Some(LiteralValue::Boolean(false)),
        _ => None,
    }
}

pub(crate) fn classify_date_time(ctx: &TerminalContext<'_>) -> Option<LiteralValue> {
    let kind = match ctx.variant()? {
        Rule::offset_date_time => DateTimeKind::OffsetDateTime,
        Rule::local_date_time => DateTimeKind::LocalDateTime,
        Rule::local_date => DateTimeKind::LocalDate,
        Rule::local_time => DateTimeKind::LocalTime,
        _ => return None,
    };
    Some(LiteralValue::DateTime {
        kind,
        text: ctx.text().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers() {
        assert_eq!(classify_integer("42"), Some(LiteralValue::Integer(42)));
        assert_eq!(classify_integer("+17"), Some(LiteralValue::Integer(17)));
        assert_eq!(classify_integer("-1_000"), Some(LiteralValue::Integer(-1000)));
        assert_eq!(classify_integer("0xdead_BEEF"), Some(LiteralValue::Integer(0xdead_beef)));
        assert_eq!(classify_integer("0o755"), Some(LiteralValue::Integer(0o755)));
        assert_eq!(classify_integer("0b1101"), Some(LiteralValue::Integer(13)));
    }

    #[test]
    fn test_integer_overflow_is_unclassified() {
        assert_eq!(classify_integer("9223372036854775808"), None);
        assert_eq!(
            classify_integer("-9223372036854775808"),
            Some(LiteralValue::Integer(i64::MIN))
        );
    }

    #[test]
    fn test_floats() {
        assert_eq!(classify_float("6.25"), Some(LiteralValue::Float(6.25)));
        assert_eq!(classify_float("-0.01"), Some(LiteralValue::Float(-0.01)));
        assert_eq!(classify_float("5e+22"), Some(LiteralValue::Float(5e22)));
        assert_eq!(classify_float("224_617.445_991"), Some(LiteralValue::Float(224617.445991)));
        assert_eq!(classify_float("-inf"), Some(LiteralValue::Float(f64::NEG_INFINITY)));
        match classify_float("nan") {
            Some(LiteralValue::Float(f)) => assert!(f.is_nan()),
            other => panic!("expected NaN, got {:?}", other),
        }
    }

    #[test]
    fn test_booleans() {
        assert_eq!(classify_boolean("true"), Some(LiteralValue::Boolean(true)));
        assert_eq!(classify_boolean("false"), Some(LiteralValue::Boolean(false)));
        assert_eq!(classify_boolean("True"), None);
    }
}
