//! Typed rule contexts over the pest parse tree.
//!
//! Each grammar rule the converter cares about gets a thin wrapper exposing
//! its start and stop offsets, its verbatim text, and one nullable accessor
//! per sub-rule slot. A slot accessor returns `None` when that production did
//! not match. Rules with mutually exclusive productions also offer an
//! `alternative()` that selects the single matched production once, as a
//! tagged union, and reports a mismatch instead of guessing.

use pest::iterators::Pair;
use thiserror::Error;

use crate::syntax::parser::Rule;
use crate::syntax::Span;

/// Positional view of a parse-tree node.
///
/// `stop` is the byte offset of the node's last character, or `None` when the
/// node matched no text at all.
pub trait ParseNode<'i> {
    fn rule_context(&self) -> &RuleContext<'i>;

    fn rule(&self) -> Rule {
        self.rule_context().rule()
    }

    fn start(&self) -> usize {
        self.rule_context().start()
    }

    fn stop(&self) -> Option<usize> {
        self.rule_context().stop()
    }

    fn text(&self) -> &'i str {
        self.rule_context().text()
    }

    fn span(&self) -> Span {
        self.rule_context().span()
    }
}

/// Untyped node of the concrete parse tree.
#[derive(Debug, Clone)]
pub struct RuleContext<'i> {
    pair: Pair<'i, Rule>,
}

impl<'i> RuleContext<'i> {
    pub fn new(pair: Pair<'i, Rule>) -> Self {
        Self { pair }
    }

    pub fn rule(&self) -> Rule {
        self.pair.as_rule()
    }

    pub fn start(&self) -> usize {
        self.pair.as_span().start()
    }

    pub fn stop(&self) -> Option<usize> {
        let end = self.pair.as_span().end();
        self.pair
            .as_str()
            .chars()
            .next_back()
            .map(|last| end - last.len_utf8())
    }

    pub fn text(&self) -> &'i str {
        self.pair.as_str()
    }

    pub fn span(&self) -> Span {
        self.pair.as_span().into()
    }

    /// Direct children in source order. The end-of-input marker is not a child.
    pub fn children(&self) -> impl Iterator<Item = RuleContext<'i>> {
        self.pair
            .clone()
            .into_inner()
            .filter(|p| p.as_rule() != Rule::EOI)
            .map(RuleContext::new)
    }

    fn slot(&self, rule: Rule) -> Option<RuleContext<'i>> {
        self.children().find(|c| c.rule() == rule)
    }

    fn slots(&self, rule: Rule) -> Vec<RuleContext<'i>> {
        self.children().filter(|c| c.rule() == rule).collect()
    }
}

impl<'i> ParseNode<'i> for RuleContext<'i> {
    fn rule_context(&self) -> &RuleContext<'i> {
        self
    }
}

/// A leaf rule: a literal token such as `=`, a string, or a number.
///
/// Compound leaves (strings, integers, date-times) keep the production that
/// matched as their only child; [`TerminalContext::variant`] exposes it.
#[derive(Debug, Clone)]
pub struct TerminalContext<'i>(RuleContext<'i>);

impl<'i> TerminalContext<'i> {
    pub fn variant(&self) -> Option<Rule> {
        self.0.children().next().map(|c| c.rule())
    }
}

impl<'i> ParseNode<'i> for TerminalContext<'i> {
    fn rule_context(&self) -> &RuleContext<'i> {
        &self.0
    }
}

macro_rules! rule_contexts {
    ($(
        $(#[$meta:meta])*
        $name:ident($rule:ident) {
            $(one $slot:ident: $slot_ty:ident;)*
            $(many $many:ident: $many_ty:ident;)*
        }
    )*) => {$(
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name<'i>(RuleContext<'i>);

        impl<'i> $name<'i> {
            pub const RULE: Rule = Rule::$rule;

            /// Wraps a raw context, or `None` if it belongs to another rule.
            pub fn from_context(ctx: RuleContext<'i>) -> Option<Self> {
                (ctx.rule() == Self::RULE).then_some(Self(ctx))
            }

            $(
                pub fn $slot(&self) -> Option<$slot_ty<'i>> {
                    self.0.slot(Rule::$slot).map($slot_ty)
                }
            )*

            $(
                pub fn $many(&self) -> Vec<$many_ty<'i>> {
                    self.0.slots(Rule::$many).into_iter().map($many_ty).collect()
                }
            )*
        }

        impl<'i> ParseNode<'i> for $name<'i> {
            fn rule_context(&self) -> &RuleContext<'i> {
                &self.0
            }
        }
    )*};
}

rule_contexts! {
    /// The whole file.
    DocumentContext(document) {
        many expression: ExpressionContext;
    }

    /// One key/value or table line, plus its inline comment.
    ExpressionContext(expression) {
        one key_value: KeyValueContext;
        one table: TableContext;
        one comment: CommentContext;
    }

    CommentContext(comment) {}

    KeyValueContext(key_value) {
        one key: KeyContext;
        one equals: TerminalContext;
        one value: ValueContext;
    }

    KeyContext(key) {}

    ValueContext(value) {
        one string: TerminalContext;
        one integer: TerminalContext;
        one floating_point: TerminalContext;
        one boolean: TerminalContext;
        one date_time: TerminalContext;
        one array: ArrayContext;
        one inline_table: InlineTableContext;
    }

    ArrayContext(array) {
        many value: ValueContext;
    }

    InlineTableContext(inline_table) {
        many key_value: KeyValueContext;
    }

    TableContext(table) {
        one standard_table: StandardTableContext;
        one array_table: ArrayTableContext;
    }

    StandardTableContext(standard_table) {
        one key: KeyContext;
    }

    ArrayTableContext(array_table) {
        one key: KeyContext;
    }
}

/// A rule matched a number of productions its shape does not allow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("rule `{rule:?}` matched {matched} alternatives, expected {expected}")]
pub struct AlternativeMismatch {
    pub rule: Rule,
    pub span: Span,
    pub matched: usize,
    pub expected: &'static str,
}

/// Picks the single present candidate, if any. More than one is a mismatch.
pub(crate) fn at_most_one<'i, A>(
    ctx: &impl ParseNode<'i>,
    candidates: impl IntoIterator<Item = Option<A>>,
) -> Result<Option<A>, AlternativeMismatch> {
    let mut matched = candidates.into_iter().flatten();
    let first = matched.next();
    let extra = matched.count();
    if extra > 0 {
        return Err(AlternativeMismatch {
            rule: ctx.rule(),
            span: ctx.span(),
            matched: extra + 1,
            expected: "at most one",
        });
    }
    Ok(first)
}

/// Picks the single present candidate. None, or more than one, is a mismatch.
pub(crate) fn exactly_one<'i, A>(
    ctx: &impl ParseNode<'i>,
    candidates: impl IntoIterator<Item = Option<A>>,
) -> Result<A, AlternativeMismatch> {
    at_most_one(ctx, candidates)
        .map_err(|e| AlternativeMismatch {
            expected: "exactly one",
            ..e
        })?
        .ok_or_else(|| AlternativeMismatch {
            rule: ctx.rule(),
            span: ctx.span(),
            matched: 0,
            expected: "exactly one",
        })
}

/// The productions of `expression`. A blank expression has none.
#[derive(Debug, Clone)]
pub enum ExpressionAlternative<'i> {
    KeyValue(KeyValueContext<'i>),
    Table(TableContext<'i>),
}

impl<'i> ExpressionContext<'i> {
    pub fn alternative(&self) -> Result<Option<ExpressionAlternative<'i>>, AlternativeMismatch> {
        at_most_one(
            self,
            [
                self.key_value().map(ExpressionAlternative::KeyValue),
                self.table().map(ExpressionAlternative::Table),
            ],
        )
    }
}

/// The productions of `value`.
#[derive(Debug, Clone)]
pub enum ValueAlternative<'i> {
    String(TerminalContext<'i>),
    Integer(TerminalContext<'i>),
    Float(TerminalContext<'i>),
    Boolean(TerminalContext<'i>),
    DateTime(TerminalContext<'i>),
    Array(ArrayContext<'i>),
    InlineTable(InlineTableContext<'i>),
}

impl<'i> ValueContext<'i> {
    pub fn alternative(&self) -> Result<ValueAlternative<'i>, AlternativeMismatch> {
        exactly_one(
            self,
            [
                self.string().map(ValueAlternative::String),
                self.integer().map(ValueAlternative::Integer),
                self.floating_point().map(ValueAlternative::Float),
                self.boolean().map(ValueAlternative::Boolean),
                self.date_time().map(ValueAlternative::DateTime),
                self.array().map(ValueAlternative::Array),
                self.inline_table().map(ValueAlternative::InlineTable),
            ],
        )
    }
}

/// The productions of `table`.
#[derive(Debug, Clone)]
pub enum TableAlternative<'i> {
    Standard(StandardTableContext<'i>),
    Array(ArrayTableContext<'i>),
}

impl<'i> TableContext<'i> {
    pub fn alternative(&self) -> Result<TableAlternative<'i>, AlternativeMismatch> {
        exactly_one(
            self,
            [
                self.standard_table().map(TableAlternative::Standard),
                self.array_table().map(TableAlternative::Array),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parser::parse_document;

    fn first_expression(source: &str) -> ExpressionContext<'_> {
        let document = parse_document(source, "test.toml").unwrap();
        document.expression().into_iter().next().unwrap()
    }

    #[test]
    fn test_offsets_and_text() {
        let expr = first_expression("  name = \"toml\" # note\n");
        assert_eq!(expr.start(), 2);
        assert_eq!(expr.text(), "name = \"toml\" # note");
        assert_eq!(expr.stop(), Some(21));
        let kv = expr.key_value().unwrap();
        assert_eq!(kv.key().unwrap().text(), "name");
        assert_eq!(kv.equals().unwrap().start(), 7);
        assert_eq!(kv.value().unwrap().text(), "\"toml\"");
        assert_eq!(expr.comment().unwrap().text(), "# note");
    }

    #[test]
    fn test_stop_of_multibyte_tail() {
        let expr = first_expression("k = \"é\"");
        let value = expr.key_value().unwrap().value().unwrap();
        // The closing quote is one byte; the accented char before it is two.
        assert_eq!(value.start(), 4);
        assert_eq!(value.stop(), Some(7));
        assert_eq!(value.span(), Span::new(4, 8));
    }

    #[test]
    fn test_absent_slots_are_none() {
        let expr = first_expression("[server]");
        assert!(expr.key_value().is_none());
        assert!(expr.comment().is_none());
        let table = expr.table().unwrap();
        assert!(table.array_table().is_none());
        assert_eq!(table.standard_table().unwrap().key().unwrap().text(), "server");
    }

    #[test]
    fn test_value_alternatives() {
        let cases = [
            ("v = 'x'", "String"),
            ("v = 0xFF", "Integer"),
            ("v = 6.5e-3", "Float"),
            ("v = false", "Boolean"),
            ("v = 1979-05-27", "DateTime"),
            ("v = [1, 2]", "Array"),
            ("v = { a = 1 }", "InlineTable"),
        ];
        for (source, expected) in cases {
            let value = first_expression(source).key_value().unwrap().value().unwrap();
            let tag = match value.alternative().unwrap() {
                ValueAlternative::String(_) => "String",
                ValueAlternative::Integer(_) => "Integer",
                ValueAlternative::Float(_) => "Float",
                ValueAlternative::Boolean(_) => "Boolean",
                ValueAlternative::DateTime(_) => "DateTime",
                ValueAlternative::Array(_) => "Array",
                ValueAlternative::InlineTable(_) => "InlineTable",
            };
            assert_eq!(tag, expected, "for {source}");
        }
    }

    #[test]
    fn test_terminal_variant() {
        let value = first_expression("v = '''raw'''").key_value().unwrap().value().unwrap();
        assert_eq!(value.string().unwrap().variant(), Some(Rule::ml_literal_string));
        let value = first_expression("v = 07:32:00").key_value().unwrap().value().unwrap();
        assert_eq!(value.date_time().unwrap().variant(), Some(Rule::local_time));
    }

    #[test]
    fn test_nested_accessors() {
        let value = first_expression("v = [1, [2], 3]").key_value().unwrap().value().unwrap();
        let array = value.array().unwrap();
        assert_eq!(array.value().len(), 3);
        let value = first_expression("v = { a = 1, b.c = 2 }").key_value().unwrap().value().unwrap();
        let keys: Vec<_> = value
            .inline_table()
            .unwrap()
            .key_value()
            .iter()
            .map(|kv| kv.key().unwrap().text())
            .collect();
        assert_eq!(keys, vec!["a", "b.c"]);
    }

    #[test]
    fn test_multiple_alternatives_is_mismatch() {
        let expr = first_expression("a = 1");
        let err = exactly_one(&expr, [Some(1), None, Some(2)]).unwrap_err();
        assert_eq!(err.matched, 2);
        assert_eq!(err.rule, Rule::expression);
        assert_eq!(err.expected, "exactly one");
    }

    #[test]
    fn test_no_alternative_is_mismatch() {
        let expr = first_expression("a = 1");
        let err = exactly_one::<u8>(&expr, [None, None]).unwrap_err();
        assert_eq!(err.matched, 0);
        assert_eq!(at_most_one::<u8>(&expr, [None, None]), Ok(None));
    }

    #[test]
    fn test_from_context_checks_rule() {
        let expr = first_expression("a = 1");
        let raw = expr.rule_context().clone();
        assert!(ExpressionContext::from_context(raw.clone()).is_some());
        assert!(TableContext::from_context(raw).is_none());
    }
}
