//! Parse-tree to LST conversion.
//!
//! [`LstBuilder`] walks the typed parse tree once, top to bottom, threading a
//! forward-only [`Cursor`] through every call. Before a node is built, the
//! text between the cursor and the node's first token becomes the node's
//! prefix [`Space`]. After it is built, the cursor moves past the node's last
//! character. Every byte of the source therefore lands in exactly one prefix
//! or exactly one node, and the end-of-file space picks up whatever is left.
//!
//! A builder owns its cursor and borrows one source, so independent documents
//! can be converted in parallel without coordination.

use std::path::PathBuf;

use tracing::{debug, trace};

use crate::diagnostics::{named_source, SourceArc, TomlError};
use crate::err_ctx;
use crate::syntax::{
    AlternativeMismatch, CommentContext, DocumentContext, ExpressionAlternative,
    ExpressionContext, KeyContext, KeyValueContext, ParseNode, RuleContext, Span,
    TableAlternative, TableContext, ValueAlternative, ValueContext,
};
use crate::tree::{
    random_id, Checksum, Comment, Document, Expression, FileAttributes, Key, KeyValue, Literal,
    LiteralKind, Markers, Space, Table, TableKind, TomlValue,
};

pub mod cursor;
mod literal;

pub use cursor::Cursor;

use literal::{
    classify_boolean, classify_date_time, classify_float, classify_integer, classify_string,
};

/// Converts one document's parse tree into its lossless tree.
pub struct LstBuilder<'s> {
    source: &'s str,
    path: PathBuf,
    charset_name: String,
    charset_bom_marked: bool,
    checksum: Option<Checksum>,
    file_attributes: Option<FileAttributes>,
    cursor: Cursor,
    #[cfg(test)]
    steps: Vec<usize>,
}

impl<'s> LstBuilder<'s> {
    pub fn new(source: &'s str, path: impl Into<PathBuf>) -> Self {
        Self {
            source,
            path: path.into(),
            charset_name: "UTF-8".to_string(),
            charset_bom_marked: false,
            checksum: None,
            file_attributes: None,
            cursor: Cursor::new(),
            #[cfg(test)]
            steps: Vec::new(),
        }
    }

    pub fn charset(mut self, name: impl Into<String>, bom_marked: bool) -> Self {
        self.charset_name = name.into();
        self.charset_bom_marked = bom_marked;
        self
    }

    pub fn checksum(mut self, checksum: Option<Checksum>) -> Self {
        self.checksum = checksum;
        self
    }

    pub fn file_attributes(mut self, attributes: Option<FileAttributes>) -> Self {
        self.file_attributes = attributes;
        self
    }

    pub fn cursor(&self) -> usize {
        self.cursor.offset()
    }

    // ========================================================================
    // DOCUMENT ASSEMBLY
    // ========================================================================

    /// Converts the root rule. This is the only place a trailing space is
    /// captured: the document has no later sibling to hand it to.
    pub fn visit_document(&mut self, ctx: DocumentContext<'s>) -> Result<Document, TomlError> {
        debug!(path = %self.path.display(), bytes = self.source.len(), "converting document");
        let document = self.convert_node(ctx, |b, c, prefix| {
            let mut expressions = Vec::new();
            for expression in c.expression() {
                expressions.extend(b.visit_expression(Some(expression))?);
            }
            let eof = b.remaining_space()?;
            Ok(Document {
                id: random_id(),
                path: b.path.clone(),
                prefix,
                markers: Markers::EMPTY,
                charset_name: b.charset_name.clone(),
                charset_bom_marked: b.charset_bom_marked,
                checksum: b.checksum.clone(),
                file_attributes: b.file_attributes.clone(),
                expressions,
                eof,
            })
        })?;
        debug!(
            path = %self.path.display(),
            expressions = document.expressions.len(),
            "converted document"
        );
        Ok(document)
    }

    // ========================================================================
    // RULE BUILDERS
    // ========================================================================

    fn visit_expression(
        &mut self,
        ctx: Option<ExpressionContext<'s>>,
    ) -> Result<Option<Expression>, TomlError> {
        self.convert(ctx, |b, c, prefix| {
            let value = match c.alternative().map_err(|e| b.mismatch(e))? {
                Some(ExpressionAlternative::KeyValue(kv)) => {
                    b.visit_key_value(Some(kv))?.map(TomlValue::KeyValue)
                }
                Some(ExpressionAlternative::Table(table)) => {
                    b.visit_table(Some(table))?.map(TomlValue::Table)
                }
                None => None,
            };
            let comment = b.visit_comment(c.comment())?;
            Ok(Expression {
                id: random_id(),
                prefix,
                markers: Markers::EMPTY,
                value,
                comment,
            })
        })
    }

    fn visit_comment(
        &mut self,
        ctx: Option<CommentContext<'s>>,
    ) -> Result<Option<Comment>, TomlError> {
        self.convert(ctx, |_, c, prefix| {
            Ok(Comment {
                prefix,
                text: c.text().to_string(),
                markers: Markers::EMPTY,
            })
        })
    }

    fn visit_key_value(
        &mut self,
        ctx: Option<KeyValueContext<'s>>,
    ) -> Result<Option<KeyValue>, TomlError> {
        self.convert(ctx, |b, c, prefix| {
            let key = b.visit_key(c.key())?;
            let key = b.require(key, &c, "key")?;

            let equals = c.equals();
            let after_key = b.space_before_token(equals.as_ref())?;
            if let Some(equals) = &equals {
                b.skip_token(equals);
            }

            let value = b.visit_value(c.value())?;
            let value = b.require(value, &c, "value")?;
            Ok(KeyValue {
                id: random_id(),
                prefix,
                markers: Markers::EMPTY,
                key,
                after_key,
                value,
            })
        })
    }

    fn visit_key(&mut self, ctx: Option<KeyContext<'s>>) -> Result<Option<Key>, TomlError> {
        self.convert(ctx, |_, c, prefix| {
            Ok(Key {
                id: random_id(),
                prefix,
                markers: Markers::EMPTY,
                name: c.text().to_string(),
            })
        })
    }

    fn visit_value(&mut self, ctx: Option<ValueContext<'s>>) -> Result<Option<Literal>, TomlError> {
        self.convert(ctx, |b, c, prefix| {
            let (kind, value) = match c.alternative().map_err(|e| b.mismatch(e))? {
                ValueAlternative::String(t) => (LiteralKind::String, classify_string(&t)),
                ValueAlternative::Integer(t) => (LiteralKind::Integer, classify_integer(t.text())),
                ValueAlternative::Float(t) => (LiteralKind::Float, classify_float(t.text())),
                ValueAlternative::Boolean(t) => (LiteralKind::Boolean, classify_boolean(t.text())),
                ValueAlternative::DateTime(t) => (LiteralKind::DateTime, classify_date_time(&t)),
                ValueAlternative::Array(array) => {
                    b.visit_unsupported(array.rule_context().clone())?;
                    (LiteralKind::Array, None)
                }
                ValueAlternative::InlineTable(table) => {
                    b.visit_unsupported(table.rule_context().clone())?;
                    (LiteralKind::InlineTable, None)
                }
            };
            Ok(Literal {
                id: random_id(),
                prefix,
                markers: Markers::EMPTY,
                source: c.text().to_string(),
                kind,
                value,
            })
        })
    }

    /// Table headers consume their full span but carry no structured payload yet.
    fn visit_table(&mut self, ctx: Option<TableContext<'s>>) -> Result<Option<Table>, TomlError> {
        self.convert(ctx, |b, c, prefix| {
            let kind = match c.alternative().map_err(|e| b.mismatch(e))? {
                TableAlternative::Standard(header) => {
                    b.visit_unsupported(header.rule_context().clone())?;
                    TableKind::Standard
                }
                TableAlternative::Array(header) => {
                    b.visit_unsupported(header.rule_context().clone())?;
                    TableKind::Array
                }
            };
            Ok(Table {
                id: random_id(),
                prefix,
                markers: Markers::EMPTY,
                kind,
                source: c.text().to_string(),
                value: None,
            })
        })
    }

    /// Generic traversal for constructs that have no structured builder. The
    /// span is consumed child by child and nothing is produced.
    fn visit_unsupported(&mut self, ctx: RuleContext<'s>) -> Result<(), TomlError> {
        trace!(rule = ?ctx.rule(), span = ?ctx.span(), "traversing unsupported construct");
        self.visit_children(ctx)
    }

    fn visit_children(&mut self, ctx: RuleContext<'s>) -> Result<(), TomlError> {
        self.convert_node(ctx, |b, c, _prefix| {
            for child in c.children() {
                b.visit_children(child)?;
            }
            Ok(())
        })
    }

    // ========================================================================
    // CONVERSION PROTOCOL
    // ========================================================================

    /// Converts an optional node. An absent node produces nothing and leaves
    /// the cursor where it is.
    fn convert<C, T>(
        &mut self,
        ctx: Option<C>,
        build: impl FnOnce(&mut Self, C, Space) -> Result<T, TomlError>,
    ) -> Result<Option<T>, TomlError>
    where
        C: ParseNode<'s>,
    {
        ctx.map(|c| self.convert_node(c, build)).transpose()
    }

    fn convert_node<C, T>(
        &mut self,
        ctx: C,
        build: impl FnOnce(&mut Self, C, Space) -> Result<T, TomlError>,
    ) -> Result<T, TomlError>
    where
        C: ParseNode<'s>,
    {
        let start = ctx.start();
        let stop = ctx.stop();
        trace!(rule = ?ctx.rule(), start, ?stop, cursor = self.cursor.offset(), "convert");

        let prefix = self.space_before(start)?;
        let node = build(self, ctx, prefix)?;
        if let Some(stop) = stop {
            self.advance_past(stop)?;
        }
        Ok(node)
    }

    // ========================================================================
    // SPACE EXTRACTION
    // ========================================================================

    /// The verbatim text between the cursor and `start`. A token the cursor
    /// already passed gets an empty space and the cursor stays put.
    fn space_before(&mut self, start: usize) -> Result<Space, TomlError> {
        let source = self.source;
        let cursor = self.cursor.offset();
        if start < cursor {
            return Ok(Space::EMPTY);
        }
        let text = source.get(cursor..start).ok_or_else(|| {
            self.cursor_error(
                format!("cannot take space between offsets {} and {}", cursor, start),
                Span::new(cursor, start),
            )
        })?;
        self.move_cursor(start);
        Ok(Space::format(text))
    }

    /// Like [`Self::space_before`] for a token that may be syntactically absent.
    fn space_before_token(
        &mut self,
        token: Option<&impl ParseNode<'s>>,
    ) -> Result<Space, TomlError> {
        match token {
            Some(token) => self.space_before(token.start()),
            None => Ok(Space::EMPTY),
        }
    }

    /// Moves past a token that has no node of its own.
    fn skip_token(&mut self, token: &impl ParseNode<'s>) {
        self.move_cursor(token.span().end);
    }

    /// Moves the cursor past the character at `stop`. A whitespace character
    /// is left for the next prefix. A stop at or beyond the end of the text
    /// clamps the cursor to the end without reading anything.
    fn advance_past(&mut self, stop: usize) -> Result<(), TomlError> {
        if stop >= self.source.len() {
            self.move_cursor(self.source.len());
            return Ok(());
        }
        let last = self
            .source
            .get(stop..)
            .and_then(|rest| rest.chars().next())
            .ok_or_else(|| {
                self.cursor_error(
                    format!("stop offset {} is not on a character boundary", stop),
                    Span::point(stop),
                )
            })?;
        if last.is_whitespace() {
            self.move_cursor(stop);
        } else {
            self.move_cursor(stop + last.len_utf8());
        }
        Ok(())
    }

    fn remaining_space(&mut self) -> Result<Space, TomlError> {
        let source = self.source;
        let cursor = self.cursor.offset();
        let rest = source.get(cursor..).ok_or_else(|| {
            self.cursor_error(
                format!("cursor {} is outside the source", cursor),
                Span::point(cursor),
            )
        })?;
        self.move_cursor(self.source.len());
        Ok(Space::format(rest))
    }

    fn move_cursor(&mut self, offset: usize) {
        self.cursor.advance_to(offset);
        #[cfg(test)]
        self.steps.push(self.cursor.offset());
    }

    // ========================================================================
    // ERRORS
    // ========================================================================

    fn named_source(&self) -> SourceArc {
        named_source(self.path.display().to_string(), self.source)
    }

    fn mismatch(&self, mismatch: AlternativeMismatch) -> TomlError {
        let src = self.named_source();
        let message = mismatch.to_string();
        let span = mismatch.span;
        err_ctx!(
            Grammar,
            message,
            &src,
            span,
            "the grammar and the tree builder disagree about this rule's shape"
        )
        .with_cause(mismatch)
    }

    fn require<T>(
        &self,
        node: Option<T>,
        parent: &impl ParseNode<'s>,
        slot: &str,
    ) -> Result<T, TomlError> {
        node.ok_or_else(|| {
            let src = self.named_source();
            err_ctx!(
                Grammar,
                format!("`{:?}` is missing its {} slot", parent.rule(), slot),
                &src,
                parent.span()
            )
        })
    }

    fn cursor_error(&self, message: String, span: Span) -> TomlError {
        let src = self.named_source();
        let span = Span::new(
            span.start.min(self.source.len()),
            span.end.min(self.source.len()),
        );
        err_ctx!(Cursor, message, &src, span)
    }
}
