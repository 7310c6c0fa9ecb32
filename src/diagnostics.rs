//! Unified, `miette`-based diagnostics for the TOML tree builder.
//!
//! Every failure produced while decoding, parsing, or converting a document
//! is a [`TomlError`]. Errors are built with the `err_msg!` and `err_ctx!`
//! macros rather than by hand:
//!
//! - `err_msg!(Io, "cannot read {}", path)` for message-only errors.
//! - `err_ctx!(Parse, "unexpected token", src, span)` when a source and span
//!   are available, optionally followed by a help message.
//!
//! A failure anywhere in a document aborts that document's conversion. There
//! is no partial tree. Whether to report and continue with other files is up
//! to the caller.

use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode};
use thiserror::Error;

use crate::syntax::Span;

pub type SourceArc = Arc<NamedSource<String>>;

/// Type-safe classification of a [`TomlError`], mostly for tests and exit
/// reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// The grammar rejected the input text.
    Parse,
    /// A rule matched zero or several alternatives where exactly one was expected.
    Grammar,
    /// The cursor tried to slice outside the source.
    Cursor,
    /// The input bytes could not be decoded.
    Encoding,
    /// Reading the input failed.
    Io,
    /// The printed tree did not reproduce the input.
    RoundTrip,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Parse => "Parse",
            ErrorType::Grammar => "Grammar",
            ErrorType::Cursor => "Cursor",
            ErrorType::Encoding => "Encoding",
            ErrorType::Io => "Io",
            ErrorType::RoundTrip => "RoundTrip",
        }
    }

    /// Internal errors point at a defect in this crate or its grammar, not
    /// at the user's input.
    pub fn is_internal(&self) -> bool {
        matches!(self, ErrorType::Grammar | ErrorType::Cursor | ErrorType::RoundTrip)
    }
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Minimal error context for diagnostics.
#[derive(Debug, Default)]
pub struct ErrorContext {
    /// The source this error points into (if any).
    pub source: Option<SourceArc>,
    /// The primary span (if any).
    pub span: Option<Span>,
    /// An optional help message.
    pub help: Option<String>,
}

impl ErrorContext {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_source_and_span(source: SourceArc, span: Span) -> Self {
        Self {
            source: Some(source),
            span: Some(span),
            help: None,
        }
    }
}

/// Every failure mode of decoding, parsing and tree conversion.
#[derive(Debug, Error)]
pub enum TomlError {
    #[error("Parse error: {message}")]
    Parse {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
    #[error("Grammar inconsistency: {message}")]
    Grammar {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
    #[error("Cursor out of bounds: {message}")]
    Cursor {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
    #[error("Encoding error: {message}")]
    Encoding {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
    #[error("I/O error: {message}")]
    Io {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
    #[error("Round-trip mismatch: {message}")]
    RoundTrip {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
}

impl TomlError {
    fn get_ctx(&self) -> &ErrorContext {
        match self {
            TomlError::Parse { ctx, .. }
            | TomlError::Grammar { ctx, .. }
            | TomlError::Cursor { ctx, .. }
            | TomlError::Encoding { ctx, .. }
            | TomlError::Io { ctx, .. }
            | TomlError::RoundTrip { ctx, .. } => ctx,
        }
    }

    fn message(&self) -> &str {
        match self {
            TomlError::Parse { message, .. }
            | TomlError::Grammar { message, .. }
            | TomlError::Cursor { message, .. }
            | TomlError::Encoding { message, .. }
            | TomlError::Io { message, .. }
            | TomlError::RoundTrip { message, .. } => message,
        }
    }

    pub fn error_type(&self) -> ErrorType {
        match self {
            TomlError::Parse { .. } => ErrorType::Parse,
            TomlError::Grammar { .. } => ErrorType::Grammar,
            TomlError::Cursor { .. } => ErrorType::Cursor,
            TomlError::Encoding { .. } => ErrorType::Encoding,
            TomlError::Io { .. } => ErrorType::Io,
            TomlError::RoundTrip { .. } => ErrorType::RoundTrip,
        }
    }

    /// The primary span, if the error points into the source.
    pub fn span(&self) -> Option<Span> {
        self.get_ctx().span
    }

    /// Attaches a cause to this error.
    pub fn with_cause(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        let slot = match &mut self {
            TomlError::Parse { source, .. }
            | TomlError::Grammar { source, .. }
            | TomlError::Cursor { source, .. }
            | TomlError::Encoding { source, .. }
            | TomlError::Io { source, .. }
            | TomlError::RoundTrip { source, .. } => source,
        };
        *slot = Some(Box::new(cause));
        self
    }
}

impl Diagnostic for TomlError {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        let code = match self.error_type() {
            ErrorType::Parse => "toml_lst::parse",
            ErrorType::Grammar => "toml_lst::grammar",
            ErrorType::Cursor => "toml_lst::cursor",
            ErrorType::Encoding => "toml_lst::encoding",
            ErrorType::Io => "toml_lst::io",
            ErrorType::RoundTrip => "toml_lst::round_trip",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        self.get_ctx()
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn std::fmt::Display + 'a>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.get_ctx()
            .source
            .as_ref()
            .map(|s| s.as_ref() as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let ctx = self.get_ctx();
        // A span without a source cannot be rendered.
        ctx.source.as_ref()?;
        let span = ctx.span?;
        let len = if span.end > span.start {
            span.end - span.start
        } else {
            1
        };
        let label = LabeledSpan::new(Some(self.message().to_string()), span.start, len);
        Some(Box::new(std::iter::once(label)))
    }
}

/// Wraps a source string in a named, shareable source for error contexts.
pub fn named_source(name: impl AsRef<str>, source: impl Into<String>) -> SourceArc {
    Arc::new(NamedSource::new(name.as_ref(), source.into()))
}

/// Renders an error with full miette diagnostics on stderr.
pub fn print_error(error: TomlError) {
    let report = miette::Report::new(error);
    eprintln!("{report:?}");
}

/// Constructs a TomlError variant with a formatted message and no context.
#[macro_export]
macro_rules! err_msg {
    ($variant:ident, $msg:expr, $($arg:expr),+ $(,)?) => {
        $crate::TomlError::$variant {
            message: format!($msg, $($arg),+),
            ctx: $crate::ErrorContext::none(),
            source: None,
        }
    };
    ($variant:ident, $msg:expr) => {
        $crate::TomlError::$variant {
            message: format!("{}", $msg),
            ctx: $crate::ErrorContext::none(),
            source: None,
        }
    };
}

/// Constructs a TomlError variant with a message, a source and a span, and
/// optionally a help message.
#[macro_export]
macro_rules! err_ctx {
    ($variant:ident, $msg:expr, $src:expr, $span:expr, $help:expr) => {
        $crate::TomlError::$variant {
            message: $msg.to_string(),
            ctx: $crate::ErrorContext {
                source: Some($crate::diagnostics::SourceArc::clone($src)),
                span: Some($span),
                help: Some(format!("{}", $help)),
            },
            source: None,
        }
    };
    ($variant:ident, $msg:expr, $src:expr, $span:expr) => {
        $crate::TomlError::$variant {
            message: $msg.to_string(),
            ctx: $crate::ErrorContext::with_source_and_span(
                $crate::diagnostics::SourceArc::clone($src),
                $span,
            ),
            source: None,
        }
    };
}
