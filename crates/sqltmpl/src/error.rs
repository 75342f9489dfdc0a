//! Error types for sqltmpl

use std::fmt;
use thiserror::Error;

/// Result type alias for template operations
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Errors produced while rendering a template.
///
/// The two variants separate a malformed template ([`TemplateError::Parse`])
/// from a bad parameter list ([`TemplateError::InvalidArgument`]).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TemplateError {
    /// The template itself is structurally invalid.
    #[error("Parse error at offset {offset}: {kind}")]
    Parse { kind: ParseErrorKind, offset: usize },

    /// The template is fine but the supplied parameters are not.
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] ArgumentError),
}

/// What made a template structurally invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("unexpected `?` immediately after `?`")]
    DoublePlaceholder,

    #[error("nested conditional blocks are not allowed")]
    NestedBlock,

    #[error("closing `}}` without matching opening `{{`")]
    UnmatchedBlockClose,

    #[error("conditional block not closed at the end of query")]
    UnterminatedBlock,

    #[error("string literal not closed at the end of query")]
    UnterminatedString,
}

/// Why a parameter could not be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    /// A placeholder asked for a parameter past the end of the list.
    #[error("no parameter with index {index} ({supplied} supplied)")]
    MissingParam { index: usize, supplied: usize },

    /// The value's shape is not accepted by the placeholder requesting it.
    #[error("unsupported {found} value for {placeholder} placeholder: {reason}")]
    UnsupportedValue {
        placeholder: PlaceholderKind,
        found: &'static str,
        reason: String,
    },
}

/// The typed forms a placeholder can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderKind {
    /// `?`
    Generic,
    /// `?d`
    Int,
    /// `?f`
    Float,
    /// `?a`
    Array,
    /// `?#`
    Identifier,
}

impl PlaceholderKind {
    /// Map the character following `?` to a typed placeholder.
    pub fn from_suffix(c: char) -> Option<Self> {
        match c {
            'd' => Some(Self::Int),
            'f' => Some(Self::Float),
            'a' => Some(Self::Array),
            '#' => Some(Self::Identifier),
            _ => None,
        }
    }

    /// The placeholder as written in a template.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Generic => "?",
            Self::Int => "?d",
            Self::Float => "?f",
            Self::Array => "?a",
            Self::Identifier => "?#",
        }
    }
}

impl fmt::Display for PlaceholderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}`", self.as_str())
    }
}

impl TemplateError {
    /// Create a parse error at a byte offset
    pub fn parse(kind: ParseErrorKind, offset: usize) -> Self {
        Self::Parse { kind, offset }
    }

    /// Create an unsupported-value error
    pub fn unsupported(
        placeholder: PlaceholderKind,
        found: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidArgument(ArgumentError::UnsupportedValue {
            placeholder,
            found,
            reason: reason.into(),
        })
    }

    /// Check if the template was malformed
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    /// Check if the parameter list was at fault
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Parse error kind, if any
    pub fn parse_kind(&self) -> Option<ParseErrorKind> {
        match self {
            Self::Parse { kind, .. } => Some(*kind),
            Self::InvalidArgument(_) => None,
        }
    }

    /// Byte offset into the template for parse errors
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::Parse { offset, .. } => Some(*offset),
            Self::InvalidArgument(_) => None,
        }
    }
}
