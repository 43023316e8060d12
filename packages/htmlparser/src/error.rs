//! Error types for the parser.
//!
//! `ParserError::Parse` and `ParserError::EncodingChange` are the parser's own
//! kinds. Anything else that escapes a pull is wrapped into
//! `ParserError::Pull` at the iteration boundary.

use std::error::Error as StdError;

use thiserror::Error;

/// Boxed cause attached to chained errors.
pub type BoxedError = Box<dyn StdError + Send + Sync + 'static>;

/// Main error type for the parser library.
#[derive(Debug, Error)]
pub enum ParserError {
    /// Structural parse error (malformed tag, unknown nesting, bad attributes).
    #[error("{message}")]
    Parse {
        message: String,
        #[source]
        source: Option<BoxedError>,
    },

    /// The document declared a different encoding than the one in use.
    ///
    /// Progress must be discarded and the parse restarted.
    #[error("encoding changed from {from} to {to}")]
    EncodingChange { from: String, to: String },

    /// Failure raised while pulling a node, wrapped with its source context.
    #[error("{operation} failed{}: {source}", .url.as_ref().map(|u| format!(" for {u}")).unwrap_or_default())]
    Pull {
        url: Option<String>,
        operation: &'static str,
        #[source]
        source: BoxedError,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error.
    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// Failure raised by a user supplied scanner or factory.
    #[error(transparent)]
    Other(BoxedError),
}

impl ParserError {
    /// Create a structural parse error without a cause.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            source: None,
        }
    }

    /// Create a structural parse error chained to `cause`.
    pub fn parse_with_cause(
        message: impl Into<String>,
        cause: impl Into<BoxedError>,
    ) -> Self {
        Self::Parse {
            message: message.into(),
            source: Some(cause.into()),
        }
    }

    /// Wrap an arbitrary error raised by extension code.
    pub fn other(err: impl Into<BoxedError>) -> Self {
        Self::Other(err.into())
    }

    /// Whether this is one of the parser's own kinds.
    ///
    /// Own kinds pass through the iteration boundary unwrapped.
    #[must_use]
    pub fn is_core(&self) -> bool {
        matches!(
            self,
            Self::Parse { .. } | Self::EncodingChange { .. } | Self::Pull { .. }
        )
    }

    /// Whether this error asks for a restart under a new encoding.
    #[must_use]
    pub fn is_encoding_change(&self) -> bool {
        matches!(self, Self::EncodingChange { .. })
    }

    /// Flattened chain of messages, outermost first.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        let mut messages = vec![self.to_string()];
        let mut current = self.source();
        while let Some(err) = current {
            messages.push(err.to_string());
            current = err.source();
        }
        messages
    }
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;
