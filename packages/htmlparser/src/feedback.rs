//! Diagnostic sinks for parser feedback.

use crate::error::ParserError;

/// Receiver of parser diagnostics.
///
/// A parser routes every diagnostic through exactly one sink. The default
/// sink is [`QuietFeedback`], which discards everything.
pub trait Feedback: Send + Sync {
    fn info(&self, message: &str);

    fn warning(&self, message: &str);

    fn error(&self, message: &str, cause: &ParserError);
}

/// Discards every diagnostic.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuietFeedback;

impl Feedback for QuietFeedback {
    fn info(&self, _message: &str) {}

    fn warning(&self, _message: &str) {}

    fn error(&self, _message: &str, _cause: &ParserError) {}
}

/// Forwards diagnostics to `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingFeedback;

impl Feedback for TracingFeedback {
    fn info(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn warning(&self, message: &str) {
        tracing::warn!("{message}");
    }

    fn error(&self, message: &str, cause: &ParserError) {
        tracing::error!(chain = ?cause.messages(), "{message}");
    }
}
