//! Page and cursor abstractions over the document text.

use std::sync::Arc;

use crate::config::DEFAULT_ENCODING;
use crate::error::{ParserError, Result};

/// Immutable document text shared by every node created from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    url: Option<String>,
    text: String,
}

impl Source {
    /// Create a new source.
    #[must_use]
    pub fn new(url: Option<String>, text: impl Into<String>) -> Self {
        Self {
            url,
            text: text.into(),
        }
    }

    /// URL the text was loaded from, if known.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Full document text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text between two offsets, or `None` when the range is not valid.
    ///
    /// Offsets are not ordered by the nodes, so `end < start` is legal
    /// input here and simply yields `None`.
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> Option<&str> {
        if start > end {
            return None;
        }
        self.text.get(start..end)
    }

    /// Length of the text in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether the text is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Position in a page, as a byte offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cursor {
    position: usize,
}

impl Cursor {
    /// Create a cursor at `position`.
    #[must_use]
    pub const fn new(position: usize) -> Self {
        Self { position }
    }

    /// Current byte offset.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Move to `position`.
    pub fn set_position(&mut self, position: usize) {
        self.position = position;
    }

    /// Advance by `bytes`.
    pub fn advance(&mut self, bytes: usize) {
        self.position += bytes;
    }
}

/// A document being lexed: shared text plus mutable document-level state.
#[derive(Debug, Clone)]
pub struct Page {
    source: Arc<Source>,
    encoding: String,
    base_url: Option<String>,
}

impl Page {
    /// Create a page over `text` with no URL.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self::from_source(Source::new(None, text))
    }

    /// Create a page over `text` loaded from `url`.
    #[must_use]
    pub fn with_url(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self::from_source(Source::new(Some(url.into()), text))
    }

    /// Create a page from an existing source.
    #[must_use]
    pub fn from_source(source: Source) -> Self {
        Self {
            source: Arc::new(source),
            encoding: DEFAULT_ENCODING.to_string(),
            base_url: None,
        }
    }

    /// Shared source handle.
    #[must_use]
    pub fn source(&self) -> &Arc<Source> {
        &self.source
    }

    /// Character at the cursor, or `None` at end of stream.
    #[must_use]
    pub fn character_at(&self, cursor: Cursor) -> Option<char> {
        self.source
            .text()
            .get(cursor.position()..)
            .and_then(|rest| rest.chars().next())
    }

    /// Remaining text from `position` onwards.
    #[must_use]
    pub fn remaining(&self, position: usize) -> &str {
        self.source.text().get(position..).unwrap_or_default()
    }

    /// URL of the page, if known.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.source.url()
    }

    /// Base URL set by a BASE tag, falling back to the page URL.
    #[must_use]
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref().or_else(|| self.url())
    }

    /// Override the base URL.
    pub fn set_base_url(&mut self, url: impl Into<String>) {
        self.base_url = Some(url.into());
    }

    /// Current character encoding label.
    #[must_use]
    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    /// Switch to a new character encoding.
    ///
    /// # Errors
    /// Returns `EncodingChange` when `encoding` differs from the current one.
    /// The new label is stored before returning so a restarted parse sees it.
    pub fn set_encoding(&mut self, encoding: &str) -> Result<()> {
        if self.encoding.eq_ignore_ascii_case(encoding) {
            return Ok(());
        }
        let from = std::mem::replace(&mut self.encoding, encoding.to_string());
        Err(ParserError::EncodingChange {
            from,
            to: encoding.to_string(),
        })
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new("")
    }
}
