//! Leaf node data: text runs and remarks.

use serde::Serialize;

use crate::entities;

/// Transformation layered over a text node's plain-text rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Decoration {
    /// Decode character references.
    DecodeEntities,
    /// Remove tab, newline and carriage return.
    RemoveEscapes,
    /// Replace U+00A0 with a space.
    ConvertNbsp,
}

impl Decoration {
    /// Apply this decoration to `text`.
    #[must_use]
    pub fn apply(self, text: &str) -> String {
        match self {
            Self::DecodeEntities => entities::decode(text),
            Self::RemoveEscapes => entities::remove_escapes(text),
            Self::ConvertNbsp => entities::convert_nbsp(text),
        }
    }
}

/// A run of character data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Text {
    text: Option<String>,
    decorations: Vec<Decoration>,
}

impl Text {
    /// Text that reads its content from the source range.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicit text, overriding the source range.
    #[must_use]
    pub fn override_text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Replace the content with explicit text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    /// Wrap this node in another decoration. Decorations apply innermost first.
    pub fn decorate(&mut self, decoration: Decoration) {
        self.decorations.push(decoration);
    }

    /// Decorations in application order.
    #[must_use]
    pub fn decorations(&self) -> &[Decoration] {
        &self.decorations
    }

    /// Apply every decoration to the raw text.
    #[must_use]
    pub fn render(&self, raw: &str) -> String {
        self.decorations
            .iter()
            .fold(raw.to_string(), |text, decoration| decoration.apply(&text))
    }
}

/// Content of a `<!-- ... -->` comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Remark {
    text: Option<String>,
}

impl Remark {
    /// Remark that reads its content from the source range.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicit text, overriding the source range.
    #[must_use]
    pub fn override_text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Replace the content with explicit text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }
}
