//! Node model: tags, text runs and remarks stored in an arena.
//!
//! Parent and child links are [`NodeId`] indices into a [`NodeArena`], so a
//! tree never owns itself through back references.

mod arena;
mod node_ref;
mod tag;
mod text;

use std::sync::Arc;

use serde::Serialize;

use crate::error::{ParserError, Result};
use crate::page::{Page, Source};

pub use arena::NodeArena;
pub use node_ref::NodeRef;
pub use tag::{Attribute, Tag, TagKind};
pub use text::{Decoration, Remark, Text};

/// Index of a node in its arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub usize);

/// Coarse classification of a node, used for class-based extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeType {
    Tag,
    Text,
    Remark,
}

/// Variant payload of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Tag(Tag),
    Text(Text),
    Remark(Remark),
}

/// A parsed unit with source offsets and optional children.
#[derive(Debug, Clone)]
pub struct Node {
    kind: NodeKind,
    source: Arc<Source>,
    start: usize,
    end: usize,
    parent: Option<NodeId>,
    children: Option<Vec<NodeId>>,
}

impl Node {
    /// Create a detached node covering `start..end` of `source`.
    #[must_use]
    pub fn new(kind: NodeKind, source: Arc<Source>, start: usize, end: usize) -> Self {
        Self {
            kind,
            source,
            start,
            end,
            parent: None,
            children: None,
        }
    }

    /// Variant payload.
    #[must_use]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Mutable variant payload.
    pub fn kind_mut(&mut self) -> &mut NodeKind {
        &mut self.kind
    }

    /// Coarse classification.
    #[must_use]
    pub fn node_type(&self) -> NodeType {
        match self.kind {
            NodeKind::Tag(_) => NodeType::Tag,
            NodeKind::Text(_) => NodeType::Text,
            NodeKind::Remark(_) => NodeType::Remark,
        }
    }

    /// Tag payload, if this is a tag.
    #[must_use]
    pub fn as_tag(&self) -> Option<&Tag> {
        match &self.kind {
            NodeKind::Tag(tag) => Some(tag),
            _ => None,
        }
    }

    /// Mutable tag payload, if this is a tag.
    pub fn as_tag_mut(&mut self) -> Option<&mut Tag> {
        match &mut self.kind {
            NodeKind::Tag(tag) => Some(tag),
            _ => None,
        }
    }

    /// Text payload, if this is a text run.
    #[must_use]
    pub fn as_text(&self) -> Option<&Text> {
        match &self.kind {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Mutable text payload, if this is a text run.
    pub fn as_text_mut(&mut self) -> Option<&mut Text> {
        match &mut self.kind {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Originating document.
    #[must_use]
    pub fn source(&self) -> &Arc<Source> {
        &self.source
    }

    /// Start offset.
    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    /// End offset (exclusive).
    #[must_use]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Set the start offset. No ordering against `end` is enforced.
    pub fn set_start(&mut self, start: usize) {
        self.start = start;
    }

    /// Set the end offset. No ordering against `start` is enforced.
    pub fn set_end(&mut self, end: usize) {
        self.end = end;
    }

    /// Enclosing node, if a scanner attached this one.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Set the enclosing node.
    pub fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    /// Children, or `None` if no scanner ever assigned any.
    #[must_use]
    pub fn children(&self) -> Option<&[NodeId]> {
        self.children.as_deref()
    }

    /// Whether children can be attached to this node.
    #[must_use]
    pub fn can_have_children(&self) -> bool {
        self.as_tag().is_some_and(|tag| !tag.is_end_tag())
    }

    /// Assign the children list.
    ///
    /// # Errors
    /// Returns a parse error for text, remark or end-tag nodes.
    pub fn set_children(&mut self, children: Option<Vec<NodeId>>) -> Result<()> {
        if children.is_some() && !self.can_have_children() {
            return Err(ParserError::parse(format!(
                "{:?} node at {} cannot have children",
                self.node_type(),
                self.start
            )));
        }
        self.children = children;
        Ok(())
    }

    pub(crate) fn children_mut(&mut self) -> &mut Option<Vec<NodeId>> {
        &mut self.children
    }

    /// Source text between the offsets, empty when the range is not valid.
    #[must_use]
    pub fn source_text(&self) -> &str {
        self.source.slice(self.start, self.end).unwrap_or_default()
    }

    /// Text content of a leaf, or the inside of a tag's brackets.
    #[must_use]
    pub fn text(&self) -> String {
        match &self.kind {
            NodeKind::Text(text) => text
                .override_text()
                .unwrap_or_else(|| self.source_text())
                .to_string(),
            NodeKind::Remark(remark) => remark
                .override_text()
                .map(str::to_string)
                .unwrap_or_else(|| {
                    let raw = self.source_text();
                    let raw = raw.strip_prefix("<!--").unwrap_or(raw);
                    raw.strip_suffix("-->").unwrap_or(raw).to_string()
                }),
            NodeKind::Tag(tag) => {
                let html = tag.to_tag_html();
                html[1..html.len() - 1].to_string()
            }
        }
    }

    /// Document-level side effect of this node.
    ///
    /// META tags declaring a charset switch the page encoding and BASE tags
    /// set the page base URL. Everything else is a no-op.
    ///
    /// # Errors
    /// Returns `EncodingChange` when a META tag declares a new encoding.
    pub fn do_semantic_action(&self, page: &mut Page) -> Result<()> {
        let Some(tag) = self.as_tag() else {
            return Ok(());
        };
        if tag.is_end_tag() {
            return Ok(());
        }
        match tag.kind() {
            TagKind::Meta => {
                if let Some(charset) = tag.charset() {
                    tracing::debug!(charset = %charset, "META declares charset");
                    page.set_encoding(&charset)?;
                }
            }
            TagKind::BaseHref => {
                if let Some(href) = tag.attribute("href").map(str::trim) {
                    if !href.is_empty() {
                        page.set_base_url(href);
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }
}
