//! Node factories used by the lexer to turn raw tokens into nodes.

mod prototype;
mod string;

use std::sync::Arc;

use crate::error::Result;
use crate::nodes::{Attribute, Node};
use crate::page::Source;

pub use prototype::{PrototypicalNodeFactory, TagPrototype};
pub use string::StringNodeFactory;

/// Builds nodes for the lexer.
pub trait NodeFactory: Send + Sync {
    /// Create a text node covering `start..end`.
    fn create_string_node(&self, source: &Arc<Source>, start: usize, end: usize) -> Node;

    /// Create a remark node covering `start..end`.
    fn create_remark_node(&self, source: &Arc<Source>, start: usize, end: usize) -> Node;

    /// Create a tag node from its raw attribute list (tag name first).
    ///
    /// # Errors
    /// Returns a parse error when the attribute list is malformed.
    fn create_tag_node(
        &self,
        source: &Arc<Source>,
        start: usize,
        end: usize,
        attributes: Vec<Attribute>,
    ) -> Result<Node>;
}
