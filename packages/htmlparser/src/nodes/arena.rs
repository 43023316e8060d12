//! Flat owned store for parsed nodes.

use super::{Node, NodeId, NodeRef};
use crate::error::{ParserError, Result};

/// Arena holding every node produced by a parser.
///
/// Nodes are only ever appended, so a [`NodeId`] stays valid for the
/// lifetime of the arena unless [`NodeArena::truncate`] discards it.
#[derive(Debug, Clone, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    /// Create an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a node and return its id.
    pub fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Get a node by id.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a mutable node by id.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Borrowed view of a node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        NodeRef::new(self, id)
    }

    /// Number of stored nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop every node allocated at or after `len`.
    pub fn truncate(&mut self, len: usize) {
        self.nodes.truncate(len);
    }

    /// Append `child` to `parent`'s children and set its parent link.
    ///
    /// # Errors
    /// Returns a parse error if either id is unknown, or if `parent` is a
    /// text, remark or end-tag node.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if self.get(child).is_none() {
            return Err(ParserError::parse(format!("unknown child node {}", child.0)));
        }
        let parent_node = self
            .nodes
            .get_mut(parent.0)
            .ok_or_else(|| ParserError::parse(format!("unknown parent node {}", parent.0)))?;
        if !parent_node.can_have_children() {
            return Err(ParserError::parse(format!(
                "{:?} node at {} cannot have children",
                parent_node.node_type(),
                parent_node.start()
            )));
        }
        parent_node
            .children_mut()
            .get_or_insert_with(Vec::new)
            .push(child);
        self.nodes[child.0].set_parent(Some(parent));
        Ok(())
    }

    /// Iterate over every stored node with its id.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::nodes::{Attribute, NodeKind, Tag, TagKind, Text};
    use crate::page::Source;

    fn arena_with_div_and_text() -> (NodeArena, NodeId, NodeId) {
        let source = Arc::new(Source::new(None, "<div>x"));
        let mut arena = NodeArena::new();
        let div = arena.alloc(Node::new(
            NodeKind::Tag(Tag::new(TagKind::Div, vec![Attribute::name_only("div")])),
            Arc::clone(&source),
            0,
            5,
        ));
        let text = arena.alloc(Node::new(NodeKind::Text(Text::new()), source, 5, 6));
        (arena, div, text)
    }

    #[test]
    fn test_append_child_sets_parent() {
        let (mut arena, div, text) = arena_with_div_and_text();
        arena.append_child(div, text).unwrap();

        assert_eq!(arena.get(div).unwrap().children(), Some(&[text][..]));
        assert_eq!(arena.get(text).unwrap().parent(), Some(div));
    }

    #[test]
    fn test_append_child_to_text_fails() {
        let (mut arena, div, text) = arena_with_div_and_text();
        assert!(arena.append_child(text, div).is_err());
        assert!(arena.get(text).unwrap().children().is_none());
    }

    #[test]
    fn test_truncate_discards_tail() {
        let (mut arena, div, text) = arena_with_div_and_text();
        arena.truncate(1);
        assert!(arena.get(div).is_some());
        assert!(arena.get(text).is_none());
        assert_eq!(arena.len(), 1);
    }
}
