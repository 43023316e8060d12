//! Borrowed view of a node together with its arena.

use super::{Node, NodeArena, NodeId, NodeKind, NodeType, Tag};
use crate::filters::NodeFilter;
use crate::list::NodeList;
use crate::visitors::NodeVisitor;

/// A node plus the arena it lives in, so links can be followed.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    arena: &'a NodeArena,
    id: NodeId,
    node: &'a Node,
}

impl<'a> NodeRef<'a> {
    pub(super) fn new(arena: &'a NodeArena, id: NodeId) -> Option<Self> {
        arena.get(id).map(|node| Self { arena, id, node })
    }

    /// Id of this node.
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Underlying node.
    #[must_use]
    pub fn node(&self) -> &'a Node {
        self.node
    }

    /// Arena this node lives in.
    #[must_use]
    pub fn arena(&self) -> &'a NodeArena {
        self.arena
    }

    /// Coarse classification.
    #[must_use]
    pub fn node_type(&self) -> NodeType {
        self.node.node_type()
    }

    /// Tag payload, if this is a tag.
    #[must_use]
    pub fn tag(&self) -> Option<&'a Tag> {
        self.node.as_tag()
    }

    /// Uppercased tag name, if this is a tag.
    #[must_use]
    pub fn tag_name(&self) -> Option<String> {
        self.tag().map(Tag::tag_name)
    }

    /// Whether this is a closing tag.
    #[must_use]
    pub fn is_end_tag(&self) -> bool {
        self.tag().is_some_and(Tag::is_end_tag)
    }

    /// Text content, see [`Node::text`].
    #[must_use]
    pub fn text(&self) -> String {
        self.node.text()
    }

    /// Source text between the node's offsets.
    #[must_use]
    pub fn source_text(&self) -> &'a str {
        self.node.source_text()
    }

    /// Enclosing node.
    #[must_use]
    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.node.parent().and_then(|id| self.arena.node(id))
    }

    /// Whether a children list has been assigned.
    #[must_use]
    pub fn has_children(&self) -> bool {
        self.node.children().is_some()
    }

    /// Children in document order; empty when none were assigned.
    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let arena = self.arena;
        let node = self.node;
        node.children()
            .unwrap_or_default()
            .iter()
            .filter_map(move |&id| arena.node(id))
    }

    /// Matching end tag of a composite tag.
    #[must_use]
    pub fn end_tag(&self) -> Option<NodeRef<'a>> {
        self.tag()
            .and_then(Tag::end_tag)
            .and_then(|id| self.arena.node(id))
    }

    /// Semantic text: decorated text runs, remark text, and the
    /// concatenated plain text of a tag's children.
    #[must_use]
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        self.write_plain_text(&mut out);
        out
    }

    fn write_plain_text(&self, out: &mut String) {
        match self.node.kind() {
            NodeKind::Text(text) => out.push_str(&text.render(&self.node.text())),
            NodeKind::Remark(_) => out.push_str(&self.node.text()),
            NodeKind::Tag(_) => {
                for child in self.children() {
                    child.write_plain_text(out);
                }
            }
        }
    }

    /// Markup reconstruction: the tag, its children and its end tag.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self.node.kind() {
            NodeKind::Text(_) => out.push_str(&self.node.text()),
            NodeKind::Remark(_) => {
                out.push_str("<!--");
                out.push_str(&self.node.text());
                out.push_str("-->");
            }
            NodeKind::Tag(tag) => {
                out.push_str(&tag.to_tag_html());
                for child in self.children() {
                    child.write_html(out);
                }
                if let Some(end) = self.end_tag() {
                    end.write_html(out);
                }
            }
        }
    }

    /// Add this node to `list` if `filter` accepts it. Children are not
    /// examined.
    pub fn collect_into(&self, list: &mut NodeList, filter: &dyn NodeFilter) {
        if filter.accept(*self) {
            list.add(self.id);
        }
    }

    /// Dispatch to `visitor`, descending into children when it asks to.
    pub fn accept(&self, visitor: &mut dyn NodeVisitor) {
        match self.node.kind() {
            NodeKind::Text(_) => visitor.visit_string_node(*self),
            NodeKind::Remark(_) => visitor.visit_remark_node(*self),
            NodeKind::Tag(tag) if tag.is_end_tag() => visitor.visit_end_tag(*self),
            NodeKind::Tag(_) => {
                if visitor.should_recurse_self() {
                    visitor.visit_tag(*self);
                }
                if visitor.should_recurse_children() {
                    for child in self.children() {
                        child.accept(visitor);
                    }
                }
                if let Some(end) = self.end_tag() {
                    end.accept(visitor);
                }
            }
        }
    }
}
