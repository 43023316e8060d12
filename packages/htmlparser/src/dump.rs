//! Serializable summaries of node trees.

use serde::Serialize;

use crate::error::Result;
use crate::nodes::{Attribute, NodeArena, NodeId, NodeKind, NodeRef, NodeType};

/// Tree summary of one node, serialized by the `dump` command.
#[derive(Debug, Serialize)]
pub struct NodeSummary {
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub start: usize,
    pub end: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub closed: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSummary>,
}

impl NodeSummary {
    /// Summarize `node` and its descendants.
    #[must_use]
    pub fn from_node(node: NodeRef<'_>) -> Self {
        let (name, kind, attributes, text, closed) = match node.node().kind() {
            NodeKind::Tag(tag) => (
                Some(tag.raw_name().to_string()),
                Some(tag.kind().to_string()),
                tag.attributes().iter().skip(1).cloned().collect(),
                None,
                tag.end_tag().is_some(),
            ),
            NodeKind::Text(_) => (None, None, Vec::new(), Some(node.to_plain_text()), false),
            NodeKind::Remark(_) => (None, None, Vec::new(), Some(node.text()), false),
        };
        Self {
            node_type: node.node_type(),
            name,
            kind,
            start: node.node().start(),
            end: node.node().end(),
            attributes,
            text,
            closed,
            children: node.children().map(Self::from_node).collect(),
        }
    }
}

/// Summarize every node in `ids`.
#[must_use]
pub fn summarize(arena: &NodeArena, ids: &[NodeId]) -> Vec<NodeSummary> {
    ids.iter()
        .filter_map(|&id| arena.node(id))
        .map(NodeSummary::from_node)
        .collect()
}

/// Render the summaries of `ids` as YAML.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn to_yaml(arena: &NodeArena, ids: &[NodeId]) -> Result<String> {
    Ok(serde_yaml_ng::to_string(&summarize(arena, ids))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    #[test]
    fn test_summary_tree() {
        let mut parser = Parser::from_html(r#"<ul class="x"><li>one</li></ul>"#);
        let top = parser
            .extract_all_nodes_that_match(&|_: NodeRef<'_>| true)
            .unwrap();
        let summaries = summarize(parser.arena(), top.as_slice());

        assert_eq!(summaries.len(), 1);
        let ul = &summaries[0];
        assert_eq!(ul.name.as_deref(), Some("ul"));
        assert_eq!(ul.kind.as_deref(), Some("BulletList"));
        assert_eq!(ul.attributes.len(), 1);
        assert!(ul.closed);
        assert_eq!(ul.children[0].children[0].text.as_deref(), Some("one"));
    }

    #[test]
    fn test_yaml_output() {
        let mut parser = Parser::from_html("<p>hi<!--note--></p>");
        let top = parser
            .extract_all_nodes_that_match(&|_: NodeRef<'_>| true)
            .unwrap();
        let yaml = to_yaml(parser.arena(), top.as_slice()).unwrap();

        assert!(yaml.contains("type: Tag"));
        assert!(yaml.contains("name: p"));
        assert!(yaml.contains("kind: Paragraph"));
        assert!(yaml.contains("text: hi"));
        assert!(yaml.contains("type: Remark"));
        assert!(yaml.contains("text: note"));
    }
}
