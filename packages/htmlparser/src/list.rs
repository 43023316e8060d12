//! Ordered, growable list of node ids with filter-based selection.

use crate::filters::NodeFilter;
use crate::nodes::{NodeArena, NodeId};
use crate::visitors::NodeVisitor;

/// Insertion-ordered sequence of nodes. Duplicates are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeList {
    nodes: Vec<NodeId>,
}

impl NodeList {
    /// Create an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node.
    pub fn add(&mut self, id: NodeId) {
        self.nodes.push(id);
    }

    /// Insert a node at the head, shifting the rest.
    pub fn prepend(&mut self, id: NodeId) {
        self.nodes.insert(0, id);
    }

    /// Append every node of `other`.
    pub fn add_all(&mut self, other: &NodeList) {
        self.nodes.extend_from_slice(&other.nodes);
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Entry at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.nodes.get(index).copied()
    }

    /// Remove and return the entry at `index`.
    pub fn remove(&mut self, index: usize) -> Option<NodeId> {
        (index < self.nodes.len()).then(|| self.nodes.remove(index))
    }

    /// Remove the first occurrence of `id`; returns whether it was present.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        match self.index_of(id) {
            Some(index) => {
                self.nodes.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove every entry.
    pub fn remove_all(&mut self) {
        self.nodes.clear();
    }

    /// Whether `id` is in the list.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains(&id)
    }

    /// Position of the first occurrence of `id`.
    #[must_use]
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.nodes.iter().position(|&n| n == id)
    }

    /// Iterate over the entries.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }

    /// Entries as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Copy entries into the front of `target`; returns how many were copied.
    pub fn copy_to(&self, target: &mut [NodeId]) -> usize {
        let count = self.nodes.len().min(target.len());
        target[..count].copy_from_slice(&self.nodes[..count]);
        count
    }

    /// New list of the entries `filter` accepts, optionally descending into
    /// children. Parents come before their matching descendants.
    #[must_use]
    pub fn extract_all_nodes_that_match(
        &self,
        arena: &NodeArena,
        filter: &dyn NodeFilter,
        recursive: bool,
    ) -> NodeList {
        let mut out = NodeList::new();
        extract_into(&self.nodes, arena, filter, recursive, &mut out);
        out
    }

    /// Drop entries `filter` rejects. In recursive mode the children lists
    /// of the kept nodes are pruned the same way.
    pub fn keep_all_nodes_that_match(
        &mut self,
        arena: &mut NodeArena,
        filter: &dyn NodeFilter,
        recursive: bool,
    ) {
        self.nodes = keep_matching(&self.nodes, arena, filter, recursive);
    }

    /// Concatenated plain text of every entry.
    #[must_use]
    pub fn as_string(&self, arena: &NodeArena) -> String {
        self.iter()
            .filter_map(|id| arena.node(id))
            .map(|node| node.to_plain_text())
            .collect()
    }

    /// Concatenated HTML of every entry.
    #[must_use]
    pub fn to_html(&self, arena: &NodeArena) -> String {
        self.iter()
            .filter_map(|id| arena.node(id))
            .map(|node| node.to_html())
            .collect()
    }

    /// Run `visitor` over every entry, bracketed by begin/finish calls.
    pub fn visit_all_nodes_with(&self, arena: &NodeArena, visitor: &mut dyn NodeVisitor) {
        visitor.begin_parsing();
        for node in self.iter().filter_map(|id| arena.node(id)) {
            node.accept(visitor);
        }
        visitor.finished_parsing();
    }
}

fn extract_into(
    ids: &[NodeId],
    arena: &NodeArena,
    filter: &dyn NodeFilter,
    recursive: bool,
    out: &mut NodeList,
) {
    for node in ids.iter().filter_map(|&id| arena.node(id)) {
        if filter.accept(node) {
            out.add(node.id());
        }
        if recursive {
            if let Some(children) = node.node().children() {
                extract_into(children, arena, filter, recursive, out);
            }
        }
    }
}

fn keep_matching(
    ids: &[NodeId],
    arena: &mut NodeArena,
    filter: &dyn NodeFilter,
    recursive: bool,
) -> Vec<NodeId> {
    let kept: Vec<NodeId> = ids
        .iter()
        .copied()
        .filter(|&id| arena.node(id).is_some_and(|node| filter.accept(node)))
        .collect();

    if recursive {
        for &id in &kept {
            let Some(children) = arena.get(id).and_then(|n| n.children()).map(<[_]>::to_vec)
            else {
                continue;
            };
            let pruned = keep_matching(&children, arena, filter, recursive);
            if let Some(node) = arena.get_mut(id) {
                *node.children_mut() = Some(pruned);
            }
        }
    }
    kept
}

impl FromIterator<NodeId> for NodeList {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a NodeList {
    type Item = NodeId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, NodeId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter().copied()
    }
}
