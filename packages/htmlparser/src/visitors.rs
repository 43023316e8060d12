//! Visitor dispatch over node trees.

use std::collections::HashMap;

use crate::nodes::{NodeId, NodeRef};

/// Callback set invoked by [`NodeRef::accept`].
///
/// Every method defaults to a no-op so visitors only implement what they
/// need.
pub trait NodeVisitor {
    /// Whether tags should be passed to [`NodeVisitor::visit_tag`].
    fn should_recurse_self(&self) -> bool {
        true
    }

    /// Whether composite tags should hand their children to the visitor.
    fn should_recurse_children(&self) -> bool {
        true
    }

    /// Called once before the first node.
    fn begin_parsing(&mut self) {}

    /// Called for every open tag.
    fn visit_tag(&mut self, _tag: NodeRef<'_>) {}

    /// Called for every end tag.
    fn visit_end_tag(&mut self, _tag: NodeRef<'_>) {}

    /// Called for every text node.
    fn visit_string_node(&mut self, _string: NodeRef<'_>) {}

    /// Called for every remark node.
    fn visit_remark_node(&mut self, _remark: NodeRef<'_>) {}

    /// Called once after the last node.
    fn finished_parsing(&mut self) {}
}

/// Accumulates the plain text of every text node, skipping the bodies of
/// SCRIPT and STYLE tags.
#[derive(Debug, Default)]
pub struct TextExtractingVisitor {
    text: String,
    skip_depth: usize,
}

impl TextExtractingVisitor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Text collected so far.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Take the collected text.
    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }
}

fn is_raw_text(tag: NodeRef<'_>) -> bool {
    tag.tag_name()
        .is_some_and(|name| name == "SCRIPT" || name == "STYLE")
}

impl NodeVisitor for TextExtractingVisitor {
    fn visit_tag(&mut self, tag: NodeRef<'_>) {
        if is_raw_text(tag) && tag.end_tag().is_some() {
            self.skip_depth += 1;
        }
    }

    fn visit_end_tag(&mut self, tag: NodeRef<'_>) {
        if is_raw_text(tag) && self.skip_depth > 0 {
            self.skip_depth -= 1;
        }
    }

    fn visit_string_node(&mut self, string: NodeRef<'_>) {
        if self.skip_depth == 0 {
            self.text.push_str(&string.to_plain_text());
        }
    }
}

/// Records open tags by uppercased name.
#[derive(Debug, Default)]
pub struct TagFindingVisitor {
    names: Vec<String>,
    found: HashMap<String, Vec<NodeId>>,
}

impl TagFindingVisitor {
    /// Look for the given tag names, case-insensitive.
    #[must_use]
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: names
                .into_iter()
                .map(|n| n.as_ref().to_ascii_uppercase())
                .collect(),
            found: HashMap::new(),
        }
    }

    /// Number of tags found with `name`.
    #[must_use]
    pub fn count(&self, name: &str) -> usize {
        self.found
            .get(&name.to_ascii_uppercase())
            .map_or(0, Vec::len)
    }

    /// Ids of the tags found with `name`, in document order.
    #[must_use]
    pub fn tags(&self, name: &str) -> &[NodeId] {
        self.found
            .get(&name.to_ascii_uppercase())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl NodeVisitor for TagFindingVisitor {
    fn visit_tag(&mut self, tag: NodeRef<'_>) {
        let Some(name) = tag.tag_name() else {
            return;
        };
        if self.names.contains(&name) {
            self.found.entry(name).or_default().push(tag.id());
        }
    }
}
