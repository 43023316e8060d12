//! Node filters: predicates used to select nodes.

use crate::nodes::{NodeRef, NodeType, TagKind};

/// Predicate over a node.
pub trait NodeFilter {
    /// Whether `node` is selected.
    fn accept(&self, node: NodeRef<'_>) -> bool;
}

impl<F> NodeFilter for F
where
    F: Fn(NodeRef<'_>) -> bool,
{
    fn accept(&self, node: NodeRef<'_>) -> bool {
        self(node)
    }
}

/// Accepts tags with the given name, case-insensitive.
///
/// Both `<p>` and `</p>` match `TagNameFilter::new("p")`.
#[derive(Debug, Clone)]
pub struct TagNameFilter {
    name: String,
}

impl TagNameFilter {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
        }
    }
}

impl NodeFilter for TagNameFilter {
    fn accept(&self, node: NodeRef<'_>) -> bool {
        node.tag().is_some_and(|tag| tag.tag_name() == self.name)
    }
}

/// Accepts nodes of one [`NodeType`].
#[derive(Debug, Clone, Copy)]
pub struct NodeClassFilter(pub NodeType);

impl NodeFilter for NodeClassFilter {
    fn accept(&self, node: NodeRef<'_>) -> bool {
        node.node_type() == self.0
    }
}

/// Accepts open tags of one [`TagKind`].
#[derive(Debug, Clone)]
pub struct TagKindFilter(pub TagKind);

impl NodeFilter for TagKindFilter {
    fn accept(&self, node: NodeRef<'_>) -> bool {
        node.tag()
            .is_some_and(|tag| !tag.is_end_tag() && *tag.kind() == self.0)
    }
}

/// Accepts tags carrying an attribute, optionally with a given value.
#[derive(Debug, Clone)]
pub struct HasAttributeFilter {
    name: String,
    value: Option<String>,
}

impl HasAttributeFilter {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    /// Also require the attribute value to equal `value`.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

impl NodeFilter for HasAttributeFilter {
    fn accept(&self, node: NodeRef<'_>) -> bool {
        let Some(found) = node.tag().and_then(|tag| tag.attribute(&self.name)) else {
            return false;
        };
        self.value.as_deref().map_or(true, |expected| found == expected)
    }
}

/// Accepts text nodes containing a pattern.
#[derive(Debug, Clone)]
pub struct StringFilter {
    pattern: String,
    case_sensitive: bool,
}

impl StringFilter {
    /// Case-insensitive substring match.
    #[must_use]
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            case_sensitive: false,
        }
    }

    #[must_use]
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }
}

impl NodeFilter for StringFilter {
    fn accept(&self, node: NodeRef<'_>) -> bool {
        if node.node_type() != NodeType::Text {
            return false;
        }
        let text = node.text();
        if self.case_sensitive {
            text.contains(&self.pattern)
        } else {
            text.to_lowercase().contains(&self.pattern.to_lowercase())
        }
    }
}

/// Accepts nodes every inner filter accepts. Empty means accept all.
#[derive(Default)]
pub struct AndFilter {
    filters: Vec<Box<dyn NodeFilter>>,
}

impl AndFilter {
    #[must_use]
    pub fn new(filters: Vec<Box<dyn NodeFilter>>) -> Self {
        Self { filters }
    }
}

impl NodeFilter for AndFilter {
    fn accept(&self, node: NodeRef<'_>) -> bool {
        self.filters.iter().all(|f| f.accept(node))
    }
}

/// Accepts nodes any inner filter accepts. Empty means accept none.
#[derive(Default)]
pub struct OrFilter {
    filters: Vec<Box<dyn NodeFilter>>,
}

impl OrFilter {
    #[must_use]
    pub fn new(filters: Vec<Box<dyn NodeFilter>>) -> Self {
        Self { filters }
    }
}

impl NodeFilter for OrFilter {
    fn accept(&self, node: NodeRef<'_>) -> bool {
        self.filters.iter().any(|f| f.accept(node))
    }
}

/// Inverts a filter.
pub struct NotFilter {
    filter: Box<dyn NodeFilter>,
}

impl NotFilter {
    #[must_use]
    pub fn new(filter: impl NodeFilter + 'static) -> Self {
        Self {
            filter: Box::new(filter),
        }
    }
}

impl NodeFilter for NotFilter {
    fn accept(&self, node: NodeRef<'_>) -> bool {
        !self.filter.accept(node)
    }
}

/// Accepts tags with a child (or, recursively, a descendant) the inner
/// filter accepts.
pub struct HasChildFilter {
    filter: Box<dyn NodeFilter>,
    recursive: bool,
}

impl HasChildFilter {
    #[must_use]
    pub fn new(filter: impl NodeFilter + 'static, recursive: bool) -> Self {
        Self {
            filter: Box::new(filter),
            recursive,
        }
    }

    fn any_child(&self, node: NodeRef<'_>) -> bool {
        node.children()
            .any(|child| self.filter.accept(child) || (self.recursive && self.any_child(child)))
    }
}

impl NodeFilter for HasChildFilter {
    fn accept(&self, node: NodeRef<'_>) -> bool {
        node.tag().is_some() && self.any_child(node)
    }
}

/// Accepts nodes whose parent (or, recursively, an ancestor) the inner
/// filter accepts.
pub struct HasParentFilter {
    filter: Box<dyn NodeFilter>,
    recursive: bool,
}

impl HasParentFilter {
    #[must_use]
    pub fn new(filter: impl NodeFilter + 'static, recursive: bool) -> Self {
        Self {
            filter: Box::new(filter),
            recursive,
        }
    }
}

impl NodeFilter for HasParentFilter {
    fn accept(&self, node: NodeRef<'_>) -> bool {
        let mut current = node.parent();
        while let Some(parent) = current {
            if self.filter.accept(parent) {
                return true;
            }
            if !self.recursive {
                break;
            }
            current = parent.parent();
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn first_top_level(parser: &mut Parser, name: &str) -> crate::nodes::NodeId {
        let list = parser
            .extract_all_nodes_that_match(&TagNameFilter::new(name))
            .unwrap();
        list.get(0).unwrap()
    }

    #[test]
    fn test_tag_name_filter_matches_end_tags_too() {
        let mut parser = Parser::from_html("<foo></foo><bar>");
        let list = parser
            .extract_all_nodes_that_match(&TagNameFilter::new("FOO"))
            .unwrap();
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_has_attribute_filter_with_value() {
        let mut parser = Parser::from_html(r#"<img src="a.png"><img src="b.png"><img>"#);
        let any = parser
            .extract_all_nodes_that_match(&HasAttributeFilter::new("src"))
            .unwrap();
        assert_eq!(any.len(), 2);

        parser.reset();
        let only_b = parser
            .extract_all_nodes_that_match(&HasAttributeFilter::new("SRC").with_value("b.png"))
            .unwrap();
        assert_eq!(only_b.len(), 1);
    }

    #[test]
    fn test_string_filter_case() {
        let mut parser = Parser::from_html("<p>Hello World</p>");
        let p = first_top_level(&mut parser, "p");
        let arena = parser.arena();
        let text = arena.node(p).unwrap().children().next().unwrap();

        assert!(StringFilter::new("hello").accept(text));
        assert!(!StringFilter::new("hello").case_sensitive(true).accept(text));
        assert!(!StringFilter::new("hello").accept(arena.node(p).unwrap()));
    }

    #[test]
    fn test_logical_filters() {
        let mut parser = Parser::from_html("<p>x</p>");
        let p = first_top_level(&mut parser, "p");
        let node = parser.arena().node(p).unwrap();

        let both = AndFilter::new(vec![
            Box::new(TagNameFilter::new("p")),
            Box::new(NodeClassFilter(NodeType::Tag)),
        ]);
        assert!(both.accept(node));
        assert!(AndFilter::default().accept(node));
        assert!(!OrFilter::default().accept(node));
        assert!(NotFilter::new(TagNameFilter::new("div")).accept(node));
    }

    #[test]
    fn test_child_and_parent_filters() {
        let mut parser = Parser::from_html("<div><p><span>deep</span></p></div>");
        let div = first_top_level(&mut parser, "div");
        let arena = parser.arena();
        let div_ref = arena.node(div).unwrap();

        assert!(!HasChildFilter::new(TagNameFilter::new("span"), false).accept(div_ref));
        assert!(HasChildFilter::new(TagNameFilter::new("span"), true).accept(div_ref));

        let span = div_ref
            .children()
            .next()
            .and_then(|p| p.children().next())
            .unwrap();
        assert!(!HasParentFilter::new(TagNameFilter::new("div"), false).accept(span));
        assert!(HasParentFilter::new(TagNameFilter::new("div"), true).accept(span));
    }
}
