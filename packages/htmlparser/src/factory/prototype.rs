//! Prototype registry mapping tag ids to tag constructors.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::NodeFactory;
use crate::error::{ParserError, Result};
use crate::nodes::{Attribute, Node, NodeKind, Remark, Tag, TagKind, Text};
use crate::page::Source;

/// Template describing how to build tags for a set of ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPrototype {
    kind: TagKind,
    ids: Vec<String>,
    enders: Vec<String>,
    end_tag_enders: Vec<String>,
}

fn upper_all<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|n| n.as_ref().to_ascii_uppercase())
        .collect()
}

impl TagPrototype {
    /// Prototype of `kind` answering to `ids`.
    #[must_use]
    pub fn new<I, S>(kind: TagKind, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            kind,
            ids: upper_all(ids),
            enders: Vec::new(),
            end_tag_enders: Vec::new(),
        }
    }

    /// Open tags that implicitly close tags built from this prototype.
    #[must_use]
    pub fn with_enders<I, S>(mut self, enders: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.enders = upper_all(enders);
        self
    }

    /// End tags that implicitly close tags built from this prototype.
    #[must_use]
    pub fn with_end_tag_enders<I, S>(mut self, end_tag_enders: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.end_tag_enders = upper_all(end_tag_enders);
        self
    }

    /// Kind of the tags built.
    #[must_use]
    pub fn kind(&self) -> &TagKind {
        &self.kind
    }

    /// Uppercased ids.
    #[must_use]
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Build a fresh tag from raw attributes.
    #[must_use]
    pub fn instantiate(&self, attributes: Vec<Attribute>) -> Tag {
        Tag::new(self.kind.clone(), attributes).with_rules(
            self.ids.clone(),
            self.enders.clone(),
            self.end_tag_enders.clone(),
        )
    }
}

/// Node factory that differentiates tags by looking their name up in a
/// prototype registry.
///
/// Closing tags never consult the registry and always produce a
/// [`TagKind::Generic`] end tag.
#[derive(Debug, Clone, Default)]
pub struct PrototypicalNodeFactory {
    prototypes: HashMap<String, Arc<TagPrototype>>,
}

impl PrototypicalNodeFactory {
    /// Factory with no registered prototypes.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Factory with the standard HTML prototypes registered.
    #[must_use]
    pub fn with_defaults() -> Self {
        crate::config::create_default_factory()
    }

    /// Register `prototype` under each of its ids, replacing earlier ones.
    pub fn register_tag(&mut self, prototype: TagPrototype) {
        let prototype = Arc::new(prototype);
        for id in prototype.ids() {
            if let Some(previous) = self.prototypes.insert(id.clone(), Arc::clone(&prototype)) {
                tracing::trace!(id = %id, previous = %previous.kind(), "replacing tag prototype");
            }
        }
    }

    /// Remove every id declared by `prototype`.
    pub fn unregister_tag(&mut self, prototype: &TagPrototype) {
        for id in prototype.ids() {
            self.prototypes.remove(id);
        }
    }

    /// Register `prototype` under `id` only; returns the previous one.
    pub fn put(&mut self, id: &str, prototype: TagPrototype) -> Option<Arc<TagPrototype>> {
        self.prototypes
            .insert(id.to_ascii_uppercase(), Arc::new(prototype))
    }

    /// Prototype registered under `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&TagPrototype> {
        self.prototypes
            .get(&id.to_ascii_uppercase())
            .map(AsRef::as_ref)
    }

    /// Remove the prototype registered under `id`.
    pub fn remove(&mut self, id: &str) -> Option<Arc<TagPrototype>> {
        self.prototypes.remove(&id.to_ascii_uppercase())
    }

    /// Remove every prototype.
    pub fn clear(&mut self) {
        self.prototypes.clear();
    }

    /// Every registered id.
    #[must_use]
    pub fn tag_names(&self) -> HashSet<&str> {
        self.prototypes.keys().map(String::as_str).collect()
    }

    /// Lookup key for a raw tag name, or `None` for closing tags.
    fn lookup_id(raw_name: &str) -> Option<String> {
        let id = raw_name.to_ascii_uppercase();
        if id.starts_with('/') {
            return None;
        }
        Some(match id.strip_suffix('/') {
            Some(stripped) => stripped.to_string(),
            None => id,
        })
    }

    /// Build the tag payload for `attributes` without allocating a node.
    ///
    /// # Errors
    /// Returns a parse error when `attributes` is empty.
    pub fn create_tag(&self, attributes: Vec<Attribute>) -> Result<Tag> {
        let Some(first) = attributes.first() else {
            return Err(ParserError::parse("tag has no name attribute"));
        };
        let prototype = Self::lookup_id(&first.name).and_then(|id| self.prototypes.get(&id));
        match prototype {
            Some(prototype) => Ok(prototype.instantiate(attributes)),
            None => {
                tracing::trace!(name = %first.name, "no prototype, building generic tag");
                Ok(Tag::new(TagKind::Generic, attributes))
            }
        }
    }
}

impl NodeFactory for PrototypicalNodeFactory {
    fn create_string_node(&self, source: &Arc<Source>, start: usize, end: usize) -> Node {
        Node::new(NodeKind::Text(Text::new()), Arc::clone(source), start, end)
    }

    fn create_remark_node(&self, source: &Arc<Source>, start: usize, end: usize) -> Node {
        Node::new(NodeKind::Remark(Remark::new()), Arc::clone(source), start, end)
    }

    fn create_tag_node(
        &self,
        source: &Arc<Source>,
        start: usize,
        end: usize,
        attributes: Vec<Attribute>,
    ) -> Result<Node> {
        let tag = self.create_tag(attributes)?;
        Ok(Node::new(NodeKind::Tag(tag), Arc::clone(source), start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> Arc<Source> {
        Arc::new(Source::new(None, "<div><a href=x>"))
    }

    fn attrs(name: &str) -> Vec<Attribute> {
        vec![Attribute::name_only(name)]
    }

    #[test]
    fn test_register_multi_id() {
        let mut factory = PrototypicalNodeFactory::empty();
        factory.register_tag(TagPrototype::new(TagKind::Heading, ["h1", "h2"]));
        assert_eq!(factory.get("H1").map(TagPrototype::kind), Some(&TagKind::Heading));
        assert_eq!(factory.get("h2").map(TagPrototype::kind), Some(&TagKind::Heading));
        assert_eq!(factory.tag_names().len(), 2);
    }

    #[test]
    fn test_last_registration_wins() {
        let mut factory = PrototypicalNodeFactory::empty();
        factory.register_tag(TagPrototype::new(TagKind::Custom("First".into()), ["A"]));
        factory.register_tag(TagPrototype::new(TagKind::Custom("Second".into()), ["A"]));

        let node = factory.create_tag_node(&source(), 0, 3, attrs("a")).unwrap();
        assert_eq!(
            node.as_tag().unwrap().kind(),
            &TagKind::Custom("Second".into())
        );
    }

    #[test]
    fn test_unregister_removes_all_ids() {
        let mut factory = PrototypicalNodeFactory::empty();
        let proto = TagPrototype::new(TagKind::TableColumn, ["td", "th"]);
        factory.register_tag(proto.clone());
        factory.unregister_tag(&proto);
        assert!(factory.tag_names().is_empty());
    }

    #[test]
    fn test_closing_tag_bypasses_registry() {
        let mut factory = PrototypicalNodeFactory::empty();
        factory.register_tag(TagPrototype::new(TagKind::Div, ["DIV", "/DIV"]));

        let node = factory.create_tag_node(&source(), 0, 6, attrs("/DIV")).unwrap();
        let tag = node.as_tag().unwrap();
        assert_eq!(tag.kind(), &TagKind::Generic);
        assert!(tag.is_end_tag());
    }

    #[test]
    fn test_self_closing_marker_stripped_for_lookup() {
        let mut factory = PrototypicalNodeFactory::empty();
        factory.register_tag(TagPrototype::new(TagKind::Image, ["IMG"]));

        let node = factory.create_tag_node(&source(), 0, 6, attrs("img/")).unwrap();
        assert_eq!(node.as_tag().unwrap().kind(), &TagKind::Image);
    }

    #[test]
    fn test_unknown_falls_back_to_generic() {
        let factory = PrototypicalNodeFactory::empty();
        let node = factory.create_tag_node(&source(), 0, 5, attrs("blink")).unwrap();
        assert_eq!(node.as_tag().unwrap().kind(), &TagKind::Generic);
        assert_eq!(node.start(), 0);
        assert_eq!(node.end(), 5);
    }

    #[test]
    fn test_empty_attributes_is_parse_error() {
        let factory = PrototypicalNodeFactory::empty();
        let err = factory.create_tag_node(&source(), 0, 0, Vec::new()).unwrap_err();
        assert!(err.is_core());
    }

    #[test]
    fn test_created_tags_are_independent() {
        let mut factory = PrototypicalNodeFactory::empty();
        factory.register_tag(TagPrototype::new(TagKind::Anchor, ["A"]).with_enders(["p"]));
        let src = source();

        let mut first = factory.create_tag_node(&src, 5, 15, attrs("a")).unwrap();
        let second = factory.create_tag_node(&src, 5, 15, attrs("a")).unwrap();

        let tag = first.as_tag_mut().unwrap();
        tag.set_attribute("href", "changed");
        first.set_start(99);

        assert_eq!(second.as_tag().unwrap().attribute("href"), None);
        assert_eq!(second.start(), 5);
        assert_eq!(factory.get("a").unwrap().ids(), &["A".to_string()]);
        assert_eq!(second.as_tag().unwrap().enders(), &["P".to_string()]);
    }
}
