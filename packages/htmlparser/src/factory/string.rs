use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use super::{NodeFactory, PrototypicalNodeFactory};
use crate::error::Result;
use crate::nodes::{Attribute, Decoration, Node};
use crate::page::Source;

/// Prototypical factory that decorates every text node it creates.
///
/// Enabled decorations always apply in the same order: entity decoding,
/// then escape removal, then non-breaking space conversion.
#[derive(Debug, Clone, Default)]
pub struct StringNodeFactory {
    inner: PrototypicalNodeFactory,
    decode: bool,
    remove_escapes: bool,
    convert_nbsp: bool,
}

impl StringNodeFactory {
    /// Wrap `inner` with no decorations enabled.
    #[must_use]
    pub fn new(inner: PrototypicalNodeFactory) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    /// Wrap the default prototypes.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(PrototypicalNodeFactory::with_defaults())
    }

    #[must_use]
    pub fn decode(&self) -> bool {
        self.decode
    }

    pub fn set_decode(&mut self, decode: bool) {
        self.decode = decode;
    }

    #[must_use]
    pub fn remove_escapes(&self) -> bool {
        self.remove_escapes
    }

    pub fn set_remove_escapes(&mut self, remove_escapes: bool) {
        self.remove_escapes = remove_escapes;
    }

    #[must_use]
    pub fn convert_nbsp(&self) -> bool {
        self.convert_nbsp
    }

    pub fn set_convert_nbsp(&mut self, convert_nbsp: bool) {
        self.convert_nbsp = convert_nbsp;
    }

    fn decorations(&self) -> impl Iterator<Item = Decoration> {
        [
            (self.decode, Decoration::DecodeEntities),
            (self.remove_escapes, Decoration::RemoveEscapes),
            (self.convert_nbsp, Decoration::ConvertNbsp),
        ]
        .into_iter()
        .filter_map(|(enabled, decoration)| enabled.then_some(decoration))
    }
}

impl Deref for StringNodeFactory {
    type Target = PrototypicalNodeFactory;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for StringNodeFactory {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl NodeFactory for StringNodeFactory {
    fn create_string_node(&self, source: &Arc<Source>, start: usize, end: usize) -> Node {
        let mut node = self.inner.create_string_node(source, start, end);
        if let Some(text) = node.as_text_mut() {
            for decoration in self.decorations() {
                text.decorate(decoration);
            }
        }
        node
    }

    fn create_remark_node(&self, source: &Arc<Source>, start: usize, end: usize) -> Node {
        self.inner.create_remark_node(source, start, end)
    }

    fn create_tag_node(
        &self,
        source: &Arc<Source>,
        start: usize,
        end: usize,
        attributes: Vec<Attribute>,
    ) -> Result<Node> {
        self.inner.create_tag_node(source, start, end, attributes)
    }
}
