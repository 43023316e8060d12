//! Scanners assemble composite subtrees by pulling further nodes from the
//! lexer after an open tag.

mod composite;
mod script;

use std::collections::HashMap;

use crate::error::Result;
use crate::iterator::ScanContext;
use crate::list::NodeList;
use crate::nodes::{NodeId, TagKind};

pub use composite::CompositeTagScanner;
pub use script::ScriptScanner;

/// Consumes the nodes belonging to an open tag.
///
/// `stack` holds the open ancestors of `tag`, outermost first. A scanner
/// returns the node that replaces `tag` in its parent, usually `tag`
/// itself.
pub trait Scanner: Send + Sync {
    /// Scan the content of `tag`.
    ///
    /// # Errors
    /// Returns an error when pulling from the lexer fails or the subtree
    /// cannot be linked.
    fn scan(&self, tag: NodeId, ctx: &mut ScanContext<'_>, stack: &mut NodeList)
        -> Result<NodeId>;
}

/// Table mapping tag kinds to their scanner.
pub struct ScannerRegistry {
    scanners: HashMap<TagKind, Box<dyn Scanner>>,
}

impl ScannerRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            scanners: HashMap::new(),
        }
    }

    /// Register the scanner for `kind`, replacing any earlier one.
    pub fn register(&mut self, kind: TagKind, scanner: impl Scanner + 'static) {
        self.scanners.insert(kind, Box::new(scanner));
    }

    /// Remove the scanner for `kind`; returns whether one was registered.
    pub fn remove(&mut self, kind: &TagKind) -> bool {
        self.scanners.remove(kind).is_some()
    }

    /// Scanner for `kind`.
    #[must_use]
    pub fn get(&self, kind: &TagKind) -> Option<&dyn Scanner> {
        self.scanners.get(kind).map(AsRef::as_ref)
    }

    /// Check if a scanner is registered for `kind`.
    #[must_use]
    pub fn has_scanner(&self, kind: &TagKind) -> bool {
        self.scanners.contains_key(kind)
    }

    /// Every kind with a scanner.
    pub fn registered_kinds(&self) -> impl Iterator<Item = &TagKind> {
        self.scanners.keys()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scanners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scanners.is_empty()
    }
}

impl Default for ScannerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop;

    impl Scanner for Noop {
        fn scan(
            &self,
            tag: NodeId,
            _ctx: &mut ScanContext<'_>,
            _stack: &mut NodeList,
        ) -> Result<NodeId> {
            Ok(tag)
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = ScannerRegistry::new();
        assert!(registry.is_empty());

        registry.register(TagKind::Custom("Bold".into()), Noop);
        assert!(registry.has_scanner(&TagKind::Custom("Bold".into())));
        assert!(registry.get(&TagKind::Div).is_none());
        assert_eq!(registry.registered_kinds().count(), 1);

        assert!(registry.remove(&TagKind::Custom("Bold".into())));
        assert!(!registry.remove(&TagKind::Custom("Bold".into())));
    }
}
