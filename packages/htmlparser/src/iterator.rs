//! Pull-based iteration: one top-level node per call, with scanners
//! recursing into the same lexer for composite tags.

use crate::config::MAX_SCAN_DEPTH;
use crate::error::{ParserError, Result};
use crate::feedback::Feedback;
use crate::lexer::Lexer;
use crate::list::NodeList;
use crate::nodes::{Node, NodeArena, NodeId};
use crate::page::Cursor;
use crate::scanners::ScannerRegistry;

/// Shared state of one scan: the lexer being pulled from, the arena nodes
/// land in, and the scanner table.
///
/// [`ScanContext::next_node`] and [`ScanContext::scan_tag`] recurse into
/// each other through the scanners, so nesting depth follows markup
/// depth.
pub struct ScanContext<'a> {
    lexer: &'a mut Lexer,
    arena: &'a mut NodeArena,
    scanners: &'a ScannerRegistry,
    depth: usize,
}

impl<'a> ScanContext<'a> {
    pub fn new(
        lexer: &'a mut Lexer,
        arena: &'a mut NodeArena,
        scanners: &'a ScannerRegistry,
    ) -> Self {
        Self {
            lexer,
            arena,
            scanners,
            depth: 0,
        }
    }

    #[must_use]
    pub fn lexer(&self) -> &Lexer {
        self.lexer
    }

    pub fn lexer_mut(&mut self) -> &mut Lexer {
        self.lexer
    }

    #[must_use]
    pub fn arena(&self) -> &NodeArena {
        self.arena
    }

    pub fn arena_mut(&mut self) -> &mut NodeArena {
        self.arena
    }

    /// Number of scanners currently active.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Lex one raw node without scanning it.
    ///
    /// # Errors
    /// Propagates lexer failures.
    pub fn pull(&mut self) -> Result<Option<NodeId>> {
        self.lexer.next_node(self.arena)
    }

    /// Lex raw text up to the `stop_tag` end tag.
    ///
    /// # Errors
    /// Propagates lexer failures.
    pub fn parse_cdata(&mut self, stop_tag: &str) -> Result<Option<NodeId>> {
        self.lexer.parse_cdata(stop_tag, self.arena)
    }

    /// Pull one node and, if it is an open tag, scan its subtree.
    ///
    /// # Errors
    /// Propagates lexer, semantic action and scanner failures.
    pub fn next_node(&mut self) -> Result<Option<NodeId>> {
        let Some(id) = self.pull()? else {
            return Ok(None);
        };
        if is_open_tag(self.arena, id) {
            return self.scan_tag(id, &mut NodeList::new()).map(Some);
        }
        Ok(Some(id))
    }

    /// Run the semantic action of the open tag `id`, then hand it to the
    /// scanner registered for its kind, if any.
    ///
    /// # Errors
    /// Returns `EncodingChange` from a charset declaration, a parse error
    /// past [`MAX_SCAN_DEPTH`], or whatever the scanner raises.
    pub fn scan_tag(&mut self, id: NodeId, stack: &mut NodeList) -> Result<NodeId> {
        let Some(node) = self.arena.get(id) else {
            return Err(ParserError::parse(format!("unknown node {}", id.0)));
        };
        node.do_semantic_action(self.lexer.page_mut())?;

        let Some(kind) = node.as_tag().filter(|tag| !tag.is_end_tag()).map(|tag| tag.kind().clone())
        else {
            return Ok(id);
        };
        let scanners = self.scanners;
        let Some(scanner) = scanners.get(&kind) else {
            return Ok(id);
        };
        if self.depth >= MAX_SCAN_DEPTH {
            return Err(ParserError::parse(format!(
                "tags nested deeper than {MAX_SCAN_DEPTH} levels at position {}",
                node.start()
            )));
        }

        self.depth += 1;
        let scanned = scanner.scan(id, self, stack);
        self.depth -= 1;
        scanned
    }
}

fn is_open_tag(arena: &NodeArena, id: NodeId) -> bool {
    arena
        .get(id)
        .and_then(Node::as_tag)
        .is_some_and(|tag| !tag.is_end_tag())
}

/// Iterator over the top-level nodes of a parser's input.
///
/// It starts wherever the lexer currently is and never rewinds it.
pub struct NodeIterator<'p> {
    lexer: &'p mut Lexer,
    arena: &'p mut NodeArena,
    scanners: &'p ScannerRegistry,
    feedback: &'p dyn Feedback,
}

impl<'p> NodeIterator<'p> {
    pub(crate) fn new(
        lexer: &'p mut Lexer,
        arena: &'p mut NodeArena,
        scanners: &'p ScannerRegistry,
        feedback: &'p dyn Feedback,
    ) -> Self {
        Self {
            lexer,
            arena,
            scanners,
            feedback,
        }
    }

    /// Whether another node is available. Does not move the lexer.
    #[must_use]
    pub fn has_more_nodes(&self) -> bool {
        let cursor = Cursor::new(self.lexer.position());
        self.lexer.page().character_at(cursor).is_some()
    }

    /// Pull the next top-level node, scanning composite tags to completion.
    ///
    /// # Errors
    /// Parser errors pass through unchanged. Any other failure is wrapped
    /// in [`ParserError::Pull`] with the page URL and reported to the
    /// feedback sink before being returned.
    pub fn next_node(&mut self) -> Result<Option<NodeId>> {
        let result = ScanContext::new(self.lexer, self.arena, self.scanners).next_node();
        result.map_err(|err| self.wrap(err))
    }

    fn wrap(&self, err: ParserError) -> ParserError {
        if err.is_core() {
            return err;
        }
        let source = match err {
            ParserError::Other(inner) => inner,
            other => Box::new(other),
        };
        let wrapped = ParserError::Pull {
            url: self.lexer.page().url().map(str::to_string),
            operation: "nextNode",
            source,
        };
        let message = wrapped.to_string();
        tracing::warn!(position = self.lexer.position(), "{message}");
        self.feedback.error(&message, &wrapped);
        wrapped
    }

    /// The arena nodes are stored in.
    #[must_use]
    pub fn arena(&self) -> &NodeArena {
        self.arena
    }
}

impl Iterator for NodeIterator<'_> {
    type Item = Result<NodeId>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_node().transpose()
    }
}
