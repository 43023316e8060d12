//! Parser facade owning the lexer, the node arena and the scanner table.

use std::sync::Arc;

use crate::config::create_default_scanners;
use crate::error::{ParserError, Result};
use crate::factory::NodeFactory;
use crate::feedback::{Feedback, QuietFeedback};
use crate::filters::{NodeClassFilter, NodeFilter};
use crate::iterator::NodeIterator;
use crate::lexer::Lexer;
use crate::list::NodeList;
use crate::nodes::{NodeArena, NodeId, NodeRef, NodeType};
use crate::page::Page;
use crate::scanners::ScannerRegistry;
use crate::visitors::NodeVisitor;

/// HTML parser.
///
/// The parser is reusable: swapping the input keeps the installed node
/// factory, scanners and feedback sink.
///
/// # Examples
/// ```
/// use htmlparser::{Parser, TagNameFilter};
///
/// let mut parser = Parser::from_html("<p>Hi <b>there</b></p>");
/// let paragraphs = parser.extract_all_nodes_that_match(&TagNameFilter::new("p")).unwrap();
/// assert_eq!(paragraphs.as_string(parser.arena()), "Hi there");
/// ```
pub struct Parser {
    lexer: Lexer,
    arena: NodeArena,
    scanners: ScannerRegistry,
    feedback: Arc<dyn Feedback>,
}

impl Parser {
    /// Parser over `lexer` with the default scanners and a quiet sink.
    #[must_use]
    pub fn new(lexer: Lexer) -> Self {
        Self {
            lexer,
            arena: NodeArena::new(),
            scanners: create_default_scanners(),
            feedback: Arc::new(QuietFeedback),
        }
    }

    /// Parser over an in-memory HTML string.
    #[must_use]
    pub fn from_html(html: impl Into<String>) -> Self {
        Self::new(Lexer::from_html(html))
    }

    /// Route diagnostics to `feedback`.
    #[must_use]
    pub fn with_feedback(mut self, feedback: Arc<dyn Feedback>) -> Self {
        self.feedback = feedback;
        self
    }

    /// Replace the scanner table.
    #[must_use]
    pub fn with_scanners(mut self, scanners: ScannerRegistry) -> Self {
        self.scanners = scanners;
        self
    }

    /// Install a node factory on the lexer.
    #[must_use]
    pub fn with_node_factory(mut self, factory: impl NodeFactory + 'static) -> Self {
        self.lexer.set_node_factory(Box::new(factory));
        self
    }

    /// Switch to another lexer, keeping the current node factory.
    ///
    /// Nodes built from the previous input are dropped.
    pub fn set_lexer(&mut self, lexer: Lexer) {
        let factory = self.lexer.take_node_factory();
        self.lexer = lexer;
        self.lexer.set_node_factory(factory);
        self.arena = NodeArena::new();
    }

    /// Switch to another page, keeping the current node factory.
    pub fn set_page(&mut self, page: Page) {
        let factory = self.lexer.take_node_factory();
        self.lexer = Lexer::with_factory(page, factory);
        self.arena = NodeArena::new();
    }

    /// Switch to an in-memory HTML string, keeping the current node factory.
    pub fn set_input_html(&mut self, html: impl Into<String>) {
        self.set_page(Page::new(html));
    }

    /// Rewind to the start of the input and drop every node built so far.
    pub fn reset(&mut self) {
        self.lexer.reset();
        self.arena = NodeArena::new();
    }

    /// URL of the current page, if known.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.lexer.page().url()
    }

    /// Current character encoding label.
    #[must_use]
    pub fn encoding(&self) -> &str {
        self.lexer.page().encoding()
    }

    /// Set the character encoding.
    ///
    /// # Errors
    /// Returns `EncodingChange` when the encoding differs and input has
    /// already been consumed.
    pub fn set_encoding(&mut self, encoding: &str) -> Result<()> {
        let consumed = self.lexer.position() > 0;
        match self.lexer.page_mut().set_encoding(encoding) {
            Err(err) if err.is_encoding_change() && !consumed => Ok(()),
            other => other,
        }
    }

    #[must_use]
    pub fn lexer(&self) -> &Lexer {
        &self.lexer
    }

    pub fn lexer_mut(&mut self) -> &mut Lexer {
        &mut self.lexer
    }

    /// Arena holding every node built so far.
    #[must_use]
    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    /// Give up the parser and keep its nodes.
    #[must_use]
    pub fn into_arena(self) -> NodeArena {
        self.arena
    }

    #[must_use]
    pub fn feedback(&self) -> &dyn Feedback {
        self.feedback.as_ref()
    }

    pub fn scanners_mut(&mut self) -> &mut ScannerRegistry {
        &mut self.scanners
    }

    /// Iterator over the top-level nodes from the lexer's current position.
    pub fn elements(&mut self) -> NodeIterator<'_> {
        NodeIterator::new(
            &mut self.lexer,
            &mut self.arena,
            &self.scanners,
            self.feedback.as_ref(),
        )
    }

    /// Drain the input and collect every top-level node `filter` accepts.
    ///
    /// Children are not examined; use
    /// [`NodeList::extract_all_nodes_that_match`] for recursive matching.
    ///
    /// # Errors
    /// Propagates parse errors. An encoding change restarts the parse once.
    pub fn extract_all_nodes_that_match(&mut self, filter: &dyn NodeFilter) -> Result<NodeList> {
        let top = self.drain()?;
        let mut list = NodeList::new();
        for node in top.iter().filter_map(|&id| self.arena.node(id)) {
            node.collect_into(&mut list, filter);
        }
        Ok(list)
    }

    /// Drain the input and collect every top-level node of `node_type`.
    ///
    /// # Errors
    /// Same as [`Parser::extract_all_nodes_that_match`].
    pub fn extract_all_nodes_that_are(&mut self, node_type: NodeType) -> Result<NodeList> {
        self.extract_all_nodes_that_match(&NodeClassFilter(node_type))
    }

    /// Drain the input, running `visitor` over each top-level node.
    ///
    /// # Errors
    /// Same as [`Parser::extract_all_nodes_that_match`].
    pub fn visit_all_nodes_with(&mut self, visitor: &mut dyn NodeVisitor) -> Result<()> {
        let top = self.drain()?;
        visitor.begin_parsing();
        for node in top.iter().filter_map(|&id| self.arena.node(id)) {
            node.accept(visitor);
        }
        visitor.finished_parsing();
        Ok(())
    }

    /// Drain the input, feeding `sink` every top-level node, or every
    /// top-level node `filter` accepts when one is given.
    ///
    /// # Errors
    /// Same as [`Parser::extract_all_nodes_that_match`].
    pub fn parse<F>(&mut self, filter: Option<&dyn NodeFilter>, mut sink: F) -> Result<()>
    where
        F: FnMut(NodeRef<'_>),
    {
        let top = self.drain()?;
        let mut scratch = NodeList::new();
        for node in top.iter().filter_map(|&id| self.arena.node(id)) {
            let Some(filter) = filter else {
                sink(node);
                continue;
            };
            node.collect_into(&mut scratch, filter);
            for matched in scratch.iter().filter_map(|id| self.arena.node(id)) {
                sink(matched);
            }
            scratch.remove_all();
        }
        Ok(())
    }

    /// Pull every remaining top-level node.
    ///
    /// A restart discards every node built by the failed pass before
    /// parsing again under the new encoding. Only one restart is made.
    fn drain(&mut self) -> Result<Vec<NodeId>> {
        let mark = self.arena.len();
        let start = self.lexer.position();
        let mut restarted = false;
        loop {
            match self.drain_once() {
                Err(ParserError::EncodingChange { from, to }) if !restarted => {
                    tracing::debug!(%from, %to, "restarting parse after encoding change");
                    self.feedback
                        .info(&format!("encoding changed from {from} to {to}, restarting"));
                    self.arena.truncate(mark);
                    self.lexer.set_position(start);
                    restarted = true;
                }
                other => return other,
            }
        }
    }

    fn drain_once(&mut self) -> Result<Vec<NodeId>> {
        let mut iter = self.elements();
        let mut top = Vec::new();
        while iter.has_more_nodes() {
            if let Some(id) = iter.next_node()? {
                top.push(id);
            }
        }
        Ok(top)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::from_html("")
    }
}
