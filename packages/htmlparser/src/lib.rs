//! HTML Parser - lazy, pull-based HTML parsing with composite tag scanning.
//!
//! This crate lexes HTML into text runs, remarks and tags, then assembles
//! composite tags (paragraphs, lists, tables, ...) into trees stored in a
//! flat node arena. Nodes are produced one top-level node at a time, so a
//! caller can stop at any point.
//!
//! # Example
//!
//! ```
//! use htmlparser::{NodeType, Parser};
//!
//! let mut parser = Parser::from_html("<ul><li>one<li>two</ul>");
//! let top = parser.extract_all_nodes_that_are(NodeType::Tag).unwrap();
//! assert_eq!(top.len(), 1);
//! assert_eq!(top.as_string(parser.arena()), "onetwo");
//! ```
//!
//! # Architecture
//!
//! - [`page`]: Document text, cursor and encoding state
//! - [`lexer`]: Tokenizer producing one raw node per call
//! - [`nodes`]: Node model and arena
//! - [`factory`]: Prototype registry turning raw tags into typed nodes
//! - [`scanners`]: Composite and raw-text scanners
//! - [`iterator`]: Pull-based iteration with recursive scanning
//! - [`parser`]: Parser facade and draining operations
//! - [`filters`]: Node predicates
//! - [`list`]: Node lists with filter-based extraction
//! - [`visitors`]: Visitor dispatch over node trees
//! - [`feedback`]: Diagnostic sinks
//! - [`entities`]: Character reference decoding
//! - [`dump`]: Serializable tree summaries
//! - [`config`]: Constants and default registries
//! - [`error`]: Error types and Result alias
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod config;
pub mod dump;
pub mod entities;
pub mod error;
pub mod factory;
pub mod feedback;
pub mod filters;
pub mod iterator;
pub mod lexer;
pub mod list;
pub mod nodes;
pub mod page;
pub mod parser;
pub mod scanners;
pub mod visitors;

// Re-export commonly used items
pub use error::{ParserError, Result};
pub use factory::{NodeFactory, PrototypicalNodeFactory, StringNodeFactory, TagPrototype};
pub use feedback::{Feedback, QuietFeedback, TracingFeedback};
pub use filters::{
    AndFilter, HasAttributeFilter, HasChildFilter, HasParentFilter, NodeClassFilter, NodeFilter,
    NotFilter, OrFilter, StringFilter, TagKindFilter, TagNameFilter,
};
pub use iterator::{NodeIterator, ScanContext};
pub use lexer::Lexer;
pub use list::NodeList;
pub use nodes::{Attribute, Node, NodeArena, NodeId, NodeKind, NodeRef, NodeType, Tag, TagKind};
pub use page::{Cursor, Page, Source};
pub use parser::Parser;
pub use scanners::{CompositeTagScanner, Scanner, ScannerRegistry, ScriptScanner};
pub use visitors::{NodeVisitor, TagFindingVisitor, TextExtractingVisitor};
