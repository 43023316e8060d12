//! Tokenizer turning page text into raw nodes.
//!
//! The lexer never builds trees. It produces one flat node per call and
//! leaves nesting to the scanners.

use std::sync::Arc;

use crate::error::{ParserError, Result};
use crate::factory::{NodeFactory, PrototypicalNodeFactory};
use crate::nodes::{Attribute, NodeArena, NodeId};
use crate::page::Page;

/// Pull tokenizer over a [`Page`].
pub struct Lexer {
    page: Page,
    position: usize,
    factory: Box<dyn NodeFactory>,
}

impl Lexer {
    /// Lexer over `page` using the default prototypes.
    #[must_use]
    pub fn new(page: Page) -> Self {
        Self::with_factory(page, Box::new(PrototypicalNodeFactory::with_defaults()))
    }

    /// Lexer over `page` using `factory`.
    #[must_use]
    pub fn with_factory(page: Page, factory: Box<dyn NodeFactory>) -> Self {
        Self {
            page,
            position: 0,
            factory,
        }
    }

    /// Lexer over an in-memory HTML string.
    #[must_use]
    pub fn from_html(html: impl Into<String>) -> Self {
        Self::new(Page::new(html))
    }

    #[must_use]
    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    /// Byte offset of the next node.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn set_position(&mut self, position: usize) {
        self.position = position;
    }

    /// Rewind to the start of the page.
    pub fn reset(&mut self) {
        self.position = 0;
    }

    #[must_use]
    pub fn node_factory(&self) -> &dyn NodeFactory {
        self.factory.as_ref()
    }

    pub fn set_node_factory(&mut self, factory: Box<dyn NodeFactory>) {
        self.factory = factory;
    }

    /// Remove the installed factory, leaving an empty one in its place.
    pub fn take_node_factory(&mut self) -> Box<dyn NodeFactory> {
        std::mem::replace(&mut self.factory, Box::new(PrototypicalNodeFactory::empty()))
    }

    /// Lex one node into `arena`, or `None` at end of input.
    ///
    /// # Errors
    /// Returns a parse error when the position is not on a character
    /// boundary or the factory rejects a tag.
    pub fn next_node(&mut self, arena: &mut NodeArena) -> Result<Option<NodeId>> {
        let source = Arc::clone(self.page.source());
        let text = source.text();
        let start = self.position;
        if start >= text.len() {
            return Ok(None);
        }
        let Some(rest) = text.get(start..) else {
            return Err(ParserError::parse(format!(
                "position {start} is not on a character boundary"
            )));
        };
        let bytes = text.as_bytes();

        let node = if rest.starts_with("<!--") {
            let end = rest[4..]
                .find("-->")
                .map_or(text.len(), |i| start + 4 + i + 3);
            self.position = end;
            tracing::trace!(start, end, "lexed remark");
            self.factory.create_remark_node(&source, start, end)
        } else if is_tag_start(bytes, start) {
            let (end, attributes) = scan_tag(text, start);
            self.position = end;
            tracing::trace!(start, end, name = %attributes[0].name, "lexed tag");
            self.factory
                .create_tag_node(&source, start, end, attributes)?
        } else {
            let end = find_tag_start(bytes, start + 1).unwrap_or(text.len());
            self.position = end;
            tracing::trace!(start, end, "lexed text");
            self.factory.create_string_node(&source, start, end)
        };
        Ok(Some(arena.alloc(node)))
    }

    /// Lex raw text up to (not including) `</stop_tag`, case-insensitive.
    ///
    /// Returns `None` when the closing tag follows immediately.
    ///
    /// # Errors
    /// Returns a parse error when the position is not on a character
    /// boundary.
    pub fn parse_cdata(&mut self, stop_tag: &str, arena: &mut NodeArena) -> Result<Option<NodeId>> {
        let source = Arc::clone(self.page.source());
        let text = source.text();
        let start = self.position;
        if start >= text.len() {
            return Ok(None);
        }
        let Some(rest) = text.get(start..) else {
            return Err(ParserError::parse(format!(
                "position {start} is not on a character boundary"
            )));
        };

        let needle = format!("</{}", stop_tag.to_ascii_lowercase());
        let end = rest
            .to_ascii_lowercase()
            .find(&needle)
            .map_or(text.len(), |i| start + i);
        if end == start {
            return Ok(None);
        }
        self.position = end;
        tracing::trace!(start, end, stop_tag, "lexed cdata");
        let node = self.factory.create_string_node(&source, start, end);
        Ok(Some(arena.alloc(node)))
    }
}

fn is_tag_start(bytes: &[u8], index: usize) -> bool {
    bytes.get(index) == Some(&b'<')
        && bytes
            .get(index + 1)
            .is_some_and(|b| b.is_ascii_alphabetic() || matches!(b, b'/' | b'!' | b'?'))
}

fn find_tag_start(bytes: &[u8], from: usize) -> Option<usize> {
    (from..bytes.len()).find(|&i| is_tag_start(bytes, i))
}

fn scan_while(bytes: &[u8], from: usize, keep: impl Fn(u8) -> bool) -> usize {
    (from..bytes.len())
        .find(|&i| !keep(bytes[i]))
        .unwrap_or(bytes.len())
}

fn skip_whitespace(bytes: &[u8], from: usize) -> usize {
    scan_while(bytes, from, |b| b.is_ascii_whitespace())
}

/// Split the tag starting at `start` into its end offset and attributes.
///
/// All delimiters are ASCII, so every slice boundary lands on a character
/// boundary.
fn scan_tag(text: &str, start: usize) -> (usize, Vec<Attribute>) {
    let bytes = text.as_bytes();
    let len = bytes.len();

    let name_start = start + 1;
    let name_end = scan_while(bytes, name_start, |b| !b.is_ascii_whitespace() && b != b'>');
    let mut attributes = vec![Attribute::name_only(&text[name_start..name_end])];
    let mut i = name_end;

    loop {
        i = skip_whitespace(bytes, i);
        match bytes.get(i) {
            None => return (len, attributes),
            Some(b'>') => return (i + 1, attributes),
            Some(b'/') if bytes.get(i + 1) == Some(&b'>') => {
                attributes.push(Attribute::name_only("/"));
                return (i + 2, attributes);
            }
            Some(b'/' | b'=') => {
                i += 1;
                continue;
            }
            Some(_) => {}
        }

        let attr_end = scan_while(bytes, i, |b| {
            !b.is_ascii_whitespace() && !matches!(b, b'=' | b'>' | b'/')
        });
        let name = &text[i..attr_end];
        let after_name = skip_whitespace(bytes, attr_end);
        if bytes.get(after_name) != Some(&b'=') {
            attributes.push(Attribute::name_only(name));
            i = attr_end;
            continue;
        }

        let value_start = skip_whitespace(bytes, after_name + 1);
        match bytes.get(value_start) {
            Some(&quote) if quote == b'"' || quote == b'\'' => {
                let inner = value_start + 1;
                let close = (inner..len).find(|&j| bytes[j] == quote).unwrap_or(len);
                attributes.push(Attribute {
                    name: name.to_string(),
                    value: Some(text[inner..close].to_string()),
                    quote: Some(char::from(quote)),
                });
                i = (close + 1).min(len);
            }
            _ => {
                let value_end =
                    scan_while(bytes, value_start, |b| !b.is_ascii_whitespace() && b != b'>');
                attributes.push(Attribute {
                    name: name.to_string(),
                    value: Some(text[value_start..value_end].to_string()),
                    quote: None,
                });
                i = value_end;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::nodes::NodeType;

    fn lex_all(html: &str) -> (NodeArena, Vec<NodeId>) {
        let mut lexer = Lexer::from_html(html);
        let mut arena = NodeArena::new();
        let mut ids = Vec::new();
        while let Some(id) = lexer.next_node(&mut arena).unwrap() {
            ids.push(id);
        }
        (arena, ids)
    }

    #[test]
    fn test_splits_text_tags_and_remarks() {
        let (arena, ids) = lex_all("a<b>c<!-- d -->e</b>");
        let types: Vec<NodeType> = ids.iter().map(|&id| arena.node(id).unwrap().node_type()).collect();
        assert_eq!(
            types,
            vec![
                NodeType::Text,
                NodeType::Tag,
                NodeType::Text,
                NodeType::Remark,
                NodeType::Text,
                NodeType::Tag
            ]
        );
        assert_eq!(arena.node(ids[3]).unwrap().text(), " d ");
        assert!(arena.node(ids[5]).unwrap().is_end_tag());
    }

    #[test]
    fn test_attributes_with_quotes() {
        let (arena, ids) = lex_all(r#"<a href="x y" title='t' data=raw checked>"#);
        let tag = arena.get(ids[0]).unwrap().as_tag().unwrap();
        assert_eq!(tag.attribute("href"), Some("x y"));
        assert_eq!(tag.attribute("title"), Some("t"));
        assert_eq!(tag.attribute("data"), Some("raw"));
        assert_eq!(tag.attribute("checked"), Some(""));
        assert_eq!(tag.to_tag_html(), r#"<a href="x y" title='t' data=raw checked>"#);
    }

    #[test]
    fn test_self_closing_forms() {
        let (arena, ids) = lex_all("<br/><img src=a.png />");
        let br = arena.get(ids[0]).unwrap().as_tag().unwrap();
        let img = arena.get(ids[1]).unwrap().as_tag().unwrap();
        assert!(br.is_empty_xml_tag());
        assert!(img.is_empty_xml_tag());
        assert_eq!(img.attribute("src"), Some("a.png"));
    }

    #[test]
    fn test_lone_angle_bracket_is_text() {
        let (arena, ids) = lex_all("1 < 2 <p>");
        assert_eq!(ids.len(), 2);
        assert_eq!(arena.node(ids[0]).unwrap().text(), "1 < 2 ");
    }

    #[test]
    fn test_unterminated_constructs_run_to_end() {
        let (arena, ids) = lex_all("x<!-- open");
        assert_eq!(ids.len(), 2);
        assert_eq!(arena.get(ids[1]).unwrap().end(), 10);

        let (arena, ids) = lex_all("<div class=\"a");
        let tag = arena.get(ids[0]).unwrap().as_tag().unwrap();
        assert_eq!(tag.attribute("class"), Some("a"));
    }

    #[test]
    fn test_parse_cdata_stops_at_close_tag() {
        let mut lexer = Lexer::from_html("if (a < b) {}</SCRIPT>rest");
        let mut arena = NodeArena::new();
        let body = lexer.parse_cdata("script", &mut arena).unwrap().unwrap();
        assert_eq!(arena.node(body).unwrap().text(), "if (a < b) {}");
        assert_eq!(lexer.position(), 13);
        assert!(lexer.parse_cdata("script", &mut arena).unwrap().is_none());
    }

    #[test]
    fn test_multibyte_text() {
        let (arena, ids) = lex_all("héllo<p>wörld");
        assert_eq!(arena.node(ids[0]).unwrap().text(), "héllo");
        assert_eq!(arena.node(ids[2]).unwrap().text(), "wörld");
    }

    #[test]
    fn test_factory_swap() {
        let mut lexer = Lexer::from_html("<p>");
        let taken = lexer.take_node_factory();
        let mut arena = NodeArena::new();
        let id = lexer.next_node(&mut arena).unwrap().unwrap();
        assert_eq!(
            arena.get(id).unwrap().as_tag().unwrap().kind(),
            &crate::nodes::TagKind::Generic
        );

        lexer.set_node_factory(taken);
        lexer.reset();
        let id = lexer.next_node(&mut arena).unwrap().unwrap();
        assert_eq!(
            arena.get(id).unwrap().as_tag().unwrap().kind(),
            &crate::nodes::TagKind::Paragraph
        );
    }
}
