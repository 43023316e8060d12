//! End-to-end tests for the parser: factory, scanning, iteration and
//! node lists working together.

use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;

use htmlparser::entities::{convert_nbsp, decode, remove_escapes};
use htmlparser::{
    CompositeTagScanner, Feedback, HasAttributeFilter, HasChildFilter, NodeArena, NodeClassFilter,
    NodeFactory, NodeFilter, NodeId, NodeList, NodeRef, NodeType, Parser, ParserError,
    PrototypicalNodeFactory, ScanContext, Scanner, Source, StringNodeFactory, TagKind,
    TagKindFilter, TagNameFilter, TagPrototype,
};
use htmlparser::Attribute;

fn bold() -> TagKind {
    TagKind::Custom("Bold".to_string())
}

/// Parser that treats `<b>` as a composite tag.
fn parser_with_bold(html: &str) -> Parser {
    let mut factory = PrototypicalNodeFactory::with_defaults();
    factory.register_tag(
        TagPrototype::new(bold(), ["B"]).with_end_tag_enders(["P", "BODY", "HTML"]),
    );
    let mut parser = Parser::from_html(html).with_node_factory(factory);
    parser.scanners_mut().register(bold(), CompositeTagScanner);
    parser
}

fn all_top_level(parser: &mut Parser) -> NodeList {
    parser
        .extract_all_nodes_that_match(&|_: NodeRef<'_>| true)
        .unwrap()
}

fn texts(list: &NodeList, arena: &NodeArena) -> Vec<String> {
    list.iter()
        .map(|id| arena.node(id).unwrap().text())
        .collect()
}

#[test]
fn test_paragraph_with_nested_bold() {
    let mut parser = parser_with_bold("<p>Hi <b>there</b></p>");
    let top = all_top_level(&mut parser);
    let arena = parser.arena();

    assert_eq!(top.len(), 1);
    let p = arena.node(top.get(0).unwrap()).unwrap();
    assert_eq!(p.tag_name().as_deref(), Some("P"));

    let children: Vec<NodeRef<'_>> = p.children().collect();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].text(), "Hi ");
    assert_eq!(children[1].tag_name().as_deref(), Some("B"));
    let bold_children: Vec<String> = children[1].children().map(|c| c.text()).collect();
    assert_eq!(bold_children, vec!["there"]);

    let strings = top.extract_all_nodes_that_match(arena, &NodeClassFilter(NodeType::Text), true);
    assert_eq!(texts(&strings, arena), vec!["Hi ", "there"]);
}

#[test]
fn test_last_registration_for_id_wins() {
    let mut factory = PrototypicalNodeFactory::empty();
    factory.register_tag(TagPrototype::new(TagKind::Custom("First".into()), ["A"]));
    factory.register_tag(TagPrototype::new(TagKind::Custom("Second".into()), ["A"]));

    let source = Arc::new(Source::new(None, "<a>"));
    let node = factory
        .create_tag_node(&source, 0, 3, vec![Attribute::name_only("a")])
        .unwrap();
    assert_eq!(node.as_tag().unwrap().kind(), &TagKind::Custom("Second".into()));
}

#[test]
fn test_created_nodes_are_isolated_from_prototype() {
    let factory = PrototypicalNodeFactory::with_defaults();
    let source = Arc::new(Source::new(None, r#"<a href="x">"#));
    let attrs = || vec![Attribute::name_only("a"), Attribute::new("href", "x")];

    let mut first = factory.create_tag_node(&source, 0, 12, attrs()).unwrap();
    let second = factory.create_tag_node(&source, 0, 12, attrs()).unwrap();

    let tag = first.as_tag_mut().unwrap();
    tag.set_attribute("href", "changed");
    tag.set_end_tag(Some(NodeId(7)));

    assert_eq!(second.as_tag().unwrap().attribute("href"), Some("x"));
    assert_eq!(second.as_tag().unwrap().end_tag(), None);
    let fresh = factory.get("A").unwrap().instantiate(attrs());
    assert_eq!(fresh.attribute("href"), Some("x"));
}

#[test]
fn test_closing_tag_never_uses_registry() {
    let mut factory = PrototypicalNodeFactory::with_defaults();
    factory.put("/DIV", TagPrototype::new(TagKind::Div, ["/DIV"]));

    let source = Arc::new(Source::new(None, "</div>"));
    let node = factory
        .create_tag_node(&source, 0, 6, vec![Attribute::name_only("/DIV")])
        .unwrap();
    let tag = node.as_tag().unwrap();
    assert_eq!(tag.kind(), &TagKind::Generic);
    assert!(tag.is_end_tag());
}

#[test]
fn test_offsets_are_not_validated() {
    let mut parser = Parser::from_html("<p>text</p>");
    let top = all_top_level(&mut parser);
    let mut arena = parser.into_arena();
    let id = top.get(0).unwrap();

    let node = arena.get_mut(id).unwrap();
    node.set_start(10);
    node.set_end(2);
    assert_eq!(node.start(), 10);
    assert_eq!(node.end(), 2);
    assert_eq!(node.source_text(), "");
}

#[test]
fn test_pull_count_equals_top_level_count() {
    for n in [0, 1, 7, 60] {
        let html: String = (0..n).map(|i| format!("<p>para {i}</p>")).collect();
        let mut parser = Parser::from_html(html);
        let mut iter = parser.elements();

        let mut pulls = 0;
        while iter.has_more_nodes() {
            assert!(iter.next_node().unwrap().is_some());
            pulls += 1;
        }
        assert_eq!(pulls, n, "document with {n} paragraphs");
    }
}

#[test]
fn test_decoration_order_is_fixed() {
    let raw = "a&nbsp;b\t&amp;nbsp;\u{a0}c\r\n";
    let expected = convert_nbsp(&remove_escapes(&decode(raw)));

    let mut forward = StringNodeFactory::with_defaults();
    forward.set_decode(true);
    forward.set_remove_escapes(true);
    forward.set_convert_nbsp(true);

    let mut backward = StringNodeFactory::with_defaults();
    backward.set_convert_nbsp(true);
    backward.set_remove_escapes(true);
    backward.set_decode(true);

    for factory in [forward, backward] {
        let mut parser = Parser::from_html(raw).with_node_factory(factory);
        let list = parser.extract_all_nodes_that_are(NodeType::Text).unwrap();
        assert_eq!(list.as_string(parser.arena()), expected);
    }
}

#[test]
fn test_extracted_nodes_satisfy_filter() {
    let html = r#"<html><body><div id="main"><p>One <a href="/x">link</a></p>
        <ul><li>a</li><li class="c">b</li></ul><img src="i.png"></div></body></html>"#;
    let mut parser = Parser::from_html(html);
    let top = all_top_level(&mut parser);
    let arena = parser.arena();

    let filters: Vec<Box<dyn NodeFilter>> = vec![
        Box::new(TagNameFilter::new("li")),
        Box::new(NodeClassFilter(NodeType::Text)),
        Box::new(HasAttributeFilter::new("class")),
        Box::new(TagKindFilter(TagKind::Anchor)),
        Box::new(HasChildFilter::new(TagNameFilter::new("a"), true)),
    ];
    for filter in &filters {
        let matches = top.extract_all_nodes_that_match(arena, filter.as_ref(), true);
        assert!(!matches.is_empty());
        for id in &matches {
            assert!(filter.accept(arena.node(id).unwrap()));
        }
    }
}

#[derive(Default)]
struct CollectingFeedback {
    infos: Mutex<Vec<String>>,
    errors: Mutex<Vec<Vec<String>>>,
}

impl Feedback for CollectingFeedback {
    fn info(&self, message: &str) {
        self.infos.lock().unwrap().push(message.to_string());
    }

    fn warning(&self, _message: &str) {}

    fn error(&self, _message: &str, cause: &ParserError) {
        self.errors.lock().unwrap().push(cause.messages());
    }
}

struct BrokenScanner;

impl Scanner for BrokenScanner {
    fn scan(
        &self,
        _tag: NodeId,
        _ctx: &mut ScanContext<'_>,
        _stack: &mut NodeList,
    ) -> htmlparser::Result<NodeId> {
        Err(ParserError::other(std::io::Error::other("socket closed")))
    }
}

#[test]
fn test_foreign_failure_is_wrapped_and_reported() {
    let feedback = Arc::new(CollectingFeedback::default());
    let mut parser = Parser::new(htmlparser::Lexer::new(htmlparser::Page::with_url(
        "<table><tr><td>x</td></tr></table>",
        "http://example.com/t.html",
    )))
    .with_feedback(feedback.clone());
    parser.scanners_mut().register(TagKind::TableColumn, BrokenScanner);

    let err = parser.extract_all_nodes_that_are(NodeType::Tag).unwrap_err();
    assert!(matches!(err, ParserError::Pull { .. }));

    let errors = feedback.errors.lock().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0],
        vec![
            "nextNode failed for http://example.com/t.html: socket closed".to_string(),
            "socket closed".to_string(),
        ]
    );
}

#[test]
fn test_parse_errors_are_not_reported() {
    let feedback = Arc::new(CollectingFeedback::default());
    let html = "<span>".repeat(htmlparser::config::MAX_SCAN_DEPTH + 5);
    let mut parser = Parser::from_html(html).with_feedback(feedback.clone());

    let err = parser.extract_all_nodes_that_are(NodeType::Tag).unwrap_err();
    assert!(matches!(err, ParserError::Parse { .. }));
    assert!(feedback.errors.lock().unwrap().is_empty());
}

#[test]
fn test_meta_charset_restarts_parse() {
    let feedback = Arc::new(CollectingFeedback::default());
    let html = concat!(
        "<html><head>",
        r#"<meta http-equiv="Content-Type" content="text/html; charset=utf-8">"#,
        "<base href=\"http://example.org/\"></head>",
        "<body><p>caf&eacute;</p></body></html>",
    );
    let mut parser = Parser::from_html(html).with_feedback(feedback.clone());
    let top = all_top_level(&mut parser);

    assert_eq!(top.len(), 1);
    assert_eq!(parser.encoding(), "utf-8");
    assert_eq!(parser.lexer().page().base_url(), Some("http://example.org/"));
    assert_eq!(feedback.infos.lock().unwrap().len(), 1);

    let paragraphs = top.extract_all_nodes_that_match(parser.arena(), &TagNameFilter::new("p"), true);
    assert_eq!(paragraphs.len(), 1);
}
