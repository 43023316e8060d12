//! Configuration constants and default registries for the parser.

use crate::factory::{PrototypicalNodeFactory, TagPrototype};
use crate::nodes::TagKind;
use crate::scanners::{CompositeTagScanner, ScannerRegistry, ScriptScanner};

/// Character encoding assumed until a META tag declares another one.
pub const DEFAULT_ENCODING: &str = "ISO-8859-1";

/// Maximum nesting depth of composite tags.
///
/// Each nested composite tag adds a stack frame to the scan, so documents
/// nested deeper than this fail with a parse error instead of overflowing
/// the stack.
pub const MAX_SCAN_DEPTH: usize = 256;

/// Block-level tags that implicitly close an open paragraph.
const PARAGRAPH_ENDERS: &[&str] = &[
    "P", "ADDRESS", "BLOCKQUOTE", "CENTER", "DD", "DIR", "DIV", "DL", "DT", "FIELDSET", "FORM",
    "H1", "H2", "H3", "H4", "H5", "H6", "HR", "ISINDEX", "LI", "MENU", "NOFRAMES", "OL", "PRE",
    "TABLE", "UL", "BODY", "HTML",
];

const HEADINGS: &[&str] = &["H1", "H2", "H3", "H4", "H5", "H6"];

const TABLE_SECTIONS: &[&str] = &["TBODY", "TFOOT", "THEAD"];

/// Tag kinds whose children are collected by the composite scanner.
const COMPOSITE_KINDS: [TagKind; 25] = [
    TagKind::Anchor,
    TagKind::Applet,
    TagKind::Body,
    TagKind::Bullet,
    TagKind::BulletList,
    TagKind::DefinitionList,
    TagKind::DefinitionListBullet,
    TagKind::Div,
    TagKind::Form,
    TagKind::FrameSet,
    TagKind::Head,
    TagKind::Heading,
    TagKind::Html,
    TagKind::Label,
    TagKind::Object,
    TagKind::Option,
    TagKind::Paragraph,
    TagKind::Select,
    TagKind::Span,
    TagKind::Table,
    TagKind::TableColumn,
    TagKind::TableHeader,
    TagKind::TableRow,
    TagKind::TextArea,
    TagKind::Title,
];

/// Prototypes for the standard HTML tags.
#[must_use]
pub fn default_prototypes() -> Vec<TagPrototype> {
    let cells: Vec<&str> = ["TD", "TH", "TR"]
        .into_iter()
        .chain(TABLE_SECTIONS.iter().copied())
        .collect();
    let cell_end_enders: Vec<&str> = ["TR", "TABLE"]
        .into_iter()
        .chain(TABLE_SECTIONS.iter().copied())
        .collect();
    let row_enders: Vec<&str> = ["TR"]
        .into_iter()
        .chain(TABLE_SECTIONS.iter().copied())
        .collect();
    let row_end_enders: Vec<&str> = ["TABLE"]
        .into_iter()
        .chain(TABLE_SECTIONS.iter().copied())
        .collect();
    let page_end = ["BODY", "HTML"];

    vec![
        TagPrototype::new(TagKind::Anchor, ["A"])
            .with_enders(["A", "P", "DIV", "TD", "TR", "FORM", "LI", "BODY", "HTML"])
            .with_end_tag_enders(["P", "DIV", "TD", "TR", "FORM", "LI", "BODY", "HTML"]),
        TagPrototype::new(TagKind::Applet, ["APPLET"]).with_end_tag_enders(page_end),
        TagPrototype::new(TagKind::BaseHref, ["BASE"]),
        TagPrototype::new(TagKind::Body, ["BODY"])
            .with_enders(["BODY"])
            .with_end_tag_enders(["HTML"]),
        TagPrototype::new(TagKind::Bullet, ["LI"])
            .with_enders(["LI", "BODY", "HTML"])
            .with_end_tag_enders(["UL", "OL", "BODY", "HTML"]),
        TagPrototype::new(TagKind::BulletList, ["UL", "OL"])
            .with_enders(page_end)
            .with_end_tag_enders(page_end),
        TagPrototype::new(TagKind::DefinitionList, ["DL"])
            .with_enders(page_end)
            .with_end_tag_enders(page_end),
        TagPrototype::new(TagKind::DefinitionListBullet, ["DD", "DT"])
            .with_enders(["DD", "DT"])
            .with_end_tag_enders(["DL", "BODY", "HTML"]),
        TagPrototype::new(TagKind::Div, ["DIV"])
            .with_enders(["BODY"])
            .with_end_tag_enders(page_end),
        TagPrototype::new(TagKind::Doctype, ["!DOCTYPE"]),
        TagPrototype::new(TagKind::Form, ["FORM"])
            .with_enders(["HTML", "BODY"])
            .with_end_tag_enders(page_end),
        TagPrototype::new(TagKind::Frame, ["FRAME"]),
        TagPrototype::new(TagKind::FrameSet, ["FRAMESET"]).with_end_tag_enders(["HTML"]),
        TagPrototype::new(TagKind::Head, ["HEAD"])
            .with_enders(["HEAD", "BODY"])
            .with_end_tag_enders(["HTML"]),
        TagPrototype::new(TagKind::Heading, HEADINGS.iter().copied())
            .with_enders(HEADINGS.iter().copied())
            .with_end_tag_enders(page_end),
        TagPrototype::new(TagKind::Html, ["HTML"]),
        TagPrototype::new(TagKind::Image, ["IMG"]),
        TagPrototype::new(TagKind::Input, ["INPUT"]),
        TagPrototype::new(TagKind::Label, ["LABEL"])
            .with_enders(["LABEL", "BODY", "HTML"])
            .with_end_tag_enders(page_end),
        TagPrototype::new(TagKind::Meta, ["META"]),
        TagPrototype::new(TagKind::Object, ["OBJECT"]).with_end_tag_enders(page_end),
        TagPrototype::new(TagKind::Option, ["OPTION"])
            .with_enders(["INPUT", "TEXTAREA", "SELECT", "OPTION"])
            .with_end_tag_enders(["SELECT", "FORM", "BODY", "HTML"]),
        TagPrototype::new(TagKind::Paragraph, ["P"])
            .with_enders(PARAGRAPH_ENDERS.iter().copied())
            .with_end_tag_enders(page_end),
        TagPrototype::new(TagKind::Script, ["SCRIPT"]),
        TagPrototype::new(TagKind::Select, ["SELECT"])
            .with_enders(["INPUT", "TEXTAREA", "SELECT"])
            .with_end_tag_enders(["FORM", "BODY", "HTML"]),
        TagPrototype::new(TagKind::Span, ["SPAN"]).with_end_tag_enders(page_end),
        TagPrototype::new(TagKind::Style, ["STYLE"]),
        TagPrototype::new(TagKind::Table, ["TABLE"])
            .with_enders(page_end)
            .with_end_tag_enders(page_end),
        TagPrototype::new(TagKind::TableColumn, ["TD"])
            .with_enders(cells.iter().copied())
            .with_end_tag_enders(cell_end_enders.iter().copied()),
        TagPrototype::new(TagKind::TableHeader, ["TH"])
            .with_enders(cells.iter().copied())
            .with_end_tag_enders(cell_end_enders.iter().copied()),
        TagPrototype::new(TagKind::TableRow, ["TR"])
            .with_enders(row_enders.iter().copied())
            .with_end_tag_enders(row_end_enders.iter().copied()),
        TagPrototype::new(TagKind::TextArea, ["TEXTAREA"])
            .with_enders(["TEXTAREA"])
            .with_end_tag_enders(["FORM", "BODY", "HTML"]),
        TagPrototype::new(TagKind::Title, ["TITLE"])
            .with_enders(["TITLE", "BODY"])
            .with_end_tag_enders(["HEAD", "HTML"]),
    ]
}

/// Create a factory with every standard prototype registered.
#[must_use]
pub fn create_default_factory() -> PrototypicalNodeFactory {
    let mut factory = PrototypicalNodeFactory::empty();
    for prototype in default_prototypes() {
        factory.register_tag(prototype);
    }
    factory
}

/// Create the scanner table for the standard composite and raw-text tags.
#[must_use]
pub fn create_default_scanners() -> ScannerRegistry {
    let mut registry = ScannerRegistry::new();
    for kind in COMPOSITE_KINDS {
        registry.register(kind, CompositeTagScanner);
    }
    registry.register(TagKind::Script, ScriptScanner);
    registry.register(TagKind::Style, ScriptScanner);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_factory_covers_composites() {
        let factory = create_default_factory();
        for id in ["A", "P", "TD", "TH", "TR", "UL", "OL", "H3", "!DOCTYPE", "META"] {
            assert!(factory.get(id).is_some(), "missing prototype for {id}");
        }
    }

    #[test]
    fn test_div_does_not_end_on_paragraph() {
        let factory = create_default_factory();
        let div = factory.get("DIV").unwrap().instantiate(Vec::new());
        assert!(!div.enders().contains(&"P".to_string()));
    }

    #[test]
    fn test_default_scanners() {
        let scanners = create_default_scanners();
        assert!(scanners.has_scanner(&TagKind::Paragraph));
        assert!(scanners.has_scanner(&TagKind::Script));
        assert!(!scanners.has_scanner(&TagKind::Meta));
        assert!(!scanners.has_scanner(&TagKind::Generic));
        assert_eq!(scanners.len(), COMPOSITE_KINDS.len() + 2);
    }
}
