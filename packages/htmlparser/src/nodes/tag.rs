//! Tag node data.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::NodeId;

/// Regex for the charset parameter of a META content attribute.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static CHARSET_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)charset\s*=\s*([^;\s]+)").expect("valid regex"));

/// Runtime kind of a tag, chosen by the node factory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum TagKind {
    /// Tag with no registered prototype, and every end tag.
    Generic,
    Anchor,
    Applet,
    BaseHref,
    Body,
    Bullet,
    BulletList,
    DefinitionList,
    DefinitionListBullet,
    Div,
    Doctype,
    Form,
    Frame,
    FrameSet,
    Head,
    Heading,
    Html,
    Image,
    Input,
    Label,
    Meta,
    Object,
    Option,
    Paragraph,
    Script,
    Select,
    Span,
    Style,
    Table,
    TableColumn,
    TableHeader,
    TableRow,
    TextArea,
    Title,
    /// Extension point for kinds defined outside this crate.
    Custom(String),
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom(name) => write!(f, "Custom({name})"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// One attribute of a tag. Element 0 of a tag's list is its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip)]
    pub quote: Option<char>,
}

impl Attribute {
    /// Attribute without a value, such as `checked` or the tag name.
    #[must_use]
    pub fn name_only(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            quote: None,
        }
    }

    /// Attribute with a double-quoted value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            quote: Some('"'),
        }
    }

    fn write_html(&self, out: &mut String) {
        out.push_str(&self.name);
        if let Some(value) = &self.value {
            out.push('=');
            match self.quote {
                Some(q) => {
                    out.push(q);
                    out.push_str(value);
                    out.push(q);
                }
                None => out.push_str(value),
            }
        }
    }
}

/// Markup element data carried by a tag node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    kind: TagKind,
    attributes: Vec<Attribute>,
    ids: Vec<String>,
    enders: Vec<String>,
    end_tag_enders: Vec<String>,
    end_tag: Option<NodeId>,
}

impl Tag {
    /// Create a tag from its raw attribute list.
    #[must_use]
    pub fn new(kind: TagKind, attributes: Vec<Attribute>) -> Self {
        Self {
            kind,
            attributes,
            ids: Vec::new(),
            enders: Vec::new(),
            end_tag_enders: Vec::new(),
            end_tag: None,
        }
    }

    /// Set the closing rules copied from a prototype.
    #[must_use]
    pub fn with_rules(
        mut self,
        ids: Vec<String>,
        enders: Vec<String>,
        end_tag_enders: Vec<String>,
    ) -> Self {
        self.ids = ids;
        self.enders = enders;
        self.end_tag_enders = end_tag_enders;
        self
    }

    /// Runtime kind.
    #[must_use]
    pub fn kind(&self) -> &TagKind {
        &self.kind
    }

    /// Raw name as written, e.g. `div`, `/div` or `br/`.
    #[must_use]
    pub fn raw_name(&self) -> &str {
        self.attributes.first().map(|a| a.name.as_str()).unwrap_or_default()
    }

    /// Uppercased name without leading or trailing slash.
    #[must_use]
    pub fn tag_name(&self) -> String {
        let raw = self.raw_name();
        let raw = raw.strip_prefix('/').unwrap_or(raw);
        let raw = raw.strip_suffix('/').unwrap_or(raw);
        raw.to_ascii_uppercase()
    }

    /// Whether this is a closing tag such as `</div>`.
    #[must_use]
    pub fn is_end_tag(&self) -> bool {
        self.raw_name().starts_with('/')
    }

    /// Whether this is a self-closing tag such as `<br/>` or `<br />`.
    #[must_use]
    pub fn is_empty_xml_tag(&self) -> bool {
        if self.is_end_tag() {
            return false;
        }
        self.raw_name().ends_with('/')
            || self
                .attributes
                .last()
                .is_some_and(|a| self.attributes.len() > 1 && a.name == "/" && a.value.is_none())
    }

    /// Full attribute list, tag name first.
    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Replace the full attribute list.
    pub fn set_attributes(&mut self, attributes: Vec<Attribute>) {
        self.attributes = attributes;
    }

    /// Value of the attribute `name`, case-insensitive.
    ///
    /// Valueless attributes yield an empty string.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .skip(1)
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_deref().unwrap_or_default())
    }

    /// Set or add an attribute.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        if let Some(existing) = self
            .attributes
            .iter_mut()
            .skip(1)
            .find(|a| a.name.eq_ignore_ascii_case(name))
        {
            existing.value = Some(value);
            if existing.quote.is_none() {
                existing.quote = Some('"');
            }
            return;
        }
        // Keep a trailing "/" marker last.
        let at = match self.attributes.last() {
            Some(a) if self.attributes.len() > 1 && a.name == "/" => self.attributes.len() - 1,
            _ => self.attributes.len(),
        };
        self.attributes.insert(at, Attribute::new(name, value));
    }

    /// Remove an attribute; returns whether it existed.
    pub fn remove_attribute(&mut self, name: &str) -> bool {
        let before = self.attributes.len();
        let mut index = 0;
        self.attributes.retain(|a| {
            let keep = index == 0 || !a.name.eq_ignore_ascii_case(name);
            index += 1;
            keep
        });
        before != self.attributes.len()
    }

    /// Ids this tag answers to.
    #[must_use]
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Open tag names that implicitly close this tag.
    #[must_use]
    pub fn enders(&self) -> &[String] {
        &self.enders
    }

    /// End tag names that implicitly close this tag.
    #[must_use]
    pub fn end_tag_enders(&self) -> &[String] {
        &self.end_tag_enders
    }

    /// Matching end tag, set by a scanner.
    #[must_use]
    pub fn end_tag(&self) -> Option<NodeId> {
        self.end_tag
    }

    /// Attach the matching end tag.
    pub fn set_end_tag(&mut self, end_tag: Option<NodeId>) {
        self.end_tag = end_tag;
    }

    /// `href` of an anchor.
    #[must_use]
    pub fn link(&self) -> Option<&str> {
        if self.kind != TagKind::Anchor {
            return None;
        }
        self.attribute("href").map(str::trim)
    }

    /// `src` of an image.
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        if self.kind != TagKind::Image {
            return None;
        }
        self.attribute("src").map(str::trim)
    }

    /// Charset declared by a META tag, either `charset="x"` or
    /// `http-equiv="Content-Type" content="text/html; charset=x"`.
    #[must_use]
    pub fn charset(&self) -> Option<String> {
        if self.kind != TagKind::Meta {
            return None;
        }
        if let Some(charset) = self.attribute("charset") {
            let charset = charset.trim();
            return (!charset.is_empty()).then(|| charset.to_string());
        }
        let is_content_type = self
            .attribute("http-equiv")
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("content-type"));
        if !is_content_type {
            return None;
        }
        let content = self.attribute("content")?;
        CHARSET_PATTERN
            .captures(content)
            .map(|caps| caps[1].trim_matches(|c| c == '"' || c == '\'').to_string())
    }

    /// Reconstruct the tag's own markup, without children.
    #[must_use]
    pub fn to_tag_html(&self) -> String {
        let mut out = String::from("<");
        for (i, attribute) in self.attributes.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            attribute.write_html(&mut out);
        }
        out.push('>');
        out
    }
}
