use super::Scanner;
use crate::error::{ParserError, Result};
use crate::iterator::ScanContext;
use crate::list::NodeList;
use crate::nodes::{Node, NodeId};

/// Scanner for raw-text elements such as SCRIPT and STYLE.
///
/// The body is kept as a single text child; markup inside it is not
/// lexed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptScanner;

impl Scanner for ScriptScanner {
    fn scan(&self, tag: NodeId, ctx: &mut ScanContext<'_>, _stack: &mut NodeList) -> Result<NodeId> {
        let name = {
            let open = ctx
                .arena()
                .get(tag)
                .and_then(Node::as_tag)
                .ok_or_else(|| ParserError::parse(format!("node {} is not a tag", tag.0)))?;
            if open.is_empty_xml_tag() {
                return Ok(tag);
            }
            open.tag_name()
        };
        if let Some(node) = ctx.arena_mut().get_mut(tag) {
            node.set_children(Some(Vec::new()))?;
        }

        if let Some(body) = ctx.parse_cdata(&name)? {
            ctx.arena_mut().append_child(tag, body)?;
        }

        let Some(next) = ctx.pull()? else {
            return Ok(tag);
        };
        let closes = ctx
            .arena()
            .get(next)
            .and_then(Node::as_tag)
            .is_some_and(|end| end.is_end_tag() && end.tag_name() == name);
        if closes {
            if let Some(node) = ctx.arena_mut().get_mut(next) {
                node.set_parent(Some(tag));
            }
            if let Some(open) = ctx.arena_mut().get_mut(tag).and_then(Node::as_tag_mut) {
                open.set_end_tag(Some(next));
            }
        } else if let Some(start) = ctx.arena().get(next).map(Node::start) {
            ctx.lexer_mut().set_position(start);
        }
        Ok(tag)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::filters::TagNameFilter;
    use crate::parser::Parser;

    #[test]
    fn test_script_body_is_raw() {
        let mut parser = Parser::from_html("<script>if (a<b) { x = '<p>'; }</script><p>after</p>");
        let scripts = parser
            .extract_all_nodes_that_match(&TagNameFilter::new("script"))
            .unwrap();
        assert_eq!(scripts.len(), 1);

        let script = parser.arena().node(scripts.get(0).unwrap()).unwrap();
        assert_eq!(script.children().count(), 1);
        assert_eq!(script.to_plain_text(), "if (a<b) { x = '<p>'; }");
        assert!(script.end_tag().is_some());
    }

    #[test]
    fn test_style_case_insensitive_close() {
        let mut parser = Parser::from_html("<style>p { color: red }</STYLE>");
        let list = parser
            .extract_all_nodes_that_match(&TagNameFilter::new("style"))
            .unwrap();
        let style = parser.arena().node(list.get(0).unwrap()).unwrap();
        assert_eq!(style.to_html(), "<style>p { color: red }</STYLE>");
    }

    #[test]
    fn test_unterminated_script_takes_rest() {
        let mut parser = Parser::from_html("<script>var a;");
        let list = parser
            .extract_all_nodes_that_match(&TagNameFilter::new("script"))
            .unwrap();
        let script = parser.arena().node(list.get(0).unwrap()).unwrap();
        assert_eq!(script.to_plain_text(), "var a;");
        assert!(script.end_tag().is_none());
    }
}
