use super::Scanner;
use crate::error::{ParserError, Result};
use crate::iterator::ScanContext;
use crate::list::NodeList;
use crate::nodes::{Node, NodeArena, NodeId};

/// Collects children until the tag is closed.
///
/// The tag ends at whichever comes first:
/// - its own end tag, which is recorded as the tag's end tag;
/// - an open tag listed in its enders;
/// - an end tag listed in its end-tag enders or naming an open ancestor;
/// - end of input.
///
/// Implicit endings rewind the lexer so the enclosing scanner sees the
/// node again.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompositeTagScanner;

struct Rules {
    name: String,
    enders: Vec<String>,
    end_tag_enders: Vec<String>,
}

fn tag_info(arena: &NodeArena, id: NodeId) -> Option<(String, bool)> {
    arena
        .get(id)
        .and_then(Node::as_tag)
        .map(|tag| (tag.tag_name(), tag.is_end_tag()))
}

fn is_open_ancestor(arena: &NodeArena, stack: &NodeList, name: &str) -> bool {
    stack
        .iter()
        .any(|id| tag_info(arena, id).is_some_and(|(ancestor, _)| ancestor == name))
}

impl Scanner for CompositeTagScanner {
    fn scan(&self, tag: NodeId, ctx: &mut ScanContext<'_>, stack: &mut NodeList) -> Result<NodeId> {
        let rules = {
            let open = ctx
                .arena()
                .get(tag)
                .and_then(Node::as_tag)
                .ok_or_else(|| ParserError::parse(format!("node {} is not a tag", tag.0)))?;
            if open.is_empty_xml_tag() {
                return Ok(tag);
            }
            Rules {
                name: open.tag_name(),
                enders: open.enders().to_vec(),
                end_tag_enders: open.end_tag_enders().to_vec(),
            }
        };
        if let Some(node) = ctx.arena_mut().get_mut(tag) {
            node.set_children(Some(Vec::new()))?;
        }

        while let Some(child) = ctx.pull()? {
            match tag_info(ctx.arena(), child) {
                Some((name, true)) if name == rules.name => {
                    if let Some(node) = ctx.arena_mut().get_mut(child) {
                        node.set_parent(Some(tag));
                    }
                    if let Some(open) = ctx.arena_mut().get_mut(tag).and_then(Node::as_tag_mut) {
                        open.set_end_tag(Some(child));
                    }
                    break;
                }
                Some((name, true))
                    if rules.end_tag_enders.contains(&name)
                        || is_open_ancestor(ctx.arena(), stack, &name) =>
                {
                    rewind(ctx, child, &rules.name, &name);
                    break;
                }
                Some((name, false)) if rules.enders.contains(&name) => {
                    rewind(ctx, child, &rules.name, &name);
                    break;
                }
                Some((_, false)) => {
                    let depth = stack.len();
                    stack.add(tag);
                    let scanned = ctx.scan_tag(child, stack);
                    stack.remove(depth);
                    ctx.arena_mut().append_child(tag, scanned?)?;
                }
                _ => ctx.arena_mut().append_child(tag, child)?,
            }
        }
        Ok(tag)
    }
}

fn rewind(ctx: &mut ScanContext<'_>, child: NodeId, open: &str, ender: &str) {
    if let Some(start) = ctx.arena().get(child).map(Node::start) {
        tracing::debug!(tag = open, ender, position = start, "implicitly closing tag");
        ctx.lexer_mut().set_position(start);
    }
}
