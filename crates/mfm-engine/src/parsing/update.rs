//! # Partial re-parsing
//!
//! A change is applied to the smallest node that can absorb it. Starting at
//! a node, the engine first offers the change to each child whose span covers
//! it; the first child that accepts is swapped in and the node is rebuilt
//! around it, keeping its id. When no child accepts, the node's own text is
//! spliced and re-parsed as a fragment. If that fails too, `None` travels up
//! and the parent tries the same at its level.
//!
//! Every accepted result must be indistinguishable (ids aside) from what a
//! full parse of the edited document would produce. The checks here, together
//! with each element's `accepts_replacement`, guarantee that a re-parsed node
//! does not change how any line outside it parses.

use std::sync::Arc;

use log::trace;

use super::change::TextChange;
use super::element::{ElementParser, ParseContext, parser_for};
use super::node::{Node, NodeRef};
use super::rope::Span;

/// Whether `change` lies inside the node starting at `start`. Both edges are
/// inclusive so that an insertion at a node's end still belongs to it.
pub fn covers(node: &Node, start: usize, change: &TextChange) -> bool {
    Span::new(start, node.len()).covers(change.range_offset, change.end())
}

/// The default partial parse: children first, then the node itself.
pub fn reparse<P>(
    parser: &P,
    cx: ParseContext<'_>,
    existing: &Arc<Node>,
    start: usize,
    change: &TextChange,
) -> Option<Arc<Node>>
where
    P: ElementParser + ?Sized,
{
    if !covers(existing, start, change) {
        trace!(
            "{} at {start}+{} does not cover change at {}+{}",
            existing.type_name(),
            existing.len(),
            change.range_offset,
            change.range_length
        );
        return None;
    }
    reparse_children(parser, cx, existing, start, change)
        .or_else(|| reparse_self(parser, cx, existing, start, change))
}

/// Offers the change to every child that covers it, in order. The first
/// child that accepts replaces the old one and `existing` is rebuilt.
pub fn reparse_children<P>(
    parser: &P,
    cx: ParseContext<'_>,
    existing: &Arc<Node>,
    start: usize,
    change: &TextChange,
) -> Option<Arc<Node>>
where
    P: ElementParser + ?Sized,
{
    let child_cx = parser.child_context(cx, existing);
    for (index, child) in NodeRef::new(existing, start).children().enumerate() {
        if !covers(&child, child.start(), change) {
            continue;
        }
        let child_parser = parser_for(child.element_type());
        let Some(replacement) =
            child_parser.parse_partial(child_cx, child.node(), child.start(), change)
        else {
            continue;
        };
        let mut children = existing.children().to_vec();
        children[index] = replacement;
        if let Some(rebuilt) = parser.rebuild(cx, existing, children) {
            return Some(Arc::new(rebuilt));
        }
        trace!(
            "{} could not be rebuilt around new {}",
            existing.type_name(),
            child.type_name()
        );
    }
    None
}

/// Splices the change into the node's own text and parses the result as a
/// fresh fragment.
pub fn reparse_self<P>(
    parser: &P,
    cx: ParseContext<'_>,
    existing: &Arc<Node>,
    start: usize,
    change: &TextChange,
) -> Option<Arc<Node>>
where
    P: ElementParser + ?Sized,
{
    let old = existing.as_text();
    let spliced = change.splice(&old, start)?;
    if ends_with_terminator(&old) && !ends_with_terminator(&spliced) {
        trace!("{} would lose its line end", existing.type_name());
        return None;
    }
    let Some(replacement) = parser.parse_fragment(cx, &spliced) else {
        trace!(
            "{} rejected re-parse of {:?}",
            existing.type_name(),
            super::rope::preview(&spliced, 40)
        );
        return None;
    };
    if replacement.len() != spliced.len() || !parser.accepts_replacement(existing, &replacement)
    {
        trace!("{} replacement is not compatible", existing.type_name());
        return None;
    }
    Some(Arc::new(replacement))
}

fn ends_with_terminator(text: &str) -> bool {
    text.ends_with('\n')
}
