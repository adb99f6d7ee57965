//! Links `[text](url){options}` and images `![alt](url){options}`.
//!
//! Link text is parsed as inlines; image alt text is kept as one raw text
//! node. The target runs to the first `)` and may not contain whitespace.
//! An options block directly after the `)` belongs to the link.

use std::sync::Arc;

use crate::parsing::change::TextChange;
use crate::parsing::element::{ElementParser, ParseContext};
use crate::parsing::ids::NodeId;
use crate::parsing::inline::kinds::text::is_plain_edit;
use crate::parsing::inline::parse_inlines;
use crate::parsing::node::{ElementType, Node, NodeKind, unescape};
use crate::parsing::options::collect;
use crate::parsing::update;

pub const LINK_OPEN: &str = "[";
pub const IMAGE_OPEN: &str = "![";
pub const TEXT_CLOSE: char = ']';
pub const TARGET_OPEN: &str = "](";
pub const TARGET_CLOSE: char = ')';

/// Text of the `Target` child.
fn target_of(children: &[Arc<Node>]) -> Option<String> {
    children
        .iter()
        .find(|c| c.element_type() == ElementType::Target)
        .map(|t| t.as_text())
}

/// An options block of a link ends the link, so trailing whitespace is not
/// part of it.
fn options_are_closed(children: &[Arc<Node>]) -> bool {
    children
        .iter()
        .filter(|c| c.element_type() == ElementType::Options)
        .all(|o| o.as_text().ends_with('}'))
}

/// Parses `text` as one inline node of type `ty`.
fn single_inline(cx: ParseContext<'_>, text: &str, ty: ElementType) -> Option<Node> {
    let mut nodes = parse_inlines(cx, text);
    if nodes.len() != 1 || nodes[0].element_type() != ty {
        return None;
    }
    nodes.pop().map(Arc::unwrap_or_clone)
}

fn children_only<P: ElementParser>(
    parser: &P,
    cx: ParseContext<'_>,
    existing: &Arc<Node>,
    start: usize,
    change: &TextChange,
) -> Option<Arc<Node>> {
    if !update::covers(existing, start, change) {
        return None;
    }
    update::reparse_children(parser, cx, existing, start, change)
}

pub struct LinkParser;

impl LinkParser {
    pub fn assemble(cx: ParseContext<'_>, children: Vec<Arc<Node>>) -> Option<Node> {
        Self::describe(cx, cx.ids.next_id(), children)
    }

    fn describe(cx: ParseContext<'_>, id: NodeId, children: Vec<Arc<Node>>) -> Option<Node> {
        let url = target_of(&children)?;
        if !options_are_closed(&children) {
            return None;
        }
        let options = collect(&children);
        Some(cx.resolve_options(Node::container(
            id,
            NodeKind::Link { url, options },
            children,
        )))
    }
}

impl ElementParser for LinkParser {
    fn element_type(&self) -> ElementType {
        ElementType::Link
    }

    fn parse_fragment(&self, cx: ParseContext<'_>, text: &str) -> Option<Node> {
        single_inline(cx, text, ElementType::Link)
    }

    fn parse_partial(
        &self,
        cx: ParseContext<'_>,
        existing: &Arc<Node>,
        start: usize,
        change: &TextChange,
    ) -> Option<Arc<Node>> {
        children_only(self, cx, existing, start, change)
    }

    fn rebuild(
        &self,
        cx: ParseContext<'_>,
        existing: &Node,
        children: Vec<Arc<Node>>,
    ) -> Option<Node> {
        Self::describe(cx, existing.id(), children)
    }
}

pub struct ImageParser;

impl ImageParser {
    pub fn assemble(cx: ParseContext<'_>, children: Vec<Arc<Node>>) -> Option<Node> {
        Self::describe(cx, cx.ids.next_id(), children)
    }

    fn describe(cx: ParseContext<'_>, id: NodeId, children: Vec<Arc<Node>>) -> Option<Node> {
        let url = target_of(&children)?;
        if !options_are_closed(&children) {
            return None;
        }
        let alt = children
            .iter()
            .find(|c| c.element_type() == ElementType::Text)
            .map(|t| unescape(&t.as_text()))
            .unwrap_or_default();
        let options = collect(&children);
        Some(cx.resolve_options(Node::container(
            id,
            NodeKind::Image { url, alt, options },
            children,
        )))
    }
}

impl ElementParser for ImageParser {
    fn element_type(&self) -> ElementType {
        ElementType::Image
    }

    fn parse_fragment(&self, cx: ParseContext<'_>, text: &str) -> Option<Node> {
        single_inline(cx, text, ElementType::Image)
    }

    fn parse_partial(
        &self,
        cx: ParseContext<'_>,
        existing: &Arc<Node>,
        start: usize,
        change: &TextChange,
    ) -> Option<Arc<Node>> {
        children_only(self, cx, existing, start, change)
    }

    fn rebuild(
        &self,
        cx: ParseContext<'_>,
        existing: &Node,
        children: Vec<Arc<Node>>,
    ) -> Option<Node> {
        Self::describe(cx, existing.id(), children)
    }
}

/// The URL between `](` and `)`.
pub struct TargetParser;

impl TargetParser {
    /// Length of the target at the start of `text`: everything up to the
    /// closing `)`, which must follow. Empty targets and whitespace fail.
    pub fn scan(text: &str) -> Option<usize> {
        let len = text.find(|c: char| c == TARGET_CLOSE || c.is_whitespace())?;
        (len > 0 && text[len..].starts_with(TARGET_CLOSE)).then_some(len)
    }
}

impl ElementParser for TargetParser {
    fn element_type(&self) -> ElementType {
        ElementType::Target
    }

    fn parse_fragment(&self, cx: ParseContext<'_>, text: &str) -> Option<Node> {
        if text.is_empty() || text.contains(|c: char| c == TARGET_CLOSE || c.is_whitespace()) {
            return None;
        }
        Some(Node::leaf(cx.ids.next_id(), NodeKind::Target, text))
    }

    fn parse_partial(
        &self,
        cx: ParseContext<'_>,
        existing: &Arc<Node>,
        start: usize,
        change: &TextChange,
    ) -> Option<Arc<Node>> {
        let old = existing.leaf_text()?;
        let local = change.range_offset.checked_sub(start)?;
        if !is_plain_edit(old, local, change, false) {
            return None;
        }
        update::reparse(self, cx, existing, start, change)
    }
}
