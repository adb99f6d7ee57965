//! The document root and the sections its headings open.

use std::sync::Arc;

use log::debug;

use crate::parsing::blocks::classify::{LineClass, classify};
use crate::parsing::blocks::parser_for_class;
use crate::parsing::change::TextChange;
use crate::parsing::element::{
    ElementParser, LineOutcome, ParseContext, offer_to_last, parser_for, start_child,
};
use crate::parsing::node::{ElementType, Node, NodeKind};
use crate::parsing::rope::Line;
use crate::parsing::{driver, update};

use super::code_fence::ends_in_open_fence;
use super::heading::HeadingParser;

/// Gives `line` to the open last block of `container`, or starts a new block
/// for it. With `level` set the container is a section, and a heading at
/// that level or above closes it.
fn take_line(
    cx: ParseContext<'_>,
    container: Node,
    line: &Line<'_>,
    level: Option<u8>,
) -> LineOutcome {
    let container = match container.last_child() {
        Some(last) if !last.is_leaf() => {
            let parser = parser_for(last.element_type());
            match offer_to_last(parser, cx, container, line) {
                (container, true) => return LineOutcome::Accepted(container),
                (container, false) => container,
            }
        }
        _ => container,
    };

    let class = classify(cx, line).class;
    if let (LineClass::Heading { level: heading }, Some(own)) = (class, level)
        && heading <= own
    {
        return LineOutcome::Rejected(Some(container));
    }
    match parser_for_class(class) {
        Some(parser) => start_child(parser, cx, container, line),
        None => LineOutcome::Rejected(Some(container)),
    }
}

pub struct DocumentParser;

impl ElementParser for DocumentParser {
    fn element_type(&self) -> ElementType {
        ElementType::Document
    }

    fn parse_line(
        &self,
        cx: ParseContext<'_>,
        previous: Option<Node>,
        line: &Line<'_>,
    ) -> LineOutcome {
        let document = previous.unwrap_or_else(|| cx.container(NodeKind::Document, vec![]));
        take_line(cx, document, line, None)
    }

    fn parse_fragment(&self, cx: ParseContext<'_>, text: &str) -> Option<Node> {
        if text.is_empty() {
            return Some(cx.container(NodeKind::Document, vec![]));
        }
        driver::parse_fragment(self, cx, text)
    }

    /// The root has no ancestor to escalate to, so a change no block can
    /// absorb re-parses the whole text.
    fn parse_partial(
        &self,
        cx: ParseContext<'_>,
        existing: &Arc<Node>,
        start: usize,
        change: &TextChange,
    ) -> Option<Arc<Node>> {
        if !update::covers(existing, start, change) {
            return None;
        }
        if let Some(updated) = update::reparse_children(self, cx, existing, start, change) {
            return Some(updated);
        }
        debug!(
            "change at {}+{} falls back to a full re-parse",
            change.range_offset, change.range_length
        );
        let spliced = change.splice(&existing.as_text(), start)?;
        self.parse_fragment(cx, &spliced).map(Arc::new)
    }
}

pub struct SectionParser;

impl ElementParser for SectionParser {
    fn element_type(&self) -> ElementType {
        ElementType::Section
    }

    fn parse_line(
        &self,
        cx: ParseContext<'_>,
        previous: Option<Node>,
        line: &Line<'_>,
    ) -> LineOutcome {
        match previous {
            Some(section) => {
                let level = section.level();
                take_line(cx, section, line, level)
            }
            None => {
                let LineClass::Heading { level } = classify(cx, line).class else {
                    return LineOutcome::Rejected(None);
                };
                let section = cx.container(NodeKind::Section { level }, vec![]);
                start_child(&HeadingParser, cx, section, line)
            }
        }
    }

    /// A fence left open at the end of a section runs on past its heading
    /// boundary, so the lines after the section change owner too.
    fn accepts_replacement(&self, existing: &Node, replacement: &Node) -> bool {
        replacement.element_type() == ElementType::Section
            && existing.level() == replacement.level()
            && ends_in_open_fence(existing) == ends_in_open_fence(replacement)
    }
}
