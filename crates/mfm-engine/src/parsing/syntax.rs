//! Parsers for the pieces of syntax that only exist inside other elements.

use std::sync::Arc;

use super::change::TextChange;
use super::element::{ElementParser, ParseContext};
use super::node::{ElementType, Node};
use super::update;

/// Markers such as `#`, `**`, `{`, `|` or a `> ` prefix. Their text is decided
/// by the element around them, so they never absorb a change.
pub struct DelimiterParser;

impl ElementParser for DelimiterParser {
    fn element_type(&self) -> ElementType {
        ElementType::Delimiter
    }

    fn parse_fragment(&self, _cx: ParseContext<'_>, _text: &str) -> Option<Node> {
        None
    }

    fn parse_partial(
        &self,
        _cx: ParseContext<'_>,
        _existing: &Arc<Node>,
        _start: usize,
        _change: &TextChange,
    ) -> Option<Arc<Node>> {
        None
    }
}

pub struct LineEndParser;

impl ElementParser for LineEndParser {
    fn element_type(&self) -> ElementType {
        ElementType::LineEnd
    }

    fn parse_fragment(&self, _cx: ParseContext<'_>, _text: &str) -> Option<Node> {
        None
    }

    fn parse_partial(
        &self,
        _cx: ParseContext<'_>,
        _existing: &Arc<Node>,
        _start: usize,
        _change: &TextChange,
    ) -> Option<Arc<Node>> {
        None
    }
}

/// The opening line of a fenced code block or of a block with options.
/// Only its parts can change in place; anything else re-parses the element.
pub struct HeaderParser;

impl ElementParser for HeaderParser {
    fn element_type(&self) -> ElementType {
        ElementType::Header
    }

    fn parse_fragment(&self, _cx: ParseContext<'_>, _text: &str) -> Option<Node> {
        None
    }

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
        update::reparse_children(self, cx, existing, start, change)
    }
}
