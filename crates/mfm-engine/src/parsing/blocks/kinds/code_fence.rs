//! Fenced code blocks.
//!
//! ```text
//! ```rust {linenos}     <- header: fence, info text, options, line end
//! fn main() {}          <- code lines, kept raw
//! ```                   <- closing fence, one delimiter for the whole line
//! ```
//!
//! Code lines are a raw zone: no block or inline parsing happens inside them.
//! A fence that is never closed runs to the end of the document.

use std::sync::Arc;

use crate::parsing::blocks::classify::{LineClass, classify, closes_fence};
use crate::parsing::element::{ElementParser, LineOutcome, ParseContext};
use crate::parsing::node::{ElementType, Fence, Node, NodeKind, OptionMap};
use crate::parsing::options::split_trailing_options;
use crate::parsing::rope::Line;

pub struct FencedCodeParser;

impl FencedCodeParser {
    fn open(cx: ParseContext<'_>, fence: Fence, content: &str, terminator: &str) -> Node {
        let indent = content.bytes().take_while(|&b| b == b' ').count();
        let marker_len = indent + fence.length * fence.character.len_utf8();
        let info = &content[marker_len..];

        let mut header = vec![cx.delimiter(&content[..marker_len])];
        let (text, options) = match split_trailing_options(cx, info) {
            Some((at, options)) => (&info[..at], Some(options)),
            None => (info, None),
        };
        if !text.is_empty() {
            header.push(cx.leaf(NodeKind::Text, text));
        }
        header.extend(options.map(Arc::new));
        header.extend(cx.line_end(terminator));

        let children = vec![Arc::new(cx.container(NodeKind::Header, header))];
        let (language, options) = describe(&children);
        cx.container(
            NodeKind::FencedCode {
                fence,
                language,
                options,
                closed: false,
            },
            children,
        )
    }
}

/// Whether the last line of `node` sits inside a fence that never closes,
/// which swallows every line after it.
pub(crate) fn ends_in_open_fence(node: &Node) -> bool {
    match node.kind() {
        NodeKind::FencedCode { closed, .. } => !closed,
        _ => node.last_child().is_some_and(|last| ends_in_open_fence(last)),
    }
}

/// Language and options as written in the header.
fn describe(children: &[Arc<Node>]) -> (Option<String>, OptionMap) {
    let Some(header) = children.first() else {
        return (None, OptionMap::new());
    };
    let language = header
        .child_of_type(ElementType::Text)
        .and_then(|info| info.as_text().split_whitespace().next().map(str::to_string));
    let options = header
        .child_of_type(ElementType::Options)
        .and_then(|o| o.parsed_options())
        .unwrap_or_default();
    (language, options)
}

impl ElementParser for FencedCodeParser {
    fn element_type(&self) -> ElementType {
        ElementType::FencedCode
    }

    fn parse_line(
        &self,
        cx: ParseContext<'_>,
        previous: Option<Node>,
        line: &Line<'_>,
    ) -> LineOutcome {
        let Some(mut code) = previous else {
            let classified = classify(cx, line);
            let LineClass::Fence(fence) = classified.class else {
                return LineOutcome::Rejected(None);
            };
            return LineOutcome::Accepted(Self::open(
                cx,
                fence,
                classified.content,
                classified.terminator,
            ));
        };

        let NodeKind::FencedCode { fence, closed, .. } = code.kind_mut() else {
            return LineOutcome::Rejected(Some(code));
        };
        if *closed {
            return LineOutcome::Rejected(Some(code));
        }
        let child = if closes_fence(*fence, line.body()) {
            *closed = true;
            cx.delimiter(line.text)
        } else {
            cx.leaf(NodeKind::CodeLine, line.text)
        };
        code.push_child(child);
        LineOutcome::Accepted(code)
    }

    fn child_context<'a>(&self, cx: ParseContext<'a>, node: &Node) -> ParseContext<'a> {
        match node.kind() {
            NodeKind::FencedCode { fence, .. } => cx.with_fence(Some(*fence)),
            _ => cx,
        }
    }

    fn rebuild(
        &self,
        cx: ParseContext<'_>,
        existing: &Node,
        children: Vec<Arc<Node>>,
    ) -> Option<Node> {
        let NodeKind::FencedCode { fence, closed, .. } = existing.kind() else {
            return None;
        };
        let (language, options) = describe(&children);
        Some(cx.resolve_options(Node::container(
            existing.id(),
            NodeKind::FencedCode {
                fence: *fence,
                language,
                options,
                closed: *closed,
            },
            children,
        )))
    }

    /// Closing a fence earlier or later moves every line after it.
    fn accepts_replacement(&self, existing: &Node, replacement: &Node) -> bool {
        match (existing.kind(), replacement.kind()) {
            (
                NodeKind::FencedCode { closed: a, .. },
                NodeKind::FencedCode { closed: b, .. },
            ) => a == b,
            _ => false,
        }
    }
}

/// One raw line inside a fence.
pub struct CodeLineParser;

impl ElementParser for CodeLineParser {
    fn element_type(&self) -> ElementType {
        ElementType::CodeLine
    }

    fn parse_fragment(&self, cx: ParseContext<'_>, text: &str) -> Option<Node> {
        let line = Line::new(text, 0, 0);
        if line.body().contains(['\n', '\r']) {
            return None;
        }
        if let Some(fence) = cx.fence
            && closes_fence(fence, line.body())
        {
            return None;
        }
        Some(Node::leaf(cx.ids.next_id(), NodeKind::CodeLine, text))
    }
}
