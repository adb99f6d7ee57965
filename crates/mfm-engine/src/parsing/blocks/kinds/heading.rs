use std::sync::Arc;

use crate::parsing::blocks::classify::{LineClass, classify};
use crate::parsing::element::{ElementParser, LineOutcome, ParseContext};
use crate::parsing::inline::parse_inlines;
use crate::parsing::node::{ElementType, Node, NodeKind};
use crate::parsing::options::{collect, split_trailing_options};
use crate::parsing::rope::Line;

/// An ATX heading line: `#` marker, text, optional trailing options.
pub struct HeadingParser;

impl HeadingParser {
    fn build(cx: ParseContext<'_>, level: u8, content: &str, terminator: &str) -> Node {
        let marker_len = usize::from(level)
            + content[usize::from(level)..]
                .bytes()
                .take_while(|b| matches!(b, b' ' | b'\t'))
                .count();
        let rest = &content[marker_len..];

        let mut children = vec![cx.delimiter(&content[..marker_len])];
        let (text, options) = match split_trailing_options(cx, rest) {
            Some((at, options)) => (&rest[..at], Some(options)),
            None => (rest, None),
        };
        if !text.is_empty() {
            children.push(Arc::new(
                cx.container(NodeKind::HeadingText, parse_inlines(cx, text)),
            ));
        }
        children.extend(options.map(Arc::new));
        children.extend(cx.line_end(terminator));

        let options = collect(&children);
        cx.resolve_options(cx.container(NodeKind::Heading { level, options }, children))
    }
}

impl ElementParser for HeadingParser {
    fn element_type(&self) -> ElementType {
        ElementType::Heading
    }

    fn parse_line(
        &self,
        cx: ParseContext<'_>,
        previous: Option<Node>,
        line: &Line<'_>,
    ) -> LineOutcome {
        if previous.is_some() {
            return LineOutcome::Rejected(previous);
        }
        let classified = classify(cx, line);
        let LineClass::Heading { level } = classified.class else {
            return LineOutcome::Rejected(None);
        };
        LineOutcome::Accepted(Self::build(
            cx,
            level,
            classified.content,
            classified.terminator,
        ))
    }

    fn rebuild(
        &self,
        cx: ParseContext<'_>,
        existing: &Node,
        children: Vec<Arc<Node>>,
    ) -> Option<Node> {
        let level = existing.level()?;
        let options = collect(&children);
        Some(cx.resolve_options(Node::container(
            existing.id(),
            NodeKind::Heading { level, options },
            children,
        )))
    }

    fn accepts_replacement(&self, existing: &Node, replacement: &Node) -> bool {
        replacement.element_type() == ElementType::Heading
            && existing.level() == replacement.level()
    }
}

/// The inline content of a heading, between the marker and any options.
pub struct HeadingTextParser;

impl ElementParser for HeadingTextParser {
    fn element_type(&self) -> ElementType {
        ElementType::HeadingText
    }

    fn parse_fragment(&self, cx: ParseContext<'_>, text: &str) -> Option<Node> {
        if text.is_empty()
            || text.contains(['\n', '\r'])
            || text.starts_with([' ', '\t'])
            || (cx.config().options && text.trim_end().ends_with('}'))
        {
            return None;
        }
        Some(cx.container(NodeKind::HeadingText, parse_inlines(cx, text)))
    }
}
