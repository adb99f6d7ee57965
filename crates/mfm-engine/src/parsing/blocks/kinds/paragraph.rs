use std::sync::Arc;

use crate::parsing::blocks::classify::{Classified, LineClass, classify};
use crate::parsing::driver;
use crate::parsing::element::{ElementParser, LineOutcome, LinePrefix, ParseContext};
use crate::parsing::inline::parse_inlines;
use crate::parsing::node::{ElementType, Node, NodeKind};
use crate::parsing::options::parse_options;
use crate::parsing::rope::{Line, split_lines};

/// Consecutive text lines.
pub struct ParagraphParser;

impl ElementParser for ParagraphParser {
    fn element_type(&self) -> ElementType {
        ElementType::Paragraph
    }

    fn parse_line(
        &self,
        cx: ParseContext<'_>,
        previous: Option<Node>,
        line: &Line<'_>,
    ) -> LineOutcome {
        let classified = classify(cx, line);
        if classified.class != LineClass::Text {
            return LineOutcome::Rejected(previous);
        }
        let content_line = Arc::new(content_line(cx, &classified));
        match previous {
            Some(mut paragraph) => {
                paragraph.push_child(content_line);
                LineOutcome::Accepted(paragraph)
            }
            None => LineOutcome::Accepted(cx.container(NodeKind::Paragraph, vec![content_line])),
        }
    }

    fn parse_fragment(&self, cx: ParseContext<'_>, text: &str) -> Option<Node> {
        let first = split_lines(text, 0).next()?;
        if !ContentLineParser::is_content(cx, &classify(cx, &first)) {
            return None;
        }
        driver::parse_fragment(self, cx, text)
    }
}

/// One line of a paragraph: optional prefix, inline content, line end.
pub struct ContentLineParser;

impl ContentLineParser {
    /// Whether `line` would be parsed as a paragraph line in this context.
    fn is_content(cx: ParseContext<'_>, classified: &Classified<'_>) -> bool {
        if classified.class != LineClass::Text {
            return false;
        }
        // The first line of a block may be its options header.
        !(cx.prefix == LinePrefix::Quote && parse_options(cx, classified.content).is_some())
    }
}

impl ElementParser for ContentLineParser {
    fn element_type(&self) -> ElementType {
        ElementType::ContentLine
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
        if !Self::is_content(cx, &classified) {
            return LineOutcome::Rejected(None);
        }
        LineOutcome::Accepted(content_line(cx, &classified))
    }

    fn rebuild(
        &self,
        cx: ParseContext<'_>,
        existing: &Node,
        children: Vec<Arc<Node>>,
    ) -> Option<Node> {
        let rebuilt = existing.with_children(children);
        let text = rebuilt.as_text();
        let classified = classify(cx, &Line::new(&text, 0, 0));
        Self::is_content(cx, &classified).then_some(rebuilt)
    }
}

pub(crate) fn content_line(cx: ParseContext<'_>, classified: &Classified<'_>) -> Node {
    let mut children = Vec::new();
    if !classified.prefix.is_empty() {
        children.push(cx.delimiter(classified.prefix));
    }
    children.extend(parse_inlines(cx, classified.content));
    children.extend(cx.line_end(classified.terminator));
    cx.container(NodeKind::ContentLine, children)
}
