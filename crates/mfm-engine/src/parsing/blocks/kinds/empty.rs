use crate::parsing::blocks::classify::{LineClass, classify};
use crate::parsing::element::{ElementParser, LineOutcome, ParseContext};
use crate::parsing::node::{ElementType, Node, NodeKind};
use crate::parsing::rope::Line;

/// A blank line. Each blank line is its own element.
pub struct EmptyParser;

impl ElementParser for EmptyParser {
    fn element_type(&self) -> ElementType {
        ElementType::Empty
    }

    fn parse_line(
        &self,
        cx: ParseContext<'_>,
        previous: Option<Node>,
        line: &Line<'_>,
    ) -> LineOutcome {
        if previous.is_some() || classify(cx, line).class != LineClass::Blank {
            return LineOutcome::Rejected(previous);
        }
        LineOutcome::Accepted(Node::leaf(cx.ids.next_id(), NodeKind::Empty, line.text))
    }
}
