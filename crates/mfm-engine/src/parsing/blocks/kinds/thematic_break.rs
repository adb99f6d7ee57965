use crate::parsing::blocks::classify::{LineClass, classify};
use crate::parsing::element::{ElementParser, LineOutcome, ParseContext};
use crate::parsing::node::{ElementType, Node, NodeKind};
use crate::parsing::rope::Line;

/// `---`, `***` or `___`: a single-line leaf.
pub struct ThematicBreakParser;

impl ElementParser for ThematicBreakParser {
    fn element_type(&self) -> ElementType {
        ElementType::ThematicBreak
    }

    fn parse_line(
        &self,
        cx: ParseContext<'_>,
        previous: Option<Node>,
        line: &Line<'_>,
    ) -> LineOutcome {
        if previous.is_some() || classify(cx, line).class != LineClass::ThematicBreak {
            return LineOutcome::Rejected(previous);
        }
        LineOutcome::Accepted(Node::leaf(
            cx.ids.next_id(),
            NodeKind::ThematicBreak,
            line.text,
        ))
    }
}
