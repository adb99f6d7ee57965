//! Code spans: a run of backticks closed by the next run of the same
//! length. Nothing inside a code span is parsed.
//!
//! An unmatched run earlier on the line may find its partner inside a span,
//! so an edit that adds or removes a backtick always goes to the line.

use std::sync::Arc;

use crate::parsing::change::TextChange;
use crate::parsing::element::{ElementParser, ParseContext};
use crate::parsing::inline::cursor::Cursor;
use crate::parsing::node::{ElementType, Node, NodeKind};
use crate::parsing::update;

pub const TICK: char = '`';

/// End offset of the code span opened by the backtick run at `pos`, if the
/// run is closed later in `text`. `pos` must be the start of the run.
pub fn scan_code_span(text: &str, pos: usize) -> Option<usize> {
    let mut cur = Cursor::at(text, pos);
    let ticks = cur.run_of(TICK);
    if ticks == 0 {
        return None;
    }
    cur.bump_n(ticks);
    while !cur.eof() {
        if cur.peek() == Some(TICK) {
            let run = cur.run_of(TICK);
            cur.bump_n(run);
            if run == ticks {
                return Some(cur.pos());
            }
        } else {
            cur.bump();
        }
    }
    None
}

pub struct InlineCodeParser;

impl ElementParser for InlineCodeParser {
    fn element_type(&self) -> ElementType {
        ElementType::InlineCode
    }

    fn parse_fragment(&self, cx: ParseContext<'_>, text: &str) -> Option<Node> {
        if text.contains(['\n', '\r']) || scan_code_span(text, 0) != Some(text.len()) {
            return None;
        }
        Some(Node::leaf(cx.ids.next_id(), NodeKind::InlineCode, text))
    }

    fn parse_partial(
        &self,
        cx: ParseContext<'_>,
        existing: &Arc<Node>,
        start: usize,
        change: &TextChange,
    ) -> Option<Arc<Node>> {
        let removed = change.removed(&existing.as_text(), start)?.contains(TICK);
        if removed || change.text.contains(TICK) {
            return None;
        }
        update::reparse(self, cx, existing, start, change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;
    use crate::parsing::ids::IdGenerator;

    #[test]
    fn scanning() {
        assert_eq!(scan_code_span("`a` b", 0), Some(3));
        assert_eq!(scan_code_span("``a`b`` c", 0), Some(7));
        assert_eq!(scan_code_span("`a``", 0), None);
        assert_eq!(scan_code_span("x`a`", 1), Some(4));
        assert_eq!(scan_code_span("abc", 0), None);
    }

    #[test]
    fn content_edit_stays_in_span() {
        let dialect = Dialect::default();
        let ids = IdGenerator::new();
        let cx = ParseContext::new(&dialect, &ids);
        let code = Arc::new(InlineCodeParser.parse_fragment(cx, "`a *b*`").unwrap());
        assert_eq!(code.text().as_deref(), Some("a *b*"));

        let updated = InlineCodeParser
            .parse_partial(cx, &code, 0, &TextChange::insert(2, "["))
            .unwrap();
        assert_eq!(updated.text().as_deref(), Some("a[ *b*"));
    }

    #[test]
    fn new_tick_escalates() {
        let dialect = Dialect::default();
        let ids = IdGenerator::new();
        let cx = ParseContext::new(&dialect, &ids);
        let code = Arc::new(InlineCodeParser.parse_fragment(cx, "`ab`").unwrap());
        let edit = TextChange::insert(2, "`");
        assert!(InlineCodeParser.parse_partial(cx, &code, 0, &edit).is_none());
        let edit = TextChange::insert(4, "x");
        assert!(InlineCodeParser.parse_partial(cx, &code, 0, &edit).is_none());
    }
}
