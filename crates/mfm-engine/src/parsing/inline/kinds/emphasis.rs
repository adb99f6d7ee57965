use std::sync::Arc;

use crate::parsing::change::TextChange;
use crate::parsing::element::{ElementParser, ParseContext};
use crate::parsing::inline::delimiter::DelimiterRun;
use crate::parsing::node::{ElementType, EmphasisStyle, Node};
use crate::parsing::update;

pub const STRIKE: char = '~';

/// Style of emphasis opened by `run`: `~` strikes through, a single `*` or
/// `_` is italic, anything longer is bold.
pub fn style_of(run: &DelimiterRun) -> EmphasisStyle {
    match (run.character, run.length) {
        (STRIKE, _) => EmphasisStyle::Strikethrough,
        (_, 1) => EmphasisStyle::Italic,
        _ => EmphasisStyle::Bold,
    }
}

/// Emphasis pairs with delimiters elsewhere on the line, so it is never
/// re-parsed on its own; only its content can change in place.
pub struct EmphasisParser;

impl ElementParser for EmphasisParser {
    fn element_type(&self) -> ElementType {
        ElementType::Emphasis
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
