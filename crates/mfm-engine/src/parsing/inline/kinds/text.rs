//! Plain text runs.
//!
//! A text node is everything between inline constructs, escapes included.
//! Whether a neighbouring construct forms at all depends on the characters
//! that can start or end one, and on the class of the characters right next
//! to them. A text edit is absorbed in place only when it touches neither.

use std::sync::Arc;

use log::trace;

use crate::parsing::change::TextChange;
use crate::parsing::element::{ElementParser, ParseContext};
use crate::parsing::inline::delimiter::char_class;
use crate::parsing::inline::parse_inlines;
use crate::parsing::node::{ElementType, Node, NodeKind};
use crate::parsing::update;

/// Characters that can start, end or change an inline construct, or the line
/// or cell the text sits in.
pub const SIGNIFICANT: [char; 18] = [
    '*', '_', '~', '`', '[', ']', '!', '(', ')', '{', '}', '<', '>', '=', '-', '\\', '|', '\n',
];

fn is_significant(c: char) -> bool {
    SIGNIFICANT.contains(&c) || c == '\r'
}

/// Whether replacing `change.range_length` bytes at `local` in `old` with
/// `change.text` leaves every construct around and inside `old` as it was.
///
/// With `allow_whitespace` unset, whitespace may never be added or removed.
pub(crate) fn is_plain_edit(
    old: &str,
    local: usize,
    change: &TextChange,
    allow_whitespace: bool,
) -> bool {
    let Some(removed) = old.get(local..local + change.range_length) else {
        return false;
    };
    let inserted = change.text.as_str();
    if removed.contains(is_significant) || inserted.contains(is_significant) {
        return false;
    }

    let touches_whitespace =
        removed.contains(char::is_whitespace) || inserted.contains(char::is_whitespace);
    // Whitespace decides whether a link target ends, so it is only free in
    // text without any markup characters.
    if touches_whitespace && (!allow_whitespace || old.contains(is_significant)) {
        return false;
    }

    let before = old[..local].chars().next_back();
    let after = old[local + change.range_length..].chars().next();
    if before.is_some_and(is_significant) || after.is_some_and(is_significant) {
        return false;
    }

    let mut spliced = String::with_capacity(old.len() + inserted.len());
    spliced.push_str(&old[..local]);
    spliced.push_str(inserted);
    spliced.push_str(&old[local + change.range_length..]);
    if spliced.is_empty() {
        return false;
    }
    char_class(old.chars().next()) == char_class(spliced.chars().next())
        && char_class(old.chars().next_back()) == char_class(spliced.chars().next_back())
}

pub struct TextParser;

impl ElementParser for TextParser {
    fn element_type(&self) -> ElementType {
        ElementType::Text
    }

    fn parse_fragment(&self, cx: ParseContext<'_>, text: &str) -> Option<Node> {
        if text.is_empty() || text.contains(['\n', '\r']) {
            return None;
        }
        let mut nodes = parse_inlines(cx, text);
        if nodes.len() != 1 || nodes[0].element_type() != ElementType::Text {
            return None;
        }
        nodes.pop().map(Arc::unwrap_or_clone)
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
        if !update::covers(existing, start, change) || !is_plain_edit(old, local, change, true) {
            trace!("text edit at {} needs the surrounding line", change.range_offset);
            return None;
        }
        update::reparse_self(self, cx, existing, start, change)
    }

    fn accepts_replacement(&self, _existing: &Node, replacement: &Node) -> bool {
        matches!(replacement.kind(), NodeKind::Text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;
    use crate::parsing::ids::IdGenerator;
    use rstest::rstest;

    #[rstest]
    #[case::plain_insert("hello world", TextChange::insert(5, ","), true)]
    #[case::word_delete("hello world", TextChange::delete(6, 5), false)]
    #[case::inner_replace("hello world", TextChange::new(1, 3, "ipp"), true)]
    #[case::adds_star("hello world", TextChange::insert(5, "*"), false)]
    #[case::next_to_star("a*b c", TextChange::insert(2, "x"), false)]
    #[case::far_from_star("a*b cd", TextChange::insert(5, "x"), true)]
    #[case::space_with_markup("(a b)", TextChange::delete(2, 1), false)]
    #[case::space_without_markup("a b", TextChange::delete(1, 1), true)]
    #[case::first_becomes_space("ab", TextChange::new(0, 1, " "), false)]
    #[case::last_becomes_punct("ab", TextChange::new(1, 1, "."), false)]
    #[case::emptied("ab", TextChange::delete(0, 2), false)]
    fn plain_edits(#[case] old: &str, #[case] change: TextChange, #[case] plain: bool) {
        assert_eq!(
            is_plain_edit(old, change.range_offset, &change, true),
            plain,
            "{change:?} on {old:?}"
        );
    }

    #[test]
    fn whitespace_can_be_forbidden() {
        assert!(!is_plain_edit("ab", 1, &TextChange::insert(1, " "), false));
        assert!(is_plain_edit("ab", 1, &TextChange::insert(1, "x"), false));
    }

    #[test]
    fn fragment_must_stay_text() {
        let dialect = Dialect::default();
        let ids = IdGenerator::new();
        let cx = ParseContext::new(&dialect, &ids);
        assert!(TextParser.parse_fragment(cx, "just words").is_some());
        assert!(TextParser.parse_fragment(cx, "a *b*").is_none());
        assert!(TextParser.parse_fragment(cx, "").is_none());
        assert!(TextParser.parse_fragment(cx, "a\nb").is_none());
    }

    #[test]
    fn partial_edit_in_place() {
        let dialect = Dialect::default();
        let ids = IdGenerator::new();
        let cx = ParseContext::new(&dialect, &ids);
        let text = Arc::new(TextParser.parse_fragment(cx, "hello").unwrap());
        let updated = TextParser
            .parse_partial(cx, &text, 10, &TextChange::insert(15, "s"))
            .unwrap();
        assert_eq!(updated.as_text(), "hellos");

        let rejected = TextParser.parse_partial(cx, &text, 10, &TextChange::insert(15, "*"));
        assert!(rejected.is_none());
    }
}
