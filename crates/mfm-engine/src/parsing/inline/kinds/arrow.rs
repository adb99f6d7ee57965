use std::sync::Arc;

use crate::parsing::change::TextChange;
use crate::parsing::element::{ElementParser, ParseContext};
use crate::parsing::node::{ArrowDirection, ElementType, Node, NodeKind};

/// Arrow tokens, longest first so `<->` wins over `<-`.
pub const ARROWS: [(&str, ArrowDirection); 6] = [
    ("<->", ArrowDirection::Both),
    ("<=>", ArrowDirection::DoubleBoth),
    ("->", ArrowDirection::Right),
    ("<-", ArrowDirection::Left),
    ("=>", ArrowDirection::DoubleRight),
    ("<=", ArrowDirection::DoubleLeft),
];

/// The arrow token at the start of `text`.
pub fn scan_arrow(text: &str) -> Option<(&'static str, ArrowDirection)> {
    ARROWS
        .iter()
        .find(|(token, _)| text.starts_with(token))
        .copied()
}

/// Typographic arrows. Any edit to one changes how the characters around it
/// group, so arrows are always re-parsed with their line.
pub struct ArrowParser;

impl ElementParser for ArrowParser {
    fn element_type(&self) -> ElementType {
        ElementType::Arrow
    }

    fn parse_fragment(&self, cx: ParseContext<'_>, text: &str) -> Option<Node> {
        if !cx.config().arrows {
            return None;
        }
        let (token, direction) = scan_arrow(text)?;
        (token.len() == text.len())
            .then(|| Node::leaf(cx.ids.next_id(), NodeKind::Arrow { direction }, text))
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;
    use crate::parsing::ids::IdGenerator;
    use mfm_config::DialectConfig;
    use rstest::rstest;

    #[rstest]
    #[case("-> x", Some(ArrowDirection::Right))]
    #[case("<-> x", Some(ArrowDirection::Both))]
    #[case("<- x", Some(ArrowDirection::Left))]
    #[case("<=>", Some(ArrowDirection::DoubleBoth))]
    #[case("=>", Some(ArrowDirection::DoubleRight))]
    #[case("<=", Some(ArrowDirection::DoubleLeft))]
    #[case("- >", None)]
    #[case("==", None)]
    fn tokens(#[case] text: &str, #[case] direction: Option<ArrowDirection>) {
        assert_eq!(scan_arrow(text).map(|(_, d)| d), direction);
    }

    #[test]
    fn disabled_arrows_do_not_parse() {
        let dialect = Dialect::from_config(DialectConfig {
            arrows: false,
            ..DialectConfig::default()
        });
        let ids = IdGenerator::new();
        let cx = ParseContext::new(&dialect, &ids);
        assert!(ArrowParser.parse_fragment(cx, "->").is_none());

        let dialect = Dialect::default();
        let cx = ParseContext::new(&dialect, &ids);
        assert!(ArrowParser.parse_fragment(cx, "->").is_some());
        assert!(ArrowParser.parse_fragment(cx, "->>").is_none());
    }
}
