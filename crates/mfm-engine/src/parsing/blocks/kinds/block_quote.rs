//! Blockquotes and asides: consecutive `>` lines.
//!
//! When the first line holds nothing but an options block it becomes the
//! block's header, and a default option of `aside` turns the block into an
//! aside. Inside a block only paragraphs, blank lines and lists are
//! recognised; every inner line keeps its `>` prefix as a delimiter.

use std::sync::Arc;

use crate::parsing::blocks::classify::{LineClass, classify, quote_prefix_len};
use crate::parsing::blocks::parser_for_class;
use crate::parsing::element::{
    ElementParser, LineOutcome, LinePrefix, ParseContext, offer_to_last, parser_for, start_child,
};
use crate::parsing::node::{BlockStyle, DEFAULT_OPTION, ElementType, Node, NodeKind, OptionMap};
use crate::parsing::options::parse_options;
use crate::parsing::rope::Line;

const ASIDE: &str = "aside";

pub struct BlockParser;

impl BlockParser {
    fn open(cx: ParseContext<'_>, line: &Line<'_>) -> LineOutcome {
        let inner = cx.with_prefix(LinePrefix::Quote);
        let block = cx.container(
            NodeKind::Block {
                style: BlockStyle::Blockquote,
                options: OptionMap::new(),
            },
            vec![],
        );

        let body = line.body();
        let Some(prefix_len) = quote_prefix_len(body) else {
            return LineOutcome::Rejected(None);
        };
        let Some(options) = parse_options(inner, &body[prefix_len..]) else {
            return match Self::take_inner(inner, block, line) {
                LineOutcome::Accepted(block) => LineOutcome::Accepted(Self::describe(block)),
                LineOutcome::Rejected(_) => LineOutcome::Rejected(None),
            };
        };

        let mut header = vec![cx.delimiter(&body[..prefix_len]), Arc::new(options)];
        header.extend(cx.line_end(line.terminator()));
        let mut block = block;
        block.push_child(Arc::new(cx.container(NodeKind::Header, header)));
        LineOutcome::Accepted(Self::describe(block))
    }

    /// Offers a `>` line to the open inner block, or starts a new one.
    fn take_inner(inner: ParseContext<'_>, block: Node, line: &Line<'_>) -> LineOutcome {
        let block = match block.last_child() {
            Some(last) if !last.is_leaf() && last.element_type() != ElementType::Header => {
                match offer_to_last(parser_for(last.element_type()), inner, block, line) {
                    (block, true) => return LineOutcome::Accepted(block),
                    (block, false) => block,
                }
            }
            _ => block,
        };
        match parser_for_class(classify(inner, line).class) {
            Some(parser) => start_child(parser, inner, block, line),
            None => LineOutcome::Rejected(Some(block)),
        }
    }

    /// Sets style and options from the header. Hooks run once the block is
    /// complete.
    fn describe(block: Node) -> Node {
        let options = block
            .child_of_type(ElementType::Header)
            .and_then(|h| h.child_of_type(ElementType::Options))
            .and_then(|o| o.parsed_options())
            .unwrap_or_default();
        let style = match options.get(DEFAULT_OPTION).map(String::as_str) {
            Some(ASIDE) => BlockStyle::Aside,
            _ => BlockStyle::Blockquote,
        };
        let children = block.children().to_vec();
        Node::container(block.id(), NodeKind::Block { style, options }, children)
    }
}

impl ElementParser for BlockParser {
    fn element_type(&self) -> ElementType {
        ElementType::Block
    }

    fn parse_line(
        &self,
        cx: ParseContext<'_>,
        previous: Option<Node>,
        line: &Line<'_>,
    ) -> LineOutcome {
        match previous {
            Some(block) => Self::take_inner(self.child_context(cx, &block), block, line),
            None => {
                if classify(cx, line).class != LineClass::Quote {
                    return LineOutcome::Rejected(None);
                }
                Self::open(cx, line)
            }
        }
    }

    fn child_context<'a>(&self, cx: ParseContext<'a>, _node: &Node) -> ParseContext<'a> {
        cx.with_prefix(LinePrefix::Quote)
    }

    fn rebuild(
        &self,
        cx: ParseContext<'_>,
        existing: &Node,
        children: Vec<Arc<Node>>,
    ) -> Option<Node> {
        Some(cx.resolve_options(Self::describe(existing.with_children(children))))
    }
}
