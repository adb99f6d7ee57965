//! Line-by-line driver.
//!
//! Feeds lines to a single element parser, carrying the node built so far
//! from one line to the next. Once a node exists, every later line must
//! extend that same node; anything else means the grammar and the driver
//! disagree about the document and is reported as an error.

use std::sync::Arc;

use log::debug;

use super::element::{ElementParser, LineOutcome, ParseContext};
use super::node::{ElementType, Node};
use super::rope::{Line, split_lines};
use crate::error::ParseError;

pub fn parse_lines<'t, P>(
    parser: &P,
    cx: ParseContext<'_>,
    lines: impl IntoIterator<Item = Line<'t>>,
) -> Result<Node, ParseError>
where
    P: ElementParser + ?Sized,
{
    let mut current: Option<Node> = None;

    for line in lines {
        let expected = current.as_ref().map(Node::id);
        match parser.parse_line(cx, current.take(), &line) {
            LineOutcome::Accepted(node) => {
                if let Some(expected) = expected
                    && node.id() != expected
                {
                    debug!(
                        "{} parser replaced {expected} with {} at line {}",
                        parser.element_type().name(),
                        node.id(),
                        line.number
                    );
                    return Err(ParseError::ContainerReplaced {
                        line: line.number,
                        expected,
                        found: node.id(),
                    });
                }
                current = Some(node);
            }
            LineOutcome::Rejected(_) if expected.is_some() => {
                debug!(
                    "{} parser desynchronised at line {} (offset {})",
                    parser.element_type().name(),
                    line.number,
                    line.start
                );
                return Err(ParseError::Desync {
                    line: line.number,
                    offset: line.start,
                });
            }
            LineOutcome::Rejected(_) => {
                return Err(ParseError::Unrecognized {
                    line: line.number,
                    offset: line.start,
                });
            }
        }
    }

    let node = current.ok_or(ParseError::Empty)?;
    if cx.dialect.hooks().is_empty() {
        return Ok(node);
    }
    Ok(resolve_multiline(cx, node))
}

/// Whether `node` is, or may hold, an element that grows line by line and
/// so only gets its options resolved once the driver is done with it.
fn holds_multiline(node: &Node) -> bool {
    match node.element_type() {
        ElementType::Block | ElementType::FencedCode => true,
        ElementType::Document | ElementType::Section => {
            node.children().iter().any(|c| holds_multiline(c))
        }
        _ => false,
    }
}

/// Runs the option hooks of blocks and fences on their finished contents.
fn resolve_multiline(cx: ParseContext<'_>, node: Node) -> Node {
    if !holds_multiline(&node) {
        return node;
    }
    let node = match node.element_type() {
        ElementType::Document | ElementType::Section => {
            let children = node
                .children()
                .iter()
                .map(|child| {
                    if holds_multiline(child) {
                        Arc::new(resolve_multiline(cx, Node::clone(child)))
                    } else {
                        Arc::clone(child)
                    }
                })
                .collect();
            node.with_children(children)
        }
        _ => node,
    };
    cx.resolve_options(node)
}

/// Parses a standalone piece of text as one node, or `None` if any line is
/// rejected.
pub fn parse_fragment<P>(parser: &P, cx: ParseContext<'_>, text: &str) -> Option<Node>
where
    P: ElementParser + ?Sized,
{
    parse_lines(parser, cx, split_lines(text, 0)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;
    use crate::parsing::blocks::kinds::{DocumentParser, ParagraphParser};
    use crate::parsing::ids::IdGenerator;
    use crate::parsing::node::{ElementType, NodeKind};

    /// Opens a fresh paragraph on every line instead of extending the last.
    struct Restarting;

    impl ElementParser for Restarting {
        fn element_type(&self) -> ElementType {
            ElementType::Paragraph
        }

        fn parse_line(
            &self,
            cx: ParseContext<'_>,
            _previous: Option<Node>,
            _line: &Line<'_>,
        ) -> LineOutcome {
            LineOutcome::Accepted(cx.container(NodeKind::Paragraph, vec![]))
        }
    }
    #[test]
    fn document_takes_every_line() {
        let dialect = Dialect::default();
        let ids = IdGenerator::new();
        let cx = ParseContext::new(&dialect, &ids);
        let doc = parse_lines(&DocumentParser, cx, split_lines("a\n\n# b\nc", 0)).unwrap();
        assert_eq!(doc.as_text(), "a\n\n# b\nc");
        assert_eq!(doc.element_type(), ElementType::Document);
    }

    #[test]
    fn rejected_middle_line_is_desync() {
        let dialect = Dialect::default();
        let ids = IdGenerator::new();
        let cx = ParseContext::new(&dialect, &ids);
        let err = parse_lines(&ParagraphParser, cx, split_lines("one\ntwo\n\nthree", 0)).unwrap_err();
        assert_eq!(err, ParseError::Desync { line: 2, offset: 8 });
    }

    #[test]
    fn rejected_first_line_is_unrecognized() {
        let dialect = Dialect::default();
        let ids = IdGenerator::new();
        let cx = ParseContext::new(&dialect, &ids);
        let err = parse_lines(&ParagraphParser, cx, split_lines("# heading", 0)).unwrap_err();
        assert_eq!(err, ParseError::Unrecognized { line: 0, offset: 0 });
    }

    #[test]
    fn no_lines_is_empty() {
        let dialect = Dialect::default();
        let ids = IdGenerator::new();
        let cx = ParseContext::new(&dialect, &ids);
        let err = parse_lines(&DocumentParser, cx, split_lines("", 0)).unwrap_err();
        assert_eq!(err, ParseError::Empty);
    }

    #[test]
    fn fragment_fails_when_any_line_is_rejected() {
        let dialect = Dialect::default();
        let ids = IdGenerator::new();
        let cx = ParseContext::new(&dialect, &ids);
        assert!(parse_fragment(&ParagraphParser, cx, "one\ntwo\n").is_some());
        assert!(parse_fragment(&ParagraphParser, cx, "one\n- two\n").is_none());
    }

    #[test]
    fn new_node_on_later_line_is_container_replaced() {
        let dialect = Dialect::default();
        let ids = IdGenerator::new();
        let cx = ParseContext::new(&dialect, &ids);
        let err = parse_lines(&Restarting, cx, split_lines("a\nb\n", 0)).unwrap_err();
        let ParseError::ContainerReplaced {
            line,
            expected,
            found,
        } = err
        else {
            panic!("unexpected error: {err:?}");
        };
        assert_eq!(line, 1);
        assert_eq!((expected.get(), found.get()), (1, 2));
        assert!(parse_fragment(&Restarting, cx, "a\nb\n").is_none());
        assert!(parse_fragment(&Restarting, cx, "a\n").is_some());
    }
}
