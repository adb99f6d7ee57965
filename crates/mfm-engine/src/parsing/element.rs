//! # The element parser contract
//!
//! Every grammar element is parsed by a stateless [`ElementParser`]. A parser
//! knows how to
//!
//! - consume the document one line at a time ([`ElementParser::parse_line`]),
//!   either starting a new node or continuing the one handed back to it;
//! - parse a standalone fragment of text as exactly one node of its kind
//!   ([`ElementParser::parse_fragment`]);
//! - apply a text change to a node it produced
//!   ([`ElementParser::parse_partial`]), delegating to children first and
//!   re-parsing its own text as a last resort.
//!
//! The defaults implement the generic algorithms in [`super::driver`] and
//! [`super::update`]; concrete elements override only what their grammar needs.
//! Parsers are looked up by [`ElementType`] through [`parser_for`], so a node
//! never has to remember which parser built it.

use std::mem;
use std::sync::Arc;

use mfm_config::DialectConfig;

use super::blocks::kinds::{
    BlockParser, CodeLineParser, ContentLineParser, DocumentParser, EmptyParser, FencedCodeParser,
    HeadingParser, HeadingTextParser, ListItemParser, ListParser, ParagraphParser, SectionParser,
    TableCellParser, TableParser, TableRowParser, ThematicBreakParser,
};
use super::change::TextChange;
use super::ids::IdGenerator;
use super::inline::kinds::{
    ArrowParser, EmphasisParser, ImageParser, InlineCodeParser, LinkParser, TargetParser,
    TextParser,
};
use super::node::{ElementType, Fence, Node, NodeKind};
use super::options::{OptionEntryParser, OptionsParser};
use super::rope::Line;
use super::syntax::{DelimiterParser, HeaderParser, LineEndParser};
use super::{driver, update};
use crate::dialect::Dialect;

/// What a container's lines start with before their content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinePrefix {
    #[default]
    None,
    /// `>` with up to three spaces before it and one optional space after.
    Quote,
}

/// Everything a parser may consult besides the text itself.
#[derive(Clone, Copy)]
pub struct ParseContext<'a> {
    pub dialect: &'a Dialect,
    pub ids: &'a IdGenerator,
    pub prefix: LinePrefix,
    /// The opening fence when parsing the inside of a fenced code block.
    pub fence: Option<Fence>,
}

impl<'a> ParseContext<'a> {
    pub fn new(dialect: &'a Dialect, ids: &'a IdGenerator) -> Self {
        Self {
            dialect,
            ids,
            prefix: LinePrefix::None,
            fence: None,
        }
    }

    pub fn config(&self) -> &'a DialectConfig {
        self.dialect.config()
    }

    pub fn with_prefix(self, prefix: LinePrefix) -> Self {
        Self { prefix, ..self }
    }

    pub fn with_fence(self, fence: Option<Fence>) -> Self {
        Self { fence, ..self }
    }

    pub fn leaf(&self, kind: NodeKind, text: &str) -> Arc<Node> {
        Arc::new(Node::leaf(self.ids.next_id(), kind, text))
    }

    pub fn container(&self, kind: NodeKind, children: Vec<Arc<Node>>) -> Node {
        Node::container(self.ids.next_id(), kind, children)
    }

    pub fn delimiter(&self, text: &str) -> Arc<Node> {
        self.leaf(NodeKind::Delimiter, text)
    }

    /// A `LineEnd` leaf for a non-empty terminator.
    pub fn line_end(&self, terminator: &str) -> Option<Arc<Node>> {
        (!terminator.is_empty()).then(|| self.leaf(NodeKind::LineEnd, terminator))
    }

    /// Runs the registered option hooks over a freshly assembled node.
    pub fn resolve_options(&self, node: Node) -> Node {
        self.dialect.hooks().apply(node)
    }
}

/// Result of offering a line to a parser.
#[derive(Debug)]
pub enum LineOutcome {
    /// The line started a new node or extended the one passed in.
    Accepted(Node),
    /// The line does not belong here; the node passed in is handed back untouched.
    Rejected(Option<Node>),
}

pub trait ElementParser: Sync {
    fn element_type(&self) -> ElementType;

    /// Offers one line. With `previous` set, the parser should extend it and
    /// keep its id; without, it may start a new node. Inline elements never
    /// take lines.
    fn parse_line(
        &self,
        _cx: ParseContext<'_>,
        previous: Option<Node>,
        _line: &Line<'_>,
    ) -> LineOutcome {
        LineOutcome::Rejected(previous)
    }

    /// Parses `text` as exactly one node of this element, consuming all of it.
    fn parse_fragment(&self, cx: ParseContext<'_>, text: &str) -> Option<Node> {
        driver::parse_fragment(self, cx, text)
    }

    /// Applies `change` to `existing`, which starts at absolute offset `start`.
    /// `None` means the change has to be handled by an ancestor.
    fn parse_partial(
        &self,
        cx: ParseContext<'_>,
        existing: &Arc<Node>,
        start: usize,
        change: &TextChange,
    ) -> Option<Arc<Node>> {
        update::reparse(self, cx, existing, start, change)
    }

    /// The context children of `node` are parsed in.
    fn child_context<'a>(&self, cx: ParseContext<'a>, _node: &Node) -> ParseContext<'a> {
        cx
    }

    /// Re-assembles `existing` around a new set of children, recomputing any
    /// derived fields. `None` when the children no longer form this element.
    fn rebuild(
        &self,
        _cx: ParseContext<'_>,
        existing: &Node,
        children: Vec<Arc<Node>>,
    ) -> Option<Node> {
        Some(existing.with_children(children))
    }

    /// Whether a re-parsed `replacement` can stand in for `existing` without
    /// changing how the surrounding lines parse.
    fn accepts_replacement(&self, existing: &Node, replacement: &Node) -> bool {
        mem::discriminant(existing.kind()) == mem::discriminant(replacement.kind())
    }
}

/// The parser responsible for nodes of type `ty`.
pub fn parser_for(ty: ElementType) -> &'static dyn ElementParser {
    match ty {
        ElementType::Document => &DocumentParser,
        ElementType::Section => &SectionParser,
        ElementType::Heading => &HeadingParser,
        ElementType::HeadingText => &HeadingTextParser,
        ElementType::Paragraph => &ParagraphParser,
        ElementType::ContentLine => &ContentLineParser,
        ElementType::Text => &TextParser,
        ElementType::Emphasis => &EmphasisParser,
        ElementType::InlineCode => &InlineCodeParser,
        ElementType::Link => &LinkParser,
        ElementType::Image => &ImageParser,
        ElementType::Target => &TargetParser,
        ElementType::Arrow => &ArrowParser,
        ElementType::OptionEntry => &OptionEntryParser,
        ElementType::Options => &OptionsParser,
        ElementType::Block => &BlockParser,
        ElementType::Header => &HeaderParser,
        ElementType::List => &ListParser,
        ElementType::ListItem => &ListItemParser,
        ElementType::Table => &TableParser,
        ElementType::TableRow => &TableRowParser,
        ElementType::TableCell => &TableCellParser,
        ElementType::ThematicBreak => &ThematicBreakParser,
        ElementType::FencedCode => &FencedCodeParser,
        ElementType::CodeLine => &CodeLineParser,
        ElementType::Empty => &EmptyParser,
        ElementType::Delimiter => &DelimiterParser,
        ElementType::LineEnd => &LineEndParser,
    }
}

/// Offers `line` to the last child of `container` when that child is of type
/// `ty`. On acceptance the extended child replaces the old one.
///
/// Returns the container and whether the line was taken.
pub(crate) fn offer_to_last(
    parser: &dyn ElementParser,
    cx: ParseContext<'_>,
    mut container: Node,
    line: &Line<'_>,
) -> (Node, bool) {
    let Some(last) = container.last_child() else {
        return (container, false);
    };
    if last.element_type() != parser.element_type() || last.is_leaf() {
        return (container, false);
    }
    let Some(last) = container.pop_child() else {
        return (container, false);
    };
    // Uniquely owned during a full parse, so this does not copy.
    let owned = Arc::unwrap_or_clone(last);
    match parser.parse_line(cx, Some(owned), line) {
        LineOutcome::Accepted(extended) => {
            container.push_child(Arc::new(extended));
            (container, true)
        }
        LineOutcome::Rejected(returned) => {
            if let Some(node) = returned {
                container.push_child(Arc::new(node));
            }
            (container, false)
        }
    }
}

/// Starts a new child of `container` from `line` using `parser`.
pub(crate) fn start_child(
    parser: &dyn ElementParser,
    cx: ParseContext<'_>,
    mut container: Node,
    line: &Line<'_>,
) -> LineOutcome {
    match parser.parse_line(cx, None, line) {
        LineOutcome::Accepted(child) => {
            container.push_child(Arc::new(child));
            LineOutcome::Accepted(container)
        }
        LineOutcome::Rejected(_) => LineOutcome::Rejected(Some(container)),
    }
}
