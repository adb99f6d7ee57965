//! # Parsed nodes and the position model
//!
//! Every element of a parsed document is a [`Node`]. Leaves own their source
//! text; containers own an ordered list of children and their text is exactly
//! the concatenation of the children's text. Nothing stores an absolute
//! offset: a node's start is computed on the way down the tree (the first
//! child starts where its parent starts, every later child starts where its
//! previous sibling ends). An edit therefore shifts everything behind it
//! without touching a single stored number.
//!
//! Nodes are immutable snapshots shared through [`Arc`]. An incremental update
//! allocates new nodes only on the path from the root to the changed element;
//! every untouched subtree is shared with the previous snapshot.

use std::collections::BTreeMap;
use std::ops::Deref;
use std::sync::Arc;

use super::ids::NodeId;
use super::rope::span::Span;

/// Option key/value pairs, ordered by key.
pub type OptionMap = BTreeMap<String, String>;

/// Key under which the first, key-less entry of an options block is stored.
pub const DEFAULT_OPTION: &str = "default";

/// Names every element the dialect knows. Used to dispatch from a node to the
/// parser that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementType {
    Document,
    Section,
    Heading,
    HeadingText,
    Paragraph,
    ContentLine,
    Text,
    Emphasis,
    InlineCode,
    Link,
    Image,
    Target,
    Arrow,
    OptionEntry,
    Options,
    Block,
    Header,
    List,
    ListItem,
    Table,
    TableRow,
    TableCell,
    ThematicBreak,
    FencedCode,
    CodeLine,
    Empty,
    Delimiter,
    LineEnd,
}

impl ElementType {
    /// The public `type` discriminator string.
    pub fn name(self) -> &'static str {
        match self {
            ElementType::Document => "document",
            ElementType::Section => "section",
            ElementType::Heading => "heading",
            ElementType::HeadingText => "heading-text",
            ElementType::Paragraph => "paragraph",
            ElementType::ContentLine => "content-line",
            ElementType::Text => "text",
            ElementType::Emphasis => "emphasis",
            ElementType::InlineCode => "inline-code",
            ElementType::Link => "link",
            ElementType::Image => "image",
            ElementType::Target => "target",
            ElementType::Arrow => "arrow",
            ElementType::OptionEntry => "option",
            ElementType::Options => "options",
            ElementType::Block => "block",
            ElementType::Header => "header",
            ElementType::List => "list",
            ElementType::ListItem => "list-item",
            ElementType::Table => "table",
            ElementType::TableRow => "table-row",
            ElementType::TableCell => "table-cell",
            ElementType::ThematicBreak => "thematic-break",
            ElementType::FencedCode => "fenced-code",
            ElementType::CodeLine => "code-line",
            ElementType::Empty => "empty",
            ElementType::Delimiter => "delimiter",
            ElementType::LineEnd => "line-end",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmphasisStyle {
    Italic,
    Bold,
    Strikethrough,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrowDirection {
    /// `->`
    Right,
    /// `<-`
    Left,
    /// `<->`
    Both,
    /// `=>`
    DoubleRight,
    /// `<=`
    DoubleLeft,
    /// `<=>`
    DoubleBoth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockStyle {
    Blockquote,
    Aside,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListMarker {
    /// `-`, `*` or `+`.
    Bullet(char),
    /// `1.` or `1)`.
    Ordered { number: u64, delimiter: char },
}

impl ListMarker {
    pub fn is_ordered(self) -> bool {
        matches!(self, ListMarker::Ordered { .. })
    }
}

/// Opening fence of a code block: the fence character and run length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fence {
    pub character: char,
    pub length: usize,
}

/// Kind-specific semantic fields of a node.
///
/// Fields here are the facts a parser decided while building the node. Text
/// that can be read off the children (heading text, cell text, code content)
/// is computed on access instead, so replacing a child never leaves a stale copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Section {
        level: u8,
    },
    Heading {
        level: u8,
        options: OptionMap,
    },
    HeadingText,
    Paragraph,
    ContentLine,
    Text,
    Emphasis {
        style: EmphasisStyle,
    },
    InlineCode,
    Link {
        url: String,
        options: OptionMap,
    },
    Image {
        url: String,
        alt: String,
        options: OptionMap,
    },
    /// The URL part of a link or image.
    Target,
    Arrow {
        direction: ArrowDirection,
    },
    OptionEntry {
        /// Position inside the options block; only entry 0 may omit its key.
        index: usize,
        key: Option<String>,
        value: String,
    },
    Options,
    Block {
        style: BlockStyle,
        options: OptionMap,
    },
    /// The opening line of a fenced code block or block: marker, info, options.
    Header,
    List {
        ordered: bool,
        indent: usize,
    },
    ListItem {
        indent: usize,
        marker: ListMarker,
    },
    Table,
    TableRow {
        separator: bool,
    },
    TableCell,
    ThematicBreak,
    FencedCode {
        fence: Fence,
        language: Option<String>,
        options: OptionMap,
        closed: bool,
    },
    CodeLine,
    Empty,
    /// Syntax that carries no content of its own (`#`, `**`, `{`, `|`, `> `...).
    Delimiter,
    LineEnd,
}

impl NodeKind {
    pub fn element_type(&self) -> ElementType {
        match self {
            NodeKind::Document => ElementType::Document,
            NodeKind::Section { .. } => ElementType::Section,
            NodeKind::Heading { .. } => ElementType::Heading,
            NodeKind::HeadingText => ElementType::HeadingText,
            NodeKind::Paragraph => ElementType::Paragraph,
            NodeKind::ContentLine => ElementType::ContentLine,
            NodeKind::Text => ElementType::Text,
            NodeKind::Emphasis { .. } => ElementType::Emphasis,
            NodeKind::InlineCode => ElementType::InlineCode,
            NodeKind::Link { .. } => ElementType::Link,
            NodeKind::Image { .. } => ElementType::Image,
            NodeKind::Target => ElementType::Target,
            NodeKind::Arrow { .. } => ElementType::Arrow,
            NodeKind::OptionEntry { .. } => ElementType::OptionEntry,
            NodeKind::Options => ElementType::Options,
            NodeKind::Block { .. } => ElementType::Block,
            NodeKind::Header => ElementType::Header,
            NodeKind::List { .. } => ElementType::List,
            NodeKind::ListItem { .. } => ElementType::ListItem,
            NodeKind::Table => ElementType::Table,
            NodeKind::TableRow { .. } => ElementType::TableRow,
            NodeKind::TableCell => ElementType::TableCell,
            NodeKind::ThematicBreak => ElementType::ThematicBreak,
            NodeKind::FencedCode { .. } => ElementType::FencedCode,
            NodeKind::CodeLine => ElementType::CodeLine,
            NodeKind::Empty => ElementType::Empty,
            NodeKind::Delimiter => ElementType::Delimiter,
            NodeKind::LineEnd => ElementType::LineEnd,
        }
    }
}

/// One line of a node's text with its absolute position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedContentSpan {
    pub start: usize,
    pub length: usize,
    pub text: String,
}

#[derive(Debug, Clone)]
enum Body {
    Leaf(String),
    Container(Vec<Arc<Node>>),
}

#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    kind: NodeKind,
    body: Body,
    len: usize,
}

impl Node {
    pub(crate) fn leaf(id: NodeId, kind: NodeKind, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            id,
            kind,
            len: text.len(),
            body: Body::Leaf(text),
        }
    }

    pub(crate) fn container(id: NodeId, kind: NodeKind, children: Vec<Arc<Node>>) -> Self {
        Self {
            id,
            kind,
            len: children.iter().map(|c| c.len).sum(),
            body: Body::Container(children),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    pub fn type_name(&self) -> &'static str {
        self.element_type().name()
    }

    /// Length of the node's text in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.body, Body::Leaf(_))
    }

    /// Children in document order; empty for leaves.
    pub fn children(&self) -> &[Arc<Node>] {
        match &self.body {
            Body::Leaf(_) => &[],
            Body::Container(children) => children,
        }
    }

    pub fn leaf_text(&self) -> Option<&str> {
        match &self.body {
            Body::Leaf(text) => Some(text),
            Body::Container(_) => None,
        }
    }

    /// The exact source text this node was parsed from.
    pub fn as_text(&self) -> String {
        let mut out = String::with_capacity(self.len);
        self.write_text(&mut out);
        out
    }

    pub fn write_text(&self, out: &mut String) {
        match &self.body {
            Body::Leaf(text) => out.push_str(text),
            Body::Container(children) => children.iter().for_each(|c| c.write_text(out)),
        }
    }

    /// The node's text split into line spans, positioned from `start`.
    pub fn lines(&self, start: usize) -> Vec<ParsedContentSpan> {
        let mut offset = start;
        self.as_text()
            .split_inclusive('\n')
            .map(|line| {
                let span = ParsedContentSpan {
                    start: offset,
                    length: line.len(),
                    text: line.to_string(),
                };
                offset += line.len();
                span
            })
            .collect()
    }

    /// Structural equality ignoring ids: same kinds, same text, same shape.
    pub fn same_structure(&self, other: &Node) -> bool {
        if self.kind != other.kind || self.len != other.len {
            return false;
        }
        match (&self.body, &other.body) {
            (Body::Leaf(a), Body::Leaf(b)) => a == b,
            (Body::Container(a), Body::Container(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_structure(y))
            }
            _ => false,
        }
    }

    /// First direct child of the given type.
    pub fn child_of_type(&self, ty: ElementType) -> Option<&Arc<Node>> {
        self.children().iter().find(|c| c.element_type() == ty)
    }

    // Construction helpers. Only parsers mutate a node, and only while it is
    // still being built line by line and therefore uniquely owned.

    pub(crate) fn push_child(&mut self, child: Arc<Node>) {
        if let Body::Container(children) = &mut self.body {
            self.len += child.len;
            children.push(child);
        }
    }

    pub(crate) fn pop_child(&mut self) -> Option<Arc<Node>> {
        match &mut self.body {
            Body::Container(children) => {
                let child = children.pop()?;
                self.len -= child.len;
                Some(child)
            }
            Body::Leaf(_) => None,
        }
    }

    pub(crate) fn last_child(&self) -> Option<&Arc<Node>> {
        self.children().last()
    }

    pub(crate) fn kind_mut(&mut self) -> &mut NodeKind {
        &mut self.kind
    }

    /// A copy with the same id and kind but different children.
    pub(crate) fn with_children(&self, children: Vec<Arc<Node>>) -> Node {
        Node::container(self.id, self.kind.clone(), children)
    }

    // Semantic read surface.

    /// Heading level of a section or heading.
    pub fn level(&self) -> Option<u8> {
        match self.kind {
            NodeKind::Section { level } | NodeKind::Heading { level, .. } => Some(level),
            _ => None,
        }
    }

    /// Resolved options (parsed entries plus hook-derived values) of an
    /// element that can carry an options block.
    pub fn options(&self) -> Option<&OptionMap> {
        match &self.kind {
            NodeKind::Heading { options, .. }
            | NodeKind::Link { options, .. }
            | NodeKind::Image { options, .. }
            | NodeKind::Block { options, .. }
            | NodeKind::FencedCode { options, .. } => Some(options),
            _ => None,
        }
    }

    /// Entries of an `Options` node as a map.
    pub fn parsed_options(&self) -> Option<OptionMap> {
        if !matches!(self.kind, NodeKind::Options) {
            return None;
        }
        let mut map = OptionMap::new();
        for child in self.children() {
            if let NodeKind::OptionEntry { key, value, .. } = &child.kind {
                let key = key.clone().unwrap_or_else(|| DEFAULT_OPTION.to_string());
                map.insert(key, value.clone());
            }
        }
        Some(map)
    }

    /// The semantic text of a node, where the kind has one.
    pub fn text(&self) -> Option<String> {
        match &self.kind {
            NodeKind::Heading { .. } => Some(
                self.child_of_type(ElementType::HeadingText)
                    .map(|t| t.plain_text().trim().to_string())
                    .unwrap_or_default(),
            ),
            NodeKind::HeadingText
            | NodeKind::ContentLine
            | NodeKind::Emphasis { .. }
            | NodeKind::Link { .. }
            | NodeKind::ListItem { .. } => Some(self.plain_text()),
            NodeKind::TableCell => Some(self.plain_text().trim().to_string()),
            NodeKind::Text => Some(unescape(&self.as_text())),
            NodeKind::Target | NodeKind::CodeLine => Some(self.as_text()),
            NodeKind::Paragraph => Some(
                self.children()
                    .iter()
                    .map(|line| line.plain_text())
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            NodeKind::InlineCode => Some(code_span_content(&self.as_text()).to_string()),
            NodeKind::OptionEntry { value, .. } => Some(value.clone()),
            NodeKind::Image { alt, .. } => Some(alt.clone()),
            NodeKind::FencedCode { .. } => Some(
                self.children()
                    .iter()
                    .filter(|c| matches!(c.kind, NodeKind::CodeLine))
                    .map(|c| c.as_text())
                    .collect(),
            ),
            _ => None,
        }
    }

    /// Text content with markup removed: delimiters, options, URLs and line
    /// ends are dropped, escapes resolved, nested lists skipped.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.write_plain(&mut out);
        out
    }

    fn write_plain(&self, out: &mut String) {
        match &self.kind {
            NodeKind::Text => out.push_str(&unescape(&self.as_text())),
            NodeKind::InlineCode => out.push_str(code_span_content(&self.as_text())),
            NodeKind::Arrow { .. } => self.write_text(out),
            NodeKind::Image { alt, .. } => out.push_str(alt),
            NodeKind::Delimiter
            | NodeKind::LineEnd
            | NodeKind::Options
            | NodeKind::OptionEntry { .. }
            | NodeKind::Target
            | NodeKind::List { .. } => {}
            _ => self.children().iter().for_each(|c| c.write_plain(out)),
        }
    }
}

/// Resolves backslash escapes of ASCII punctuation.
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\'
            && let Some(&next) = chars.peek()
            && next.is_ascii_punctuation()
        {
            out.push(next);
            chars.next();
            continue;
        }
        out.push(c);
    }
    out
}

/// Content of a code span: backtick runs removed, plus one padding space on
/// each side when both are present and the content is not all spaces.
fn code_span_content(raw: &str) -> &str {
    let ticks = raw.bytes().take_while(|&b| b == b'`').count();
    if raw.len() < ticks * 2 {
        return "";
    }
    let inner = &raw[ticks..raw.len() - ticks];
    if inner.len() >= 2
        && inner.starts_with(' ')
        && inner.ends_with(' ')
        && !inner.trim().is_empty()
    {
        &inner[1..inner.len() - 1]
    } else {
        inner
    }
}

/// A node together with its computed start offset.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    node: &'a Arc<Node>,
    start: usize,
}

impl<'a> NodeRef<'a> {
    pub fn new(node: &'a Arc<Node>, start: usize) -> Self {
        Self { node, start }
    }

    pub fn node(&self) -> &'a Arc<Node> {
        self.node
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.start + self.node.len()
    }

    pub fn span(&self) -> Span {
        Span::new(self.start, self.node.len())
    }

    /// Children with their starts: each begins where the previous one ends.
    pub fn children(&self) -> Children<'a> {
        Children {
            iter: self.node.children().iter(),
            next_start: self.start,
        }
    }

    pub fn lines(&self) -> Vec<ParsedContentSpan> {
        self.node.lines(self.start)
    }

    /// The deepest descendant whose span contains `offset` (`start <= offset < end`).
    pub fn descendant_at(self, offset: usize) -> Option<NodeRef<'a>> {
        if offset < self.start || offset >= self.end() {
            return None;
        }
        let mut current = self;
        while let Some(child) = current
            .children()
            .find(|c| offset >= c.start && offset < c.end())
        {
            current = child;
        }
        Some(current)
    }

    /// Pre-order traversal of this node and all its descendants.
    pub fn walk(self) -> Walk<'a> {
        Walk { stack: vec![self] }
    }
}

impl Deref for NodeRef<'_> {
    type Target = Node;

    fn deref(&self) -> &Node {
        self.node
    }
}

pub struct Children<'a> {
    iter: std::slice::Iter<'a, Arc<Node>>,
    next_start: usize,
}

impl<'a> Iterator for Children<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.iter.next()?;
        let start = self.next_start;
        self.next_start += node.len();
        Some(NodeRef { node, start })
    }
}

pub struct Walk<'a> {
    stack: Vec<NodeRef<'a>>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        let children: Vec<_> = current.children().collect();
        self.stack.extend(children.into_iter().rev());
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::ids::IdGenerator;

    fn text(ids: &IdGenerator, s: &str) -> Arc<Node> {
        Arc::new(Node::leaf(ids.next_id(), NodeKind::Text, s))
    }

    #[test]
    fn container_text_is_concatenation_of_children() {
        let ids = IdGenerator::new();
        let line = Node::container(
            ids.next_id(),
            NodeKind::ContentLine,
            vec![
                text(&ids, "lorem "),
                text(&ids, "ipsum"),
                Arc::new(Node::leaf(ids.next_id(), NodeKind::LineEnd, "\n")),
            ],
        );
        assert_eq!(line.as_text(), "lorem ipsum\n");
        assert_eq!(line.len(), 12);
        assert_eq!(line.text().as_deref(), Some("lorem ipsum"));
    }

    #[test]
    fn child_starts_are_computed_from_previous_siblings() {
        let ids = IdGenerator::new();
        let root = Arc::new(Node::container(
            ids.next_id(),
            NodeKind::ContentLine,
            vec![text(&ids, "ab"), text(&ids, "cde"), text(&ids, "f")],
        ));
        let starts: Vec<_> = NodeRef::new(&root, 10).children().map(|c| c.start()).collect();
        assert_eq!(starts, vec![10, 12, 15]);
    }

    #[test]
    fn lines_split_at_terminators() {
        let ids = IdGenerator::new();
        let node = Node::leaf(ids.next_id(), NodeKind::CodeLine, "a\nbc\n");
        let lines = node.lines(3);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].start, 5);
        assert_eq!(lines[1].length, 3);
        assert_eq!(lines[1].text, "bc\n");
    }

    #[test]
    fn push_and_pop_keep_length_in_sync() {
        let ids = IdGenerator::new();
        let mut node = Node::container(ids.next_id(), NodeKind::Paragraph, vec![]);
        node.push_child(text(&ids, "abc"));
        node.push_child(text(&ids, "de"));
        assert_eq!(node.len(), 5);
        node.pop_child();
        assert_eq!(node.len(), 3);
    }

    #[test]
    fn descendant_at_finds_deepest_node() {
        let ids = IdGenerator::new();
        let inner = Arc::new(Node::container(
            ids.next_id(),
            NodeKind::ContentLine,
            vec![text(&ids, "xy"), text(&ids, "z")],
        ));
        let root = Arc::new(Node::container(
            ids.next_id(),
            NodeKind::Paragraph,
            vec![inner],
        ));
        let found = NodeRef::new(&root, 0).descendant_at(2).unwrap();
        assert_eq!(found.start(), 2);
        assert_eq!(found.as_text(), "z");
        assert!(NodeRef::new(&root, 0).descendant_at(3).is_none());
    }

    #[test]
    fn walk_is_pre_order() {
        let ids = IdGenerator::new();
        let root = Arc::new(Node::container(
            ids.next_id(),
            NodeKind::ContentLine,
            vec![text(&ids, "a"), text(&ids, "b")],
        ));
        let texts: Vec<_> = NodeRef::new(&root, 0).walk().map(|n| n.as_text()).collect();
        assert_eq!(texts, vec!["ab", "a", "b"]);
    }

    #[test]
    fn unescape_resolves_punctuation_only() {
        assert_eq!(unescape(r"\*a\b\\"), r"*a\b\");
    }

    #[test]
    fn code_span_content_strips_padding() {
        assert_eq!(code_span_content("`` a ``"), "a");
        assert_eq!(code_span_content("`  `"), "  ");
        assert_eq!(code_span_content("`x`"), "x");
    }

    #[test]
    fn same_structure_ignores_ids() {
        let ids = IdGenerator::new();
        let a = text(&ids, "same");
        let b = text(&ids, "same");
        assert_ne!(a.id(), b.id());
        assert!(a.same_structure(&b));
    }
}
