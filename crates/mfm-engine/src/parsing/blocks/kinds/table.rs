//! Pipe tables.
//!
//! Every consecutive line starting with `|` is a row. Cells are split on
//! unescaped pipes. The row whose cells all look like `:--`, `--:`, `:-:` or
//! `---` is the separator: rows above it are header rows and it decides the
//! column alignment.

use std::sync::{Arc, OnceLock};

use regex::Regex;

use crate::parsing::blocks::classify::{LineClass, classify};
use crate::parsing::element::{ElementParser, LineOutcome, ParseContext};
use crate::parsing::inline::parse_inlines;
use crate::parsing::node::{ElementType, Node, NodeKind};
use crate::parsing::rope::Line;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    None,
    Left,
    Center,
    Right,
}

fn separator_regex() -> &'static Regex {
    static SEPARATOR_REGEX: OnceLock<Regex> = OnceLock::new();
    SEPARATOR_REGEX
        .get_or_init(|| Regex::new(r"^\s*:?-+:?\s*$").expect("Invalid table separator regex"))
}

impl Node {
    /// Cells of a table row.
    pub fn cells(&self) -> impl Iterator<Item = &Arc<Node>> {
        self.children()
            .iter()
            .filter(|c| c.element_type() == ElementType::TableCell)
    }

    /// Rows of a table above its separator row. Zero when there is none.
    pub fn header_rows(&self) -> usize {
        self.children()
            .iter()
            .position(|row| matches!(row.kind(), NodeKind::TableRow { separator: true }))
            .unwrap_or(0)
    }

    /// Column alignment of a table, read from its separator row.
    pub fn alignments(&self) -> Vec<Alignment> {
        let Some(separator) = self
            .children()
            .iter()
            .find(|row| matches!(row.kind(), NodeKind::TableRow { separator: true }))
        else {
            return Vec::new();
        };
        separator
            .cells()
            .map(|cell| {
                let text = cell.as_text();
                let text = text.trim();
                match (text.starts_with(':'), text.ends_with(':')) {
                    (true, true) => Alignment::Center,
                    (true, false) => Alignment::Left,
                    (false, true) => Alignment::Right,
                    (false, false) => Alignment::None,
                }
            })
            .collect()
    }
}

/// Byte offsets of the unescaped `|` characters in `text`.
fn pipes(text: &str) -> Vec<usize> {
    let mut out = Vec::new();
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '|' => out.push(i),
            _ => {}
        }
    }
    out
}

fn is_separator(cells: &[Arc<Node>]) -> bool {
    let mut cells = cells
        .iter()
        .filter(|c| c.element_type() == ElementType::TableCell)
        .peekable();
    cells.peek().is_some() && cells.all(|c| separator_regex().is_match(&c.as_text()))
}

pub struct TableParser;

impl ElementParser for TableParser {
    fn element_type(&self) -> ElementType {
        ElementType::Table
    }

    fn parse_line(
        &self,
        cx: ParseContext<'_>,
        previous: Option<Node>,
        line: &Line<'_>,
    ) -> LineOutcome {
        if classify(cx, line).class != LineClass::TableRow {
            return LineOutcome::Rejected(previous);
        }
        let row = Arc::new(TableRowParser::build(cx, line));
        match previous {
            Some(mut table) => {
                table.push_child(row);
                LineOutcome::Accepted(table)
            }
            None => LineOutcome::Accepted(cx.container(NodeKind::Table, vec![row])),
        }
    }
}

pub struct TableRowParser;

impl TableRowParser {
    fn build(cx: ParseContext<'_>, line: &Line<'_>) -> Node {
        let body = line.body();
        let pipes = pipes(body);
        let mut children = Vec::new();
        // The first pipe always exists for a row: classification checked it.
        let mut cell_start = match pipes.first() {
            Some(&first) => {
                children.push(cx.delimiter(&body[..=first]));
                first + 1
            }
            None => 0,
        };
        for &pipe in pipes.iter().skip(1) {
            let raw = &body[cell_start..pipe];
            children.push(Arc::new(TableCellParser::build(cx, raw)));
            let is_last = pipe + 1 == body.trim_end().len();
            let end = if is_last { body.len() } else { pipe + 1 };
            children.push(cx.delimiter(&body[pipe..end]));
            cell_start = end;
        }
        if cell_start < body.len() {
            children.push(Arc::new(TableCellParser::build(cx, &body[cell_start..])));
        }
        children.extend(cx.line_end(line.terminator()));

        let separator = is_separator(&children);
        cx.container(NodeKind::TableRow { separator }, children)
    }
}

impl ElementParser for TableRowParser {
    fn element_type(&self) -> ElementType {
        ElementType::TableRow
    }

    fn parse_line(
        &self,
        cx: ParseContext<'_>,
        previous: Option<Node>,
        line: &Line<'_>,
    ) -> LineOutcome {
        if previous.is_some() || classify(cx, line).class != LineClass::TableRow {
            return LineOutcome::Rejected(previous);
        }
        LineOutcome::Accepted(Self::build(cx, line))
    }

    fn rebuild(
        &self,
        _cx: ParseContext<'_>,
        existing: &Node,
        children: Vec<Arc<Node>>,
    ) -> Option<Node> {
        let separator = is_separator(&children);
        Some(Node::container(
            existing.id(),
            NodeKind::TableRow { separator },
            children,
        ))
    }
}

pub struct TableCellParser;

impl TableCellParser {
    fn build(cx: ParseContext<'_>, raw: &str) -> Node {
        cx.container(NodeKind::TableCell, parse_inlines(cx, raw))
    }
}

impl ElementParser for TableCellParser {
    fn element_type(&self) -> ElementType {
        ElementType::TableCell
    }

    /// A cell may not gain a pipe, nor end in a backslash that would escape
    /// the pipe after it.
    fn parse_fragment(&self, cx: ParseContext<'_>, text: &str) -> Option<Node> {
        if text.contains(['|', '\n', '\r']) || text.ends_with('\\') {
            return None;
        }
        Some(Self::build(cx, text))
    }
}
