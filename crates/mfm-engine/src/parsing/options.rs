//! # Options blocks
//!
//! `{ default; key=value; other = value two }` attaches metadata to headings,
//! blocks, code fences, links and images.
//!
//! - Entries are separated by `;`. The first entry may be a bare value, which
//!   is stored under the `default` key; any later bare entry fails the block.
//! - Keys are `[A-Za-z0-9_.-]+`. Values may be empty and are trimmed.
//! - An empty entry or an empty block fails.
//!
//! Each entry is one node holding its raw text, surrounding whitespace
//! included. Editing inside that whitespace changes the node's length but
//! not its value.

use std::sync::{Arc, OnceLock};

use regex::Regex;

use super::change::TextChange;
use super::element::{ElementParser, ParseContext};
use super::node::{ElementType, Node, NodeKind, OptionMap};
use super::update;

const OPEN: char = '{';
const CLOSE: char = '}';
const SEPARATOR: char = ';';

/// Characters an entry edit may never add or remove.
const RESERVED: [char; 5] = [OPEN, CLOSE, SEPARATOR, '\n', '\r'];

fn key_regex() -> &'static Regex {
    static KEY_REGEX: OnceLock<Regex> = OnceLock::new();
    KEY_REGEX.get_or_init(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("Invalid option key regex"))
}

/// Length of the `{...}` block at the start of `text`, if one is there.
pub fn scan_options(text: &str) -> Option<usize> {
    let rest = text.strip_prefix(OPEN)?;
    let close = rest.find([CLOSE, OPEN, '\n', '\r'])?;
    rest[close..].starts_with(CLOSE).then_some(close + 2)
}

/// Finds an options block that ends `content` (only whitespace may follow
/// it) and returns where it starts together with the parsed node.
pub fn split_trailing_options(cx: ParseContext<'_>, content: &str) -> Option<(usize, Node)> {
    if !cx.config().options || !content.trim_end().ends_with(CLOSE) {
        return None;
    }
    let at = content.rfind(OPEN)?;
    let options = parse_options(cx, &content[at..])?;
    Some((at, options))
}

/// Parses `text` as one options block. Whitespace after the closing brace
/// is allowed and belongs to the closing delimiter.
pub fn parse_options(cx: ParseContext<'_>, text: &str) -> Option<Node> {
    let block_len = scan_options(text)?;
    let trailing = &text[block_len..];
    if !trailing.chars().all(|c| c == ' ' || c == '\t') {
        return None;
    }
    let inner = &text[1..block_len - 1];
    if inner.trim().is_empty() {
        return None;
    }

    let mut children = vec![cx.delimiter(&text[..1])];
    for (index, raw) in inner.split(SEPARATOR).enumerate() {
        if index > 0 {
            children.push(cx.delimiter(";"));
        }
        children.push(Arc::new(parse_entry(cx, index, raw)?));
    }
    children.push(cx.delimiter(&text[block_len - 1..]));

    Some(cx.container(NodeKind::Options, children))
}

/// Parses the raw text of the `index`th entry.
pub fn parse_entry(cx: ParseContext<'_>, index: usize, raw: &str) -> Option<Node> {
    if raw.contains(RESERVED) {
        return None;
    }
    let (key, value) = match raw.split_once('=') {
        Some((key, value)) => {
            let key = key.trim();
            if !key_regex().is_match(key) {
                return None;
            }
            (Some(key.to_string()), value.trim())
        }
        None if index == 0 => (None, raw.trim()),
        None => return None,
    };
    if key.is_none() && value.is_empty() {
        return None;
    }
    Some(Node::leaf(
        cx.ids.next_id(),
        NodeKind::OptionEntry {
            index,
            key,
            value: value.to_string(),
        },
        raw,
    ))
}

/// Resolved options of an element: the entries of its `Options` child, if any.
pub fn collect(children: &[Arc<Node>]) -> OptionMap {
    children
        .iter()
        .find_map(|c| c.parsed_options())
        .unwrap_or_default()
}

pub struct OptionsParser;

impl ElementParser for OptionsParser {
    fn element_type(&self) -> ElementType {
        ElementType::Options
    }

    fn parse_fragment(&self, cx: ParseContext<'_>, text: &str) -> Option<Node> {
        if !cx.config().options {
            return None;
        }
        parse_options(cx, text)
    }
}

pub struct OptionEntryParser;

impl ElementParser for OptionEntryParser {
    fn element_type(&self) -> ElementType {
        ElementType::OptionEntry
    }

    fn parse_fragment(&self, cx: ParseContext<'_>, text: &str) -> Option<Node> {
        parse_entry(cx, 0, text)
    }

    /// An entry re-parses at its own position, so a bare value stays legal
    /// only in first place.
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
        let NodeKind::OptionEntry { index, .. } = existing.kind() else {
            return None;
        };
        let old = existing.as_text();
        if change.text.contains(RESERVED) || change.removed(&old, start)?.contains(RESERVED) {
            return None;
        }
        let spliced = change.splice(&old, start)?;
        parse_entry(cx, *index, &spliced).map(Arc::new)
    }
}
