use std::sync::Arc;

use super::cursor::Cursor;
use super::delimiter::{DelimiterRun, EMPHASIS_CHARS, scan_delimiter_run};
use super::kinds::arrow::scan_arrow;
use super::kinds::code_span::{TICK, scan_code_span};
use super::kinds::emphasis::style_of;
use super::kinds::link::{IMAGE_OPEN, LINK_OPEN, TARGET_CLOSE, TARGET_OPEN, TEXT_CLOSE};
use super::kinds::{ImageParser, LinkParser, TargetParser};
use crate::parsing::element::ParseContext;
use crate::parsing::node::{Node, NodeKind};
use crate::parsing::options::{parse_options, scan_options};

/// Parses one line's worth of inline content into nodes whose texts
/// concatenate back to `s`.
///
/// Constructs are tried at every position in source order. Backslash
/// escapes, unmatched delimiter runs and anything else that does not start a
/// construct stay in the surrounding text node, so two text nodes are never
/// adjacent.
pub fn parse_inlines(cx: ParseContext<'_>, s: &str) -> Vec<Arc<Node>> {
    let mut cur = Cursor::new(s);
    let mut out = vec![];
    let mut text_start = 0;

    fn flush_text(cx: ParseContext<'_>, out: &mut Vec<Arc<Node>>, text: &str) {
        if !text.is_empty() {
            out.push(cx.leaf(NodeKind::Text, text));
        }
    }

    while !cur.eof() {
        if cur.skip_escape() {
            continue;
        }
        let start = cur.pos();
        if let Some(node) = try_parse_construct(cx, &mut cur) {
            flush_text(cx, &mut out, &s[text_start..start]);
            out.push(node);
            text_start = cur.pos();
            continue;
        }
        skip_literal(&mut cur);
    }

    flush_text(cx, &mut out, &s[text_start..]);
    out
}

fn try_parse_construct(cx: ParseContext<'_>, cur: &mut Cursor<'_>) -> Option<Arc<Node>> {
    match cur.peek()? {
        TICK => try_parse_code_span(cx, cur),
        '!' => try_parse_image(cx, cur),
        '[' => try_parse_link(cx, cur),
        '<' | '-' | '=' => try_parse_arrow(cx, cur),
        c if EMPHASIS_CHARS.contains(&c) => try_parse_emphasis(cx, cur),
        _ => None,
    }
}

/// Steps over a character that did not start a construct. Backtick and
/// delimiter runs are skipped whole so no suffix of them is tried again.
fn skip_literal(cur: &mut Cursor<'_>) {
    match cur.peek() {
        Some(c) if c == TICK || EMPHASIS_CHARS.contains(&c) => {
            let run = cur.run_of(c);
            cur.bump_n(run * c.len_utf8());
        }
        _ => {
            cur.bump();
        }
    }
}

/// Steps over a code span, or the backtick run that failed to open one.
fn skip_code(cur: &mut Cursor<'_>) {
    match scan_code_span(cur.s, cur.pos()) {
        Some(end) => cur.i = end,
        None => cur.bump_n(cur.run_of(TICK)),
    }
}

fn try_parse_code_span(cx: ParseContext<'_>, cur: &mut Cursor<'_>) -> Option<Arc<Node>> {
    let start = cur.pos();
    let end = scan_code_span(cur.s, start)?;
    cur.i = end;
    Some(cx.leaf(NodeKind::InlineCode, &cur.s[start..end]))
}

fn try_parse_arrow(cx: ParseContext<'_>, cur: &mut Cursor<'_>) -> Option<Arc<Node>> {
    if !cx.config().arrows {
        return None;
    }
    let (token, direction) = scan_arrow(cur.rest())?;
    cur.bump_n(token.len());
    Some(cx.leaf(NodeKind::Arrow { direction }, token))
}

/// An opening run closes at the next run of the same character and length
/// that can close. Escapes and code spans are skipped on the way.
fn find_closer(s: &str, opener: &DelimiterRun) -> Option<DelimiterRun> {
    let mut cur = Cursor::at(s, opener.end());
    while !cur.eof() {
        if cur.skip_escape() {
            continue;
        }
        match cur.peek() {
            Some(TICK) => skip_code(&mut cur),
            Some(c) if EMPHASIS_CHARS.contains(&c) => {
                let run = scan_delimiter_run(s, cur.pos())?;
                if run.character == opener.character
                    && run.length == opener.length
                    && run.can_close(s)
                {
                    return Some(run);
                }
                cur.i = run.end();
            }
            _ => {
                cur.bump();
            }
        }
    }
    None
}

fn try_parse_emphasis(cx: ParseContext<'_>, cur: &mut Cursor<'_>) -> Option<Arc<Node>> {
    let s = cur.s;
    let opener = scan_delimiter_run(s, cur.pos())?;
    if !opener.can_open(s) {
        return None;
    }
    let closer = find_closer(s, &opener)?;

    let mut children = vec![cx.delimiter(&s[opener.start..opener.end()])];
    children.extend(parse_inlines(cx, &s[opener.end()..closer.start]));
    children.push(cx.delimiter(&s[closer.start..closer.end()]));

    cur.i = closer.end();
    let style = style_of(&opener);
    Some(Arc::new(cx.container(NodeKind::Emphasis { style }, children)))
}

/// Byte offset of the `]` closing bracketed text that starts at `from`.
/// Brackets do not nest.
fn find_text_close(s: &str, from: usize) -> Option<usize> {
    let mut cur = Cursor::at(s, from);
    while !cur.eof() {
        if cur.skip_escape() {
            continue;
        }
        match cur.peek() {
            Some(TICK) => skip_code(&mut cur),
            Some('[') => return None,
            Some(TEXT_CLOSE) => return Some(cur.pos()),
            _ => {
                cur.bump();
            }
        }
    }
    None
}

/// Where the pieces of a link or image lie in the scanned string.
struct LinkParts {
    /// Offset of the `]`.
    text_close: usize,
    /// Offset of the `)`.
    target_close: usize,
    options: Option<Node>,
    end: usize,
}

/// Scans `text](target){options}` starting at `text_start`.
fn scan_link_parts(cx: ParseContext<'_>, s: &str, text_start: usize) -> Option<LinkParts> {
    let text_close = find_text_close(s, text_start)?;
    if !s[text_close..].starts_with(TARGET_OPEN) {
        return None;
    }
    let target_start = text_close + TARGET_OPEN.len();
    let target_close = target_start + TargetParser::scan(&s[target_start..])?;
    let mut end = target_close + TARGET_CLOSE.len_utf8();

    let mut options = None;
    if cx.config().options
        && let Some(len) = scan_options(&s[end..])
        && let Some(node) = parse_options(cx, &s[end..end + len])
    {
        options = Some(node);
        end += len;
    }
    Some(LinkParts {
        text_close,
        target_close,
        options,
        end,
    })
}

/// Children from `](` on: the target, the closing paren and any options.
fn link_tail(cx: ParseContext<'_>, s: &str, parts: LinkParts) -> Vec<Arc<Node>> {
    let target_start = parts.text_close + TARGET_OPEN.len();
    let mut children = vec![
        cx.delimiter(TARGET_OPEN),
        cx.leaf(NodeKind::Target, &s[target_start..parts.target_close]),
        cx.delimiter(&s[parts.target_close..parts.target_close + TARGET_CLOSE.len_utf8()]),
    ];
    children.extend(parts.options.map(Arc::new));
    children
}

fn try_parse_link(cx: ParseContext<'_>, cur: &mut Cursor<'_>) -> Option<Arc<Node>> {
    if !cur.starts_with(LINK_OPEN) {
        return None;
    }
    let s = cur.s;
    let start = cur.pos();
    let text_start = start + LINK_OPEN.len();
    let parts = scan_link_parts(cx, s, text_start)?;
    let end = parts.end;

    let mut children = vec![cx.delimiter(LINK_OPEN)];
    children.extend(parse_inlines(cx, &s[text_start..parts.text_close]));
    children.extend(link_tail(cx, s, parts));

    let link = LinkParser::assemble(cx, children)?;
    cur.i = end;
    Some(Arc::new(link))
}

fn try_parse_image(cx: ParseContext<'_>, cur: &mut Cursor<'_>) -> Option<Arc<Node>> {
    if !cur.starts_with(IMAGE_OPEN) {
        return None;
    }
    let s = cur.s;
    let start = cur.pos();
    let alt_start = start + IMAGE_OPEN.len();
    let parts = scan_link_parts(cx, s, alt_start)?;
    let end = parts.end;

    let mut children = vec![cx.delimiter(IMAGE_OPEN)];
    let alt = &s[alt_start..parts.text_close];
    if !alt.is_empty() {
        children.push(cx.leaf(NodeKind::Text, alt));
    }
    children.extend(link_tail(cx, s, parts));

    let image = ImageParser::assemble(cx, children)?;
    cur.i = end;
    Some(Arc::new(image))
}
