use std::sync::OnceLock;

use mfm_config::DialectConfig;
use regex::Regex;

use crate::parsing::element::{LinePrefix, ParseContext};
use crate::parsing::node::{Fence, ListMarker};
use crate::parsing::rope::Line;

/// What a single line looks like on its own, without looking at its
/// neighbours. Block parsers decide from this whether to start, continue or
/// reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    Blank,
    Fence(Fence),
    Heading { level: u8 },
    ThematicBreak,
    ListItem(ItemMarker),
    TableRow,
    Quote,
    Text,
    /// Inside a block: a line without the `>` prefix.
    Foreign,
}

/// The marker at the start of a list item line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemMarker {
    /// Spaces before the marker.
    pub indent: usize,
    pub marker: ListMarker,
    /// Bytes from the start of the content to the item text, spaces included.
    pub len: usize,
}

/// A classified line cut into prefix, content and terminator.
#[derive(Debug, Clone, Copy)]
pub struct Classified<'a> {
    pub class: LineClass,
    /// The container prefix (`> `), empty outside blocks.
    pub prefix: &'a str,
    pub content: &'a str,
    pub terminator: &'a str,
}

pub fn classify<'a>(cx: ParseContext<'_>, line: &Line<'a>) -> Classified<'a> {
    let body = line.body();
    let terminator = line.terminator();
    let Some(prefix_len) = prefix_len(cx.prefix, body) else {
        return Classified {
            class: LineClass::Foreign,
            prefix: "",
            content: body,
            terminator,
        };
    };
    let content = &body[prefix_len..];
    Classified {
        class: classify_content(cx.config(), cx.prefix, content),
        prefix: &body[..prefix_len],
        content,
        terminator,
    }
}

/// Classifies line content (prefix and terminator already removed).
pub fn classify_content(config: &DialectConfig, prefix: LinePrefix, content: &str) -> LineClass {
    if content.trim().is_empty() {
        return LineClass::Blank;
    }
    let quoted = prefix == LinePrefix::Quote;
    if !quoted && config.code_fences
        && let Some(fence) = fence_open(content)
    {
        return LineClass::Fence(fence);
    }
    if !quoted && let Some(level) = heading_level(content, config.heading_limit()) {
        return LineClass::Heading { level };
    }
    if !quoted && is_thematic_break(content) {
        return LineClass::ThematicBreak;
    }
    if config.lists
        && let Some(marker) = item_marker(content)
    {
        return LineClass::ListItem(marker);
    }
    if !quoted && config.tables && content.trim_start().starts_with('|') {
        return LineClass::TableRow;
    }
    if !quoted && config.blocks && quote_prefix_len(content).is_some() {
        return LineClass::Quote;
    }
    LineClass::Text
}

/// Length of the container prefix at the start of `body`, or `None` when the
/// line does not carry it.
pub fn prefix_len(prefix: LinePrefix, body: &str) -> Option<usize> {
    match prefix {
        LinePrefix::None => Some(0),
        LinePrefix::Quote => quote_prefix_len(body),
    }
}

/// `>` after at most three spaces, plus one optional following space.
pub fn quote_prefix_len(body: &str) -> Option<usize> {
    let bytes = body.as_bytes();
    let indent = leading_spaces(body);
    if indent > 3 || bytes.get(indent) != Some(&b'>') {
        return None;
    }
    let mut len = indent + 1;
    if bytes.get(len) == Some(&b' ') {
        len += 1;
    }
    Some(len)
}

/// An opening code fence: at most three spaces, then three or more backticks
/// or tildes. A backtick fence's info string may not contain backticks.
pub fn fence_open(content: &str) -> Option<Fence> {
    let indent = leading_spaces(content);
    if indent > 3 {
        return None;
    }
    let rest = &content[indent..];
    let character = rest.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let length = rest.chars().take_while(|c| *c == character).count();
    if length < 3 {
        return None;
    }
    if character == '`' && rest[length..].contains('`') {
        return None;
    }
    Some(Fence { character, length })
}

/// Whether `content` is a closing fence for `fence`: same character, at
/// least as long, nothing but whitespace after it.
pub fn closes_fence(fence: Fence, content: &str) -> bool {
    let indent = leading_spaces(content);
    if indent > 3 {
        return false;
    }
    let rest = &content[indent..];
    let length = rest.chars().take_while(|c| *c == fence.character).count();
    length >= fence.length && rest[length..].trim().is_empty()
}

/// Level of an ATX heading line: `#` repeated up to `limit` times, then a
/// space or the end of the line.
pub fn heading_level(content: &str, limit: u8) -> Option<u8> {
    let hashes = content.bytes().take_while(|&b| b == b'#').count();
    if hashes == 0 || hashes > usize::from(limit) {
        return None;
    }
    match content.as_bytes().get(hashes) {
        None | Some(b' ') | Some(b'\t') => u8::try_from(hashes).ok(),
        Some(_) => None,
    }
}

/// Three or more of the same `-`, `*` or `_`, optionally separated by spaces.
pub fn is_thematic_break(content: &str) -> bool {
    if leading_spaces(content) > 3 {
        return false;
    }
    let mut marks = content.chars().filter(|c| !matches!(c, ' ' | '\t'));
    let Some(first) = marks.next() else {
        return false;
    };
    if !matches!(first, '-' | '*' | '_') {
        return false;
    }
    let mut count = 1;
    for c in marks {
        if c != first {
            return false;
        }
        count += 1;
    }
    count >= 3
}

fn item_regex() -> &'static Regex {
    static ITEM_REGEX: OnceLock<Regex> = OnceLock::new();
    ITEM_REGEX.get_or_init(|| {
        Regex::new(r"^( *)([-*+]|[0-9]{1,9}[.)])(?: +|$)").expect("Invalid list item regex")
    })
}

pub fn item_marker(content: &str) -> Option<ItemMarker> {
    let caps = item_regex().captures(content)?;
    let indent = caps.get(1)?.as_str().len();
    let raw = caps.get(2)?.as_str();
    let marker = match raw.parse::<char>() {
        Ok(bullet) if matches!(bullet, '-' | '*' | '+') => ListMarker::Bullet(bullet),
        _ => {
            let delimiter = raw.chars().last()?;
            let number = raw[..raw.len() - 1].parse().ok()?;
            ListMarker::Ordered { number, delimiter }
        }
    };
    Some(ItemMarker {
        indent,
        marker,
        len: caps.get(0)?.as_str().len(),
    })
}

fn leading_spaces(text: &str) -> usize {
    text.bytes().take_while(|&b| b == b' ').count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn class(content: &str) -> LineClass {
        classify_content(&DialectConfig::default(), LinePrefix::None, content)
    }

    #[rstest]
    #[case("", LineClass::Blank)]
    #[case("   ", LineClass::Blank)]
    #[case("# Title", LineClass::Heading { level: 1 })]
    #[case("###", LineClass::Heading { level: 3 })]
    #[case("#hashtag", LineClass::Text)]
    #[case("##### too deep", LineClass::Text)]
    #[case("---", LineClass::ThematicBreak)]
    #[case(" * * *", LineClass::ThematicBreak)]
    #[case("- - x", LineClass::ListItem(ItemMarker { indent: 0, marker: ListMarker::Bullet('-'), len: 2 }))]
    #[case("| a | b |", LineClass::TableRow)]
    #[case("> quoted", LineClass::Quote)]
    #[case("    > not a quote", LineClass::Text)]
    #[case("plain", LineClass::Text)]
    #[case("1.5 is a number", LineClass::Text)]
    fn classifies_lines(#[case] content: &str, #[case] expected: LineClass) {
        assert_eq!(class(content), expected);
    }

    #[test]
    fn fences() {
        assert_eq!(
            class("```rust"),
            LineClass::Fence(Fence { character: '`', length: 3 })
        );
        assert_eq!(
            class("~~~~"),
            LineClass::Fence(Fence { character: '~', length: 4 })
        );
        assert_eq!(class("``` a`b"), LineClass::Text);
        assert_eq!(class("``"), LineClass::Text);
    }

    #[test]
    fn closing_fence_must_be_at_least_as_long() {
        let fence = Fence { character: '`', length: 4 };
        assert!(closes_fence(fence, "````"));
        assert!(closes_fence(fence, "  `````  "));
        assert!(!closes_fence(fence, "```"));
        assert!(!closes_fence(fence, "```` x"));
        assert!(!closes_fence(fence, "~~~~"));
    }

    #[test]
    fn ordered_markers() {
        let marker = item_marker("  12) item").unwrap();
        assert_eq!(marker.indent, 2);
        assert_eq!(
            marker.marker,
            ListMarker::Ordered {
                number: 12,
                delimiter: ')'
            }
        );
        assert_eq!(marker.len, 6);
        assert!(item_marker("-item").is_none());
        assert!(item_marker("-").is_some());
    }

    #[test]
    fn disabled_elements_are_text() {
        let config = DialectConfig {
            lists: false,
            tables: false,
            max_heading_level: 1,
            ..DialectConfig::default()
        };
        let class = |c| classify_content(&config, LinePrefix::None, c);
        assert_eq!(class("- item"), LineClass::Text);
        assert_eq!(class("| cell |"), LineClass::Text);
        assert_eq!(class("## two"), LineClass::Text);
    }

    #[test]
    fn quoted_content_allows_only_paragraphs_and_lists() {
        let config = DialectConfig::default();
        let class = |c| classify_content(&config, LinePrefix::Quote, c);
        assert_eq!(class("# not a heading"), LineClass::Text);
        assert!(matches!(class("- item"), LineClass::ListItem(_)));
        assert_eq!(class(""), LineClass::Blank);
    }

    #[test]
    fn quote_prefix() {
        assert_eq!(quote_prefix_len("> a"), Some(2));
        assert_eq!(quote_prefix_len(">a"), Some(1));
        assert_eq!(quote_prefix_len("   >  a"), Some(5));
        assert_eq!(quote_prefix_len("a > b"), None);
    }
}
