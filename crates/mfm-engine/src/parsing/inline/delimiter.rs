//! Delimiter runs and flanking.
//!
//! A delimiter run is a maximal sequence of one emphasis character (`*`, `_`
//! or `~`). Whether it can open or close emphasis depends only on the
//! characters immediately before and after it:
//!
//! - left-flanking (may open): not followed by whitespace, and either not
//!   followed by punctuation or preceded by whitespace or punctuation;
//! - right-flanking (may close): not preceded by whitespace, and either not
//!   preceded by punctuation or followed by whitespace or punctuation.
//!
//! The start and end of the text count as whitespace.

/// Characters that can form a delimiter run.
pub const EMPHASIS_CHARS: [char; 3] = ['*', '_', '~'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimiterRun {
    /// Byte offset of the first delimiter character.
    pub start: usize,
    /// Number of delimiter characters.
    pub length: usize,
    pub character: char,
}

impl DelimiterRun {
    pub fn end(&self) -> usize {
        self.start + self.length * self.character.len_utf8()
    }

    fn before(&self, text: &str) -> CharClass {
        char_class(text[..self.start].chars().next_back())
    }

    fn after(&self, text: &str) -> CharClass {
        char_class(text[self.end()..].chars().next())
    }

    pub fn is_left_flanking(&self, text: &str) -> bool {
        let (before, after) = (self.before(text), self.after(text));
        after != CharClass::Whitespace
            && (after != CharClass::Punctuation || before != CharClass::Other)
    }

    pub fn is_right_flanking(&self, text: &str) -> bool {
        let (before, after) = (self.before(text), self.after(text));
        before != CharClass::Whitespace
            && (before != CharClass::Punctuation || after != CharClass::Other)
    }

    /// Whether the run may open emphasis. `_` inside a word never does.
    pub fn can_open(&self, text: &str) -> bool {
        self.is_left_flanking(text)
            && (self.character != '_'
                || !self.is_right_flanking(text)
                || self.before(text) == CharClass::Punctuation)
    }

    /// Whether the run may close emphasis. `_` inside a word never does.
    pub fn can_close(&self, text: &str) -> bool {
        self.is_right_flanking(text)
            && (self.character != '_'
                || !self.is_left_flanking(text)
                || self.after(text) == CharClass::Punctuation)
    }
}

/// Scans the delimiter run at byte offset `pos`.
///
/// An escaped delimiter character at `pos` (`\*`) is skipped and the run, if
/// any, starts after it. The run ends at the first different character, so an
/// escape inside a run shortens it instead of failing.
pub fn scan_delimiter_run(text: &str, pos: usize) -> Option<DelimiterRun> {
    let mut start = pos;
    let mut chars = text.get(pos..)?.chars();
    if chars.next()? == '\\' {
        let escaped = chars.next().filter(|c| EMPHASIS_CHARS.contains(c))?;
        start += 1 + escaped.len_utf8();
    }
    let character = text[start..]
        .chars()
        .next()
        .filter(|c| EMPHASIS_CHARS.contains(c))?;
    let length = text[start..]
        .chars()
        .take_while(|c| *c == character)
        .count();
    Some(DelimiterRun {
        start,
        length,
        character,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Whitespace,
    Punctuation,
    Other,
}

/// Class of a character for flanking purposes; `None` (start or end of the
/// text) is whitespace.
pub fn char_class(c: Option<char>) -> CharClass {
    match c {
        None => CharClass::Whitespace,
        Some(c) if c.is_whitespace() => CharClass::Whitespace,
        Some(c) if c.is_ascii_punctuation() => CharClass::Punctuation,
        Some(c) if !c.is_ascii() && !c.is_alphanumeric() => CharClass::Punctuation,
        Some(_) => CharClass::Other,
    }
}
