use xi_rope::Rope;

use super::span::Span;

/// One source line handed to an element parser.
///
/// `text` includes the line terminator (`\n` or `\r\n`) when there is one;
/// `start` is the absolute byte offset of the line in the text being parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    pub text: &'a str,
    pub start: usize,
    /// Zero-based line number, used for error reporting only.
    pub number: usize,
}

impl<'a> Line<'a> {
    pub fn new(text: &'a str, start: usize, number: usize) -> Self {
        Self {
            text,
            start,
            number,
        }
    }

    pub fn span(&self) -> Span {
        Span::new(self.start, self.text.len())
    }

    /// The line without its terminator.
    pub fn body(&self) -> &'a str {
        &self.text[..self.text.len() - terminator_len(self.text)]
    }

    /// The terminator (`""`, `"\n"` or `"\r\n"`).
    pub fn terminator(&self) -> &'a str {
        &self.text[self.text.len() - terminator_len(self.text)..]
    }
}

/// Byte length of the line terminator at the end of `text`.
pub fn terminator_len(text: &str) -> usize {
    if text.ends_with("\r\n") {
        2
    } else if text.ends_with('\n') {
        1
    } else {
        0
    }
}

/// Splits `text` into lines, each keeping its terminator.
///
/// Offsets are reported relative to `base`, so fragments cut out of a larger
/// document keep meaningful line starts in logs and errors.
pub fn split_lines(text: &str, base: usize) -> impl Iterator<Item = Line<'_>> + '_ {
    let mut offset = base;
    text.split_inclusive('\n')
        .enumerate()
        .map(move |(number, line)| {
            let start = offset;
            offset += line.len();
            Line::new(line, start, number)
        })
}

/// A line copied out of the rope with its byte span.
#[derive(Debug, Clone)]
pub struct LineRef {
    /// Byte span of this line in the rope (includes newline if present).
    pub span: Span,
    pub text: String,
}

/// Returns an iterator over lines with their byte spans.
///
/// Uses `lines_raw` to preserve newline characters: every byte of the rope
/// must end up in some node.
pub fn lines_with_spans(rope: &Rope) -> impl Iterator<Item = LineRef> + '_ {
    let mut offset = 0usize;
    rope.lines_raw(..).map(move |line| {
        let start = offset;
        let len = line.len();
        offset += len;
        LineRef {
            span: Span { start, end: offset },
            text: line.into_owned(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_and_terminator() {
        let line = Line::new("abc\r\n", 0, 0);
        assert_eq!(line.body(), "abc");
        assert_eq!(line.terminator(), "\r\n");

        let last = Line::new("abc", 7, 2);
        assert_eq!(last.body(), "abc");
        assert_eq!(last.terminator(), "");
        assert_eq!(last.span(), Span { start: 7, end: 10 });
    }

    #[test]
    fn split_lines_keeps_terminators_and_offsets() {
        let lines: Vec<_> = split_lines("a\nbc\n\nd", 10).collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1].text, "bc\n");
        assert_eq!(lines[1].start, 12);
        assert_eq!(lines[2].text, "\n");
        assert_eq!(lines[3].start, 16);
        assert_eq!(lines[3].number, 3);
    }

    #[test]
    fn split_lines_of_empty_text_is_empty() {
        assert_eq!(split_lines("", 0).count(), 0);
    }

    #[test]
    fn rope_lines_match_str_lines() {
        let text = "# a\n\nsome text\r\nlast";
        let rope = Rope::from(text);
        let from_rope: Vec<_> = lines_with_spans(&rope).map(|l| l.text).collect();
        let from_str: Vec<_> = split_lines(text, 0).map(|l| l.text.to_string()).collect();
        assert_eq!(from_rope, from_str);
    }
}
