use serde::{Deserialize, Serialize};

/// A single text edit: replace `range_length` bytes at `range_offset` with `text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextChange {
    pub range_offset: usize,
    pub range_length: usize,
    pub text: String,
}

impl TextChange {
    pub fn new(range_offset: usize, range_length: usize, text: impl Into<String>) -> Self {
        Self {
            range_offset,
            range_length,
            text: text.into(),
        }
    }

    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self::new(offset, 0, text)
    }

    pub fn delete(offset: usize, length: usize) -> Self {
        Self::new(offset, length, "")
    }

    /// End of the replaced range in the old text.
    pub fn end(&self) -> usize {
        self.range_offset + self.range_length
    }

    /// Whether the inserted text would add or split a line.
    pub fn crosses_lines(&self) -> bool {
        self.text.contains(['\n', '\r'])
    }

    /// Net change in length.
    pub fn delta(&self) -> isize {
        self.text.len() as isize - self.range_length as isize
    }

    /// The slice of `text` (which begins at absolute offset `start`) that this
    /// change removes. `None` when the range is not inside `text` or does not
    /// fall on character boundaries.
    pub fn removed<'a>(&self, text: &'a str, start: usize) -> Option<&'a str> {
        let from = self.range_offset.checked_sub(start)?;
        let to = from + self.range_length;
        text.get(from..to)
    }

    /// `text` (beginning at absolute offset `start`) with this change applied.
    pub fn splice(&self, text: &str, start: usize) -> Option<String> {
        let from = self.range_offset.checked_sub(start)?;
        let to = from + self.range_length;
        if to > text.len() || !text.is_char_boundary(from) || !text.is_char_boundary(to) {
            return None;
        }
        let mut out = String::with_capacity(text.len() + self.text.len() - self.range_length);
        out.push_str(&text[..from]);
        out.push_str(&self.text);
        out.push_str(&text[to..]);
        Some(out)
    }
}

/// Line/column range of an editor change. One-based, as editors report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRange {
    pub start_line_number: usize,
    pub start_column: usize,
    pub end_line_number: usize,
    pub end_column: usize,
}

/// Change descriptor in the shape editors emit. Only the offset, length and
/// text are used for parsing; the range is carried for callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentChange {
    pub range: ContentRange,
    pub range_offset: usize,
    pub range_length: usize,
    pub text: String,
}

impl From<ContentChange> for TextChange {
    fn from(change: ContentChange) -> Self {
        TextChange::new(change.range_offset, change.range_length, change.text)
    }
}

impl From<&ContentChange> for TextChange {
    fn from(change: &ContentChange) -> Self {
        TextChange::new(change.range_offset, change.range_length, change.text.clone())
    }
}
