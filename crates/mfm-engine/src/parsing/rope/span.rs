/// A byte range `[start, end)` into the document text.
///
/// Nodes never store spans: a span only exists for a node once its start has
/// been computed from its preceding siblings and its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, len: usize) -> Self {
        Self {
            start,
            end: start + len,
        }
    }

    /// Returns the length in bytes. Uses saturating subtraction for safety.
    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Whether `[from, to]` lies inside this span. Both ends are inclusive so
    /// that an insertion at either edge still belongs to the span.
    #[must_use]
    pub fn covers(self, from: usize, to: usize) -> bool {
        from >= self.start && to <= self.end && from <= to
    }
}
