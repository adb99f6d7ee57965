/// A cursor over one inline slice.
///
/// Positions are byte offsets into `s` and always sit on a char boundary.
#[derive(Clone)]
pub struct Cursor<'a> {
    /// The string being parsed.
    pub s: &'a str,
    /// Current byte index into `s`.
    pub i: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    /// Cursor positioned at byte offset `i`.
    pub fn at(s: &'a str, i: usize) -> Self {
        Self { s, i }
    }

    pub fn pos(&self) -> usize {
        self.i
    }

    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    /// The unconsumed rest of the input.
    pub fn rest(&self) -> &'a str {
        &self.s[self.i..]
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// The character after the current one.
    pub fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    pub fn starts_with(&self, pat: &str) -> bool {
        self.rest().starts_with(pat)
    }

    /// Advances by one character, returning it.
    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.i += c.len_utf8();
        Some(c)
    }

    /// Advances by `n` bytes.
    pub fn bump_n(&mut self, n: usize) {
        self.i = (self.i + n).min(self.s.len());
    }

    /// Number of consecutive `c` characters at the cursor.
    pub fn run_of(&self, c: char) -> usize {
        self.rest().chars().take_while(|&x| x == c).count()
    }

    /// Steps over a backslash escape of ASCII punctuation. Returns whether
    /// one was consumed.
    pub fn skip_escape(&mut self) -> bool {
        if self.peek() == Some('\\') && self.peek_second().is_some_and(|c| c.is_ascii_punctuation())
        {
            self.bump_n(2);
            return true;
        }
        false
    }
}
