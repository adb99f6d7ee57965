use xi_rope::Rope;

use super::span::Span;

/// Extracts the text for a span from the rope as an owned String.
pub fn slice_to_string(rope: &Rope, sp: Span) -> String {
    rope.slice_to_cow(sp.start..sp.end).into_owned()
}

/// Shortens `text` to at most `max` bytes (on a char boundary), escaping
/// control characters so a line terminator stays visible in outlines.
pub fn preview(text: &str, max: usize) -> String {
    let mut cut = text.len().min(max);
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    let mut s: String = text[..cut].escape_debug().collect();
    if cut < text.len() {
        s.push_str("...");
    }
    s
}
