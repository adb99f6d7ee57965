//! # Block elements
//!
//! Block parsing is line-oriented: each line is classified on its own
//! ([`classify`]), then offered to the open block. A block either continues
//! with the line, or rejects it so that its container can start a new block
//! chosen by the line's class ([`parser_for_class`]).
//!
//! ## Modules
//!
//! - **`classify`**: `LineClass` of a single line (blank, fence, heading, ...)
//! - **`kinds`**: one parser per block element, each owning its syntax

pub mod classify;
pub mod kinds;

use classify::LineClass;
use kinds::{
    BlockParser, EmptyParser, FencedCodeParser, ListParser, ParagraphParser, SectionParser,
    TableParser, ThematicBreakParser,
};

use super::element::ElementParser;

/// The parser that starts a new block for a line of the given class.
pub fn parser_for_class(class: LineClass) -> Option<&'static dyn ElementParser> {
    match class {
        LineClass::Blank => Some(&EmptyParser),
        LineClass::Fence(_) => Some(&FencedCodeParser),
        LineClass::Heading { .. } => Some(&SectionParser),
        LineClass::ThematicBreak => Some(&ThematicBreakParser),
        LineClass::ListItem(_) => Some(&ListParser),
        LineClass::TableRow => Some(&TableParser),
        LineClass::Quote => Some(&BlockParser),
        LineClass::Text => Some(&ParagraphParser),
        LineClass::Foreign => None,
    }
}
