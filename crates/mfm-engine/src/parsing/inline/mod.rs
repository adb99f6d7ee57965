//! # Inline parsing
//!
//! Cursor-based parsing of the content of a single line: paragraph lines,
//! heading text, list item text and table cells.
//!
//! ## Modules
//!
//! - **`cursor`**: `Cursor` for character-by-character scanning
//! - **`delimiter`**: emphasis delimiter runs and their flanking rules
//! - **`kinds`**: one parser per inline element, owning its delimiters
//! - **`parser`**: `parse_inlines()` entry point with `try_parse_*` helpers
//!
//! ## Precedence
//!
//! Constructs are recognised left to right. Code spans are raw zones: a
//! `` `[a](b)` `` is one code span, and emphasis and link scanning jump over
//! code spans when looking for their closing delimiter. Link text may
//! contain emphasis, but links never nest.

pub mod cursor;
pub mod delimiter;
pub mod kinds;
pub mod parser;

pub use parser::parse_inlines;
