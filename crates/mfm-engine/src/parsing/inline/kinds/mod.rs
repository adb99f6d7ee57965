//! # Inline kinds
//!
//! Each inline element owns its delimiters and the parser for its nodes. The
//! scanner in [`super::parser`] uses these constants and never hardcodes a
//! `[` or a backtick itself.
//!
//! - **Text**: plain runs, including escapes
//! - **InlineCode**: `` `code` ``, a raw zone
//! - **Emphasis**: `*italic*`, `**bold**`, `~strike~`
//! - **Link**, **Image**, **Target**: `[text](url){opts}`, `![alt](url){opts}`
//! - **Arrow**: `->`, `<-`, `<->`, `=>`, `<=`, `<=>`

pub mod arrow;
pub mod code_span;
pub mod emphasis;
pub mod link;
pub mod text;

pub use arrow::ArrowParser;
pub use code_span::InlineCodeParser;
pub use emphasis::EmphasisParser;
pub use link::{ImageParser, LinkParser, TargetParser};
pub use text::TextParser;
