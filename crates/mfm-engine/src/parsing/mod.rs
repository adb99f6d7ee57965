//! # Parsing
//!
//! The MfM grammar as a set of element parsers over an immutable node tree.
//!
//! ## Modules
//!
//! - **`node`**: `Node`, `NodeKind`, and `NodeRef` for computed positions
//! - **`ids`**: per-document node id generator
//! - **`element`**: the `ElementParser` contract and parser lookup
//! - **`driver`**: line-by-line parsing of a whole text
//! - **`update`**: applying a `TextChange` to the smallest node that can take it
//! - **`blocks`** / **`inline`**: the grammar elements
//! - **`options`**: `{key=value}` blocks shared by several elements
//! - **`syntax`**: delimiters, line ends and headers
//! - **`change`**: edit descriptions as editors send them
//! - **`rope`**: line splitting and span helpers
//! - **`snapshot`**: outlines and invariant checks for tests

pub mod blocks;
pub mod change;
pub mod driver;
pub mod element;
pub mod ids;
pub mod inline;
pub mod node;
pub mod options;
pub mod rope;
pub mod snapshot;
pub mod syntax;
pub mod update;

#[cfg(test)]
mod tests;

pub use blocks::kinds::Alignment;
pub use change::{ContentChange, ContentRange, TextChange};
pub use element::{ElementParser, LineOutcome, LinePrefix, ParseContext, parser_for};
pub use ids::{IdGenerator, NodeId};
pub use node::{
    ArrowDirection, BlockStyle, DEFAULT_OPTION, ElementType, EmphasisStyle, Fence, ListMarker, Node,
    NodeKind, NodeRef, OptionMap, ParsedContentSpan, Walk,
};
