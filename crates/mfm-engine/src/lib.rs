//! Incremental parser for MfM, a line-oriented Markdown dialect.
//!
//! A [`Dialect`] parses text into an [`MfmDocument`]: an immutable tree of
//! [`Node`]s whose concatenated leaves reproduce the source byte for byte.
//! [`Dialect::parse_update`] applies a single-line [`TextChange`] to an
//! existing document, rebuilding only the smallest subtree the change
//! touches and sharing the rest with the previous snapshot.

pub mod dialect;
pub mod document;
pub mod error;
pub mod hooks;
pub mod parsing;

pub use dialect::Dialect;
pub use document::MfmDocument;
pub use error::ParseError;
pub use hooks::{OptionHooks, OptionSetter};
pub use mfm_config::DialectConfig;
pub use parsing::{
    ContentChange, ContentRange, ElementType, Node, NodeId, NodeKind, NodeRef, TextChange,
};
