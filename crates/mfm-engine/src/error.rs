use crate::parsing::ids::NodeId;

/// Contract violations detected while driving parsers line by line, and
/// changes that cannot be applied to a document at all.
///
/// A line a grammar does not recognise is not an error: it ends up as
/// paragraph text. These variants indicate a bug in a grammar element or a
/// caller passing a change for a different document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("line {line} (offset {offset}) was rejected by the open container")]
    Desync { line: usize, offset: usize },

    #[error("line {line} replaced container {expected} with {found}")]
    ContainerReplaced {
        line: usize,
        expected: NodeId,
        found: NodeId,
    },

    #[error("first line {line} (offset {offset}) was not recognised")]
    Unrecognized { line: usize, offset: usize },

    #[error("no lines to parse")]
    Empty,

    #[error("change at {offset} removing {length} bytes is outside the document ({len} bytes)")]
    InvalidChange {
        offset: usize,
        length: usize,
        len: usize,
    },
}
