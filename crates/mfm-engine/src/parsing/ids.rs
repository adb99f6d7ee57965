use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifier of a parsed node, unique within one document and all of the
/// snapshots derived from it by incremental updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u64);

impl NodeId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Issues node identifiers in increasing order.
///
/// A document owns one generator and hands it to every successor snapshot, so
/// a node created by an update always has a larger id than any node that
/// existed before the update.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> NodeId {
        NodeId(self.last.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// Number of identifiers handed out so far.
    pub fn issued(&self) -> u64 {
        self.last.load(Ordering::Relaxed)
    }
}
