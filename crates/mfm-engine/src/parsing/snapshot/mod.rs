//! # Snapshot testing support
//!
//! - **`normalize`**: id-free views of a tree, as an indented text outline
//!   for `insta` snapshots and as a serializable `Snap`
//! - **`invariants`**: runtime checks for parser correctness (lossless text,
//!   children adding up to their parent, unique ids, merged text runs)

pub mod invariants;
pub mod normalize;

pub use invariants::check as invariants;
pub use normalize::{Snap, normalize, outline};
