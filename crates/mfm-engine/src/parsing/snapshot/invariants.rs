use std::collections::HashSet;
use std::sync::Arc;

use crate::parsing::node::{ElementType, Node, NodeRef};

/// Asserts the structural guarantees of a parse tree for `source`:
/// the root's text is the source, containers are exactly their children,
/// ids are unique, and no two text nodes are siblings in a row.
pub fn check(root: &Arc<Node>, source: &str) {
    assert_eq!(
        root.as_text(),
        source,
        "tree text does not reproduce the source"
    );

    let mut seen = HashSet::new();
    for node in NodeRef::new(root, 0).walk() {
        assert!(
            node.end() <= source.len(),
            "{} span {}..{} out of bounds (source len: {})",
            node.type_name(),
            node.start(),
            node.end(),
            source.len()
        );
        assert!(
            seen.insert(node.id()),
            "duplicate id {} on {}",
            node.id(),
            node.type_name()
        );
        if node.is_leaf() {
            continue;
        }
        let sum: usize = node.children().map(|c| c.len()).sum();
        assert_eq!(
            sum,
            node.len(),
            "{} at {} is not the sum of its children",
            node.type_name(),
            node.start()
        );
        let adjacent_text = node
            .node()
            .children()
            .windows(2)
            .any(|w| w.iter().all(|c| c.element_type() == ElementType::Text));
        assert!(
            !adjacent_text,
            "{} at {} has adjacent text nodes",
            node.type_name(),
            node.start()
        );
    }
}
