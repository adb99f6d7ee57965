use std::fmt;
use std::sync::Arc;

use uuid::Uuid;
use xi_rope::delta::Builder;
use xi_rope::{Delta, Rope, RopeInfo};

use crate::parsing::change::TextChange;
use crate::parsing::ids::IdGenerator;
use crate::parsing::node::{Node, NodeRef, Walk};
use crate::parsing::rope::{LineRef, Span, lines_with_spans, slice_to_string};

/// One snapshot of a parsed document.
///
/// The source text lives in a rope next to the tree. Snapshots produced by
/// incremental updates share the document's uuid and id generator, and every
/// subtree the update did not touch.
#[derive(Clone)]
pub struct MfmDocument {
    uuid: Uuid,
    root: Arc<Node>,
    buffer: Rope,
    ids: Arc<IdGenerator>,
}

impl fmt::Debug for MfmDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MfmDocument")
            .field("uuid", &self.uuid)
            .field("len", &self.buffer.len())
            .field("root", &self.root.id())
            .finish()
    }
}

impl MfmDocument {
    pub(crate) fn new(root: Arc<Node>, buffer: Rope, ids: Arc<IdGenerator>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            root,
            buffer,
            ids,
        }
    }

    /// The next snapshot after `change` produced `root`.
    pub(crate) fn successor(&self, root: Arc<Node>, change: &TextChange) -> Self {
        let mut builder = Builder::new(self.buffer.len());
        builder.replace(change.range_offset..change.end(), Rope::from(&change.text));
        let delta: Delta<RopeInfo> = builder.build();
        Self {
            uuid: self.uuid,
            root,
            buffer: delta.apply(&self.buffer),
            ids: Arc::clone(&self.ids),
        }
    }

    pub fn root(&self) -> &Arc<Node> {
        &self.root
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub(crate) fn ids(&self) -> &IdGenerator {
        &self.ids
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Source text of `span`.
    pub fn slice(&self, span: Span) -> String {
        slice_to_string(&self.buffer, span)
    }

    /// Source lines with their byte spans.
    pub fn lines(&self) -> impl Iterator<Item = LineRef> + '_ {
        lines_with_spans(&self.buffer)
    }

    /// The deepest node covering `offset`, with its computed start.
    pub fn node_at(&self, offset: usize) -> Option<NodeRef<'_>> {
        NodeRef::new(&self.root, 0).descendant_at(offset)
    }

    /// All nodes in document order.
    pub fn walk(&self) -> Walk<'_> {
        NodeRef::new(&self.root, 0).walk()
    }
}

#[cfg(test)]
mod tests {
    use crate::dialect::Dialect;
    use crate::parsing::change::TextChange;
    use crate::parsing::node::ElementType;
    use crate::parsing::rope::Span;

    #[test]
    fn node_at_finds_deepest_node() {
        let doc = Dialect::default()
            .parse_complete_text("# Title\n\nsome *text*\n")
            .unwrap();
        let node = doc.node_at(16).unwrap();
        assert_eq!(node.element_type(), ElementType::Text);
        assert_eq!(node.start(), 15);
        assert_eq!(node.as_text(), "text");
        assert!(doc.node_at(21).is_none());
    }

    #[test]
    fn walk_is_pre_order() {
        let doc = Dialect::default().parse_complete_text("a\n").unwrap();
        let types: Vec<_> = doc.walk().map(|n| n.type_name()).collect();
        assert_eq!(
            types,
            vec!["document", "paragraph", "content-line", "text", "line-end"]
        );
    }

    #[test]
    fn successor_shares_identity_and_applies_change() {
        let dialect = Dialect::default();
        let doc = dialect.parse_complete_text("hello world\n").unwrap();
        let next = dialect
            .parse_update(&doc, &TextChange::new(6, 5, "there"))
            .unwrap();
        assert_eq!(next.uuid(), doc.uuid());
        assert_eq!(next.text(), "hello there\n");
        assert_eq!(next.root().as_text(), next.text());
        assert_eq!(doc.text(), "hello world\n");
        assert_eq!(next.slice(Span { start: 6, end: 11 }), "there");
        assert_eq!(next.lines().count(), 1);
    }
}
