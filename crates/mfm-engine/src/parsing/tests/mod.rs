//! Whole-document tests for the parsing module.
//!
//! Unit tests next to each element cover its own grammar. These run the
//! full pipeline through a `Dialect` and check the tree-wide properties:
//! lossless text, idempotent full parses, and incremental updates that agree
//! with a full parse of the edited text.

use pretty_assertions::assert_eq;

use crate::dialect::Dialect;
use crate::parsing::change::TextChange;
use crate::parsing::node::{ElementType, NodeKind};
use crate::parsing::snapshot::{invariants, outline};

/// A document touching every element of the grammar.
const SAMPLE: &str = "\
intro with *emphasis* and `code`
# Title {anchor=top}

Some **bold** text, a [link](page){x=1} and ![img](a.png) -> done.
## Nested
- one
- two _it_
  - deep
1. first

| a | b |
|---|--:|
| 1 | 2 |

> {aside}
> quoted ~~gone~~

```rust {linenos}
let x = 1;
```
***
tail\\* line
";

fn full(text: &str) -> String {
    let doc = Dialect::default().parse_complete_text(text).unwrap();
    invariants(doc.root(), text);
    outline(doc.root())
}

/// Applies `change` incrementally and, when the update is accepted, checks
/// it against a full parse of the edited text.
fn assert_update_agrees(text: &str, change: &TextChange) -> bool {
    let dialect = Dialect::default();
    let doc = dialect.parse_complete_text(text).unwrap();
    let Some(updated) = dialect.parse_update(&doc, change) else {
        return false;
    };
    let edited = change.splice(text, 0).unwrap();
    assert_eq!(updated.text(), edited);
    invariants(updated.root(), &edited);
    assert_eq!(
        outline(updated.root()),
        full(&edited),
        "update {change:?} of {text:?} disagrees with a full parse"
    );
    true
}

#[test]
fn scenario_single_heading() {
    let doc = Dialect::default().parse_complete_text("# Heading").unwrap();
    let root = doc.root();
    assert_eq!(root.children().len(), 1);
    let section = &root.children()[0];
    assert_eq!(section.kind(), &NodeKind::Section { level: 1 });
    assert_eq!(section.children().len(), 1);
    assert_eq!(section.children()[0].text().as_deref(), Some("Heading"));
}

#[test]
fn scenario_nested_sections() {
    let doc = Dialect::default().parse_complete_text("# a\n## b").unwrap();
    let outer = &doc.root().children()[0];
    assert_eq!(outer.level(), Some(1));
    assert_eq!(outer.children()[0].text().as_deref(), Some("a"));
    let inner = &outer.children()[1];
    assert_eq!(inner.level(), Some(2));
    assert_eq!(inner.children()[0].text().as_deref(), Some("b"));
}

#[test]
fn scenario_two_paragraphs() {
    let doc = Dialect::default().parse_complete_text("lorem\n\nipsum").unwrap();
    let types: Vec<_> = doc.root().children().iter().map(|c| c.type_name()).collect();
    assert_eq!(types, vec!["paragraph", "empty", "paragraph"]);
    let texts: Vec<_> = doc
        .root()
        .children()
        .iter()
        .filter(|c| c.element_type() == ElementType::Paragraph)
        .map(|p| p.text().unwrap_or_default())
        .collect();
    assert_eq!(texts, vec!["lorem", "ipsum"]);
}

#[test]
fn scenario_option_value_update() {
    let dialect = Dialect::default();
    let text = "# H {the value}\n";
    let doc = dialect.parse_complete_text(text).unwrap();
    let entry_start = |doc: &crate::MfmDocument| {
        doc.walk()
            .find(|n| n.element_type() == ElementType::OptionEntry)
            .map(|n| (n.start(), n.len()))
            .unwrap()
    };
    let (start, len) = entry_start(&doc);

    let updated = dialect
        .parse_update(&doc, &TextChange::insert(9, "updated "))
        .unwrap();
    let heading = updated
        .walk()
        .find(|n| n.element_type() == ElementType::Heading)
        .unwrap();
    assert_eq!(heading.options().unwrap()["default"], "the updated value");
    assert_eq!(entry_start(&updated), (start, len + 8));
}

#[test]
fn scenario_unterminated_emphasis_is_text() {
    let doc = Dialect::default().parse_complete_text("*not italic").unwrap();
    assert!(doc.walk().all(|n| n.element_type() != ElementType::Emphasis));
    let line = doc
        .walk()
        .find(|n| n.element_type() == ElementType::ContentLine)
        .unwrap();
    assert!(
        line.children()
            .all(|c| c.element_type() == ElementType::Text)
    );
    assert_eq!(line.plain_text(), "*not italic");
}

#[test]
fn sample_is_lossless_and_idempotent() {
    assert_eq!(full(SAMPLE), full(SAMPLE));
    let doc = Dialect::default().parse_complete_text(SAMPLE).unwrap();
    assert_eq!(doc.root().as_text(), SAMPLE);
    for ty in [
        ElementType::Section,
        ElementType::Emphasis,
        ElementType::InlineCode,
        ElementType::Link,
        ElementType::Image,
        ElementType::Arrow,
        ElementType::List,
        ElementType::Table,
        ElementType::Block,
        ElementType::FencedCode,
        ElementType::ThematicBreak,
    ] {
        assert!(
            doc.walk().any(|n| n.element_type() == ty),
            "sample has no {}",
            ty.name()
        );
    }
}

#[test]
fn every_single_byte_insertion_agrees_with_full_parse() {
    for insert in ["x", " ", "*", "#", "`", "[", "|", "-", ">", "{", "}", "\\"] {
        let accepted = (0..=SAMPLE.len())
            .filter(|&offset| assert_update_agrees(SAMPLE, &TextChange::insert(offset, insert)))
            .count();
        assert!(accepted > 0, "no insertion of {insert:?} was applied incrementally");
    }
}

#[test]
fn every_single_byte_deletion_agrees_with_full_parse() {
    let accepted = (0..SAMPLE.len())
        .filter(|&offset| assert_update_agrees(SAMPLE, &TextChange::delete(offset, 1)))
        .count();
    assert!(accepted > 0);
}

#[test]
fn replacements_inside_words_are_accepted() {
    let offset = SAMPLE.find("Nested").unwrap() + 2;
    assert!(assert_update_agrees(SAMPLE, &TextChange::new(offset, 2, "XY")));
    let offset = SAMPLE.find("deep").unwrap() + 1;
    assert!(assert_update_agrees(SAMPLE, &TextChange::new(offset, 1, "o")));
    let offset = SAMPLE.find("let x").unwrap() + 4;
    assert!(assert_update_agrees(SAMPLE, &TextChange::new(offset, 1, "y")));
}

#[test]
fn untouched_subtrees_are_shared() {
    let dialect = Dialect::default();
    let doc = dialect.parse_complete_text(SAMPLE).unwrap();
    let offset = SAMPLE.find("tail").unwrap() + 1;
    let updated = dialect
        .parse_update(&doc, &TextChange::insert(offset, "x"))
        .unwrap();
    assert_eq!(updated.root().id(), doc.root().id());
    let shared = doc
        .root()
        .children()
        .iter()
        .zip(updated.root().children())
        .filter(|(a, b)| std::sync::Arc::ptr_eq(a, b))
        .count();
    assert!(shared > 0);
}
