use mfm_engine::Dialect;
use mfm_engine::parsing::snapshot;

fn parse(text: &str) -> String {
    let doc = Dialect::default().parse_complete_text(text).unwrap();
    snapshot::invariants(doc.root(), text);
    snapshot::outline(doc.root())
}

#[test]
fn heading_outline() {
    insta::assert_snapshot!(parse("# Heading\n"), @r##"
    document 0..10
      section h1 0..10
        heading h1 0..10
          delimiter 0..2 "# "
          heading-text 2..9
            text 2..9 "Heading"
          line-end 9..10 "\n"
    "##);
}

#[test]
fn inline_outline() {
    insta::assert_snapshot!(parse("Some *em* [a](b)\n"), @r#"
    document 0..17
      paragraph 0..17
        content-line 0..17
          text 0..5 "Some "
          emphasis italic 5..9
            delimiter 5..6 "*"
            text 6..8 "em"
            delimiter 8..9 "*"
          text 9..10 " "
          link b 10..16
            delimiter 10..11 "["
            text 11..12 "a"
            delimiter 12..14 "]("
            target 14..15 "b"
            delimiter 15..16 ")"
          line-end 16..17 "\n"
    "#);
}

#[test]
fn serialized_tree_has_no_ids() {
    let doc = Dialect::default().parse_complete_text("a\n").unwrap();
    let json = serde_json::to_value(snapshot::normalize(doc.root())).unwrap();
    assert_eq!(json["type"], "document");
    assert_eq!(json["span"], serde_json::json!([0, 2]));
    assert_eq!(json["children"][0]["type"], "paragraph");
    assert!(json.get("id").is_none());
}
