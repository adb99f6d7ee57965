use mfm_engine::parsing::snapshot::{invariants, outline};
use mfm_engine::{
    ContentChange, Dialect, DialectConfig, ElementType, MfmDocument, NodeKind, OptionHooks,
    TextChange,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn find(doc: &MfmDocument, ty: ElementType) -> Option<NodeKind> {
    doc.walk()
        .find(|n| n.element_type() == ty)
        .map(|n| n.kind().clone())
}

/// Returns whether the update was applied, after checking that it matches
/// a full parse of the edited text.
fn update_matches_full_parse(dialect: &Dialect, text: &str, change: TextChange) -> bool {
    let doc = dialect.parse_complete_text(text).unwrap();
    let Some(updated) = dialect.parse_update(&doc, &change) else {
        return false;
    };
    let edited = updated.text();
    invariants(updated.root(), &edited);
    let reparsed = dialect.parse_complete_text(&edited).unwrap();
    assert_eq!(outline(updated.root()), outline(reparsed.root()));
    true
}

#[rstest]
#[case::word_in_paragraph("hello world\n", TextChange::insert(5, "ooo"))]
#[case::emphasis_content("a **bold** b\n", TextChange::insert(5, "o"))]
#[case::heading_text("## Title\nbody\n", TextChange::new(3, 5, "Other"))]
#[case::option_value("# T {k=v}\n", TextChange::insert(8, "alue"))]
#[case::link_target("[a](page)\n", TextChange::insert(8, "s"))]
#[case::list_item("- one\n- two\n", TextChange::insert(9, "o"))]
#[case::table_cell("| a | b |\n|---|---|\n", TextChange::insert(3, "x"))]
#[case::code_line("```\nlet x;\n```\n", TextChange::insert(8, "y"))]
#[case::quoted_line("> quoted\n> more\n", TextChange::delete(3, 1))]
fn local_edits_are_absorbed(#[case] text: &str, #[case] change: TextChange) {
    assert!(update_matches_full_parse(&Dialect::default(), text, change));
}

#[rstest]
#[case::unclosed_emphasis("a *b* c\n", TextChange::delete(4, 1))]
#[case::new_heading("x\n\n# a\n", TextChange::insert(2, "# b"))]
#[case::heading_level("# a\n## b\n", TextChange::delete(4, 1))]
#[case::opening_fence("``\ncode\n", TextChange::insert(0, "`"))]
#[case::closing_fence("```\ncode\n```\ntail\n", TextChange::delete(9, 1))]
#[case::closing_fence_in_section("# A\n```\ncode\n```\n# B\n", TextChange::delete(13, 1))]
#[case::reclosing_fence_in_section("# A\n```\ncode\n``\n# B\n", TextChange::insert(13, "`"))]
#[case::paragraph_to_list("one\ntwo\n", TextChange::insert(4, "- "))]
#[case::separator_row("| a |\n| - |\n| b |\n", TextChange::delete(8, 1))]
#[case::aside_header("> {aside}\n> text\n", TextChange::delete(2, 1))]
fn structural_edits_still_match_full_parse(#[case] text: &str, #[case] change: TextChange) {
    update_matches_full_parse(&Dialect::default(), text, change);
}

#[rstest]
#[case::newline(TextChange::insert(3, "\n"))]
#[case::carriage_return(TextChange::insert(3, "\r"))]
#[case::crlf_in_replacement(TextChange::new(1, 2, "x\r\ny"))]
fn cross_line_edits_escalate(#[case] change: TextChange) {
    let dialect = Dialect::default();
    let doc = dialect.parse_complete_text("abcdef\n").unwrap();
    assert!(dialect.parse_update(&doc, &change).is_none());
}

#[test]
fn editor_change_from_json() {
    let change: ContentChange = serde_json::from_str(
        r#"{
            "range": {"startLineNumber": 1, "startColumn": 7, "endLineNumber": 1, "endColumn": 12},
            "rangeOffset": 6,
            "rangeLength": 5,
            "text": "there"
        }"#,
    )
    .unwrap();
    assert_eq!(change.range.start_column, 7);

    let dialect = Dialect::default();
    let doc = dialect.parse_complete_text("hello world\n").unwrap();
    let updated = dialect.parse_update(&doc, &change.into()).unwrap();
    assert_eq!(updated.text(), "hello there\n");
    assert_eq!(updated.uuid(), doc.uuid());
}

#[test]
fn hooks_follow_edits() {
    let mut hooks = OptionHooks::new();
    hooks.register(ElementType::Image, |node, _options, setter| {
        if let NodeKind::Image { url, .. } = node.kind()
            && url.ends_with(".mp4")
        {
            setter.set("media", "video");
        }
    });
    let dialect = Dialect::default().with_hooks(hooks);

    let doc = dialect.parse_complete_text("![clip](movie.mp4)\n").unwrap();
    let Some(NodeKind::Image { options, .. }) = find(&doc, ElementType::Image) else {
        panic!("no image");
    };
    assert_eq!(options.get("media").map(String::as_str), Some("video"));

    let updated = dialect
        .parse_update(&doc, &TextChange::new(14, 3, "png"))
        .unwrap();
    let Some(NodeKind::Image { url, options, .. }) = find(&updated, ElementType::Image) else {
        panic!("no image");
    };
    assert_eq!(url, "movie.png");
    assert!(!options.contains_key("media"));
}

fn option<'a>(kind: &'a NodeKind, key: &str) -> Option<&'a str> {
    match kind {
        NodeKind::Block { options, .. } | NodeKind::FencedCode { options, .. } => {
            options.get(key).map(String::as_str)
        }
        _ => None,
    }
}

#[test]
fn block_hooks_see_every_line() {
    let mut hooks = OptionHooks::new();
    hooks.register(ElementType::Block, |node, _options, setter| {
        setter.set("lines", node.as_text().lines().count().to_string());
    });
    let dialect = Dialect::default().with_hooks(hooks);
    let text = "> {aside}\n> body text\n";

    let doc = dialect.parse_complete_text(text).unwrap();
    let block = find(&doc, ElementType::Block).unwrap();
    assert_eq!(option(&block, "lines"), Some("2"));
    assert_eq!(option(&block, "default"), Some("aside"));

    assert!(update_matches_full_parse(&dialect, text, TextChange::insert(14, "y")));
}

#[test]
fn fence_hooks_see_the_code() {
    let mut hooks = OptionHooks::new();
    hooks.register(ElementType::FencedCode, |node, _options, setter| {
        setter.set("code", node.text().unwrap_or_default());
    });
    let dialect = Dialect::default().with_hooks(hooks);
    let text = "# T\n```rust\nlet x;\n```\n";

    let doc = dialect.parse_complete_text(text).unwrap();
    let fence = find(&doc, ElementType::FencedCode).unwrap();
    assert_eq!(option(&fence, "code"), Some("let x;\n"));

    let updated = dialect
        .parse_update(&doc, &TextChange::insert(17, "y"))
        .unwrap();
    let fence = find(&updated, ElementType::FencedCode).unwrap();
    assert_eq!(option(&fence, "code"), Some("let xy;\n"));
    assert!(update_matches_full_parse(&dialect, text, TextChange::insert(17, "y")));
}

#[test]
fn disabled_elements_parse_as_text() {
    let dialect = Dialect::from_config(DialectConfig {
        tables: false,
        arrows: false,
        max_heading_level: 2,
        ..DialectConfig::default()
    });
    let doc = dialect
        .parse_complete_text("### deep\n| a |\nx -> y\n")
        .unwrap();
    assert!(find(&doc, ElementType::Section).is_none());
    assert!(find(&doc, ElementType::Table).is_none());
    assert!(find(&doc, ElementType::Arrow).is_none());
    let types: Vec<_> = doc.root().children().iter().map(|c| c.type_name()).collect();
    assert_eq!(types, vec!["paragraph"]);
}

#[test]
fn previous_snapshot_is_untouched() {
    let dialect = Dialect::default();
    let doc = dialect.parse_complete_text("one two\n").unwrap();
    let before = outline(doc.root());
    let updated = dialect
        .parse_update(&doc, &TextChange::insert(3, "s"))
        .unwrap();
    assert_eq!(outline(doc.root()), before);
    assert_eq!(doc.text(), "one two\n");
    assert_eq!(updated.text(), "ones two\n");
}
