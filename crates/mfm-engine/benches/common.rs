// Benchmark helpers. Each bench file compiles this module on its own, so
// helpers one file does not use would otherwise warn.
#[allow(dead_code)]
pub fn generate_markdown_content(size: usize) -> String {
    let base = "# Title {anchor=top}\n\n## Section\n\nParagraph with *some* `content` and a [link](page).\n\n- Bullet point\n  - Nested item\n- Another item\n\n| a | b |\n|---|---|\n| 1 | 2 |\n\n```rust\nfn example() {\n    println!(\"Hello\");\n}\n```\n\n";
    base.repeat(size)
}

/// Offset just inside the word `content` of the last repetition.
#[allow(dead_code)]
pub fn last_word_offset(content: &str) -> usize {
    content.rfind("content").map_or(0, |at| at + 3)
}
