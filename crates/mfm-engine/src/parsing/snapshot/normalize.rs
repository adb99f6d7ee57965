use std::fmt::Write;
use std::sync::Arc;

use serde::Serialize;

use crate::parsing::node::{EmphasisStyle, ListMarker, Node, NodeKind, NodeRef, OptionMap};

/// A stable, serializable picture of a parse tree without ids.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Snap {
    #[serde(rename = "type")]
    pub kind: String,
    pub span: (usize, usize),
    #[serde(skip_serializing_if = "String::is_empty")]
    pub fields: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Snap>,
}

pub fn normalize(root: &Arc<Node>) -> Snap {
    snap(NodeRef::new(root, 0))
}

fn snap(node: NodeRef<'_>) -> Snap {
    Snap {
        kind: node.type_name().to_string(),
        span: (node.start(), node.end()),
        fields: fields(node.kind()).trim_start().to_string(),
        text: node.leaf_text().map(str::to_string),
        children: node.children().map(snap).collect(),
    }
}

/// One line per node: indent, type, kind fields, span, and the text of
/// leaves. Two trees have the same outline exactly when they differ in ids
/// only.
pub fn outline(root: &Node) -> String {
    let mut out = String::new();
    write_outline(&mut out, root, 0, 0);
    out
}

fn write_outline(out: &mut String, node: &Node, start: usize, depth: usize) {
    let _ = write!(
        out,
        "{:indent$}{}{} {}..{}",
        "",
        node.type_name(),
        fields(node.kind()),
        start,
        start + node.len(),
        indent = depth * 2
    );
    if let Some(text) = node.leaf_text() {
        let _ = write!(out, " {text:?}");
    }
    out.push('\n');
    let mut child_start = start;
    for child in node.children() {
        write_outline(out, child, child_start, depth + 1);
        child_start += child.len();
    }
}

fn options(map: &OptionMap) -> String {
    if map.is_empty() {
        return String::new();
    }
    let entries: Vec<_> = map.iter().map(|(k, v)| format!("{k}={v}")).collect();
    format!(" {{{}}}", entries.join("; "))
}

fn fields(kind: &NodeKind) -> String {
    match kind {
        NodeKind::Section { level } => format!(" h{level}"),
        NodeKind::Heading { level, options: o } => format!(" h{level}{}", options(o)),
        NodeKind::Emphasis { style } => match style {
            EmphasisStyle::Italic => " italic",
            EmphasisStyle::Bold => " bold",
            EmphasisStyle::Strikethrough => " strike",
        }
        .to_string(),
        NodeKind::Link { url, options: o } => format!(" {url}{}", options(o)),
        NodeKind::Image {
            url,
            alt,
            options: o,
        } => format!(" {url} alt={alt:?}{}", options(o)),
        NodeKind::Arrow { direction } => format!(" {direction:?}"),
        NodeKind::OptionEntry { key, value, .. } => {
            format!(" {}={value:?}", key.as_deref().unwrap_or("default"))
        }
        NodeKind::Block { style, options: o } => format!(" {style:?}{}", options(o)),
        NodeKind::List { ordered, indent } => {
            let mut s = if *ordered { " ordered" } else { " bullet" }.to_string();
            if *indent > 0 {
                let _ = write!(s, " indent={indent}");
            }
            s
        }
        NodeKind::ListItem { marker, .. } => match marker {
            ListMarker::Bullet(c) => format!(" {c}"),
            ListMarker::Ordered { number, delimiter } => format!(" {number}{delimiter}"),
        },
        NodeKind::TableRow { separator: true } => " separator".to_string(),
        NodeKind::FencedCode {
            fence,
            language,
            options: o,
            closed,
        } => {
            let mut s = format!(" {}", fence.character.to_string().repeat(fence.length));
            if let Some(language) = language {
                let _ = write!(s, " {language}");
            }
            s.push_str(&options(o));
            if !closed {
                s.push_str(" unclosed");
            }
            s
        }
        _ => String::new(),
    }
}
