use std::sync::Arc;

use crate::parsing::blocks::classify::{Classified, ItemMarker, LineClass, classify};
use crate::parsing::element::{ElementParser, LineOutcome, ParseContext, offer_to_last, start_child};
use crate::parsing::inline::parse_inlines;
use crate::parsing::node::{ElementType, ListMarker, Node, NodeKind};
use crate::parsing::rope::Line;

impl Node {
    /// Number of the first item of an ordered list.
    pub fn list_start(&self) -> Option<u64> {
        match self.kind() {
            NodeKind::List { ordered: true, .. } => match self.children().first()?.kind() {
                NodeKind::ListItem {
                    marker: ListMarker::Ordered { number, .. },
                    ..
                } => Some(*number),
                _ => None,
            },
            _ => None,
        }
    }

    /// Lists nested under a list item.
    pub fn nested_lists(&self) -> impl Iterator<Item = &Arc<Node>> {
        self.children()
            .iter()
            .filter(|c| c.element_type() == ElementType::List)
    }
}

fn item_marker<'a>(
    cx: ParseContext<'_>,
    line: &Line<'a>,
) -> Option<(ItemMarker, Classified<'a>)> {
    let classified = classify(cx, line);
    match classified.class {
        LineClass::ListItem(marker) => Some((marker, classified)),
        _ => None,
    }
}

/// Consecutive list items at one indent. Deeper items nest inside the
/// previous item; a shallower one ends the list.
pub struct ListParser;

impl ElementParser for ListParser {
    fn element_type(&self) -> ElementType {
        ElementType::List
    }

    fn parse_line(
        &self,
        cx: ParseContext<'_>,
        previous: Option<Node>,
        line: &Line<'_>,
    ) -> LineOutcome {
        let Some((marker, _)) = item_marker(cx, line) else {
            return LineOutcome::Rejected(previous);
        };
        let Some(list) = previous else {
            let list = cx.container(
                NodeKind::List {
                    ordered: marker.marker.is_ordered(),
                    indent: marker.indent,
                },
                vec![],
            );
            return match start_child(&ListItemParser, cx, list, line) {
                LineOutcome::Accepted(list) => LineOutcome::Accepted(list),
                LineOutcome::Rejected(_) => LineOutcome::Rejected(None),
            };
        };
        let &NodeKind::List { ordered, indent } = list.kind() else {
            return LineOutcome::Rejected(Some(list));
        };

        if marker.indent < indent {
            return LineOutcome::Rejected(Some(list));
        }
        if marker.indent == indent {
            if marker.marker.is_ordered() != ordered {
                return LineOutcome::Rejected(Some(list));
            }
            return start_child(&ListItemParser, cx, list, line);
        }
        match offer_to_last(&ListItemParser, cx, list, line) {
            (list, true) => LineOutcome::Accepted(list),
            (list, false) => LineOutcome::Rejected(Some(list)),
        }
    }

    fn accepts_replacement(&self, existing: &Node, replacement: &Node) -> bool {
        existing.kind() == replacement.kind()
    }
}

/// One item line plus any lists nested below it.
pub struct ListItemParser;

impl ListItemParser {
    fn build(cx: ParseContext<'_>, marker: ItemMarker, classified: &Classified<'_>) -> Node {
        let mut children = Vec::new();
        if !classified.prefix.is_empty() {
            children.push(cx.delimiter(classified.prefix));
        }
        children.push(cx.delimiter(&classified.content[..marker.len]));
        children.extend(parse_inlines(cx, &classified.content[marker.len..]));
        children.extend(cx.line_end(classified.terminator));
        cx.container(
            NodeKind::ListItem {
                indent: marker.indent,
                marker: marker.marker,
            },
            children,
        )
    }
}

impl ElementParser for ListItemParser {
    fn element_type(&self) -> ElementType {
        ElementType::ListItem
    }

    fn parse_line(
        &self,
        cx: ParseContext<'_>,
        previous: Option<Node>,
        line: &Line<'_>,
    ) -> LineOutcome {
        let Some((marker, classified)) = item_marker(cx, line) else {
            return LineOutcome::Rejected(previous);
        };
        let Some(item) = previous else {
            return LineOutcome::Accepted(Self::build(cx, marker, &classified));
        };
        let &NodeKind::ListItem { indent, .. } = item.kind() else {
            return LineOutcome::Rejected(Some(item));
        };
        if marker.indent <= indent {
            return LineOutcome::Rejected(Some(item));
        }
        match offer_to_last(&ListParser, cx, item, line) {
            (item, true) => LineOutcome::Accepted(item),
            (item, false) => start_child(&ListParser, cx, item, line),
        }
    }

    /// The item's own line must still read as the same kind of item.
    fn rebuild(
        &self,
        cx: ParseContext<'_>,
        existing: &Node,
        children: Vec<Arc<Node>>,
    ) -> Option<Node> {
        let rebuilt = existing.with_children(children);
        let mut first_line = String::new();
        rebuilt
            .children()
            .iter()
            .take_while(|c| c.element_type() != ElementType::List)
            .for_each(|c| c.write_text(&mut first_line));
        let (marker, _) = item_marker(cx, &Line::new(&first_line, 0, 0))?;
        let same = matches!(
            existing.kind(),
            NodeKind::ListItem { indent, marker: m }
                if *indent == marker.indent && *m == marker.marker
        );
        same.then_some(rebuilt)
    }

    fn accepts_replacement(&self, existing: &Node, replacement: &Node) -> bool {
        existing.kind() == replacement.kind()
    }
}
