//! Options post-processing.
//!
//! A hook is registered per element type and runs whenever an element that
//! carries options (heading, block, fenced code, link, image) is assembled or
//! rebuilt. It sees the finished node and its parsed options and may derive
//! further values, which are merged into the node's options. A derived value
//! replaces a parsed one with the same key.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::parsing::node::{ElementType, Node, NodeKind, OptionMap};

/// Collects the values a hook derives.
#[derive(Debug, Default)]
pub struct OptionSetter {
    values: OptionMap,
}

impl OptionSetter {
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }
}

pub type OptionHook = Arc<dyn Fn(&Node, &OptionMap, &mut OptionSetter) + Send + Sync>;

#[derive(Clone, Default)]
pub struct OptionHooks {
    hooks: HashMap<ElementType, Vec<OptionHook>>,
}

impl fmt::Debug for OptionHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut counts: Vec<_> = self.hooks.iter().map(|(ty, h)| (ty.name(), h.len())).collect();
        counts.sort();
        f.debug_struct("OptionHooks").field("hooks", &counts).finish()
    }
}

impl OptionHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a hook for elements of type `ty`. Hooks run in registration order.
    pub fn register<F>(&mut self, ty: ElementType, hook: F)
    where
        F: Fn(&Node, &OptionMap, &mut OptionSetter) + Send + Sync + 'static,
    {
        self.hooks.entry(ty).or_default().push(Arc::new(hook));
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Runs the hooks for `node`'s type and merges what they set.
    pub fn apply(&self, mut node: Node) -> Node {
        let Some(hooks) = self.hooks.get(&node.element_type()) else {
            return node;
        };
        let Some(options) = node.options() else {
            return node;
        };
        let mut setter = OptionSetter::default();
        for hook in hooks {
            hook(&node, options, &mut setter);
        }
        if setter.values.is_empty() {
            return node;
        }
        match node.kind_mut() {
            NodeKind::Heading { options, .. }
            | NodeKind::Link { options, .. }
            | NodeKind::Image { options, .. }
            | NodeKind::Block { options, .. }
            | NodeKind::FencedCode { options, .. } => options.extend(setter.values),
            _ => {}
        }
        node
    }
}
