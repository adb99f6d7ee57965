//! The MfM dialect: configuration and hooks, plus the parse entry points.

use std::sync::Arc;

use anyhow::Context;
use log::debug;
use mfm_config::{Config, ConfigError, DialectConfig};
use xi_rope::Rope;

use crate::document::MfmDocument;
use crate::error::ParseError;
use crate::hooks::OptionHooks;
use crate::parsing::blocks::kinds::DocumentParser;
use crate::parsing::change::TextChange;
use crate::parsing::driver;
use crate::parsing::element::{ElementParser, ParseContext};
use crate::parsing::ids::IdGenerator;
use crate::parsing::node::{Node, NodeKind};
use crate::parsing::rope::split_lines;

/// An immutable grammar configuration. Built once and passed by reference
/// to every element parser.
#[derive(Debug, Clone, Default)]
pub struct Dialect {
    config: DialectConfig,
    hooks: OptionHooks,
}

impl Dialect {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: DialectConfig) -> Self {
        Self {
            config,
            hooks: OptionHooks::default(),
        }
    }

    /// The dialect described by the user's config file, or the default one
    /// when there is no file.
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self::from_config(Config::load_or_default()?.dialect))
    }

    pub fn with_hooks(self, hooks: OptionHooks) -> Self {
        Self { hooks, ..self }
    }

    pub fn config(&self) -> &DialectConfig {
        &self.config
    }

    pub fn hooks(&self) -> &OptionHooks {
        &self.hooks
    }

    /// Parses `text` from scratch.
    pub fn parse_complete_text(&self, text: &str) -> Result<MfmDocument, ParseError> {
        let ids = Arc::new(IdGenerator::new());
        let cx = ParseContext::new(self, &ids);
        let root = if text.is_empty() {
            Node::container(ids.next_id(), NodeKind::Document, vec![])
        } else {
            driver::parse_lines(&DocumentParser, cx, split_lines(text, 0))?
        };
        Ok(MfmDocument::new(Arc::new(root), Rope::from(text), ids))
    }

    /// Parses UTF-8 bytes, e.g. a file read from disk.
    pub fn parse_bytes(&self, bytes: &[u8]) -> anyhow::Result<MfmDocument> {
        let text = std::str::from_utf8(bytes).context("document is not valid UTF-8")?;
        Ok(self.parse_complete_text(text)?)
    }

    /// Applies `change` to `document` incrementally. `None` means the change
    /// spans lines or lies outside the document, and the caller should parse
    /// the edited text from scratch.
    pub fn parse_update(&self, document: &MfmDocument, change: &TextChange) -> Option<MfmDocument> {
        self.try_parse_update(document, change).ok().flatten()
    }

    /// Like [`Dialect::parse_update`], but reports a change that does not fit
    /// the document as an error.
    pub fn try_parse_update(
        &self,
        document: &MfmDocument,
        change: &TextChange,
    ) -> Result<Option<MfmDocument>, ParseError> {
        if change.end() > document.len() {
            return Err(ParseError::InvalidChange {
                offset: change.range_offset,
                length: change.range_length,
                len: document.len(),
            });
        }
        if change.crosses_lines() {
            debug!(
                "change at {} inserts a line break; a full parse is needed",
                change.range_offset
            );
            return Ok(None);
        }
        let cx = ParseContext::new(self, document.ids());
        let root = DocumentParser.parse_partial(cx, document.root(), 0, change);
        Ok(root.map(|root| document.successor(root, change)))
    }
}
