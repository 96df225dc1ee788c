use serde::{Deserialize, Serialize};

use crate::entity::EntityRecord;
use std::sync::Arc;

/// A `@token` found in user text.
///
/// `span` is a byte range into the scanned text, covering the marker and the
/// identifier, so `&text[span.0..span.1] == raw_token`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
    pub raw_token: String,
    /// Identifier without the marker. Never empty.
    pub candidate_id: String,
    pub span: (usize, usize),
}

/// Outcome of looking a mention up in the entity registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "record", rename_all = "snake_case")]
pub enum Resolution {
    Found(Arc<EntityRecord>),
    NotFound,
}

/// A mention paired with its resolution. One per mention per message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedContext {
    pub mention: Mention,
    pub resolution: Resolution,
}

impl ResolvedContext {
    /// The resolved record, if the lookup succeeded.
    pub fn record(&self) -> Option<&EntityRecord> {
        match &self.resolution {
            Resolution::Found(record) => Some(record),
            Resolution::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self.resolution, Resolution::Found(_))
    }
}

/// An image handed to the agent runtime alongside the composed text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInput {
    pub name: String,
    /// `data:<mime>;base64,<payload>`
    pub data_url: String,
}

/// Final payload for the agent runtime: the user's text, untouched, plus the
/// context blocks injected for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposedMessage {
    pub visible_text: String,
    pub injected_blocks: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ImageInput>,
}

impl ComposedMessage {
    /// Render the single text payload: visible text followed by each block
    /// on its own line.
    pub fn to_payload(&self) -> String {
        let extra: usize = self.injected_blocks.iter().map(|b| b.len() + 1).sum();
        let mut payload = String::with_capacity(self.visible_text.len() + extra);
        payload.push_str(&self.visible_text);
        for block in &self.injected_blocks {
            payload.push('\n');
            payload.push_str(block);
        }
        payload
    }
}
