//! Context block rendering and message composition.
//!
//! Each resolved mention becomes one block wrapped in a kind-specific tag so
//! the agent runtime can tell injected context from user-authored text:
//!
//! ```text
//! <ORDER_CONTEXT>
//! id=order_123
//! status=shipped
//! </ORDER_CONTEXT>
//! ```
//!
//! Unresolved mentions become an `<ENTITY_NOT_FOUND>` block instead of being
//! dropped. Repeated mentions produce repeated blocks.

use mentionkit_types::entity::EntityRecord;
use mentionkit_types::mention::{ComposedMessage, Resolution, ResolvedContext};

/// Tag wrapping the marker for an unresolved mention.
pub const NOT_FOUND_TAG: &str = "ENTITY_NOT_FOUND";

/// Merge `text` with one block per resolved context, in order.
///
/// `text` is copied verbatim into `visible_text`; nothing is removed or
/// rewritten.
pub fn compose(text: &str, resolved: &[ResolvedContext]) -> ComposedMessage {
    ComposedMessage {
        visible_text: text.to_owned(),
        injected_blocks: resolved.iter().map(render_block).collect(),
        images: Vec::new(),
    }
}

/// Render the block for a single resolved context.
pub fn render_block(ctx: &ResolvedContext) -> String {
    match &ctx.resolution {
        Resolution::Found(record) => render_record(record),
        Resolution::NotFound => render_not_found(&ctx.mention.candidate_id),
    }
}

fn render_record(record: &EntityRecord) -> String {
    let tag = record.kind.context_tag();
    let mut block = format!("<{tag}>\nid={}\n", escape(&record.id));
    for (key, value) in &record.fields {
        block.push_str(&escape(key));
        block.push('=');
        block.push_str(&escape(value));
        block.push('\n');
    }
    block.push_str(&format!("</{tag}>"));
    block
}

fn render_not_found(id: &str) -> String {
    format!("<{NOT_FOUND_TAG}>\nid={}\n</{NOT_FOUND_TAG}>", escape(id))
}

/// Keep field data from closing the block early or spanning lines.
pub fn escape(value: &str) -> String {
    escape_markup(value).replace(['\r', '\n'], " ")
}

/// Escape `&`, `<` and `>` so embedded text can never open or close a
/// context tag. Line breaks are kept.
pub fn escape_markup(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            other => out.push(other),
        }
    }
    out
}
