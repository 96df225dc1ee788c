//! Mention resolution against the entity registry.
//!
//! Resolution is a pure lookup: the same mention against the same registry
//! contents always gives the same result, and no resolution depends on any
//! other mention in the message.

use tracing::debug;

use mentionkit_types::mention::{Mention, Resolution, ResolvedContext};

use crate::entity::registry::EntityRegistry;

/// Resolve one mention. A miss becomes `Resolution::NotFound`, never an error.
pub fn resolve(mention: Mention, registry: &EntityRegistry) -> ResolvedContext {
    let resolution = match registry.get(&mention.candidate_id) {
        Some(record) => Resolution::Found(record),
        None => {
            debug!(id = %mention.candidate_id, "mentioned entity not found");
            Resolution::NotFound
        }
    };

    ResolvedContext {
        mention,
        resolution,
    }
}

/// Resolve mentions in the order given.
pub fn resolve_all(
    mentions: impl IntoIterator<Item = Mention>,
    registry: &EntityRegistry,
) -> Vec<ResolvedContext> {
    mentions
        .into_iter()
        .map(|mention| resolve(mention, registry))
        .collect()
}
