//! Entity seed loader.
//!
//! Reads the registry's initial records from a TOML file:
//!
//! ```toml
//! [[entity]]
//! id = "order_123"
//! kind = "order"
//!
//! [entity.fields]
//! title = "Order #123"
//! status = "shipped"
//! ```
//!
//! Field values may be any TOML scalar; non-strings are stored in their TOML
//! text form. Field order follows the file.

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::{debug, info, warn};

use mentionkit_core::entity::registry::EntityRegistry;
use mentionkit_types::entity::{EntityKind, EntityRecord};
use mentionkit_types::error::SeedError;

#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(default, rename = "entity")]
    entities: Vec<SeedEntity>,
}

#[derive(Debug, Deserialize)]
struct SeedEntity {
    id: String,
    kind: EntityKind,
    #[serde(default)]
    fields: IndexMap<String, toml::Value>,
}

impl SeedEntity {
    fn into_record(self) -> Result<EntityRecord, SeedError> {
        let mut record = EntityRecord::new(self.id, self.kind);
        for (key, value) in self.fields {
            let text = match value {
                toml::Value::String(s) => s,
                toml::Value::Integer(_)
                | toml::Value::Float(_)
                | toml::Value::Boolean(_)
                | toml::Value::Datetime(_) => value.to_string(),
                toml::Value::Array(_) | toml::Value::Table(_) => {
                    return Err(SeedError::Parse(format!(
                        "entity '{}': field '{key}' must be a scalar",
                        record.id
                    )));
                }
            };
            record = record.with_field(key, text);
        }
        Ok(record)
    }
}

/// Parse seed records from TOML text.
pub fn parse_seed(content: &str) -> Result<Vec<EntityRecord>, SeedError> {
    let file: SeedFile = toml::from_str(content).map_err(|e| SeedError::Parse(e.to_string()))?;
    file.entities
        .into_iter()
        .map(SeedEntity::into_record)
        .collect()
}

/// Build the registry from a seed file.
///
/// - Missing file: the demo records are used.
/// - Unreadable or malformed file, a duplicate id, or an id no mention can
///   reach: error.
pub async fn load_registry(path: &Path) -> Result<EntityRegistry, SeedError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            warn!("No seed file at {}, using demo entities", path.display());
            return Ok(EntityRegistry::with_demo_entities());
        }
        Err(err) => return Err(SeedError::Io(format!("{}: {err}", path.display()))),
    };

    let records = parse_seed(&content)?;
    let registry = EntityRegistry::from_records(records)?;
    info!(count = registry.len(), path = %path.display(), "loaded entity seed");
    debug!(ids = ?registry.ids(), "seeded entity ids");
    Ok(registry)
}
