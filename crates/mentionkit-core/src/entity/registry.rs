//! In-memory entity registry.
//!
//! Records are keyed by id in a sharded concurrent map. Lookups only take a
//! shard read lock, so any number of readers proceed in parallel; a
//! registration locks one shard for the duration of a single insert.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::info;

use mentionkit_types::entity::{EntityKind, EntityRecord};
use mentionkit_types::error::RegistryError;

use crate::mention::scanner::is_valid_identifier;

/// Lookup table of entity records referenced by `@mentions`.
///
/// Populated at startup and read-mostly afterwards. Share it behind an
/// `Arc`; all methods take `&self`.
#[derive(Default)]
pub struct EntityRegistry {
    records: DashMap<String, Arc<EntityRecord>>,
}

impl EntityRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    /// Build a registry from a batch of records, failing on the first duplicate id.
    pub fn from_records(
        records: impl IntoIterator<Item = EntityRecord>,
    ) -> Result<Self, RegistryError> {
        let registry = Self::new();
        for record in records {
            registry.register(record)?;
        }
        Ok(registry)
    }

    /// Registry seeded with the demo orders.
    pub fn with_demo_entities() -> Self {
        let registry = Self::new();
        for record in demo_entities() {
            // Demo ids are distinct.
            let _ = registry.register(record);
        }
        registry
    }

    /// Insert a record. Fails if the id is already taken; the existing
    /// entry is left untouched.
    ///
    /// The id must match the mention identifier grammar, otherwise no
    /// mention could ever resolve to it.
    pub fn register(&self, record: EntityRecord) -> Result<(), RegistryError> {
        if !is_valid_identifier(&record.id) {
            return Err(RegistryError::InvalidId(record.id));
        }

        let (id, kind) = (record.id.clone(), record.kind);
        match self.records.entry(record.id.clone()) {
            Entry::Occupied(_) => return Err(RegistryError::DuplicateId(record.id)),
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(record));
            }
        }

        info!(id = %id, kind = %kind, "registered entity");
        Ok(())
    }

    /// Look up a record by id. A miss is `None`, never an error.
    pub fn get(&self, id: &str) -> Option<Arc<EntityRecord>> {
        self.records.get(id).map(|entry| Arc::clone(entry.value()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All registered ids, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.records.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    /// All records, sorted by id.
    pub fn records(&self) -> Vec<Arc<EntityRecord>> {
        let mut records: Vec<Arc<EntityRecord>> =
            self.records.iter().map(|e| Arc::clone(e.value())).collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));
        records
    }
}

impl std::fmt::Debug for EntityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityRegistry")
            .field("entities", &self.records.len())
            .finish()
    }
}

/// The two demo orders shipped with the chat demo.
pub fn demo_entities() -> Vec<EntityRecord> {
    vec![
        EntityRecord::new("order_123", EntityKind::Order)
            .with_field("title", "Order #123")
            .with_field("status", "shipped")
            .with_field("items", "Laptop, Mouse"),
        EntityRecord::new("order_456", EntityKind::Order)
            .with_field("title", "Order #456")
            .with_field("status", "processing")
            .with_field("items", "Monitor"),
    ]
}
