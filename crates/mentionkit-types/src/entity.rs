use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// A structured record that can be referenced from chat text via `@id`.
///
/// Records are immutable once registered; the registry hands them out behind
/// an `Arc` so readers never copy field data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Registry key, matched against the identifier following the mention marker.
    pub id: String,
    pub kind: EntityKind,
    /// Field name -> value, rendered in insertion order.
    #[serde(default)]
    pub fields: IndexMap<String, String>,
}

impl EntityRecord {
    /// Create a record with no fields.
    pub fn new(id: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            id: id.into(),
            kind,
            fields: IndexMap::new(),
        }
    }

    /// Append a field, keeping insertion order. A repeated key overwrites in place.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Look up a single field value.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }
}

/// Category of an entity. Determines the delimiter used for its context block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Order,
    Document,
    Customer,
    Product,
}

impl EntityKind {
    /// Tag name wrapping this kind's injected block, e.g. `ORDER_CONTEXT`.
    pub fn context_tag(&self) -> &'static str {
        match self {
            EntityKind::Order => "ORDER_CONTEXT",
            EntityKind::Document => "DOCUMENT_CONTEXT",
            EntityKind::Customer => "CUSTOMER_CONTEXT",
            EntityKind::Product => "PRODUCT_CONTEXT",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Order => write!(f, "order"),
            EntityKind::Document => write!(f, "document"),
            EntityKind::Customer => write!(f, "customer"),
            EntityKind::Product => write!(f, "product"),
        }
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "order" => Ok(EntityKind::Order),
            "document" => Ok(EntityKind::Document),
            "customer" => Ok(EntityKind::Customer),
            "product" => Ok(EntityKind::Product),
            other => Err(format!("invalid entity kind: '{other}'")),
        }
    }
}
