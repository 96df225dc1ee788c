//! Conversation thread types persisted by the thread store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// User id used when a request carries no user header.
pub const ANONYMOUS_USER: &str = "anonymous-default";

/// A conversation thread owned by a single user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadMetadata {
    pub id: String,
    pub user_id: String,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ThreadMetadata {
    pub fn new(id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            title: None,
            created_at: Utc::now(),
        }
    }
}

/// Who authored a thread item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemRole {
    User,
    Assistant,
}

impl fmt::Display for ItemRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemRole::User => write!(f, "user"),
            ItemRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for ItemRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(ItemRole::User),
            "assistant" => Ok(ItemRole::Assistant),
            other => Err(format!("invalid item role: '{other}'")),
        }
    }
}

/// A single message in a thread.
///
/// User items keep the verbatim text and the payload that was composed for
/// the agent runtime, so the injected context can be audited later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadItem {
    pub id: String,
    pub thread_id: String,
    pub role: ItemRole,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composed_payload: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachment_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Ordering for item listings, by creation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("invalid sort order: '{other}'")),
        }
    }
}
