//! Custom action types exchanged between the chat UI and the action bridge.
//!
//! A UI widget (e.g. an "Apply Theme" button) fires an [`ActionRequest`]; the
//! bridge answers with an [`ActionResult`] whose `effect` the UI applies.

use serde::{Deserialize, Serialize};

use std::fmt;

use crate::error::ActionError;

/// A UI-originated custom action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub action_name: String,
    #[serde(default = "empty_payload")]
    pub payload: serde_json::Value,
}

fn empty_payload() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl ActionRequest {
    pub fn new(action_name: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            action_name: action_name.into(),
            payload,
        }
    }
}

/// Structured instruction for the UI layer produced by an applied action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionEffect {
    /// Client effect name the UI dispatches on (e.g. `update_ui_theme`).
    pub name: String,
    pub data: serde_json::Value,
    /// Transient progress text shown while the effect is applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<String>,
    /// Assistant reply to append to the thread.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
}

impl ActionEffect {
    pub fn new(name: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            data,
            progress: None,
            reply: None,
        }
    }

    pub fn with_progress(mut self, text: impl Into<String>) -> Self {
        self.progress = Some(text.into());
        self
    }

    pub fn with_reply(mut self, text: impl Into<String>) -> Self {
        self.reply = Some(text.into());
        self
    }
}

/// Lifecycle of a single action invocation.
///
/// `Received -> Validated -> Applied` on success. Unknown actions go straight
/// from `Received` to `Rejected`; handler failures go `Validated -> Rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionState {
    Received,
    Validated,
    Applied,
    Rejected,
}

impl ActionState {
    /// Whether `self -> next` is a legal transition.
    pub fn can_transition_to(self, next: ActionState) -> bool {
        matches!(
            (self, next),
            (ActionState::Received, ActionState::Validated)
                | (ActionState::Received, ActionState::Rejected)
                | (ActionState::Validated, ActionState::Applied)
                | (ActionState::Validated, ActionState::Rejected)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ActionState::Applied | ActionState::Rejected)
    }
}

impl fmt::Display for ActionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionState::Received => write!(f, "received"),
            ActionState::Validated => write!(f, "validated"),
            ActionState::Applied => write!(f, "applied"),
            ActionState::Rejected => write!(f, "rejected"),
        }
    }
}

/// Caller-facing status of an action invocation.
///
/// - Ok: the action was applied and `effect` is set
/// - Rejected: the action name is not in the known set
/// - Error: the handler ran and failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
    Ok,
    Rejected,
    Error,
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionStatus::Ok => write!(f, "ok"),
            ActionStatus::Rejected => write!(f, "rejected"),
            ActionStatus::Error => write!(f, "error"),
        }
    }
}

/// Result of dispatching an [`ActionRequest`] through the bridge.
#[derive(Debug, Clone, Serialize)]
pub struct ActionResult {
    pub action_name: String,
    pub status: ActionStatus,
    /// Terminal state reached.
    pub state: ActionState,
    /// Every state visited, starting at `Received`.
    pub transitions: Vec<ActionState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effect: Option<ActionEffect>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "error_as_string")]
    pub error: Option<ActionError>,
}

fn error_as_string<S: serde::Serializer>(
    error: &Option<ActionError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match error {
        Some(e) => serializer.serialize_some(&e.to_string()),
        None => serializer.serialize_none(),
    }
}

impl ActionResult {
    pub fn is_applied(&self) -> bool {
        self.state == ActionState::Applied
    }
}
