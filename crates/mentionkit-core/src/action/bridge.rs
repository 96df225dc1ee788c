//! Action bridge: validates UI custom actions and runs their handlers.
//!
//! Every invocation walks a small state machine:
//!
//! ```text
//! Received --known--> Validated --Ok--> Applied
//!     |                   |
//!     +--unknown--+       +--Err/panic--+
//!                 v                     v
//!              Rejected              Rejected
//! ```
//!
//! The set of known actions is fixed when the bridge is built. Nothing is
//! retried; re-invoking a failed action is up to the caller.

use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use tracing::{info, warn};

use mentionkit_types::action::{
    ActionEffect, ActionRequest, ActionResult, ActionState, ActionStatus,
};
use mentionkit_types::error::ActionError;

use super::builtin::{ApplyThemeHandler, DownloadReportHandler, SubmitFeedbackHandler};
use super::handler::ActionHandler;

/// Dispatches action requests to a fixed set of named handlers.
#[derive(Clone)]
pub struct ActionBridge {
    handlers: Arc<HashMap<String, Arc<dyn ActionHandler>>>,
}

impl ActionBridge {
    pub fn builder() -> ActionBridgeBuilder {
        ActionBridgeBuilder::default()
    }

    /// Bridge with the built-in demo actions: `apply_theme` (also reachable
    /// as `apply_theme_effect`), `submit_feedback` and `download_report`.
    pub fn with_builtin_handlers() -> Self {
        let theme: Arc<dyn ActionHandler> = Arc::new(ApplyThemeHandler);
        Self::builder()
            .register_shared("apply_theme", Arc::clone(&theme))
            .register_shared("apply_theme_effect", theme)
            .register("submit_feedback", SubmitFeedbackHandler)
            .register("download_report", DownloadReportHandler)
            .build()
    }

    /// Whether `name` is in the known action set.
    pub fn is_known(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Known action names, sorted.
    pub fn known_actions(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Run one action invocation to a terminal state.
    pub fn dispatch(&self, request: &ActionRequest) -> ActionResult {
        let mut run = Invocation::new(&request.action_name);

        let Some(handler) = self.handlers.get(&request.action_name) else {
            warn!(action = %request.action_name, "rejected unknown action");
            return run.reject(
                ActionStatus::Rejected,
                ActionError::UnknownAction(request.action_name.clone()),
            );
        };
        run.advance(ActionState::Validated);

        let outcome = catch_unwind(AssertUnwindSafe(|| handler.apply(&request.payload)))
            .unwrap_or_else(|panic| Err(panic_message(panic.as_ref())));

        match outcome {
            Ok(effect) => {
                info!(action = %request.action_name, effect = %effect.name, "action applied");
                run.advance(ActionState::Applied);
                run.finish(Some(effect))
            }
            Err(reason) => {
                warn!(action = %request.action_name, %reason, "action failed");
                run.reject(
                    ActionStatus::Error,
                    ActionError::Execution {
                        action: request.action_name.clone(),
                        reason,
                    },
                )
            }
        }
    }
}

impl std::fmt::Debug for ActionBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionBridge")
            .field("actions", &self.known_actions())
            .finish()
    }
}

/// Collects handlers before the action set is frozen.
#[derive(Default)]
pub struct ActionBridgeBuilder {
    handlers: HashMap<String, Arc<dyn ActionHandler>>,
}

impl ActionBridgeBuilder {
    /// Register a handler under `name`. A later registration of the same name replaces it.
    pub fn register(self, name: impl Into<String>, handler: impl ActionHandler + 'static) -> Self {
        self.register_shared(name, Arc::new(handler))
    }

    /// Register an already shared handler, e.g. to expose it under an alias.
    pub fn register_shared(mut self, name: impl Into<String>, handler: Arc<dyn ActionHandler>) -> Self {
        self.handlers.insert(name.into(), handler);
        self
    }

    pub fn build(self) -> ActionBridge {
        ActionBridge {
            handlers: Arc::new(self.handlers),
        }
    }
}

/// State of a single dispatch.
struct Invocation {
    action_name: String,
    state: ActionState,
    transitions: Vec<ActionState>,
}

impl Invocation {
    fn new(action_name: &str) -> Self {
        Self {
            action_name: action_name.to_owned(),
            state: ActionState::Received,
            transitions: vec![ActionState::Received],
        }
    }

    fn advance(&mut self, next: ActionState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal action transition {} -> {}",
            self.state,
            next
        );
        self.state = next;
        self.transitions.push(next);
    }

    fn reject(mut self, status: ActionStatus, error: ActionError) -> ActionResult {
        self.advance(ActionState::Rejected);
        ActionResult {
            action_name: self.action_name,
            status,
            state: self.state,
            transitions: self.transitions,
            effect: None,
            error: Some(error),
        }
    }

    fn finish(self, effect: Option<ActionEffect>) -> ActionResult {
        debug_assert!(self.state.is_terminal(), "finished in state {}", self.state);
        ActionResult {
            action_name: self.action_name,
            status: ActionStatus::Ok,
            state: self.state,
            transitions: self.transitions,
            effect,
            error: None,
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        format!("handler panicked: {msg}")
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        format!("handler panicked: {msg}")
    } else {
        "handler panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn theme_payload() -> serde_json::Value {
        serde_json::json!({
            "colorScheme": "dark",
            "radius": "round",
            "density": "normal",
            "typography": {"baseSize": 16, "fontFamily": "Inter"},
            "color": {"accent": {"primary": "#1769C8", "level": 2}}
        })
    }

    #[test]
    fn apply_theme_reaches_applied_with_effect() {
        let bridge = ActionBridge::with_builtin_handlers();
        let result = bridge.dispatch(&ActionRequest::new("apply_theme", theme_payload()));

        assert_eq!(result.status, ActionStatus::Ok);
        assert_eq!(result.state, ActionState::Applied);
        assert_eq!(
            result.transitions,
            vec![
                ActionState::Received,
                ActionState::Validated,
                ActionState::Applied
            ]
        );
        let effect = result.effect.expect("effect");
        assert_eq!(effect.name, "update_ui_theme");
        assert_eq!(effect.data, theme_payload());
        assert!(result.error.is_none());
    }

    #[test]
    fn legacy_theme_action_name_is_known() {
        let bridge = ActionBridge::with_builtin_handlers();
        let result = bridge.dispatch(&ActionRequest::new("apply_theme_effect", theme_payload()));
        assert!(result.is_applied());
    }

    #[test]
    fn unknown_action_rejected_without_running_any_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let bridge = ActionBridge::builder()
            .register("apply_theme", move |_: &serde_json::Value| -> Result<ActionEffect, String> {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(ActionEffect::new("update_ui_theme", serde_json::json!({})))
            })
            .build();

        let result = bridge.dispatch(&ActionRequest::new("nonexistent", serde_json::json!({})));

        assert_eq!(result.status, ActionStatus::Rejected);
        assert_eq!(result.state, ActionState::Rejected);
        assert_eq!(
            result.transitions,
            vec![ActionState::Received, ActionState::Rejected]
        );
        assert!(!result.transitions.contains(&ActionState::Applied));
        assert_eq!(
            result.error,
            Some(ActionError::UnknownAction("nonexistent".to_string()))
        );
        assert!(result.effect.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn handler_error_is_execution_error() {
        let bridge = ActionBridge::builder()
            .register("explode", |_: &serde_json::Value| -> Result<ActionEffect, String> {
                Err("boom".to_string())
            })
            .build();

        let result = bridge.dispatch(&ActionRequest::new("explode", serde_json::json!({})));

        assert_eq!(result.status, ActionStatus::Error);
        assert_eq!(
            result.transitions,
            vec![
                ActionState::Received,
                ActionState::Validated,
                ActionState::Rejected
            ]
        );
        assert_eq!(
            result.error,
            Some(ActionError::Execution {
                action: "explode".to_string(),
                reason: "boom".to_string(),
            })
        );
    }

    #[test]
    fn handler_panic_is_contained() {
        let bridge = ActionBridge::builder()
            .register("panics", |_: &serde_json::Value| -> Result<ActionEffect, String> {
                panic!("bad payload")
            })
            .build();

        let result = bridge.dispatch(&ActionRequest::new("panics", serde_json::json!({})));

        assert_eq!(result.status, ActionStatus::Error);
        assert_eq!(result.state, ActionState::Rejected);
        match result.error {
            Some(ActionError::Execution { reason, .. }) => assert!(reason.contains("bad payload")),
            other => panic!("expected execution error, got {other:?}"),
        }
    }

    #[test]
    fn failed_action_is_not_retried() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let bridge = ActionBridge::builder()
            .register("flaky", move |_: &serde_json::Value| -> Result<ActionEffect, String> {
                counter.fetch_add(1, Ordering::SeqCst);
                Err("unavailable".to_string())
            })
            .build();

        let _ = bridge.dispatch(&ActionRequest::new("flaky", serde_json::json!({})));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn known_actions_sorted() {
        let bridge = ActionBridge::with_builtin_handlers();
        assert_eq!(
            bridge.known_actions(),
            vec![
                "apply_theme",
                "apply_theme_effect",
                "download_report",
                "submit_feedback"
            ]
        );
        assert!(bridge.is_known("submit_feedback"));
        assert!(!bridge.is_known("delete_everything"));
    }
}
