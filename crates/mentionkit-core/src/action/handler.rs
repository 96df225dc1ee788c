//! Action handler trait.

use mentionkit_types::action::ActionEffect;

/// Effect-producing function behind a custom action.
///
/// Handlers receive only the request payload and return the instruction for
/// the UI. Applying it (and any other side effect) is the caller's job, so a
/// handler must not keep state between calls.
pub trait ActionHandler: Send + Sync {
    /// Build the effect for `payload`, or explain why it cannot be applied.
    fn apply(&self, payload: &serde_json::Value) -> Result<ActionEffect, String>;
}

impl<F> ActionHandler for F
where
    F: Fn(&serde_json::Value) -> Result<ActionEffect, String> + Send + Sync,
{
    fn apply(&self, payload: &serde_json::Value) -> Result<ActionEffect, String> {
        self(payload)
    }
}
