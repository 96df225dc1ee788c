//! UI custom action handling.
//!
//! The `ActionBridge` maps an action name to an [`ActionHandler`](handler::ActionHandler)
//! and records the state machine each invocation walks.

pub mod bridge;
pub mod builtin;
pub mod handler;
