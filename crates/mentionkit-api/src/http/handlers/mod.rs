//! REST API endpoint handlers.

pub mod action;
pub mod compose;
pub mod entity;
pub mod thread;
