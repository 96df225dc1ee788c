//! Shared domain types for mentionkit.
//!
//! This crate contains the types passed between the mention pipeline, the
//! action bridge and the storage layer: entity records, mentions, composed
//! messages, action requests/results, threads, and their error types.
//!
//! Zero infrastructure dependencies -- only serde, indexmap, chrono, thiserror.

pub mod action;
pub mod attachment;
pub mod config;
pub mod entity;
pub mod error;
pub mod mention;
pub mod thread;
