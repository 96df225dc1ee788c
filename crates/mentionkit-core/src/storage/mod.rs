//! Storage abstractions for mentionkit.
//!
//! Defines traits for thread persistence and uploaded attachment bytes.
//! Implementations live in mentionkit-infra.

pub mod thread_store;
pub mod upload_store;
