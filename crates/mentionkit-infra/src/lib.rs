//! Infrastructure layer for mentionkit.
//!
//! Contains implementations of the storage traits defined in `mentionkit-core`:
//! SQLite thread storage, the local upload directory, configuration loading
//! and the entity seed loader.

pub mod config;
pub mod filesystem;
pub mod seed;
pub mod sqlite;
