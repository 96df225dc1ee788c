//! Context injection and action handling for mentionkit.
//!
//! This crate holds the pipeline (`mention`), the entity registry (`entity`),
//! the action bridge (`action`), and the storage "ports" (traits) that the
//! infrastructure layer implements. It depends only on `mentionkit-types` --
//! never on `mentionkit-infra` or any database/IO crate.

pub mod action;
pub mod attachment;
pub mod chat;
pub mod entity;
pub mod mention;
pub mod storage;
