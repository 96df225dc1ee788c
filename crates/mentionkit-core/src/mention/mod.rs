//! Tag-triggered context injection.
//!
//! `scanner` finds `@mentions`, `resolver` looks them up in the entity
//! registry, `composer` wraps the results into delimited blocks, and
//! `pipeline` runs the three in one call.

pub mod composer;
pub mod pipeline;
pub mod resolver;
pub mod scanner;
