//! Entity lookup for mention resolution.

pub mod registry;
