//! Per-thread chat orchestration.

pub mod service;
