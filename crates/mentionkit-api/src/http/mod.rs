//! HTTP/REST API layer for mentionkit.
//!
//! Axum-based REST API at `/api/v1/` with an envelope response format and
//! CORS support. The caller's user id comes from the `x-user-id` header.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod router;
