//! Caller identity from the `x-user-id` header.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use mentionkit_types::thread::ANONYMOUS_USER;

/// Header carrying the caller's user id.
pub const USER_HEADER: &str = "x-user-id";

/// The user a request acts for. Missing or blank headers map to the
/// anonymous user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserId(pub String);

impl<S: Send + Sync> FromRequestParts<S> for UserId {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .headers
            .get(USER_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(ANONYMOUS_USER);
        Ok(UserId(user.to_string()))
    }
}
