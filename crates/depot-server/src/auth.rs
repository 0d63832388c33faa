//! Bearer-token extraction.
//!
//! The HTTP layer only extracts the token; the authorization decision
//! itself lives in `depot_store::AccessGate`. A missing or malformed
//! header is passed through as "no token", which the service denies.

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;

/// Extract the bearer token from the Authorization header, if any.
/// Per RFC 6750, the "Bearer" scheme is case-insensitive.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| {
            if v.len() >= 7 && v[..7].eq_ignore_ascii_case("bearer ") {
                Some(&v[7..])
            } else {
                None
            }
        })
        .filter(|t| !t.is_empty())
}
