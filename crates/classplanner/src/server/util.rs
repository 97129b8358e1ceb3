use axum::http::header::COOKIE;
use axum::http::HeaderMap;

use crate::search::SessionKey;

/// Header carrying an explicit session token
pub const SESSION_HEADER: &str = "x-session-id";

/// Derives the caller's session from `x-session-id`, falling back to the
/// `Cookie` header and then to the shared anonymous session.
pub fn session_key(headers: &HeaderMap) -> SessionKey {
    [SESSION_HEADER, COOKIE.as_str()]
        .into_iter()
        .filter_map(|name| headers.get(name))
        .filter_map(|value| value.to_str().ok())
        .map(str::trim)
        .find(|token| !token.is_empty())
        .map(SessionKey::from_token)
        .unwrap_or_else(SessionKey::anonymous)
}
