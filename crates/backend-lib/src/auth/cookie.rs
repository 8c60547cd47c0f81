//! Session cookie formatting and parsing.
use axum::http::{header, HeaderMap};

/// Build the `Set-Cookie` value carrying a new session token.
pub fn session_cookie_header(name: &str, token: &str, max_age_secs: u64, secure: bool) -> String {
    let secure_flag = if secure { "; Secure" } else { "" };
    format!("{name}={token}; HttpOnly; Path=/{secure_flag}; SameSite=Strict; Max-Age={max_age_secs}")
}

/// Build the `Set-Cookie` value that removes the session cookie.
pub fn clear_cookie_header(name: &str, secure: bool) -> String {
    session_cookie_header(name, "", 0, secure)
}

/// Find the value of cookie `name` in a `Cookie` header value.
pub fn cookie_value<'a>(cookie_header: &'a str, name: &str) -> Option<&'a str> {
    cookie_header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key.trim() == name).then(|| value.trim())
    })
}

/// Extract cookie `name` from the request headers, if present and non-empty.
///
/// Browsers may send several `Cookie` headers over HTTP/2; all are searched.
/// An empty duplicate (a stale cleared cookie) does not hide a later value.
pub fn session_token_from_headers<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| key.trim() == name && !value.trim().is_empty())
        .map(|(_, value)| value.trim())
}
