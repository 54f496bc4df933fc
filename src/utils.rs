//! String helpers shared by the client: base URL normalization and rendering
//! of response bodies inside error messages.

use reqwest::Url;

use crate::error::ApiError;

/// Normalizes a base URL so relative endpoint paths can be appended to it.
///
/// Whitespace is trimmed, `https://` is prepended when no `http://` or
/// `https://` scheme is present (case-insensitive) and a single trailing
/// slash is removed. An explicit `http://` is kept as is.
///
/// # Errors
///
/// Returns [`ApiError::Config`] if the input is empty or does not form an
/// absolute URL.
///
/// # Examples
///
/// ```
/// # use geoguess_client::normalize_base_url;
/// assert_eq!(normalize_base_url("example.com/").unwrap(), "https://example.com");
/// assert_eq!(normalize_base_url("http://example.com").unwrap(), "http://example.com");
/// ```
pub fn normalize_base_url(base_url: &str) -> Result<String, ApiError> {
    let trimmed = base_url.trim();
    if trimmed.is_empty() {
        return Err(ApiError::config("base URL is required"));
    }

    let lowercase = trimmed.to_ascii_lowercase();
    let mut normalized = if lowercase.starts_with("http://") || lowercase.starts_with("https://") {
        trimmed.to_owned()
    } else {
        format!("https://{}", trimmed)
    };

    if normalized.ends_with('/') {
        normalized.pop();
    }

    Url::parse(&normalized)
        .map_err(|e| ApiError::config(format!("invalid base URL {}: {}", trimmed, e)))?;

    Ok(normalized)
}

/// Renders a response body for an error message.
///
/// JSON bodies are re-serialized compactly, anything else is returned as is.
/// Blank bodies yield `None`.
pub fn render_body(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(value) => Some(value.to_string()),
        Err(_) => Some(trimmed.to_owned()),
    }
}
