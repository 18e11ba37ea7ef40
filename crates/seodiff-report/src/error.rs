use thiserror::Error;

/// Errors returned by the report sinks.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote service answered with a non-2xx status.
    #[error("{service} returned HTTP {status}: {body}")]
    UnexpectedStatus {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// The remote service answered 2xx but reported a failure in its payload.
    #[error("{service} API error: {message}")]
    Api {
        service: &'static str,
        message: String,
    },

    /// A service-account key could not be loaded or exchanged for a token.
    #[error("Google auth error: {0}")]
    Auth(#[from] gcp_auth::Error),

    /// A reporter was requested but its credentials are not configured.
    #[error("missing configuration: {0}")]
    MissingConfig(&'static str),

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Longest slice of a remote error body kept in [`ReportError::UnexpectedStatus`].
pub(crate) const ERROR_BODY_LIMIT: usize = 300;

/// Cuts `body` to [`ERROR_BODY_LIMIT`] characters.
pub(crate) fn truncate_body(body: &str) -> String {
    truncate_chars(body, ERROR_BODY_LIMIT)
}

/// Cuts `text` to `limit` characters on a char boundary, marking the cut with `...`.
pub(crate) fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_owned(),
    }
}
