/// Message returned when the panel flags the request as unauthorized.
pub const INVALID_CREDENTIALS: &str = "Invalid username or password";
/// Message returned for an HTML body that matches no known error rule.
pub const UNEXPECTED_HTML: &str = "Got unexpected HTML response from server";
/// Message returned when `error` is non-zero and neither `details` nor `text` is set.
pub const UNKNOWN_ERROR: &str = "Unknown error detected";

/// Generic error for everything that can go wrong talking to the panel.
///
/// The panel has no structured error codes, so neither does this type:
/// callers get the human-readable message and nothing else.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Wrap a failure below the API layer (connect, TLS, non-2xx, body read).
    pub fn http(reason: impl std::fmt::Display) -> Self {
        Self::new(format!("HTTP Error: {}", reason))
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Innermost cause of an error chain, e.g. the `io::Error` behind a failed connect.
fn root_cause<'a>(err: &'a (dyn std::error::Error + 'static)) -> &'a (dyn std::error::Error + 'static) {
    let mut cause = err;
    while let Some(next) = cause.source() {
        cause = next;
    }
    cause
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL may carry credentials in its query string.
        let err = err.without_url();
        Self::http(root_cause(&err))
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
