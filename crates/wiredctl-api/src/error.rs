use thiserror::Error;

/// Top-level error type for the `wiredctl-api` crate.
///
/// Covers every failure mode of the controller surface: authentication,
/// transport, structured API errors, and asynchronous task tracking.
/// `wiredctl-core` maps these into domain diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Token request rejected (wrong credentials, locked account, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The token was accepted once but is no longer valid.
    #[error("Auth token expired -- re-authentication required")]
    TokenExpired,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API ─────────────────────────────────────────────────────────
    /// Structured error returned by the controller.
    #[error("Controller API error (HTTP {status}): {message}")]
    Api {
        message: String,
        code: Option<String>,
        status: u16,
    },

    // ── Tasks ───────────────────────────────────────────────────────
    /// The controller never returned a task id for an accepted write.
    #[error("Controller accepted the request but returned no task id")]
    MissingTaskId,

    /// A task did not reach a terminal state in time.
    #[error("Task {task_id} did not finish within {waited_secs}s")]
    TaskTimeout { task_id: String, waited_secs: u64 },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error indicates the auth token has expired
    /// and re-authentication might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Authentication { .. } | Self::TokenExpired)
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            Self::Api { status, .. } => matches!(status, 502..=504),
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status: 404, .. } => true,
            _ => false,
        }
    }

    /// The controller's SDK layer sometimes fails a read of an empty
    /// feature with a null-iteration message instead of a 404.
    pub fn is_null_iteration(&self) -> bool {
        match self {
            Self::Api { message, .. } => {
                message.contains("NoneType") || message.contains("not iterable")
            }
            _ => false,
        }
    }

    /// Extract the API error code, if available.
    pub fn api_error_code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16, message: &str) -> Error {
        Error::Api {
            message: message.into(),
            code: None,
            status,
        }
    }

    #[test]
    fn not_found_detection() {
        assert!(api(404, "Not Found").is_not_found());
        assert!(!api(500, "boom").is_not_found());
    }

    #[test]
    fn null_iteration_quirk_detection() {
        assert!(api(500, "'NoneType' object is not iterable").is_null_iteration());
        assert!(!api(500, "internal error").is_null_iteration());
        assert!(!Error::MissingTaskId.is_null_iteration());
    }

    #[test]
    fn gateway_errors_are_transient() {
        assert!(api(503, "unavailable").is_transient());
        assert!(!api(400, "bad request").is_transient());
        assert!(Error::Timeout { timeout_secs: 5 }.is_transient());
    }
}
