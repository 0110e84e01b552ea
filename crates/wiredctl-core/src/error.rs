// ── Core error types ──
//
// User-facing errors from wiredctl-core. Validation and mapping failures
// carry enough context to point at the offending document field; controller
// failures are translated from `wiredctl_api::Error` so consumers never
// match on HTTP details directly.

use std::fmt;

use thiserror::Error;

/// One feature whose intent write did not complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentFailure {
    /// Human-readable feature name.
    pub feature: String,
    /// `create` or `update`.
    pub operation: String,
    pub reason: String,
}

impl fmt::Display for IntentFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.feature, self.operation, self.reason)
    }
}

fn join_failures(failures: &[IntentFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Document errors ──────────────────────────────────────────────
    #[error("Invalid value for '{field}' in '{block}': {value} (expected {kind}): {reason}")]
    Validation {
        block: String,
        field: String,
        value: String,
        kind: String,
        reason: String,
    },

    #[error("Cannot map '{feature}' to the controller schema: {detail}")]
    Mapping { feature: String, detail: String },

    // ── Device errors ────────────────────────────────────────────────
    #[error("Device not found: {identifier}")]
    DeviceNotFound { identifier: String },

    #[error("Device {identifier} is not reachable (status: {status})")]
    DeviceUnreachable { identifier: String, status: String },

    #[error("Device {identifier} is not managed by the controller (collection status: {status})")]
    DeviceNotManaged { identifier: String, status: String },

    // ── Controller errors ────────────────────────────────────────────
    #[error("Controller version {found} is not supported (minimum {minimum})")]
    UnsupportedVersion { found: String, minimum: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Cannot connect to controller at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Controller request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Failed to read {stage} state for '{feature}': {reason}")]
    ReadFailed {
        feature: String,
        stage: String,
        reason: String,
    },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Intent operations failed: {}", join_failures(.failures))]
    IntentFailed {
        failures: Vec<IntentFailure>,
        /// Intent operations that completed before the failure.
        succeeded: usize,
    },

    #[error("Deployment failed after {succeeded} intent operation(s): {reason}")]
    DeployFailed { succeeded: usize, reason: String },

    #[error("Task {task_id} did not finish within {waited_secs}s")]
    TaskTimeout { task_id: String, waited_secs: u64 },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        code: Option<String>,
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a field-level validation error.
    pub fn validation(
        block: impl Into<String>,
        field: impl Into<String>,
        value: impl fmt::Display,
        kind: impl fmt::Display,
        reason: impl Into<String>,
    ) -> Self {
        Self::Validation {
            block: block.into(),
            field: field.into(),
            value: value.to_string(),
            kind: kind.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether the error was raised before any controller write.
    pub fn is_pre_write(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::Mapping { .. }
                | Self::DeviceNotFound { .. }
                | Self::DeviceUnreachable { .. }
                | Self::DeviceNotManaged { .. }
                | Self::UnsupportedVersion { .. }
                | Self::Config { .. }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<wiredctl_api::Error> for CoreError {
    fn from(err: wiredctl_api::Error) -> Self {
        match err {
            wiredctl_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            wiredctl_api::Error::TokenExpired => CoreError::AuthenticationFailed {
                message: "Auth token expired -- re-authentication required".into(),
            },
            wiredctl_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(|u| u.to_string())
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            wiredctl_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            wiredctl_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            wiredctl_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            wiredctl_api::Error::Api {
                message,
                code,
                status,
            } => CoreError::Api {
                message,
                code,
                status: Some(status),
            },
            wiredctl_api::Error::MissingTaskId => CoreError::Api {
                message: "controller accepted the request but returned no task id".into(),
                code: None,
                status: None,
            },
            wiredctl_api::Error::TaskTimeout {
                task_id,
                waited_secs,
            } => CoreError::TaskTimeout {
                task_id,
                waited_secs,
            },
            wiredctl_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_failures_are_enumerated_in_order() {
        let err = CoreError::IntentFailed {
            failures: vec![
                IntentFailure {
                    feature: "VLANs".into(),
                    operation: "create".into(),
                    reason: "VLAN 100 conflicts".into(),
                },
                IntentFailure {
                    feature: "CDP".into(),
                    operation: "update".into(),
                    reason: "timeout".into(),
                },
            ],
            succeeded: 0,
        };
        assert_eq!(
            err.to_string(),
            "Intent operations failed: VLANs (create): VLAN 100 conflicts; CDP (update): timeout"
        );
    }

    #[test]
    fn validation_message_names_block_and_field() {
        let err = CoreError::validation("vlans", "vlan_id", 5000, "integer", "must be 1-4094");
        let msg = err.to_string();
        assert!(msg.contains("'vlan_id'"));
        assert!(msg.contains("'vlans'"));
        assert!(msg.contains("5000"));
        assert!(err.is_pre_write());
    }

    #[test]
    fn api_404_maps_to_api_variant() {
        let err: CoreError = wiredctl_api::Error::Api {
            message: "gone".into(),
            code: Some("NCND00001".into()),
            status: 404,
        }
        .into();
        assert!(matches!(err, CoreError::Api { status: Some(404), .. }));
    }
}
