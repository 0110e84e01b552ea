//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text and a stable exit code.

use miette::Diagnostic;
use thiserror::Error;

use wiredctl_config::ConfigError;
use wiredctl_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const UNSUPPORTED: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const TASK_FAILED: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to controller at {url}: {reason}")]
    #[diagnostic(
        code(wiredctl::connection_failed),
        help(
            "Check that the controller is running and accessible.\n\
             For self-signed certificates use --insecure (-k) or set ca_cert in your profile."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(wiredctl::auth_failed),
        help(
            "Verify the username and password for this profile.\n\
             Run: wiredctl config set-password --profile {profile}"
        )
    )]
    AuthFailed { profile: String, message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(wiredctl::no_credentials),
        help(
            "Configure credentials with: wiredctl config init\n\
             Or set WIREDCTL_USERNAME and WIREDCTL_PASSWORD."
        )
    )]
    NoCredentials { profile: String },

    // ── Device ───────────────────────────────────────────────────────
    #[error("Device '{identifier}' not found on the controller")]
    #[diagnostic(
        code(wiredctl::device_not_found),
        help("Check ip_address / hostname in the document against the controller inventory.")
    )]
    DeviceNotFound { identifier: String },

    #[error("Device '{identifier}' cannot be configured: {reason}")]
    #[diagnostic(
        code(wiredctl::device_not_ready),
        help("Wait for the controller to finish collecting the device, or pass --skip-collection-check.")
    )]
    DeviceNotReady { identifier: String, reason: String },

    #[error("Controller version {found} is not supported")]
    #[diagnostic(
        code(wiredctl::unsupported_version),
        help("Wired Layer-2 intent needs Catalyst Center {minimum} or later.")
    )]
    UnsupportedVersion { found: String, minimum: String },

    // ── Operations ───────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(wiredctl::intent_failed),
        help(
            "{succeeded} intent operation(s) completed before the failure; nothing was deployed.\n\
             Fix the failing feature and re-run apply."
        )
    )]
    IntentFailed { message: String, succeeded: usize },

    #[error("Deployment failed after {succeeded} intent operation(s): {reason}")]
    #[diagnostic(
        code(wiredctl::deploy_failed),
        help("The intent is stored on the controller; re-running apply retries the deploy.")
    )]
    DeployFailed { succeeded: usize, reason: String },

    #[error("Task {task_id} did not finish within {seconds}s")]
    #[diagnostic(
        code(wiredctl::task_timeout),
        help("Check the task in the controller UI; raise task_timeout in your profile if needed.")
    )]
    TaskTimeout { task_id: String, seconds: u64 },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(wiredctl::timeout),
        help("Increase timeout with --timeout or check controller responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error ({code}): {message}")]
    #[diagnostic(code(wiredctl::api_error))]
    ApiError { code: String, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(wiredctl::validation))]
    Validation { field: String, reason: String },

    #[error("Cannot read document {path}: {reason}")]
    #[diagnostic(
        code(wiredctl::document),
        help("Documents are YAML or JSON with ip_address or hostname and a layer2_configuration mapping.")
    )]
    Document { path: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(wiredctl::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: wiredctl config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(wiredctl::no_config),
        help(
            "Create one with: wiredctl config init\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(wiredctl::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(wiredctl::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::DeviceNotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::DeviceNotReady { .. } | Self::UnsupportedVersion { .. } => {
                exit_code::UNSUPPORTED
            }
            Self::IntentFailed { .. } | Self::DeployFailed { .. } => exit_code::TASK_FAILED,
            Self::TaskTimeout { .. } | Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. }
            | Self::Document { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::UnknownProfile(name) => CliError::ProfileNotFound {
                name,
                available: String::new(),
            },
            other => CliError::Config(other),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation {
                block,
                field,
                value,
                kind,
                reason,
            } => CliError::Validation {
                field: format!("{block}.{field}"),
                reason: format!("{value} (expected {kind}): {reason}"),
            },

            CoreError::Mapping { feature, detail } => {
                CliError::Internal(format!("cannot map '{feature}': {detail}"))
            }

            CoreError::DeviceNotFound { identifier } => CliError::DeviceNotFound { identifier },

            CoreError::DeviceUnreachable { identifier, status } => CliError::DeviceNotReady {
                identifier,
                reason: format!("reachability status is '{status}'"),
            },

            CoreError::DeviceNotManaged { identifier, status } => CliError::DeviceNotReady {
                identifier,
                reason: format!("collection status is '{status}'"),
            },

            CoreError::UnsupportedVersion { found, minimum } => {
                CliError::UnsupportedVersion { found, minimum }
            }

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed {
                profile: "current".into(),
                message,
            },

            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::ReadFailed { .. } => CliError::ApiError {
                code: "read_failed".into(),
                message: err.to_string(),
            },

            CoreError::IntentFailed { succeeded, .. } => CliError::IntentFailed {
                message: err.to_string(),
                succeeded,
            },

            CoreError::DeployFailed { succeeded, reason } => {
                CliError::DeployFailed { succeeded, reason }
            }

            CoreError::TaskTimeout {
                task_id,
                waited_secs,
            } => CliError::TaskTimeout {
                task_id,
                seconds: waited_secs,
            },

            CoreError::Api {
                message,
                code,
                status,
            } => CliError::ApiError {
                code: code
                    .or_else(|| status.map(|s| s.to_string()))
                    .unwrap_or_else(|| "unknown".into()),
                message,
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use wiredctl_core::IntentFailure;

    use super::*;

    #[test]
    fn intent_failure_exits_with_task_code() {
        let err: CliError = CoreError::IntentFailed {
            failures: vec![IntentFailure {
                feature: "CDP".into(),
                operation: "update".into(),
                reason: "invalid timer".into(),
            }],
            succeeded: 1,
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::TASK_FAILED);
        assert!(err.to_string().contains("CDP (update): invalid timer"));
    }

    #[test]
    fn validation_names_block_and_field() {
        let err: CliError =
            CoreError::validation("vlans", "vlan_id", 5000, "integer", "must be 1-4094").into();
        assert_eq!(err.exit_code(), exit_code::USAGE);
        assert!(matches!(err, CliError::Validation { ref field, .. } if field == "vlans.vlan_id"));
    }

    #[test]
    fn device_states_map_to_unsupported() {
        let err: CliError = CoreError::DeviceUnreachable {
            identifier: "10.0.0.1".into(),
            status: "Unreachable".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::UNSUPPORTED);
        let err: CliError = CoreError::DeviceNotFound {
            identifier: "10.0.0.1".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
    }
}
