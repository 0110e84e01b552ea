// ── Runtime connection configuration ──
//
// These types describe how to reach a Catalyst Center controller and how a
// reconcile run behaves. They carry credential data and tuning knobs but
// never touch disk; the CLI builds them from its profile config.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;
use wiredctl_api::{PollConfig, TlsMode, TransportConfig};

/// Username/password pair exchanged for an auth token.
#[derive(Debug, Clone)]
pub struct AuthCredentials {
    pub username: String,
    pub password: SecretString,
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (lab controllers with self-signed certs).
    DangerAcceptInvalid,
}

impl TlsVerification {
    pub(crate) fn to_tls_mode(&self) -> TlsMode {
        match self {
            Self::SystemDefaults => TlsMode::System,
            Self::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            Self::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        }
    }
}

/// Configuration for connecting to a single controller.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Controller URL (e.g., `https://dnac.example.net`).
    pub url: Url,
    pub auth: AuthCredentials,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ControllerConfig {
    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: self.tls.to_tls_mode(),
            timeout: self.timeout,
        }
    }
}

/// Knobs that change how a reconcile run behaves.
#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    /// Re-read deployed state after a deploy and report differences.
    pub config_verify: bool,
    /// Refuse devices whose collection status is not Managed / In Progress.
    pub device_collection_status_check: bool,
    /// Pause before the verification read.
    pub config_verification_wait_time: Duration,
    /// Page size for feature reads; `None` reads in one request.
    pub offset_limit: Option<u32>,
    /// Known controller version; fetched from the controller when unset.
    pub controller_version: Option<String>,
    pub poll: PollConfig,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            config_verify: false,
            device_collection_status_check: true,
            config_verification_wait_time: Duration::from_secs(10),
            offset_limit: None,
            controller_version: None,
            poll: PollConfig::default(),
        }
    }
}

/// How the target device is identified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceTarget {
    ManagementIp(String),
    Hostname(String),
}

impl std::fmt::Display for DeviceTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ManagementIp(ip) => write!(f, "{ip}"),
            Self::Hostname(name) => write!(f, "{name}"),
        }
    }
}
