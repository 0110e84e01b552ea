//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use wiredctl_core::{
    DeviceDocument, DeviceTarget, Layer2Document, ReconcileOptions, Reconciler, StateTag,
};

use crate::cli::GlobalOpts;
use crate::config;
use crate::error::CliError;

/// A parsed and validated desired-state document.
#[derive(Debug)]
pub struct LoadedDocument {
    pub target: DeviceTarget,
    pub layer2: Layer2Document,
    /// Per-document override of the collection-status check.
    pub collection_check: Option<bool>,
}

/// Parse a YAML or JSON document without validating it.
pub fn read_document(path: &Path) -> Result<DeviceDocument, CliError> {
    let document_err = |reason: String| CliError::Document {
        path: path.display().to_string(),
        reason,
    };
    let contents = std::fs::read_to_string(path).map_err(|e| document_err(e.to_string()))?;
    // JSON is a YAML subset, so one parser covers both.
    serde_yaml::from_str(&contents).map_err(|e| document_err(e.to_string()))
}

/// Device selector from a document; the management IP wins over hostname.
pub fn device_target(doc: &DeviceDocument) -> Result<DeviceTarget, CliError> {
    fn pick(v: &Option<String>) -> Option<&str> {
        v.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
    if let Some(ip) = pick(&doc.ip_address) {
        return Ok(DeviceTarget::ManagementIp(ip.to_owned()));
    }
    if let Some(name) = pick(&doc.hostname) {
        return Ok(DeviceTarget::Hostname(name.to_owned()));
    }
    Err(CliError::Validation {
        field: "ip_address".into(),
        reason: "either ip_address or hostname must be provided".into(),
    })
}

/// Read, parse and validate a document for the given state.
pub fn load_document(path: &Path, state: StateTag) -> Result<LoadedDocument, CliError> {
    let doc = read_document(path)?;
    let target = device_target(&doc)?;
    let layer2 = wiredctl_core::validate(&doc.layer2_configuration, state)?;
    tracing::debug!(path = %path.display(), features = layer2.len(), "document validated");
    Ok(LoadedDocument {
        target,
        layer2,
        collection_check: doc.device_collection_status_check,
    })
}

/// Resolve profile + flags and authenticate.
///
/// `adjust` receives the profile's options for per-command overrides.
pub async fn connect(
    global: &GlobalOpts,
    adjust: impl FnOnce(&mut ReconcileOptions),
) -> Result<Reconciler, CliError> {
    let (controller, mut options) = config::resolve(global)?;
    adjust(&mut options);
    let spinner = spinner(global, "Connecting to controller");
    let result = Reconciler::connect(&controller, options).await;
    spinner.finish_and_clear();
    Ok(result?)
}

/// Spinner on stderr; hidden when quiet or not attached to a terminal.
pub fn spinner(global: &GlobalOpts, message: &str) -> ProgressBar {
    if global.quiet || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} ({elapsed})") {
        pb.set_style(style);
    }
    pb.set_message(message.to_owned());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal there is nobody to ask, so `--yes` is required.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))
}
