//! CLI configuration -- thin wrapper around `wiredctl_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--controller, --username, --insecure, --timeout).

use std::time::Duration;

use wiredctl_core::{AuthCredentials, ControllerConfig, ReconcileOptions, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use wiredctl_config::{
    Config, Defaults, Profile, config_path, load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Controller connection plus run options for the active profile.
///
/// Without a profile the connection is built from flags and the
/// `WIREDCTL_*` environment alone.
pub fn resolve(global: &GlobalOpts) -> Result<(ControllerConfig, ReconcileOptions), CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    if let Some(profile) = cfg.profiles.get(&profile_name) {
        let controller = resolve_profile(profile, &profile_name, &cfg.defaults, global)?;
        return Ok((controller, wiredctl_config::profile_to_options(profile)));
    }
    if global.profile.is_some() {
        let mut names: Vec<_> = cfg.profiles.keys().cloned().collect();
        names.sort();
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: names.join(", "),
        });
    }

    let adhoc = Profile {
        controller: global
            .controller
            .clone()
            .ok_or_else(|| CliError::NoConfig {
                path: config_path().display().to_string(),
            })?,
        ..Profile::default()
    };
    let controller = resolve_profile(&adhoc, &profile_name, &cfg.defaults, global)?;
    Ok((controller, ReconcileOptions::default()))
}

/// Translate a `Profile` + global flags into a `ControllerConfig`.
///
/// CLI flag overrides take priority over profile values.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    global: &GlobalOpts,
) -> Result<ControllerConfig, CliError> {
    // 1. Controller URL (flag > env > profile)
    let url_str = global.controller.as_deref().unwrap_or(&profile.controller);
    let url: url::Url = url_str.parse().map_err(|_| CliError::Validation {
        field: "controller".into(),
        reason: format!("invalid URL: {url_str}"),
    })?;

    // 2. Credentials (flag > profile chain)
    let username = match global.username {
        Some(ref user) => user.clone(),
        None => wiredctl_config::resolve_username(profile, profile_name)?,
    };
    let password = wiredctl_config::resolve_password(profile, profile_name)?;

    // 3. TLS verification
    let tls = if global.insecure {
        TlsVerification::DangerAcceptInvalid
    } else {
        wiredctl_config::profile_tls(profile, defaults)
    };

    // 4. Timeout (flag > profile > defaults)
    let timeout = Duration::from_secs(
        global
            .timeout
            .or(profile.timeout)
            .unwrap_or(defaults.timeout),
    );

    Ok(ControllerConfig {
        url,
        auth: AuthCredentials { username, password },
        tls,
        timeout,
    })
}
