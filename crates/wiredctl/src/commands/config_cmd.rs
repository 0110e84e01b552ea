//! Config subcommand handlers.

use std::fmt::Write as _;

use dialoguer::{Confirm, Input, Select};
use secrecy::SecretString;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking sensitive fields.
fn format_config_redacted(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "controller = \"{}\"", p.controller);
        if let Some(ref u) = p.username {
            let _ = writeln!(out, "username = \"{u}\"");
        }
        if p.password.is_some() {
            let _ = writeln!(out, "password = \"****\"");
        }
        if let Some(ref env) = p.password_env {
            let _ = writeln!(out, "password_env = \"{env}\"");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
        if let Some(ref version) = p.version {
            let _ = writeln!(out, "version = \"{version}\"");
        }
        if let Some(verify) = p.config_verify {
            let _ = writeln!(out, "config_verify = {verify}");
        }
        if let Some(check) = p.device_collection_status_check {
            let _ = writeln!(out, "device_collection_status_check = {check}");
        }
        if let Some(wait) = p.config_verification_wait_time {
            let _ = writeln!(out, "config_verification_wait_time = {wait}");
        }
        if let Some(limit) = p.offset_limit {
            let _ = writeln!(out, "offset_limit = {limit}");
        }
        if let Some(interval) = p.task_poll_interval {
            let _ = writeln!(out, "task_poll_interval = {interval}");
        }
        if let Some(timeout) = p.task_timeout {
            let _ = writeln!(out, "task_timeout = {timeout}");
        }
    }

    out
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn prompt_password() -> Result<String, CliError> {
    let pass = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
    if pass.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "password cannot be empty".into(),
        });
    }
    Ok(pass)
}

/// Offer to store the password in the system keyring.
///
/// Returns `Some(password)` if the user chose plaintext, `None` if stored
/// in the keyring.
fn prompt_password_storage(profile_name: &str, password: String) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt("Where to store the password?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        wiredctl_config::store_password(profile_name, &SecretString::from(password))?;
        eprintln!("   ✓ password stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(password))
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(),

        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = match global.output {
                OutputFormat::Table | OutputFormat::Plain => {
                    format_config_redacted(&cfg)
                }
                format => {
                    let mut redacted = cfg;
                    for profile in redacted.profiles.values_mut() {
                        if profile.password.is_some() {
                            profile.password = Some("****".into());
                        }
                    }
                    output::render_single(format, &redacted, |_| String::new(), |_| String::new())
                }
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::SetPassword => {
            let cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            if !cfg.profiles.contains_key(&profile_name) {
                return Err(CliError::ProfileNotFound {
                    name: profile_name,
                    available: profile_names(&cfg).join(", "),
                });
            }
            let password = prompt_password()?;
            wiredctl_config::store_password(&profile_name, &SecretString::from(password))?;
            eprintln!("✓ password for '{profile_name}' stored in system keyring");
            Ok(())
        }

        ConfigCommand::Use { ref name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(name) {
                return Err(CliError::ProfileNotFound {
                    name: name.clone(),
                    available: profile_names(&cfg).join(", "),
                });
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            eprintln!("✓ default profile set to '{name}'");
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            let lines: Vec<String> = profile_names(&cfg)
                .into_iter()
                .map(|name| {
                    if name == default {
                        format!("{name} (default)")
                    } else {
                        name
                    }
                })
                .collect();
            output::print_output(&lines.join("\n"), global.quiet);
            Ok(())
        }
    }
}

fn profile_names(cfg: &Config) -> Vec<String> {
    let mut names: Vec<String> = cfg.profiles.keys().cloned().collect();
    names.sort();
    names
}

fn init() -> Result<(), CliError> {
    let config_path = config::config_path();
    eprintln!("wiredctl configuration wizard");
    eprintln!("   Config path: {}\n", config_path.display());

    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()
        .map_err(prompt_err)?;

    let controller: String = Input::new()
        .with_prompt("Controller URL")
        .default("https://dnac.example.net".into())
        .interact_text()
        .map_err(prompt_err)?;
    if controller.parse::<url::Url>().is_err() {
        return Err(CliError::Validation {
            field: "controller".into(),
            reason: format!("invalid URL: {controller}"),
        });
    }

    let username: String = Input::new()
        .with_prompt("Username")
        .interact_text()
        .map_err(prompt_err)?;
    let password = prompt_password_storage(&profile_name, prompt_password()?)?;

    let insecure = Confirm::new()
        .with_prompt("Accept self-signed TLS certificates?")
        .default(false)
        .interact()
        .map_err(prompt_err)?;

    let config_verify = Confirm::new()
        .with_prompt("Verify deployed state after every apply?")
        .default(false)
        .interact()
        .map_err(prompt_err)?;

    let mut cfg = config::load_config_or_default();
    cfg.profiles.insert(
        profile_name.clone(),
        Profile {
            controller,
            username: Some(username),
            password,
            insecure: insecure.then_some(true),
            config_verify: config_verify.then_some(true),
            ..Profile::default()
        },
    );
    if cfg.profiles.len() == 1 {
        cfg.default_profile = Some(profile_name.clone());
    }
    config::save_config(&cfg)?;

    eprintln!("\n✓ profile '{profile_name}' saved to {}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacted_config_masks_password() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "lab".into(),
            Profile {
                controller: "https://dnac.lab".into(),
                username: Some("admin".into()),
                password: Some("hunter2".into()),
                offset_limit: Some(500),
                ..Profile::default()
            },
        );
        let text = format_config_redacted(&cfg);
        assert!(text.contains("[profiles.lab]"));
        assert!(text.contains("password = \"****\""));
        assert!(text.contains("offset_limit = 500"));
        assert!(!text.contains("hunter2"));
    }
}
