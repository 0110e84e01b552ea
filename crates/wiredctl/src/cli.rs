//! Clap derive structures for the `wiredctl` CLI.
//!
//! Defines the command tree, global flags and shared argument types. This
//! file is also compiled into `build.rs` for man pages, so it must only
//! depend on clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// wiredctl -- declarative Layer-2 configuration for Catalyst Center switches
#[derive(Debug, Parser)]
#[command(
    name = "wiredctl",
    version,
    about = "Reconcile switch Layer-2 configuration through Catalyst Center",
    long_about = "Converges a switch's VLAN, CDP, LLDP, STP, VTP, snooping, 802.1X,\n\
        port-channel and per-interface settings towards a desired-state document\n\
        using the controller's wired Layer-2 intent API.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Controller profile to use
    #[arg(long, short = 'p', env = "WIREDCTL_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Controller URL (overrides profile)
    #[arg(long, short = 'c', env = "WIREDCTL_CONTROLLER", global = true)]
    pub controller: Option<String>,

    /// Controller username (overrides profile)
    #[arg(long, short = 'u', env = "WIREDCTL_USERNAME", global = true, hide_env = true)]
    pub username: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "WIREDCTL_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "WIREDCTL_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "WIREDCTL_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one line per feature (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Merge a desired-state document into the device and deploy it
    Apply(ReconcileArgs),

    /// Remove the configuration listed in a document and deploy
    #[command(alias = "rm")]
    Delete(ReconcileArgs),

    /// Show what `apply` would change without writing anything
    Plan(PlanArgs),

    /// Check a document offline against the Layer-2 schema
    Validate(ValidateArgs),

    /// Read deployed and intended Layer-2 state from a device
    Show(ShowArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Document Arguments ───────────────────────────────────────────────

/// Arguments shared by `apply` and `delete`.
#[derive(Debug, Args)]
pub struct ReconcileArgs {
    /// Desired-state document (YAML or JSON)
    pub file: PathBuf,

    /// Re-read deployed state after deploy and report differences
    #[arg(long)]
    pub verify: bool,

    /// Seconds to wait before the verification read
    #[arg(long, value_name = "SECS")]
    pub verify_wait: Option<u64>,

    /// Page size for state reads
    #[arg(long, value_name = "N")]
    pub offset_limit: Option<u32>,

    /// Skip the device collection-status check
    #[arg(long)]
    pub skip_collection_check: bool,
}

#[derive(Debug, Args)]
pub struct PlanArgs {
    /// Desired-state document (YAML or JSON)
    pub file: PathBuf,

    /// Page size for state reads
    #[arg(long, value_name = "N")]
    pub offset_limit: Option<u32>,

    /// Skip the device collection-status check
    #[arg(long)]
    pub skip_collection_check: bool,

    /// Include unchanged features in the output
    #[arg(long, short = 'a')]
    pub all: bool,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Desired-state document (YAML or JSON)
    pub file: PathBuf,

    /// Validate for deletion instead of merge
    #[arg(long, default_value = "merged")]
    pub state: StateArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StateArg {
    Merged,
    Deleted,
}

// ── Show ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
#[command(group(
    clap::ArgGroup::new("device")
        .required(true)
        .args(["ip", "hostname"])
))]
pub struct ShowArgs {
    /// Device management IP address
    #[arg(long)]
    pub ip: Option<String>,

    /// Device hostname
    #[arg(long)]
    pub hostname: Option<String>,

    /// Features to read (e.g. vlans,stp); all when omitted
    #[arg(long, short = 'f', value_delimiter = ',')]
    pub feature: Vec<String>,

    /// Which configuration stage to print
    #[arg(long, default_value = "deployed")]
    pub stage: StageArg,

    /// Skip the device collection-status check
    #[arg(long)]
    pub skip_collection_check: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StageArg {
    Deployed,
    Intended,
    Both,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Store a profile password in the system keyring
    SetPassword,

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },

    /// List profile names
    Profiles,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
