//! Command handlers: document loading, core calls and output formatting.

pub mod apply;
pub mod config_cmd;
pub mod plan;
pub mod show;
pub mod util;
pub mod validate;

use wiredctl_core::StateTag;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a controller-bound command to the appropriate handler.
///
/// Each handler validates its document before connecting, so a bad file
/// never costs a controller login.
pub async fn dispatch(cmd: &Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Apply(args) => apply::handle(args, StateTag::Merged, global).await,
        Command::Delete(args) => apply::handle(args, StateTag::Deleted, global).await,
        Command::Plan(args) => plan::handle(args, global).await,
        Command::Show(args) => show::handle(args, global).await,
        Command::Validate(args) => validate::handle(args, global),
        Command::Config(args) => config_cmd::handle(args, global),
        // Completions are handled before dispatch
        Command::Completions(_) => Ok(()),
    }
}
