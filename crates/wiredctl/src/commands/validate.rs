//! Offline document validation.

use serde::Serialize;
use wiredctl_core::{Feature, StateTag};

use crate::cli::{GlobalOpts, StateArg, ValidateArgs};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Debug, Serialize)]
struct ValidationView {
    file: String,
    device: String,
    state: StateTag,
    features: Vec<Feature>,
}

impl From<StateArg> for StateTag {
    fn from(arg: StateArg) -> Self {
        match arg {
            StateArg::Merged => StateTag::Merged,
            StateArg::Deleted => StateTag::Deleted,
        }
    }
}

pub fn handle(args: &ValidateArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let state = StateTag::from(args.state);
    let loaded = util::load_document(&args.file, state)?;

    let view = ValidationView {
        file: args.file.display().to_string(),
        device: loaded.target.to_string(),
        state,
        features: loaded.layer2.features().collect(),
    };
    let names = |v: &ValidationView| {
        v.features
            .iter()
            .copied()
            .map(<&'static str>::from)
            .collect::<Vec<_>>()
            .join(", ")
    };
    let out = output::render_single(
        global.output,
        &view,
        |v| {
            format!(
                "{} is valid for '{}' on {}: {} feature(s) ({})",
                v.file,
                v.state,
                v.device,
                v.features.len(),
                names(v)
            )
        },
        |v| names(v).replace(", ", "\n"),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
