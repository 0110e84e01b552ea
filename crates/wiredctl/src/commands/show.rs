//! `show` handler: print deployed / intended feature containers.

use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;
use strum::IntoEnumIterator;
use tabled::Tabled;
use wiredctl_core::reader::items;
use wiredctl_core::{ApiFeature, DeviceState, DeviceTarget, Feature};

use crate::cli::{GlobalOpts, ShowArgs, StageArg};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Debug, Serialize)]
struct ShowEntry {
    feature: ApiFeature,
    stage: &'static str,
    container: Value,
}

#[derive(Tabled)]
struct ShowRow {
    #[tabled(rename = "Feature")]
    feature: String,
    #[tabled(rename = "Stage")]
    stage: String,
    #[tabled(rename = "Items")]
    items: usize,
}

impl From<&ShowEntry> for ShowRow {
    fn from(e: &ShowEntry) -> Self {
        Self {
            feature: e.feature.to_string(),
            stage: e.stage.to_owned(),
            items: items(&e.container).len(),
        }
    }
}

fn parse_features(names: &[String]) -> Result<Vec<Feature>, CliError> {
    if names.is_empty() {
        return Ok(Feature::iter().collect());
    }
    names
        .iter()
        .map(|name| {
            Feature::from_str(name.trim()).map_err(|_| CliError::Validation {
                field: "feature".into(),
                reason: format!(
                    "unknown feature '{name}'; expected one of: {}",
                    Feature::iter()
                        .map(<&'static str>::from)
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            })
        })
        .collect()
}

fn entries(state: &DeviceState, stage: StageArg) -> Vec<ShowEntry> {
    let mut out = Vec::new();
    if stage != StageArg::Intended {
        out.extend(state.deployed.iter().map(|(&feature, c)| ShowEntry {
            feature,
            stage: "deployed",
            container: c.clone(),
        }));
    }
    if stage != StageArg::Deployed {
        out.extend(state.intended.iter().map(|(&feature, c)| ShowEntry {
            feature,
            stage: "intended",
            container: c.clone(),
        }));
    }
    out
}

pub async fn handle(args: &ShowArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let features = parse_features(&args.feature)?;
    let target = match (&args.ip, &args.hostname) {
        (Some(ip), _) => DeviceTarget::ManagementIp(ip.clone()),
        (None, Some(name)) => DeviceTarget::Hostname(name.clone()),
        (None, None) => {
            return Err(CliError::Validation {
                field: "device".into(),
                reason: "--ip or --hostname is required".into(),
            });
        }
    };

    let reconciler = util::connect(global, |opts| {
        if args.skip_collection_check {
            opts.device_collection_status_check = false;
        }
    })
    .await?;

    let spinner = util::spinner(global, &format!("Reading {target}"));
    let result = reconciler.show(&target, &features).await;
    spinner.finish_and_clear();
    let (device, state) = result?;
    tracing::debug!(device_id = %device.id, "state read");

    let data = entries(&state, args.stage);
    let out = output::render_list(global.output, &data, |e| ShowRow::from(e), |e| {
        format!("{}\t{}\t{}", e.feature, e.stage, e.container)
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
