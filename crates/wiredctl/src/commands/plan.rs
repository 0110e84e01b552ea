//! `plan` handler: read, diff and print without writing.

use serde::Serialize;
use tabled::Tabled;
use wiredctl_core::{IntentOperation, PlanRecord, StateTag};

use crate::cli::{GlobalOpts, OutputFormat, PlanArgs};
use crate::error::CliError;
use crate::output::{self, Tone};

use super::util;

#[derive(Tabled)]
struct PlanRow {
    #[tabled(rename = "Feature")]
    feature: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Operation")]
    operation: String,
    #[tabled(rename = "Items")]
    items: usize,
}

fn item_count(record: &PlanRecord) -> usize {
    record
        .final_config
        .get("items")
        .and_then(serde_json::Value::as_array)
        .map_or(0, Vec::len)
}

fn row(record: &PlanRecord, color: bool) -> PlanRow {
    let tone = match record.intent_operation {
        IntentOperation::Create | IntentOperation::Update => Tone::Change,
        IntentOperation::NoOp => Tone::Muted,
    };
    PlanRow {
        feature: record.feature.to_string(),
        name: record.feature.friendly_name().to_owned(),
        operation: output::paint(record.intent_operation.as_ref(), tone, color),
        items: item_count(record),
    }
}

#[derive(Debug, Serialize)]
struct PlanView<'a> {
    device_id: &'a str,
    hostname: Option<&'a str>,
    changes: usize,
    records: Vec<&'a PlanRecord>,
}

pub async fn handle(args: &PlanArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let doc = util::load_document(&args.file, StateTag::Merged)?;

    let reconciler = util::connect(global, |opts| {
        if args.offset_limit.is_some() {
            opts.offset_limit = args.offset_limit;
        }
        if let Some(check) = doc.collection_check {
            opts.device_collection_status_check = check;
        }
        if args.skip_collection_check {
            opts.device_collection_status_check = false;
        }
    })
    .await?;

    let spinner = util::spinner(global, &format!("Reading {}", doc.target));
    let result = reconciler.plan(&doc.target, &doc.layer2).await;
    spinner.finish_and_clear();
    let run = result?;

    let records: Vec<&PlanRecord> = run
        .plan
        .records
        .iter()
        .filter(|r| args.all || r.changes_detected)
        .collect();
    let view = PlanView {
        device_id: &run.device.id,
        hostname: run.device.hostname.as_deref(),
        changes: run.plan.changes().count(),
        records,
    };

    let color = output::should_color(global.color);
    let out = match global.output {
        OutputFormat::Table if view.records.is_empty() => {
            "No changes required; configuration already matches".to_owned()
        }
        OutputFormat::Table => {
            let rows: Vec<PlanRow> = view.records.iter().map(|r| row(r, color)).collect();
            format!(
                "{} change(s) for {}\n{}",
                view.changes,
                view.hostname.unwrap_or(view.device_id),
                output::render_table(&rows)
            )
        }
        format => output::render_single(
            format,
            &view,
            |_| String::new(),
            |v| {
                v.records
                    .iter()
                    .map(|r| format!("{} {}", r.feature, r.intent_operation))
                    .collect::<Vec<_>>()
                    .join("\n")
            },
        ),
    };
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiredctl_core::ApiFeature;

    use super::*;

    #[test]
    fn row_counts_items_in_final_config() {
        let record = PlanRecord {
            feature: ApiFeature::VlanConfig,
            intent_operation: IntentOperation::Update,
            final_config: json!({ "items": [{ "vlanId": 10 }, { "vlanId": 20 }] }),
            changes_detected: true,
        };
        let r = row(&record, false);
        assert_eq!(r.feature, "vlanConfig");
        assert_eq!(r.name, "VLANs");
        assert_eq!(r.operation, "update");
        assert_eq!(r.items, 2);
    }
}
