//! `apply` and `delete` handlers.

use std::fmt::Write as _;
use std::time::Duration;

use tabled::Tabled;
use wiredctl_core::{
    DeletionStatus, ReconcileOptions, ReconcileSummary, StateTag, VerificationReport,
};

use crate::cli::{GlobalOpts, ReconcileArgs};
use crate::error::CliError;
use crate::output::{self, Tone};

use super::util::{self, LoadedDocument};

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "Operation")]
    operation: String,
    #[tabled(rename = "Task ID")]
    task_id: String,
}

#[derive(Tabled)]
struct DeletionRow {
    #[tabled(rename = "Feature")]
    feature: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Detail")]
    message: String,
}

#[derive(Tabled)]
pub(super) struct MismatchRow {
    #[tabled(rename = "Feature")]
    feature: String,
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Expected")]
    expected: String,
    #[tabled(rename = "Deployed")]
    actual: String,
}

pub(super) fn mismatch_rows(report: &VerificationReport) -> Vec<MismatchRow> {
    report
        .features
        .iter()
        .flat_map(|(feature, mismatches)| {
            mismatches.iter().map(move |m| MismatchRow {
                feature: feature.to_string(),
                path: m.path.clone(),
                expected: m.expected.to_string(),
                actual: m
                    .actual
                    .as_ref()
                    .map_or_else(|| "-".into(), ToString::to_string),
            })
        })
        .collect()
}

// ── Summary rendering ───────────────────────────────────────────────

fn detail(summary: &ReconcileSummary, color: bool) -> String {
    let deploy = match (summary.deploy_attempted, summary.deploy_succeeded) {
        (false, _) => output::paint("not needed", Tone::Muted, color),
        (true, true) => output::paint("succeeded", Tone::Good, color),
        (true, false) => output::paint("failed", Tone::Bad, color),
    };
    let changed = if summary.changed {
        output::paint("yes", Tone::Change, color)
    } else {
        output::paint("no", Tone::Good, color)
    };

    let mut out = String::new();
    let _ = writeln!(out, "Device:   {}", summary.device_id);
    let _ = writeln!(out, "State:    {}", summary.state);
    let _ = writeln!(out, "Changed:  {changed}");
    let _ = writeln!(out, "Planned:  {} feature(s)", summary.total_features_planned);
    let _ = writeln!(out, "Intent:   {} succeeded", summary.intent_successes);
    let _ = writeln!(out, "Deploy:   {deploy}");
    let _ = write!(out, "Message:  {}", summary.message);

    if !summary.deletions.is_empty() {
        let rows: Vec<DeletionRow> = summary
            .deletions
            .iter()
            .map(|d| {
                let tone = match d.status {
                    DeletionStatus::Deleted => Tone::Change,
                    DeletionStatus::NothingToDelete => Tone::Muted,
                    DeletionStatus::NotSupported => Tone::Bad,
                };
                DeletionRow {
                    feature: d.feature.to_string(),
                    status: output::paint(d.status.as_ref(), tone, color),
                    message: d.message.clone(),
                }
            })
            .collect();
        let _ = write!(out, "\n\n{}", output::render_table(&rows));
    }

    if !summary.task_ids.is_empty() {
        let rows: Vec<TaskRow> = summary
            .task_ids
            .iter()
            .map(|(operation, task_id)| TaskRow {
                operation: operation.clone(),
                task_id: task_id.clone(),
            })
            .collect();
        let _ = write!(out, "\n\n{}", output::render_table(&rows));
    }

    if let Some(ref report) = summary.verification {
        if report.is_verified() {
            let _ = write!(
                out,
                "\n\nVerification: {}",
                output::paint("deployed state matches", Tone::Good, color)
            );
        } else {
            let _ = write!(
                out,
                "\n\nVerification: {}\n{}",
                output::paint(
                    &format!("{} mismatch(es)", report.mismatch_count()),
                    Tone::Bad,
                    color
                ),
                output::render_table(&mismatch_rows(report))
            );
        }
    }
    out
}

// ── Handler ─────────────────────────────────────────────────────────

fn apply_overrides(options: &mut ReconcileOptions, args: &ReconcileArgs, doc: &LoadedDocument) {
    if args.verify {
        options.config_verify = true;
    }
    if let Some(secs) = args.verify_wait {
        options.config_verification_wait_time = Duration::from_secs(secs);
    }
    if args.offset_limit.is_some() {
        options.offset_limit = args.offset_limit;
    }
    if let Some(check) = doc.collection_check {
        options.device_collection_status_check = check;
    }
    if args.skip_collection_check {
        options.device_collection_status_check = false;
    }
}

pub async fn handle(
    args: &ReconcileArgs,
    state: StateTag,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let doc = util::load_document(&args.file, state)?;

    if state == StateTag::Deleted {
        let features: Vec<&str> = doc.layer2.features().map(<&'static str>::from).collect();
        let prompt = format!(
            "Remove {} from {} and deploy?",
            features.join(", "),
            doc.target
        );
        if !util::confirm(&prompt, "delete", global.yes)? {
            eprintln!("Aborted.");
            return Ok(());
        }
    }

    let reconciler = util::connect(global, |opts| apply_overrides(opts, args, &doc)).await?;

    let spinner = util::spinner(global, &format!("Reconciling {}", doc.target));
    let result = reconciler.apply(&doc.target, &doc.layer2, state).await;
    spinner.finish_and_clear();
    let summary = result?;

    let color = output::should_color(global.color);
    let out = output::render_single(
        global.output,
        &summary,
        |s| detail(s, color),
        |s| s.message.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
