// ── Plans and run summaries ──

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use strum::{AsRefStr, Display};

use super::document::StateTag;
use super::feature::{ApiFeature, Feature};

/// Intent write the executor must issue for a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum IntentOperation {
    Create,
    Update,
    NoOp,
}

/// Planner output for one API feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanRecord {
    pub feature: ApiFeature,
    pub intent_operation: IntentOperation,
    /// Full container to write; every item that should exist afterwards.
    pub final_config: Value,
    pub changes_detected: bool,
}

/// Ordered set of plan records for one device.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Plan {
    pub records: Vec<PlanRecord>,
}

impl Plan {
    /// Records that need an intent write.
    pub fn changes(&self) -> impl Iterator<Item = &PlanRecord> {
        self.records
            .iter()
            .filter(|r| r.changes_detected && r.intent_operation != IntentOperation::NoOp)
    }

    pub fn has_changes(&self) -> bool {
        self.changes().next().is_some()
    }

    pub fn get(&self, feature: ApiFeature) -> Option<&PlanRecord> {
        self.records.iter().find(|r| r.feature == feature)
    }
}

/// A desired value that the device did not report after deploy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mismatch {
    /// Dotted path inside the feature container.
    pub path: String,
    pub expected: Value,
    pub actual: Option<Value>,
}

/// Post-deploy comparison per feature; empty vectors mean "verified".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VerificationReport {
    pub features: IndexMap<ApiFeature, Vec<Mismatch>>,
}

impl VerificationReport {
    pub fn is_verified(&self) -> bool {
        self.features.values().all(Vec::is_empty)
    }

    pub fn mismatch_count(&self) -> usize {
        self.features.values().map(Vec::len).sum()
    }
}

/// Result of processing one feature in `deleted` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum DeletionStatus {
    Deleted,
    NothingToDelete,
    NotSupported,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeletionOutcome {
    pub feature: Feature,
    pub status: DeletionStatus,
    pub message: String,
    pub task_ids: Vec<String>,
}

/// Everything a caller needs to report on a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReconcileSummary {
    pub device_id: String,
    pub state: StateTag,
    pub changed: bool,
    pub total_features_planned: usize,
    pub intent_successes: usize,
    pub deploy_attempted: bool,
    pub deploy_succeeded: bool,
    /// Intent task id per API feature, plus `deploy` for the deploy task.
    pub task_ids: IndexMap<String, String>,
    pub deletions: Vec<DeletionOutcome>,
    pub verification: Option<VerificationReport>,
    pub message: String,
}
