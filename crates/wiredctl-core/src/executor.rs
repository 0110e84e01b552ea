// ── Operation executor ──
//
// Applies a plan: one intent write per changed feature in plan order, each
// polled to a terminal state, then a single deploy. The first failed task
// stops the run; nothing after it is submitted.

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{info, warn};
use wiredctl_api::{CatalystClient, PollConfig, TaskId, TaskPoller};

use crate::error::{CoreError, IntentFailure};
use crate::model::{ApiFeature, IntentOperation, Plan};

/// Task key used for the deploy call in `task_ids`.
pub const DEPLOY_TASK_KEY: &str = "deploy";

/// What an executed plan did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionReport {
    pub intent_successes: usize,
    pub deploy_attempted: bool,
    pub deploy_succeeded: bool,
    /// Task id per API feature, plus `deploy`.
    pub task_ids: IndexMap<String, String>,
}

/// One intent write.
#[derive(Debug, Clone, Copy)]
pub(crate) enum IntentWrite<'p> {
    Create(&'p Value),
    Update(&'p Value),
    Delete,
}

impl IntentWrite<'_> {
    pub(crate) fn verb(&self) -> &'static str {
        match self {
            Self::Create(_) => "create",
            Self::Update(_) => "update",
            Self::Delete => "delete",
        }
    }
}

/// Submits writes for one device and waits on their tasks.
pub struct Executor<'a> {
    client: &'a CatalystClient,
    device_id: &'a str,
    poll: PollConfig,
}

impl<'a> Executor<'a> {
    pub fn new(client: &'a CatalystClient, device_id: &'a str, poll: PollConfig) -> Self {
        Self {
            client,
            device_id,
            poll,
        }
    }

    /// Apply every changed record, then deploy once if anything was written.
    pub async fn execute(&self, plan: &Plan) -> Result<ExecutionReport, CoreError> {
        let mut report = ExecutionReport::default();

        for record in plan.changes() {
            let write = match record.intent_operation {
                IntentOperation::Create => IntentWrite::Create(&record.final_config),
                IntentOperation::Update => IntentWrite::Update(&record.final_config),
                IntentOperation::NoOp => continue,
            };
            info!(
                feature = %record.feature,
                operation = write.verb(),
                device_id = self.device_id,
                "writing intent"
            );

            match self.write(record.feature, write).await {
                Ok(task_id) => {
                    report.intent_successes += 1;
                    report
                        .task_ids
                        .insert(record.feature.to_string(), task_id.to_string());
                }
                Err(reason) => {
                    warn!(feature = %record.feature, %reason, "intent write failed, skipping deploy");
                    return Err(intent_failed(
                        record.feature,
                        write,
                        reason,
                        report.intent_successes,
                    ));
                }
            }
        }

        if report.intent_successes == 0 {
            return Ok(report);
        }

        report.deploy_attempted = true;
        let task_id = self.deploy().await.map_err(|reason| CoreError::DeployFailed {
            succeeded: report.intent_successes,
            reason,
        })?;
        report.deploy_succeeded = true;
        report
            .task_ids
            .insert(DEPLOY_TASK_KEY.to_owned(), task_id.to_string());
        Ok(report)
    }

    /// Submit one intent write and wait for its task.
    ///
    /// `Err` carries the controller's failure text.
    pub(crate) async fn write(
        &self,
        feature: ApiFeature,
        write: IntentWrite<'_>,
    ) -> Result<TaskId, String> {
        let name = feature.as_ref();
        let submitted = match write {
            IntentWrite::Create(payload) => {
                self.client
                    .create_intent(self.device_id, name, payload)
                    .await
            }
            IntentWrite::Update(payload) => {
                self.client
                    .update_intent(self.device_id, name, payload)
                    .await
            }
            IntentWrite::Delete => self.client.delete_intent(self.device_id, name).await,
        };
        self.wait(submitted.map_err(|e| e.to_string())?).await
    }

    /// Deploy all pending intent and wait for the task.
    pub(crate) async fn deploy(&self) -> Result<TaskId, String> {
        info!(device_id = self.device_id, "deploying intent");
        let task_id = self
            .client
            .deploy(self.device_id)
            .await
            .map_err(|e| e.to_string())?;
        self.wait(task_id).await
    }

    async fn wait(&self, task_id: TaskId) -> Result<TaskId, String> {
        let outcome = TaskPoller::new(self.client, self.poll)
            .wait(&task_id)
            .await
            .map_err(|e| e.to_string())?;
        if outcome.is_success() {
            Ok(task_id)
        } else {
            Err(outcome
                .failure_reason
                .unwrap_or_else(|| format!("task {task_id} failed")))
        }
    }
}

pub(crate) fn intent_failed(
    feature: ApiFeature,
    write: IntentWrite<'_>,
    reason: String,
    succeeded: usize,
) -> CoreError {
    CoreError::IntentFailed {
        failures: vec![IntentFailure {
            feature: feature.friendly_name().to_owned(),
            operation: write.verb().to_owned(),
            reason,
        }],
        succeeded,
    }
}
