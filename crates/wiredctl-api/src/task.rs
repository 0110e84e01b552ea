// Task-status poller.
//
// Every controller write answers with a task id. The poller re-reads
// `/tasks/{id}` until the task is terminal, then fetches failure detail
// when the task failed. Transient transport errors are absorbed and the
// next tick tries again; anything else is returned to the caller.

use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};

use crate::client::CatalystClient;
use crate::error::Error;
use crate::types::{TaskId, TaskStatus};

/// Poll cadence and give-up deadline.
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            timeout: Duration::from_secs(300),
        }
    }
}

/// Terminal result of a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOutcome {
    pub task_id: TaskId,
    pub status: TaskStatus,
    /// Controller error text when the task failed.
    pub failure_reason: Option<String>,
}

impl TaskOutcome {
    pub fn is_success(&self) -> bool {
        self.status == TaskStatus::Success
    }
}

/// Drives a single task to completion.
pub struct TaskPoller<'a> {
    client: &'a CatalystClient,
    config: PollConfig,
}

impl<'a> TaskPoller<'a> {
    pub fn new(client: &'a CatalystClient, config: PollConfig) -> Self {
        Self { client, config }
    }

    /// Poll until the task reaches `SUCCESS` or `FAILURE`.
    ///
    /// A failed task is an `Ok` outcome -- the caller decides whether a
    /// failure is terminal. Only transport problems and the deadline
    /// produce an `Err`.
    pub async fn wait(&self, task_id: &TaskId) -> Result<TaskOutcome, Error> {
        let started = Instant::now();

        loop {
            match self.client.task(task_id).await {
                Ok(task) if task.status.is_terminal() => {
                    debug!(
                        task_id = %task_id,
                        status = ?task.status,
                        runtime_ms = task.runtime().map(|d| d.num_milliseconds()),
                        "task finished"
                    );
                    let failure_reason = if task.status == TaskStatus::Failure {
                        Some(self.failure_reason(task_id, task.error_code).await)
                    } else {
                        None
                    };
                    return Ok(TaskOutcome {
                        task_id: task_id.clone(),
                        status: task.status,
                        failure_reason,
                    });
                }
                Ok(task) => {
                    trace!(task_id = %task_id, status = ?task.status, "task still running");
                }
                Err(e) if e.is_transient() => {
                    warn!(task_id = %task_id, error = %e, "transient error while polling task");
                }
                Err(e) => return Err(e),
            }

            if started.elapsed() >= self.config.timeout {
                return Err(Error::TaskTimeout {
                    task_id: task_id.to_string(),
                    waited_secs: self.config.timeout.as_secs(),
                });
            }
            tokio::time::sleep(self.config.interval).await;
        }
    }

    async fn failure_reason(&self, task_id: &TaskId, error_code: Option<String>) -> String {
        match self.client.task_detail(task_id).await {
            Ok(detail) => detail
                .failure_reason
                .or(detail.progress)
                .or(error_code)
                .unwrap_or_else(|| "task failed without a reason".into()),
            Err(e) => {
                warn!(task_id = %task_id, error = %e, "could not fetch task detail");
                error_code.unwrap_or_else(|| format!("task failed (detail unavailable: {e})"))
            }
        }
    }
}
