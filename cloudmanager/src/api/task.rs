//! Polling of long-running Cloud Manager tasks

use serde::Deserialize;
use std::time::Duration;

use super::client::CallContext;
use super::host::HostType;
use super::request::Request;
use super::{ApiError, Client};

#[derive(Debug, Clone)]
pub struct PollConfig {
    pub retries: u32,
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            retries: 60,
            interval: Duration::from_secs(10),
        }
    }
}

/// Body of `GET /occm/api/audit/activeTask/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct TaskStatus {
    pub status: i32,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Succeeded,
    Failed,
    Pending,
}

impl TaskStatus {
    pub fn state(&self) -> TaskState {
        match self.status {
            1 => TaskState::Succeeded,
            -1 => TaskState::Failed,
            _ => TaskState::Pending,
        }
    }
}

pub fn task_path(task_id: &str) -> String {
    format!(
        "/occm/api/audit/activeTask/{}",
        urlencoding::encode(task_id)
    )
}

impl Client {
    pub async fn task_status(
        &self,
        task_id: &str,
        ctx: &CallContext<'_>,
    ) -> Result<TaskStatus, ApiError> {
        self.call_api_json(
            HostType::CloudManagerHost,
            &task_path(task_id),
            &Request::get(),
            ctx,
        )
        .await
    }

    /// Poll a task until it finishes, fails, or runs out of retries
    ///
    /// `action` and `task` only label log lines and errors, e.g. "create" and
    /// "working environment".
    pub async fn wait_on_completion(
        &self,
        task_id: &str,
        action: &str,
        task: &str,
        poll: &PollConfig,
        ctx: &CallContext<'_>,
    ) -> Result<(), ApiError> {
        for attempt in 0..poll.retries {
            if attempt > 0 {
                tokio::time::sleep(poll.interval).await;
            }

            let status = self.task_status(task_id, ctx).await?;
            match status.state() {
                TaskState::Succeeded => {
                    tracing::info!("{} {} finished (task {})", action, task, task_id);
                    return Ok(());
                }
                TaskState::Failed => {
                    let message = status
                        .error
                        .unwrap_or_else(|| "no error details returned".to_string());
                    tracing::error!("{} {} failed (task {}): {}", action, task, task_id, message);
                    return Err(ApiError::TaskFailed {
                        action: action.to_string(),
                        task: task.to_string(),
                        message,
                    });
                }
                TaskState::Pending => {
                    tracing::debug!(
                        "{} {} still running (task {}, poll {}/{})",
                        action,
                        task,
                        task_id,
                        attempt + 1,
                        poll.retries
                    );
                }
            }
        }

        Err(ApiError::TaskTimeout {
            action: action.to_string(),
            task: task.to_string(),
            retries: poll.retries,
        })
    }
}
