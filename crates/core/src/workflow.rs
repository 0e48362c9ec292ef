//! Create-task and fetch-messages flows.

use thiserror::Error;

use crate::config::{EmptyPolicy, UpstreamConfig};
use crate::model::{MessageRecord, Task, WatchKey};
use crate::store::{StoreError, TaskStore};
use crate::upstream::{UpstreamClient, UpstreamError};

/// Caller-facing failures of the two flows.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// No task carries the requested guid.
    #[error("task {0} not found")]
    TaskNotFound(u64),
    /// Upstream refused the configured login/password.
    #[error("invalid upstream login or password")]
    UpstreamCredentialsInvalid,
    /// Upstream had no messages for the watched company.
    #[error("no messages found")]
    NoMessagesFound,
    /// Persisting the task list failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Message listing failed after a successful login.
    #[error("upstream sync failed: {0}")]
    Upstream(#[source] UpstreamError),
}

/// Orchestrates the task store and the upstream client.
#[derive(Debug)]
pub struct Watchdesk {
    store: TaskStore,
    upstream: UpstreamClient,
}

impl Watchdesk {
    /// Builds the orchestrator with a fresh HTTP client.
    pub fn new(store: TaskStore, config: UpstreamConfig) -> Self {
        Self::with_client(store, UpstreamClient::new(reqwest::Client::new(), config))
    }

    /// Builds the orchestrator around an existing upstream client.
    pub fn with_client(store: TaskStore, upstream: UpstreamClient) -> Self {
        Self { store, upstream }
    }

    /// Underlying task store.
    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// All registered tasks.
    pub async fn list_tasks(&self) -> Vec<Task> {
        self.store.load().await
    }

    /// Registers a watch and returns its guid.
    pub async fn create_task(&self, key: WatchKey) -> Result<u64, WorkflowError> {
        let task = self.store.append(key).await?;
        tracing::info!(
            guid = task.guid,
            participant_type = %task.key.participant_type,
            participant_code = task.key.participant_code,
            "task created"
        );
        Ok(task.guid)
    }

    /// Authenticates upstream and returns the task's disclosure messages.
    pub async fn fetch_messages_for_task(
        &self,
        guid: u64,
    ) -> Result<Vec<MessageRecord>, WorkflowError> {
        let Some(task) = self.store.find_by_guid(guid).await else {
            tracing::debug!(guid, "task lookup missed");
            return Err(WorkflowError::TaskNotFound(guid));
        };

        let config = self.upstream.config();
        tracing::debug!(guid, "authenticating upstream");
        let token = match self.upstream.authenticate(&config.credential).await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(guid, error = %e, "upstream authentication failed");
                return Err(WorkflowError::UpstreamCredentialsInvalid);
            }
        };

        tracing::debug!(guid, "syncing upstream messages");
        let messages = self
            .upstream
            .fetch_messages(&token, &task.key)
            .await
            .map_err(WorkflowError::Upstream)?;

        if messages.is_empty() && config.empty_policy == EmptyPolicy::Error {
            tracing::info!(guid, "no messages found");
            return Err(WorkflowError::NoMessagesFound);
        }

        tracing::info!(guid, count = messages.len(), "messages delivered");
        Ok(messages)
    }
}
