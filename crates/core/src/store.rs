//! Flat JSON-file task registry.
//!
//! The whole array is rewritten on every append. Writers are serialized by
//! an async mutex and each rewrite lands via rename, so readers never see a
//! half-written file.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::sync::Mutex;

use crate::model::{Task, WatchKey};

/// Default location of the task file, relative to the working directory.
pub const DEFAULT_TASKS_PATH: &str = "files/tasks.json";

/// Task store failures. `load` and `find_by_guid` never surface these.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure while preparing or writing the task file.
    #[error("task file {path}: {source}")]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// Tasks could not be serialized.
    #[error("encode tasks: {0}")]
    Encode(#[from] serde_json::Error),
    /// The last stored guid has no successor.
    #[error("guid space exhausted after {0}")]
    GuidExhausted(u64),
}

/// Durable guid -> watch mapping backed by one JSON file.
#[derive(Debug)]
pub struct TaskStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl TaskStore {
    /// Opens the store at `path`, creating its parent directory if needed.
    ///
    /// The file itself is created lazily on the first append.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| StoreError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All tasks in guid order. Missing, empty or corrupt storage reads as empty.
    pub async fn load(&self) -> Vec<Task> {
        match try_read_tasks(&self.path).await {
            Ok(tasks) => tasks,
            Err(e) => {
                tracing::warn!(error = %e, "task file unreadable; treating as empty");
                Vec::new()
            }
        }
    }

    /// Registers a watch and persists the full task list.
    pub async fn append(&self, key: WatchKey) -> Result<Task, StoreError> {
        let _guard = self.write_lock.lock().await;

        // Read errors propagate; only missing or corrupt content counts as empty.
        let mut tasks = try_read_tasks(&self.path).await?;
        let guid = match tasks.last() {
            Some(last) => last
                .guid
                .checked_add(1)
                .ok_or(StoreError::GuidExhausted(last.guid))?,
            None => 0,
        };

        let task = Task { key, guid };
        tasks.push(task.clone());
        self.write_all(&tasks).await?;

        tracing::debug!(guid, total = tasks.len(), path = %self.path.display(), "task appended");
        Ok(task)
    }

    /// Looks up a task by guid.
    pub async fn find_by_guid(&self, guid: u64) -> Option<Task> {
        self.load().await.into_iter().find(|t| t.guid == guid)
    }

    async fn write_all(&self, tasks: &[Task]) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(tasks)?;
        let tmp = tmp_path(&self.path);

        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|source| StoreError::Io {
                path: tmp.clone(),
                source,
            })?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })
    }
}

/// Missing, blank or corrupt content reads as no tasks; other I/O errors fail.
async fn try_read_tasks(path: &Path) -> Result<Vec<Task>, StoreError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(b) => b,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    match serde_json::from_slice(&bytes) {
        Ok(tasks) => Ok(tasks),
        Err(e) => {
            tracing::warn!(
                error = %e,
                path = %path.display(),
                "task file corrupt; treating as empty"
            );
            Ok(Vec::new())
        }
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
