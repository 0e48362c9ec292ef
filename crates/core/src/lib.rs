#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Task registry and disclosure-message synchronization for bankwatch.
//!
//! A task pins a watch on one company (participant type + code). Fetching a
//! task's messages authenticates against the upstream registry and pages
//! through its bankruptcy-related disclosures.

pub mod config;
pub mod credential;
pub mod model;
pub mod store;
pub mod upstream;
pub mod workflow;

pub use config::{ConfigError, EmptyPolicy, PageMode, UpstreamConfig};
pub use credential::{derive, HashedCredential};
pub use model::{MessageRecord, Task, WatchKey};
pub use store::{StoreError, TaskStore};
pub use upstream::{BearerToken, UpstreamClient, UpstreamError};
pub use workflow::{Watchdesk, WorkflowError};
