//! Watch, task and message records shared across the crate.

use serde::{Deserialize, Serialize};

/// Subject of monitoring: one company in the upstream registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WatchKey {
    /// Participant type as the registry names it (e.g. "Company").
    #[serde(rename = "type_")]
    pub participant_type: String,
    /// Participant code (INN/OGRN style numeric identifier).
    #[serde(rename = "code")]
    pub participant_code: i64,
}

impl WatchKey {
    /// Convenience constructor.
    pub fn new(participant_type: impl Into<String>, participant_code: i64) -> Self {
        Self {
            participant_type: participant_type.into(),
            participant_code,
        }
    }
}

/// Persisted registration of a watch.
///
/// Serialized flat, matching the on-disk layout
/// `{"type_": ..., "code": ..., "guid": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    /// Watched company.
    #[serde(flatten)]
    pub key: WatchKey,
    /// Assigned identifier, contiguous from 0.
    pub guid: u64,
}

/// Normalized disclosure message returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageRecord {
    /// Upstream message identifier.
    pub guid: String,
    /// Human description of the message type.
    pub description: String,
    /// Publish date, upstream format kept verbatim.
    pub date: String,
}
