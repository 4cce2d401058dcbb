//! # Heartbeat Event
//!
//! One status report from one agent.

use crate::status::AgentStatus;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::SystemTime;

/// Free-form metadata attached to a heartbeat.
pub type Metadata = HashMap<String, serde_json::Value>;

/// A single heartbeat as reported by an agent.
///
/// The bus accepts events as-is: an empty `agent_key` or an unknown `status`
/// is not rejected. Validation belongs to the producer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartbeatEvent {
    /// Agent that produced this event. Also the history/subscription key.
    pub agent_key: String,

    /// Job the agent is working on; empty when there is none.
    #[serde(default)]
    pub job_id: String,

    /// Reported status, normally one of `idle`, `processing`, `waiting`.
    pub status: String,

    /// Producer-supplied time of the report.
    pub timestamp: SystemTime,

    /// Optional extra fields.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: Metadata,
}

impl HeartbeatEvent {
    /// Create an event stamped with the current time.
    pub fn new(agent_key: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            agent_key: agent_key.into(),
            job_id: String::new(),
            status: status.into(),
            timestamp: SystemTime::now(),
            metadata: Metadata::new(),
        }
    }

    /// Create an event from a known status.
    pub fn with_status(agent_key: impl Into<String>, status: AgentStatus) -> Self {
        Self::new(agent_key, status.as_str())
    }

    /// Set the job id.
    #[must_use]
    pub fn with_job(mut self, job_id: impl Into<String>) -> Self {
        self.job_id = job_id.into();
        self
    }

    /// Override the timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: SystemTime) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Add one metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Parse `status` into the closed set, if it belongs to it.
    #[must_use]
    pub fn agent_status(&self) -> Option<AgentStatus> {
        self.status.parse().ok()
    }
}
