//! # Agent Status
//!
//! The closed set of statuses agents report. The bus never parses these;
//! consumers use `HeartbeatEvent::agent_status` when they care.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Status string did not name a known agent status.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown agent status: {0:?}")]
pub struct ParseStatusError(pub String);

/// What an agent is doing at the moment it reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    /// Alive with nothing to do.
    Idle,
    /// Working on a job.
    Processing,
    /// Blocked on something outside the agent.
    Waiting,
}

impl AgentStatus {
    /// Wire form of the status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Processing => "processing",
            Self::Waiting => "waiting",
        }
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idle" => Ok(Self::Idle),
            "processing" => Ok(Self::Processing),
            "waiting" => Ok(Self::Waiting),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}
