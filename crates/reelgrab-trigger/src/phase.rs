//! Trigger phase machine
//!
//! ```text
//! Idle
//!   ↓ click (non-empty URL)
//! Fetching
//!   ↓ 2xx + saved        ↓ non-2xx / transport / save error
//! Succeeded            Failed
//!   ↓ control restored   ↓ control restored
//! Idle                 Idle
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerPhase {
    /// Waiting for the user
    #[default]
    Idle,
    /// Request or body read in flight
    Fetching,
    /// Payload handed to the saver
    Succeeded,
    /// Attempt ended without a saved file
    Failed,
}

impl TriggerPhase {
    pub fn can_transition_to(&self, target: TriggerPhase) -> bool {
        match (self, target) {
            (TriggerPhase::Idle, TriggerPhase::Fetching) => true,
            (TriggerPhase::Fetching, TriggerPhase::Succeeded) => true,
            (TriggerPhase::Fetching, TriggerPhase::Failed) => true,
            (TriggerPhase::Succeeded, TriggerPhase::Idle) => true,
            (TriggerPhase::Failed, TriggerPhase::Idle) => true,
            (a, b) if *a == b => true,
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerPhase::Idle => "idle",
            TriggerPhase::Fetching => "fetching",
            TriggerPhase::Succeeded => "succeeded",
            TriggerPhase::Failed => "failed",
        }
    }
}

impl std::fmt::Display for TriggerPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TriggerPhase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "idle" => Ok(TriggerPhase::Idle),
            "fetching" => Ok(TriggerPhase::Fetching),
            "succeeded" => Ok(TriggerPhase::Succeeded),
            "failed" => Ok(TriggerPhase::Failed),
            _ => Err(format!("Unknown trigger phase: {}", s)),
        }
    }
}
