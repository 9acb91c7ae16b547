//! Container-level execution status.

use serde::{Deserialize, Serialize};

/// The status of a mounted container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExecutionStatus {
    /// Trust and supportability checks are settling.
    CheckingSupportability,
    /// Ready for user action.
    Idle,
    /// An execute sequence is in flight.
    Executing,
    /// The last execution confirmed with no further chain.
    Success,
    /// The action cannot run at all (disabled, provider error at mount).
    Error,
    /// Trust enforcement stopped the action; a soft block can be
    /// acknowledged away, a hard block cannot.
    Blocked,
}

impl ExecutionStatus {
    /// Returns `true` if the container accepts an execute trigger.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Returns `true` while the execute sequence runs.
    #[must_use]
    pub fn is_executing(&self) -> bool {
        matches!(self, Self::Executing)
    }
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::CheckingSupportability => "checking-supportability",
            Self::Idle => "idle",
            Self::Executing => "executing",
            Self::Success => "success",
            Self::Error => "error",
            Self::Blocked => "blocked",
        };
        f.write_str(name)
    }
}
