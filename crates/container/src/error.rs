//! Container error types.

use thiserror::Error;

use crate::status::ExecutionStatus;

/// Errors raised by container operations.
///
/// Everything that happens *during* an execute sequence fails soft into the
/// container state instead; these errors cover misuse of the machine
/// itself.
#[derive(Debug, Error)]
pub enum ContainerError {
    /// A state transition is not valid for the current status.
    #[error("invalid transition from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: ExecutionStatus,
        /// Attempted target status.
        to: ExecutionStatus,
    },

    /// An execute trigger arrived while the container was not idle.
    #[error("container is not idle (status: {status})")]
    NotIdle {
        /// Status at the time of the trigger.
        status: ExecutionStatus,
    },

    /// The triggered component index does not exist.
    #[error("no component at index {index}")]
    UnknownComponent {
        /// Offending index.
        index: usize,
    },

    /// Unblock was requested for a hard block.
    #[error("a malicious verdict cannot be acknowledged away")]
    HardBlocked,
}
