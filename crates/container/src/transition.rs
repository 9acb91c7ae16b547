//! State machine transition validation.

use crate::error::ContainerError;
use crate::status::ExecutionStatus;

/// Returns `true` if the transition from `from` to `to` is valid.
///
/// Any state may return to `CheckingSupportability` — that is the
/// instance-swap reset. `Success` and `Error` are sticky otherwise: they
/// persist until a new instance (or a chain) replaces the model.
#[must_use]
pub fn can_transition(from: ExecutionStatus, to: ExecutionStatus) -> bool {
    use ExecutionStatus::{Blocked, CheckingSupportability, Error, Executing, Idle, Success};
    matches!(
        (from, to),
        (_, CheckingSupportability)
            | (CheckingSupportability, Idle | Blocked | Error)
            | (Idle, Executing | Blocked)
            | (Executing, Idle | Success | Blocked)
            | (Blocked, Idle)
    )
}

/// Validate a transition, returning an error if invalid.
pub fn validate_transition(
    from: ExecutionStatus,
    to: ExecutionStatus,
) -> Result<(), ContainerError> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(ContainerError::InvalidTransition { from, to })
    }
}
