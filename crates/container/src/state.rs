//! The render-facing state snapshot.

use blinks_core::InstanceId;

use crate::status::ExecutionStatus;

/// One immutable snapshot of a container, published over the watch channel
/// after every transition. The render layer needs nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerState {
    /// Current machine status.
    pub status: ExecutionStatus,
    /// Id of the mounted instance; changes on refresh, chain, or swap.
    pub instance_id: InstanceId,
    /// Index of the component currently executing, while `Executing`.
    pub executing_component: Option<usize>,
    /// Soft error from the last execute attempt, shown until the next one.
    pub error_message: Option<String>,
    /// Message recorded when the machine reached `Success`.
    pub success_message: Option<String>,
    /// Whether the support strategy accepts this action; a render layer
    /// disables triggers when `false`.
    pub supported: bool,
    /// While `Blocked`: `true` for a malicious verdict (no override),
    /// `false` for an advisory block the user may acknowledge away.
    pub hard_block: bool,
}
