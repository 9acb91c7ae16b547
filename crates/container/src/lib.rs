#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Blinks Container
//!
//! The render-agnostic execution core. A container mounts one
//! [`blinks_client::BlinkInstance`], runs trust and supportability checks,
//! and drives the connect → post → sign → confirm → (chain | finish)
//! sequence through an injected [`WalletAdapter`]. The rendering layer
//! subscribes to [`ContainerState`] snapshots over a watch channel and
//! never touches the machine directly.
//!
//! - [`ExecutionStatus`] and [`transition`] — the finite-state machine
//! - [`SecurityLevel`] / [`SecurityConfig`] — trust thresholds per category
//! - [`WalletAdapter`] — the injected connect/sign/confirm collaborator
//! - [`BlinkContainer`] — the orchestrator itself

pub mod adapter;
pub mod container;
pub mod error;
pub mod security;
pub mod state;
pub mod status;
pub mod transition;

pub use adapter::{ActionContext, AdapterMetadata, SignOutcome, WalletAdapter};
pub use container::{
    BlinkContainer, ContainerConfig, LiveDataHandle, MIN_LIVE_DATA_DELAY_MS, live_data_delay,
};
pub use error::ContainerError;
pub use security::{SecurityConfig, SecurityLevel};
pub use state::ContainerState;
pub use status::ExecutionStatus;
