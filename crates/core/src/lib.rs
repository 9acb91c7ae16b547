#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Blinks Core
//!
//! Data model for the Blinks SDK. An action provider describes a
//! transaction-triggering UI as a JSON manifest; this crate models that
//! manifest and everything derived from it:
//!
//! - [`ActionManifest`] and [`LinkedAction`] — the fetched wire shape
//! - [`ActionParameter`] and [`ParameterKind`] — typed user inputs
//! - [`ActionComponent`] — the interactive component variants built from a
//!   manifest's links, with href interpolation and POST body assembly
//! - [`Supportability`] — blockchain-id / version compatibility metadata
//! - [`InstanceId`] — opaque per-instance identifier
//!
//! Everything here is a plain value type; fetching and execution live in
//! `blinks-client` and `blinks-container`.

pub mod component;
pub mod error;
pub mod id;
pub mod manifest;
pub mod parameter;
pub mod supportability;

pub use component::{
    ActionComponent, ComponentKind, FormButton, FormField, ResolvedRequest, components_for,
};
pub use error::ComponentError;
pub use id::InstanceId;
pub use manifest::{
    ActionError, ActionManifest, ActionType, LinkedAction, LinkedActionType, LiveDataConfig,
    NextActionLink,
};
pub use parameter::{ActionParameter, ParameterKind, ParameterOption};
pub use supportability::{
    BASELINE_BLOCKCHAIN_ID, BASELINE_VERSION, SupportStrategy, Supportability, baseline_strategy,
};
