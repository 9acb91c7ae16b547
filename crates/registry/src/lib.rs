#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Blinks Trust Registry
//!
//! A shared host→trust-state cache consulted before rendering or executing
//! an action. Three independent tables exist (actions, websites,
//! interstitials); a host absent from its table is `Unknown`.
//!
//! - [`TrustState`] and [`merge`] — the three-valued trust lattice
//! - [`TrustRegistry`] — the cache itself: atomic refresh, host lookup,
//!   periodic background refresh with an explicit stop
//!
//! The registry is an explicitly constructed object shared via `Arc` from
//! the composition root; there is no process-global instance.

pub mod document;
pub mod error;
pub mod registry;
pub mod state;

pub use document::{RegistryDocument, RegistryEntry};
pub use error::RegistryError;
pub use registry::{RefreshHandle, RegistryConfig, TrustCategory, TrustRegistry};
pub use state::{TrustState, merge};
