#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Blinks Client
//!
//! Fetching, hydration, chaining, and refresh of action instances.
//!
//! - [`HttpGateway`] — the outbound HTTP surface: manifest GETs and action
//!   POSTs, routed through an optional proxy indirection that localhost
//!   targets bypass
//! - [`BlinkInstance`] — an immutable value object wrapping one fetched (or
//!   chained) manifest; every change produces a new instance
//! - POST wire types ([`PostRequest`], [`PostResponse`], [`ChainData`])

pub mod error;
pub mod gateway;
pub mod instance;
pub mod post;

pub use error::ClientError;
pub use gateway::{HttpGateway, ManifestResponse};
pub use instance::{BlinkInstance, ChainMetadata, LifecycleOverrides};
pub use post::{ChainData, PostRequest, PostResponse, PostResponseLinks};
