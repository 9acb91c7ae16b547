//! The remote registry document shape.

use serde::{Deserialize, Serialize};

use crate::state::TrustState;

/// One host entry of a registry table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    /// Host (no protocol), as the registry publishes it.
    pub host: String,
    /// Published classification.
    pub state: TrustState,
}

/// The full document served by the registry endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryDocument {
    /// Action (blink) hosts.
    #[serde(default)]
    pub actions: Vec<RegistryEntry>,
    /// Website hosts.
    #[serde(default)]
    pub websites: Vec<RegistryEntry>,
    /// Interstitial hosts.
    #[serde(default)]
    pub interstitials: Vec<RegistryEntry>,
}
