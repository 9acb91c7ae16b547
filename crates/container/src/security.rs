//! Trust thresholds and their evaluation.

use blinks_registry::TrustState;
use serde::{Deserialize, Serialize};

/// How much trust a category must carry before an action may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SecurityLevel {
    /// Only registry-trusted hosts pass; unknown hosts soft-block.
    OnlyTrusted,
    /// Unknown hosts pass; only malicious hosts block.
    #[default]
    NonMalicious,
    /// Everything passes the threshold. Malicious hosts are still
    /// hard-blocked by the container regardless.
    All,
}

impl SecurityLevel {
    /// Whether `state` clears this threshold.
    #[must_use]
    pub fn passes(&self, state: TrustState) -> bool {
        match self {
            Self::OnlyTrusted => state == TrustState::Trusted,
            Self::NonMalicious => state != TrustState::Malicious,
            Self::All => true,
        }
    }
}

/// Per-category thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SecurityConfig {
    /// Threshold for the action host itself.
    pub actions: SecurityLevel,
    /// Threshold for the hosting website, when one is known.
    pub websites: SecurityLevel,
    /// Threshold for the interstitial, when one was traversed.
    pub interstitials: SecurityLevel,
}

impl SecurityConfig {
    /// The same level for all three categories.
    #[must_use]
    pub fn uniform(level: SecurityLevel) -> Self {
        Self {
            actions: level,
            websites: level,
            interstitials: level,
        }
    }
}
