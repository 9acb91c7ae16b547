//! Blockchain / version compatibility metadata.
//!
//! Providers advertise which blockchains an action touches and which spec
//! version it was written against via the `x-blockchain-ids` and
//! `x-action-version` response headers. When absent, baseline defaults
//! apply so pre-metadata actions keep working.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Spec version assumed when a provider sends no version header.
pub const BASELINE_VERSION: &str = "2.2";

/// Blockchain assumed when a provider sends no ids header (Solana mainnet,
/// CAIP-2).
pub const BASELINE_BLOCKCHAIN_ID: &str = "solana:5eykt4UsFv8P8NJdTREpY1vzqKqZKvdp";

/// Supportability metadata captured from a manifest fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supportability {
    /// CAIP-2 blockchain ids the action touches.
    pub blockchain_ids: Vec<String>,
    /// Spec version the action targets, `major.minor`.
    pub version: String,
}

impl Default for Supportability {
    fn default() -> Self {
        Self {
            blockchain_ids: vec![BASELINE_BLOCKCHAIN_ID.to_string()],
            version: BASELINE_VERSION.to_string(),
        }
    }
}

impl Supportability {
    /// Build from the raw `x-blockchain-ids` / `x-action-version` header
    /// values; baselines apply for whichever header is absent or empty.
    #[must_use]
    pub fn from_headers(blockchain_ids: Option<&str>, version: Option<&str>) -> Self {
        let ids: Vec<String> = blockchain_ids
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .filter(|ids: &Vec<String>| !ids.is_empty())
            .unwrap_or_else(|| vec![BASELINE_BLOCKCHAIN_ID.to_string()]);

        let version = version
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(BASELINE_VERSION)
            .to_string();

        Self {
            blockchain_ids: ids,
            version,
        }
    }
}

/// Decides whether a fetched action is executable by the current client.
///
/// Injected at fetch time and carried by the instance; chained instances
/// inherit it.
pub type SupportStrategy = Arc<dyn Fn(&Supportability) -> bool + Send + Sync>;

/// The stock strategy: every blockchain id must be supported and the action
/// version must not exceed `max_version`.
#[must_use]
pub fn baseline_strategy(supported_ids: Vec<String>, max_version: &str) -> SupportStrategy {
    let max = parse_version(max_version);
    Arc::new(move |meta: &Supportability| {
        let ids_ok = meta
            .blockchain_ids
            .iter()
            .all(|id| supported_ids.iter().any(|s| s == id));
        let version_ok = match (parse_version(&meta.version), max) {
            (Some(v), Some(max)) => v <= max,
            // Unparseable versions fail closed.
            _ => false,
        };
        ids_ok && version_ok
    })
}

/// Parse a `major.minor` version string. A bare major (`"3"`) reads as
/// `(3, 0)`.
#[must_use]
pub fn parse_version(raw: &str) -> Option<(u64, u64)> {
    let mut parts = raw.trim().splitn(2, '.');
    let major = parts.next()?.parse().ok()?;
    let minor = match parts.next() {
        Some(m) => m.parse().ok()?,
        None => 0,
    };
    Some((major, minor))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_apply_when_headers_absent() {
        let meta = Supportability::from_headers(None, None);
        assert_eq!(meta.blockchain_ids, vec![BASELINE_BLOCKCHAIN_ID]);
        assert_eq!(meta.version, BASELINE_VERSION);
        assert_eq!(meta, Supportability::default());
    }

    #[test]
    fn headers_are_split_and_trimmed() {
        let meta = Supportability::from_headers(Some("solana:a, solana:b "), Some(" 2.4 "));
        assert_eq!(meta.blockchain_ids, vec!["solana:a", "solana:b"]);
        assert_eq!(meta.version, "2.4");
    }

    #[test]
    fn empty_header_values_fall_back_to_baseline() {
        let meta = Supportability::from_headers(Some(""), Some("  "));
        assert_eq!(meta.blockchain_ids, vec![BASELINE_BLOCKCHAIN_ID]);
        assert_eq!(meta.version, BASELINE_VERSION);
    }

    #[test]
    fn parse_version_handles_major_minor_and_bare_major() {
        assert_eq!(parse_version("2.2"), Some((2, 2)));
        assert_eq!(parse_version("3"), Some((3, 0)));
        assert_eq!(parse_version("2.10"), Some((2, 10)));
        assert_eq!(parse_version("abc"), None);
    }

    #[test]
    fn baseline_strategy_checks_ids_and_version() {
        let strategy = baseline_strategy(vec![BASELINE_BLOCKCHAIN_ID.to_string()], "2.4");

        assert!(strategy(&Supportability::default()));

        let newer = Supportability {
            version: "2.5".into(),
            ..Supportability::default()
        };
        assert!(!strategy(&newer));

        let foreign = Supportability {
            blockchain_ids: vec!["eip155:1".into()],
            ..Supportability::default()
        };
        assert!(!strategy(&foreign));
    }

    #[test]
    fn version_comparison_is_numeric_not_lexicographic() {
        let strategy = baseline_strategy(vec![BASELINE_BLOCKCHAIN_ID.to_string()], "2.10");
        let meta = Supportability {
            version: "2.9".into(),
            ..Supportability::default()
        };
        assert!(strategy(&meta));
    }
}
