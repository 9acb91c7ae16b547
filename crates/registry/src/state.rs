//! The three-valued trust lattice.

use serde::{Deserialize, Serialize};

/// Per-host trust classification.
///
/// Registry documents only ever carry `trusted` and `malicious`; `Unknown`
/// is the implicit state of any host absent from its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrustState {
    /// Vetted host.
    Trusted,
    /// Flagged host; execution is hard-blocked.
    Malicious,
    /// Not present in the registry.
    #[default]
    Unknown,
}

impl TrustState {
    /// Pairwise merge: `Malicious` dominates, then `Unknown`, else
    /// `Trusted`.
    #[must_use]
    pub fn merge_with(self, other: Self) -> Self {
        match (self, other) {
            (Self::Malicious, _) | (_, Self::Malicious) => Self::Malicious,
            (Self::Unknown, _) | (_, Self::Unknown) => Self::Unknown,
            (Self::Trusted, Self::Trusted) => Self::Trusted,
        }
    }
}

/// Reduce any number of states to one overall verdict.
///
/// An empty input merges to `Trusted` (the lattice identity); callers
/// always supply at least one state in practice.
#[must_use]
pub fn merge<I>(states: I) -> TrustState
where
    I: IntoIterator<Item = TrustState>,
{
    states
        .into_iter()
        .fold(TrustState::Trusted, TrustState::merge_with)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const ALL: [TrustState; 3] = [
        TrustState::Trusted,
        TrustState::Malicious,
        TrustState::Unknown,
    ];

    #[test]
    fn malicious_dominates_everything() {
        for state in ALL {
            assert_eq!(
                merge([TrustState::Malicious, state]),
                TrustState::Malicious
            );
        }
    }

    #[test]
    fn unknown_dominates_trusted() {
        assert_eq!(
            merge([TrustState::Unknown, TrustState::Trusted]),
            TrustState::Unknown
        );
    }

    #[test]
    fn single_state_merges_to_itself() {
        for state in ALL {
            assert_eq!(merge([state]), state);
        }
    }

    #[test]
    fn merge_is_commutative() {
        for a in ALL {
            for b in ALL {
                assert_eq!(merge([a, b]), merge([b, a]));
            }
        }
    }

    #[test]
    fn merge_is_idempotent() {
        for state in ALL {
            assert_eq!(merge([state, state]), state);
        }
    }

    #[test]
    fn wire_names_are_lowercase() {
        assert_eq!(
            serde_json::to_string(&TrustState::Malicious).unwrap(),
            r#""malicious""#
        );
        let state: TrustState = serde_json::from_str(r#""trusted""#).unwrap();
        assert_eq!(state, TrustState::Trusted);
    }
}
