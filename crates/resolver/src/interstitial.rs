//! Interstitial URL decoding.
//!
//! An interstitial is a wrapper page embedding the real action target in an
//! `action=` query parameter, e.g.
//! `https://interstitial.example/?action=solana-action%3Ahttps%3A%2F%2Fy%2Fz`.

use url::Url;

/// Recognized scheme prefix marking an action target.
pub const SOLANA_ACTION_PREFIX: &str = "solana-action:";

/// Result of probing a URL for interstitial shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterstitialInfo {
    /// The URL wraps a valid prefixed action target.
    Interstitial {
        /// The decoded inner action URL.
        action_url: Url,
    },
    /// Not an interstitial (no `action` param, wrong prefix, or an inner
    /// value that does not parse as a URL).
    NotInterstitial,
}

impl InterstitialInfo {
    /// Returns `true` for the interstitial variant.
    #[must_use]
    pub fn is_interstitial(&self) -> bool {
        matches!(self, Self::Interstitial { .. })
    }
}

/// Probe a URL for interstitial shape.
///
/// `query_pairs` percent-decodes the parameter value, so both raw and
/// encoded `action=` values are handled. Anything malformed answers
/// [`InterstitialInfo::NotInterstitial`] — this path never errors.
#[must_use]
pub fn parse_interstitial(url: &str) -> InterstitialInfo {
    let Ok(parsed) = Url::parse(url) else {
        return InterstitialInfo::NotInterstitial;
    };
    let Some(value) = parsed
        .query_pairs()
        .find(|(key, _)| key == "action")
        .map(|(_, value)| value.into_owned())
    else {
        return InterstitialInfo::NotInterstitial;
    };

    let Some(target) = value.strip_prefix(SOLANA_ACTION_PREFIX) else {
        return InterstitialInfo::NotInterstitial;
    };
    match Url::parse(target) {
        Ok(action_url) => InterstitialInfo::Interstitial { action_url },
        Err(err) => {
            tracing::debug!(error = %err, "interstitial action param is not a valid url");
            InterstitialInfo::NotInterstitial
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn decodes_percent_encoded_target() {
        let info = parse_interstitial("https://x/?action=solana-action%3Ahttps%3A%2F%2Fy%2Fz");
        match info {
            InterstitialInfo::Interstitial { action_url } => {
                assert_eq!(action_url.as_str(), "https://y/z");
            }
            InterstitialInfo::NotInterstitial => panic!("expected interstitial"),
        }
    }

    #[test]
    fn decodes_raw_target() {
        let info = parse_interstitial("https://x/?action=solana-action:https://y/z");
        assert!(info.is_interstitial());
    }

    #[test]
    fn rejects_missing_action_param() {
        assert_eq!(
            parse_interstitial("https://x/?other=1"),
            InterstitialInfo::NotInterstitial
        );
    }

    #[test]
    fn rejects_unrecognized_prefix() {
        assert_eq!(
            parse_interstitial("https://x/?action=other-scheme%3Ahttps%3A%2F%2Fy"),
            InterstitialInfo::NotInterstitial
        );
    }

    #[test]
    fn rejects_inner_value_that_is_not_a_url() {
        assert_eq!(
            parse_interstitial("https://x/?action=solana-action%3Anot-a-url"),
            InterstitialInfo::NotInterstitial
        );
    }

    #[test]
    fn rejects_malformed_outer_url() {
        assert_eq!(
            parse_interstitial("::::"),
            InterstitialInfo::NotInterstitial
        );
    }
}
