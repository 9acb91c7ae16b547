//! The three-branch URL-to-action resolution.

use url::Url;

use crate::interstitial::{InterstitialInfo, SOLANA_ACTION_PREFIX, parse_interstitial};
use crate::mapper::{ActionRuleset, map_url};

/// Resolve an arbitrary URL to the action API URL behind it.
///
/// Branches, tried in order:
/// 1. the URL itself carries the `solana-action:` prefix — strip and return
///    the remainder verbatim;
/// 2. the URL is an interstitial — return the decoded inner target;
/// 3. fetch `{origin}/actions.json` and run the rule mapper.
///
/// Every failure (malformed URL, unreachable manifest, malformed document,
/// no matching rule) resolves to `None`; the page simply doesn't unfurl.
pub async fn unfurl(client: &reqwest::Client, url: &str) -> Option<Url> {
    if let Some(stripped) = url.strip_prefix(SOLANA_ACTION_PREFIX) {
        return Url::parse(stripped).ok();
    }

    if let InterstitialInfo::Interstitial { action_url } = parse_interstitial(url) {
        return Some(action_url);
    }

    let parsed = Url::parse(url).ok()?;
    let ruleset = fetch_ruleset(client, &parsed).await?;
    map_url(&ruleset, &parsed)
}

async fn fetch_ruleset(client: &reqwest::Client, url: &Url) -> Option<ActionRuleset> {
    let origin = url.origin().ascii_serialization();
    let manifest_url = format!("{origin}/actions.json");
    let response = match client.get(&manifest_url).send().await {
        Ok(response) => response,
        Err(err) => {
            tracing::debug!(url = %manifest_url, error = %err, "actions.json fetch failed");
            return None;
        }
    };
    if !response.status().is_success() {
        tracing::debug!(url = %manifest_url, status = %response.status(), "actions.json unavailable");
        return None;
    }
    match response.json::<ActionRuleset>().await {
        Ok(ruleset) => Some(ruleset),
        Err(err) => {
            tracing::debug!(url = %manifest_url, error = %err, "actions.json did not parse");
            None
        }
    }
}
