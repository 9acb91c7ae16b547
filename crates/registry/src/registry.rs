//! The trust registry cache.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::document::RegistryDocument;
use crate::error::RegistryError;
use crate::state::TrustState;

/// Default registry endpoint.
pub const DEFAULT_REGISTRY_URL: &str = "https://actions-registry.dial.to/all";

/// Default interval between background refreshes.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Which table a lookup consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrustCategory {
    /// Action (blink) hosts.
    Actions,
    /// Website hosts.
    Websites,
    /// Interstitial hosts.
    Interstitials,
}

/// Registry construction options.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Endpoint serving the [`RegistryDocument`].
    pub url: String,
    /// Interval between background refreshes.
    pub refresh_interval: Duration,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_REGISTRY_URL.to_string(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
        }
    }
}

#[derive(Debug, Default)]
struct Tables {
    actions: HashMap<String, TrustState>,
    websites: HashMap<String, TrustState>,
    interstitials: HashMap<String, TrustState>,
}

impl Tables {
    fn from_document(doc: &RegistryDocument) -> Self {
        fn table(entries: &[crate::document::RegistryEntry]) -> HashMap<String, TrustState> {
            entries
                .iter()
                .map(|e| (e.host.to_ascii_lowercase(), e.state))
                .collect()
        }
        Self {
            actions: table(&doc.actions),
            websites: table(&doc.websites),
            interstitials: table(&doc.interstitials),
        }
    }

    fn for_category(&self, category: TrustCategory) -> &HashMap<String, TrustState> {
        match category {
            TrustCategory::Actions => &self.actions,
            TrustCategory::Websites => &self.websites,
            TrustCategory::Interstitials => &self.interstitials,
        }
    }
}

/// Shared host→trust cache.
///
/// Constructed once at the composition root and shared via `Arc`; many
/// containers read through it, only the refresh path writes. All three
/// tables swap atomically on refresh, so readers see either the old or the
/// new set, never a mix.
pub struct TrustRegistry {
    config: RegistryConfig,
    client: reqwest::Client,
    tables: ArcSwap<Tables>,
}

impl std::fmt::Debug for TrustRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrustRegistry")
            .field("url", &self.config.url)
            .field("refresh_interval", &self.config.refresh_interval)
            .finish_non_exhaustive()
    }
}

impl TrustRegistry {
    /// Create an empty registry (every lookup answers `Unknown` until the
    /// first successful refresh).
    #[must_use]
    pub fn new(config: RegistryConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    /// Create with a caller-supplied HTTP client.
    #[must_use]
    pub fn with_client(config: RegistryConfig, client: reqwest::Client) -> Self {
        Self {
            config,
            client,
            tables: ArcSwap::from_pointee(Tables::default()),
        }
    }

    /// Replace all three tables from a document, atomically.
    pub fn apply(&self, doc: &RegistryDocument) {
        self.tables.store(Arc::new(Tables::from_document(doc)));
    }

    /// Fetch the registry document and swap the tables in.
    ///
    /// On any failure the previous tables stay untouched; the background
    /// loop logs and carries on, so a stale or empty registry is something
    /// every caller must tolerate.
    pub async fn refresh(&self) -> Result<(), RegistryError> {
        let response = self.client.get(&self.config.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::Status {
                status: status.as_u16(),
            });
        }
        let doc: RegistryDocument = response.json().await?;
        self.apply(&doc);
        tracing::debug!(
            actions = doc.actions.len(),
            websites = doc.websites.len(),
            interstitials = doc.interstitials.len(),
            "trust registry refreshed"
        );
        Ok(())
    }

    /// Look up the trust state of a URL within a category.
    ///
    /// Host-based exact match after URL parsing (which also normalizes host
    /// case); malformed URLs answer `Unknown`. A URL carrying an `apiUrl`
    /// redirect query parameter (the action-service proxy pattern) answers
    /// the merge of the outer and inner targets, so a malicious inner URL
    /// cannot hide behind a trusted proxy host.
    #[must_use]
    pub fn lookup(&self, url: &str, category: TrustCategory) -> TrustState {
        let Ok(parsed) = Url::parse(url) else {
            return TrustState::Unknown;
        };
        let outer = self.host_state(&parsed, category);

        let inner_target = parsed
            .query_pairs()
            .find(|(key, _)| key == "apiUrl")
            .and_then(|(_, value)| Url::parse(&value).ok());
        match inner_target {
            Some(inner) => outer.merge_with(self.host_state(&inner, category)),
            None => outer,
        }
    }

    fn host_state(&self, url: &Url, category: TrustCategory) -> TrustState {
        let Some(host) = url.host_str() else {
            return TrustState::Unknown;
        };
        let tables = self.tables.load();
        tables
            .for_category(category)
            .get(&host.to_ascii_lowercase())
            .copied()
            .unwrap_or(TrustState::Unknown)
    }

    /// Start the background refresh loop: one immediate fetch, then one per
    /// configured interval. Dropping or stopping the returned handle ends
    /// the loop.
    #[must_use]
    pub fn spawn_refresh(self: &Arc<Self>) -> RefreshHandle {
        let registry = Arc::clone(self);
        let token = CancellationToken::new();
        let loop_token = token.clone();
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(registry.config.refresh_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    () = loop_token.cancelled() => break,
                    _ = interval.tick() => {
                        if let Err(err) = registry.refresh().await {
                            tracing::warn!(error = %err, "trust registry refresh failed, keeping previous tables");
                        }
                    }
                }
            }
        });
        RefreshHandle { token, task }
    }
}

/// Handle to a running refresh loop.
#[derive(Debug)]
pub struct RefreshHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    /// Stop the refresh loop.
    pub fn stop(&self) {
        self.token.cancel();
    }

    /// Returns `true` once the loop has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
