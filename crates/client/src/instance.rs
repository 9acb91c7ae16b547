//! The blink instance: one fetched (or chained) manifest as an immutable
//! value object.

use blinks_core::{
    ActionComponent, ActionManifest, ActionType, InstanceId, LiveDataConfig, NextActionLink,
    SupportStrategy, Supportability, baseline_strategy, components_for,
};
use blinks_core::manifest::{ActionLinks, LinkedAction};
use url::Url;

use crate::error::ClientError;
use crate::gateway::{HttpGateway, ManifestResponse};
use crate::post::ChainData;

/// How an instance came to exist relative to its predecessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChainMetadata {
    /// Produced by a `chain` call rather than an initial fetch.
    pub is_chained: bool,
    /// Chained from data embedded in a POST response (no extra request).
    pub is_inline: bool,
}

/// Overrides applied while chaining to an inline next action.
#[derive(Debug, Clone, Default)]
pub struct LifecycleOverrides {
    /// Replaces the chained manifest's description when present.
    pub message: Option<String>,
    /// Extra follow-up links appended after the manifest's own.
    pub extra_links: Vec<LinkedAction>,
}

/// One fetched or chained action.
///
/// Instances never mutate: refreshing, changing the support strategy, or
/// chaining all build a new instance, so a render layer holding the old one
/// observes a consistent snapshot.
#[derive(Clone)]
pub struct BlinkInstance {
    id: InstanceId,
    url: Url,
    manifest: ActionManifest,
    supportability: Supportability,
    support_strategy: SupportStrategy,
    chain: ChainMetadata,
}

impl std::fmt::Debug for BlinkInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlinkInstance")
            .field("id", &self.id)
            .field("url", &self.url.as_str())
            .field("title", &self.manifest.title)
            .field("supportability", &self.supportability)
            .field("chain", &self.chain)
            .finish_non_exhaustive()
    }
}

impl BlinkInstance {
    /// Fetch an action manifest and wrap it.
    ///
    /// The default support strategy accepts baseline-version actions on the
    /// baseline blockchain; callers with a wallet adapter inject a strategy
    /// reflecting what the adapter actually supports.
    pub async fn fetch(
        gateway: &HttpGateway,
        url: Url,
        strategy: Option<SupportStrategy>,
    ) -> Result<Self, ClientError> {
        let response = gateway.get_manifest(&url).await?;
        let supportability = Supportability::from_headers(
            response.blockchain_ids.as_deref(),
            response.version.as_deref(),
        );
        Ok(Self {
            id: InstanceId::v4(),
            url,
            manifest: response.manifest,
            supportability,
            support_strategy: strategy.unwrap_or_else(default_strategy),
            chain: ChainMetadata::default(),
        })
    }

    /// Wrap already-fetched data without a network round trip.
    #[must_use]
    pub fn hydrate(
        url: Url,
        manifest: ActionManifest,
        supportability: Supportability,
        strategy: Option<SupportStrategy>,
    ) -> Self {
        Self {
            id: InstanceId::v4(),
            url,
            manifest,
            supportability,
            support_strategy: strategy.unwrap_or_else(default_strategy),
            chain: ChainMetadata::default(),
        }
    }

    /// Opaque instance id; changes whenever the model underneath changes.
    #[must_use]
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// Source URL of the manifest.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The wrapped manifest.
    #[must_use]
    pub fn manifest(&self) -> &ActionManifest {
        &self.manifest
    }

    /// Supportability metadata captured at fetch time.
    #[must_use]
    pub fn supportability(&self) -> &Supportability {
        &self.supportability
    }

    /// Chain provenance.
    #[must_use]
    pub fn chain_metadata(&self) -> ChainMetadata {
        self.chain
    }

    /// Live-data settings, when the manifest opted in.
    #[must_use]
    pub fn live_data(&self) -> Option<LiveDataConfig> {
        self.manifest.live_data()
    }

    /// Whether the injected strategy accepts this action.
    #[must_use]
    pub fn is_supported(&self) -> bool {
        (self.support_strategy)(&self.supportability)
    }

    /// The interactive components derived from the manifest.
    #[must_use]
    pub fn components(&self) -> Vec<ActionComponent> {
        components_for(&self.manifest, self.url.as_str())
    }

    /// Same manifest under a different support strategy.
    #[must_use]
    pub fn with_strategy(&self, strategy: SupportStrategy) -> Self {
        Self {
            support_strategy: strategy,
            ..self.clone()
        }
    }

    /// Produce the follow-up instance for a next-action link.
    ///
    /// Inline links synthesize the instance from embedded data, applying
    /// lifecycle overrides (message replaces the description, extra links
    /// append, and the type is forced back to `action` so a `completed`
    /// payload stays executable). `post` links are pinned to the current
    /// instance's origin: a cross-origin target is refused with `Ok(None)`
    /// and no request is made.
    pub async fn chain(
        &self,
        gateway: &HttpGateway,
        next: &NextActionLink,
        chain_data: Option<&ChainData>,
        lifecycle: Option<&LifecycleOverrides>,
    ) -> Result<Option<Self>, ClientError> {
        match next {
            NextActionLink::Inline { action } => {
                let mut manifest = action.clone();
                apply_lifecycle(&mut manifest, lifecycle);
                Ok(Some(Self {
                    id: InstanceId::v4(),
                    url: self.url.clone(),
                    manifest,
                    supportability: self.supportability.clone(),
                    support_strategy: self.support_strategy.clone(),
                    chain: ChainMetadata {
                        is_chained: true,
                        is_inline: true,
                    },
                }))
            }
            NextActionLink::Post { href } => {
                let target = self.url.join(href)?;
                if target.origin() != self.url.origin() {
                    tracing::warn!(
                        current = %self.url,
                        target = %target,
                        "refusing cross-origin chain target"
                    );
                    return Ok(None);
                }
                let response = match chain_data {
                    Some(data) => gateway.post_manifest(&target, data).await?,
                    None => {
                        gateway
                            .post_manifest(&target, &serde_json::json!({}))
                            .await?
                    }
                };
                Ok(Some(self.chained_from(target, response)))
            }
        }
    }

    /// Re-fetch the same URL, preserving strategy and chain provenance.
    ///
    /// Used for manual refresh and the live-data polling loop.
    pub async fn refresh(&self, gateway: &HttpGateway) -> Result<Self, ClientError> {
        let response = gateway.get_manifest(&self.url).await?;
        let supportability = Supportability::from_headers(
            response.blockchain_ids.as_deref(),
            response.version.as_deref(),
        );
        Ok(Self {
            id: InstanceId::v4(),
            url: self.url.clone(),
            manifest: response.manifest,
            supportability,
            support_strategy: self.support_strategy.clone(),
            chain: self.chain,
        })
    }

    /// Build the chained instance from a POST response, carrying this
    /// instance's supportability forward wherever the response did not
    /// override it.
    fn chained_from(&self, url: Url, response: ManifestResponse) -> Self {
        let supportability = Supportability {
            blockchain_ids: response.blockchain_ids.map_or_else(
                || self.supportability.blockchain_ids.clone(),
                |raw| Supportability::from_headers(Some(&raw), None).blockchain_ids,
            ),
            version: response
                .version
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| self.supportability.version.clone()),
        };
        Self {
            id: InstanceId::v4(),
            url,
            manifest: response.manifest,
            supportability,
            support_strategy: self.support_strategy.clone(),
            chain: ChainMetadata {
                is_chained: true,
                is_inline: false,
            },
        }
    }
}

fn default_strategy() -> SupportStrategy {
    baseline_strategy(
        vec![blinks_core::BASELINE_BLOCKCHAIN_ID.to_string()],
        blinks_core::BASELINE_VERSION,
    )
}

fn apply_lifecycle(manifest: &mut ActionManifest, lifecycle: Option<&LifecycleOverrides>) {
    manifest.action_type = ActionType::Action;
    let Some(lifecycle) = lifecycle else { return };
    if let Some(message) = &lifecycle.message {
        manifest.description = message.clone();
    }
    if !lifecycle.extra_links.is_empty() {
        let links = manifest.links.get_or_insert_with(|| ActionLinks {
            actions: Vec::new(),
        });
        links.actions.extend(lifecycle.extra_links.iter().cloned());
    }
}
