//! The execution container: orchestration of trust checks, the execute
//! sequence, and the live-data loop.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use blinks_client::{BlinkInstance, ChainData, HttpGateway, PostRequest};
use blinks_core::{BASELINE_VERSION, LinkedActionType, LiveDataConfig, baseline_strategy};
use blinks_registry::{TrustCategory, TrustRegistry, TrustState, merge};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::adapter::{ActionContext, SignOutcome, WalletAdapter};
use crate::error::ContainerError;
use crate::security::SecurityConfig;
use crate::state::ContainerState;
use crate::status::ExecutionStatus;
use crate::transition::validate_transition;

/// Floor for the live-data poll delay; manifests asking for less get this.
pub const MIN_LIVE_DATA_DELAY_MS: u64 = 1000;

/// Container construction options.
#[derive(Debug, Clone)]
pub struct ContainerConfig {
    /// Trust thresholds per category.
    pub security: SecurityConfig,
    /// The page hosting the blink, for website-category trust lookups.
    pub website_url: Option<Url>,
    /// The interstitial traversed to reach the blink, when one was.
    pub interstitial_url: Option<Url>,
    /// Highest action spec version this client executes.
    pub supported_version: String,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            security: SecurityConfig::default(),
            website_url: None,
            interstitial_url: None,
            supported_version: BASELINE_VERSION.to_string(),
        }
    }
}

struct Inner {
    instance: BlinkInstance,
    status: ExecutionStatus,
    executing: Option<usize>,
    error: Option<String>,
    success: Option<String>,
    supported: bool,
    hard_block: bool,
}

fn snapshot(inner: &Inner) -> ContainerState {
    ContainerState {
        status: inner.status,
        instance_id: inner.instance.id(),
        executing_component: inner.executing,
        error_message: inner.error.clone(),
        success_message: inner.success.clone(),
        supported: inner.supported,
        hard_block: inner.hard_block,
    }
}

enum Verdict {
    Pass,
    SoftBlock,
    HardBlock,
}

enum Settle {
    /// User cancelled somewhere; back to idle with nothing to show.
    Cancelled,
    /// Something failed; back to idle with a message.
    SoftError(String),
    /// Confirmed with no further chain.
    Success(Option<String>),
    /// Confirmed and chained; the new model takes over.
    Chained(BlinkInstance),
}

/// The execution core behind one rendered blink.
///
/// Owns the state machine, consults the shared [`TrustRegistry`], and
/// drives the injected [`WalletAdapter`] through the execute sequence.
/// Renderers subscribe via [`BlinkContainer::subscribe`] and read
/// [`ContainerState`] snapshots; they never see intermediate states.
pub struct BlinkContainer {
    gateway: HttpGateway,
    registry: Arc<TrustRegistry>,
    adapter: Arc<dyn WalletAdapter>,
    config: ContainerConfig,
    inner: Mutex<Inner>,
    tx: watch::Sender<ContainerState>,
}

impl std::fmt::Debug for BlinkContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlinkContainer")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl BlinkContainer {
    /// Wrap an instance. The instance's support strategy is replaced with
    /// one derived from the adapter's metadata and the configured version
    /// ceiling. Call [`BlinkContainer::mount`] to run the initial checks.
    #[must_use]
    pub fn new(
        gateway: HttpGateway,
        registry: Arc<TrustRegistry>,
        adapter: Arc<dyn WalletAdapter>,
        instance: BlinkInstance,
        config: ContainerConfig,
    ) -> Arc<Self> {
        let strategy = baseline_strategy(
            adapter.metadata().supported_blockchain_ids,
            &config.supported_version,
        );
        let instance = instance.with_strategy(strategy);
        let inner = Inner {
            status: ExecutionStatus::CheckingSupportability,
            executing: None,
            error: None,
            success: None,
            supported: instance.is_supported(),
            hard_block: false,
            instance,
        };
        let (tx, _) = watch::channel(snapshot(&inner));
        Arc::new(Self {
            gateway,
            registry,
            adapter,
            config,
            inner: Mutex::new(inner),
            tx,
        })
    }

    /// Subscribe to state snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ContainerState> {
        self.tx.subscribe()
    }

    /// The current snapshot.
    #[must_use]
    pub fn state(&self) -> ContainerState {
        self.tx.borrow().clone()
    }

    /// The mounted instance.
    #[must_use]
    pub fn instance(&self) -> BlinkInstance {
        self.inner.lock().instance.clone()
    }

    /// Run (or re-run) the supportability and trust checks.
    ///
    /// Settles in `Idle`, `Blocked`, or — for a manifest carrying a
    /// provider error — `Error`. Resets any previous error/success.
    pub fn mount(&self) {
        let mut inner = self.inner.lock();
        let _ = self.transition_to(&mut inner, ExecutionStatus::CheckingSupportability);
        inner.error = None;
        inner.success = None;
        inner.executing = None;
        inner.supported = inner.instance.is_supported();

        if let Some(err) = &inner.instance.manifest().error {
            inner.error = Some(err.message.clone());
            let _ = self.transition_to(&mut inner, ExecutionStatus::Error);
            return;
        }

        match self.verdict(&inner.instance) {
            Verdict::Pass => {
                let _ = self.transition_to(&mut inner, ExecutionStatus::Idle);
            }
            Verdict::SoftBlock => {
                inner.hard_block = false;
                let _ = self.transition_to(&mut inner, ExecutionStatus::Blocked);
            }
            Verdict::HardBlock => {
                inner.hard_block = true;
                let _ = self.transition_to(&mut inner, ExecutionStatus::Blocked);
            }
        }
    }

    /// Replace the model (a fresh, non-chained instance) and re-run mount
    /// checks.
    pub fn swap_instance(&self, instance: BlinkInstance) {
        {
            let mut inner = self.inner.lock();
            inner.instance = instance;
        }
        self.mount();
    }

    /// Acknowledge an advisory block. Hard (malicious) blocks cannot be
    /// acknowledged away.
    pub fn unblock(&self) -> Result<(), ContainerError> {
        let mut inner = self.inner.lock();
        if inner.status != ExecutionStatus::Blocked {
            return Err(ContainerError::InvalidTransition {
                from: inner.status,
                to: ExecutionStatus::Idle,
            });
        }
        if inner.hard_block {
            return Err(ContainerError::HardBlocked);
        }
        tracing::debug!(url = %inner.instance.url(), "user acknowledged advisory block");
        self.transition_to(&mut inner, ExecutionStatus::Idle)
    }

    /// Run the execute sequence for the component at `index`.
    ///
    /// Trust is re-evaluated at this moment, not just at mount: a registry
    /// refresh that flipped a host since render blocks here instead of
    /// proceeding. Execution failures settle softly into the state (error
    /// message + `Idle`); the returned `Err` covers only machine misuse
    /// (not idle, unknown component).
    pub async fn execute(
        &self,
        index: usize,
        values: &HashMap<String, Vec<String>>,
    ) -> Result<(), ContainerError> {
        let (component, context, base_url) = {
            let mut inner = self.inner.lock();
            if !inner.status.is_idle() {
                return Err(ContainerError::NotIdle {
                    status: inner.status,
                });
            }
            match self.verdict(&inner.instance) {
                Verdict::Pass => {}
                verdict => {
                    inner.hard_block = matches!(verdict, Verdict::HardBlock);
                    tracing::warn!(
                        url = %inner.instance.url(),
                        "trust state drifted since mount, blocking execution"
                    );
                    let _ = self.transition_to(&mut inner, ExecutionStatus::Blocked);
                    return Ok(());
                }
            }
            let components = inner.instance.components();
            let Some(component) = components.get(index).cloned() else {
                return Err(ContainerError::UnknownComponent { index });
            };
            inner.error = None;
            inner.executing = Some(index);
            self.transition_to(&mut inner, ExecutionStatus::Executing)?;
            let context = ActionContext {
                url: inner.instance.url().clone(),
                action_title: inner.instance.manifest().title.clone(),
                component_label: Some(component.label().to_string()),
            };
            (component, context, inner.instance.url().clone())
        };

        let outcome = self
            .run_sequence(&component, &context, &base_url, values)
            .await;
        self.settle(outcome);
        Ok(())
    }

    async fn run_sequence(
        &self,
        component: &blinks_core::ActionComponent,
        context: &ActionContext,
        base_url: &Url,
        values: &HashMap<String, Vec<String>>,
    ) -> Settle {
        let Some(account) = self.adapter.connect(context).await else {
            return Settle::Cancelled;
        };

        if component.link_type() == LinkedActionType::ExternalLink {
            // Navigation is the render layer's job; nothing to post.
            return Settle::Cancelled;
        }

        let resolved = match component.resolve(values) {
            Ok(resolved) => resolved,
            Err(err) => return Settle::SoftError(err.to_string()),
        };
        let target = match base_url.join(&resolved.href) {
            Ok(target) => target,
            Err(err) => return Settle::SoftError(format!("invalid action href: {err}")),
        };

        let body = PostRequest {
            account: account.clone(),
            action_type: (component.link_type() == LinkedActionType::Post)
                .then(|| "post".to_string()),
            data: (!resolved.data.is_empty()).then_some(resolved.data),
        };
        let response = match self.gateway.post_action(&target, &body).await {
            Ok(response) => response,
            Err(err) => return Settle::SoftError(err.to_string()),
        };

        let signature = if component.link_type() == LinkedActionType::Post {
            None
        } else {
            let Some(transaction) = response.transaction.as_deref() else {
                return Settle::SoftError("action response did not include a transaction".into());
            };
            match self.adapter.sign_transaction(transaction, context).await {
                SignOutcome::Signature(signature) => {
                    if let Err(err) = self.adapter.confirm_transaction(&signature, context).await {
                        return Settle::SoftError(err);
                    }
                    Some(signature)
                }
                SignOutcome::Error(err) => {
                    // Declined signing resets silently; no error to show.
                    tracing::debug!(error = %err, "signing declined");
                    return Settle::Cancelled;
                }
            }
        };

        let Some(next) = response.next_link().cloned() else {
            return Settle::Success(response.message);
        };
        let instance = self.inner.lock().instance.clone();
        let chain_data = ChainData { account, signature };
        match instance
            .chain(&self.gateway, &next, Some(&chain_data), None)
            .await
        {
            Ok(Some(chained)) => Settle::Chained(chained),
            Ok(None) => Settle::Success(response.message),
            Err(err) => {
                tracing::warn!(error = %err, "chain failed to resolve, settling as success");
                Settle::Success(response.message)
            }
        }
    }

    fn settle(&self, outcome: Settle) {
        let mut inner = self.inner.lock();
        inner.executing = None;
        match outcome {
            Settle::Cancelled => {
                let _ = self.transition_to(&mut inner, ExecutionStatus::Idle);
            }
            Settle::SoftError(message) => {
                inner.error = Some(message);
                let _ = self.transition_to(&mut inner, ExecutionStatus::Idle);
            }
            Settle::Success(message) => {
                inner.success =
                    Some(message.unwrap_or_else(|| "Transaction confirmed".to_string()));
                let _ = self.transition_to(&mut inner, ExecutionStatus::Success);
            }
            Settle::Chained(instance) => {
                inner.supported = instance.is_supported();
                inner.instance = instance;
                inner.error = None;
                inner.success = None;
                let _ = self.transition_to(&mut inner, ExecutionStatus::Idle);
            }
        }
    }

    /// Start the live-data polling loop, when the manifest opted in and the
    /// instance is not itself a chain result. The loop refreshes only while
    /// idle, swaps the refreshed model in only if still idle (and not
    /// replaced underneath), and retries a failed refresh on the same fixed
    /// delay.
    #[must_use]
    pub fn spawn_live_data(self: &Arc<Self>) -> Option<LiveDataHandle> {
        let delay = {
            let inner = self.inner.lock();
            let live = inner.instance.live_data()?;
            if !live.enabled || inner.instance.chain_metadata().is_chained {
                return None;
            }
            live_data_delay(live)
        };

        let container = Arc::clone(self);
        let token = CancellationToken::new();
        let loop_token = token.clone();
        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    () = loop_token.cancelled() => break,
                    () = tokio::time::sleep(delay) => {}
                }
                let current = {
                    let inner = container.inner.lock();
                    if !inner.status.is_idle() {
                        continue;
                    }
                    inner.instance.clone()
                };
                match current.refresh(&container.gateway).await {
                    Ok(refreshed) => {
                        let mut inner = container.inner.lock();
                        // Never clobber an in-flight execution or a model
                        // swapped while the fetch was out.
                        if inner.status.is_idle() && inner.instance.id() == current.id() {
                            inner.supported = refreshed.is_supported();
                            inner.instance = refreshed;
                            container.publish(&inner);
                        }
                    }
                    Err(err) => {
                        tracing::debug!(error = %err, "live-data refresh failed, retrying on the same delay");
                    }
                }
            }
        });
        Some(LiveDataHandle { token, task })
    }

    fn verdict(&self, instance: &BlinkInstance) -> Verdict {
        let actions = self
            .registry
            .lookup(instance.url().as_str(), TrustCategory::Actions);
        let websites = self
            .config
            .website_url
            .as_ref()
            .map(|u| self.registry.lookup(u.as_str(), TrustCategory::Websites));
        let interstitials = self.config.interstitial_url.as_ref().map(|u| {
            self.registry
                .lookup(u.as_str(), TrustCategory::Interstitials)
        });

        let overall = merge(
            std::iter::once(actions)
                .chain(websites)
                .chain(interstitials),
        );
        if overall == TrustState::Malicious {
            return Verdict::HardBlock;
        }

        let passes = self.config.security.actions.passes(actions)
            && websites.is_none_or(|s| self.config.security.websites.passes(s))
            && interstitials.is_none_or(|s| self.config.security.interstitials.passes(s));
        if passes {
            Verdict::Pass
        } else {
            Verdict::SoftBlock
        }
    }

    fn transition_to(
        &self,
        inner: &mut Inner,
        to: ExecutionStatus,
    ) -> Result<(), ContainerError> {
        if let Err(err) = validate_transition(inner.status, to) {
            tracing::error!(error = %err, "refusing invalid container transition");
            return Err(err);
        }
        inner.status = to;
        self.publish(inner);
        Ok(())
    }

    fn publish(&self, inner: &Inner) {
        let _ = self.tx.send_replace(snapshot(inner));
    }
}

/// The poll delay a live-data config actually gets, after clamping.
#[must_use]
pub fn live_data_delay(config: LiveDataConfig) -> Duration {
    Duration::from_millis(
        config
            .delay_ms
            .unwrap_or(MIN_LIVE_DATA_DELAY_MS)
            .max(MIN_LIVE_DATA_DELAY_MS),
    )
}

/// Handle to a running live-data loop.
#[derive(Debug)]
pub struct LiveDataHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl LiveDataHandle {
    /// Stop the loop.
    pub fn stop(&self) {
        self.token.cancel();
    }

    /// Returns `true` once the loop has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for LiveDataHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use blinks_core::manifest::{
        ActionLinks, ActionManifest, ActionType, ExperimentalFeatures, LinkedAction,
    };
    use blinks_core::{BASELINE_BLOCKCHAIN_ID, Supportability};
    use blinks_registry::{RegistryConfig, RegistryDocument, RegistryEntry};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::adapter::AdapterMetadata;
    use crate::security::SecurityLevel;

    struct NullAdapter;

    #[async_trait]
    impl WalletAdapter for NullAdapter {
        fn metadata(&self) -> AdapterMetadata {
            AdapterMetadata {
                supported_blockchain_ids: vec![BASELINE_BLOCKCHAIN_ID.to_string()],
            }
        }

        async fn connect(&self, _context: &ActionContext) -> Option<String> {
            None
        }

        async fn sign_transaction(
            &self,
            _transaction: &str,
            _context: &ActionContext,
        ) -> SignOutcome {
            SignOutcome::Error("unused".into())
        }

        async fn confirm_transaction(
            &self,
            _signature: &str,
            _context: &ActionContext,
        ) -> Result<(), String> {
            Ok(())
        }

        async fn sign_message(&self, _data: &str, _context: &ActionContext) -> SignOutcome {
            SignOutcome::Error("unused".into())
        }
    }

    fn manifest() -> ActionManifest {
        ActionManifest {
            icon: "https://x/i.png".into(),
            title: "t".into(),
            description: "d".into(),
            label: "Go".into(),
            disabled: false,
            action_type: ActionType::Action,
            error: None,
            links: Some(ActionLinks {
                actions: vec![LinkedAction {
                    href: "https://provider.com/api/act".into(),
                    label: "Act".into(),
                    link_type: LinkedActionType::Transaction,
                    parameters: vec![],
                }],
            }),
            experimental: None,
        }
    }

    fn instance() -> BlinkInstance {
        BlinkInstance::hydrate(
            Url::parse("https://provider.com/api/act").unwrap(),
            manifest(),
            Supportability::default(),
            None,
        )
    }

    fn registry_with(state: TrustState) -> Arc<TrustRegistry> {
        let registry = TrustRegistry::new(RegistryConfig::default());
        registry.apply(&RegistryDocument {
            actions: vec![RegistryEntry {
                host: "provider.com".into(),
                state,
            }],
            ..RegistryDocument::default()
        });
        Arc::new(registry)
    }

    fn container(
        registry: Arc<TrustRegistry>,
        config: ContainerConfig,
    ) -> Arc<BlinkContainer> {
        BlinkContainer::new(
            HttpGateway::new(),
            registry,
            Arc::new(NullAdapter),
            instance(),
            config,
        )
    }

    #[test]
    fn mount_settles_idle_for_non_malicious_host() {
        let container = container(registry_with(TrustState::Trusted), ContainerConfig::default());
        container.mount();
        assert_eq!(container.state().status, ExecutionStatus::Idle);
        assert!(container.state().supported);
    }

    #[test]
    fn mount_hard_blocks_malicious_host() {
        let container = container(
            registry_with(TrustState::Malicious),
            ContainerConfig::default(),
        );
        container.mount();
        let state = container.state();
        assert_eq!(state.status, ExecutionStatus::Blocked);
        assert!(state.hard_block);
        assert!(matches!(
            container.unblock(),
            Err(ContainerError::HardBlocked)
        ));
    }

    #[test]
    fn mount_soft_blocks_unknown_host_under_only_trusted() {
        let registry = Arc::new(TrustRegistry::new(RegistryConfig::default()));
        let config = ContainerConfig {
            security: SecurityConfig::uniform(SecurityLevel::OnlyTrusted),
            ..ContainerConfig::default()
        };
        let container = container(registry, config);
        container.mount();
        let state = container.state();
        assert_eq!(state.status, ExecutionStatus::Blocked);
        assert!(!state.hard_block);

        container.unblock().unwrap();
        assert_eq!(container.state().status, ExecutionStatus::Idle);
    }

    #[test]
    fn mount_surfaces_manifest_error() {
        let mut m = manifest();
        m.error = Some(blinks_core::ActionError {
            message: "closed for maintenance".into(),
        });
        let container = BlinkContainer::new(
            HttpGateway::new(),
            registry_with(TrustState::Trusted),
            Arc::new(NullAdapter),
            BlinkInstance::hydrate(
                Url::parse("https://provider.com/api/act").unwrap(),
                m,
                Supportability::default(),
                None,
            ),
            ContainerConfig::default(),
        );
        container.mount();
        let state = container.state();
        assert_eq!(state.status, ExecutionStatus::Error);
        assert_eq!(state.error_message.as_deref(), Some("closed for maintenance"));
    }

    #[test]
    fn website_category_participates_in_the_verdict() {
        let registry = registry_with(TrustState::Trusted);
        registry.apply(&RegistryDocument {
            actions: vec![RegistryEntry {
                host: "provider.com".into(),
                state: TrustState::Trusted,
            }],
            websites: vec![RegistryEntry {
                host: "evil-embed.com".into(),
                state: TrustState::Malicious,
            }],
            ..RegistryDocument::default()
        });
        let config = ContainerConfig {
            website_url: Some(Url::parse("https://evil-embed.com/page").unwrap()),
            ..ContainerConfig::default()
        };
        let container = container(registry, config);
        container.mount();
        assert!(container.state().hard_block);
        assert_eq!(container.state().status, ExecutionStatus::Blocked);
    }

    #[tokio::test]
    async fn execute_reblocks_when_registry_flips_after_mount() {
        let registry = registry_with(TrustState::Trusted);
        let container = container(Arc::clone(&registry), ContainerConfig::default());
        container.mount();
        assert_eq!(container.state().status, ExecutionStatus::Idle);

        // Background refresh flips the host between render and click.
        registry.apply(&RegistryDocument {
            actions: vec![RegistryEntry {
                host: "provider.com".into(),
                state: TrustState::Malicious,
            }],
            ..RegistryDocument::default()
        });

        container.execute(0, &HashMap::new()).await.unwrap();
        let state = container.state();
        assert_eq!(state.status, ExecutionStatus::Blocked);
        assert!(state.hard_block);
    }

    #[tokio::test]
    async fn execute_rejects_unknown_component_index() {
        let container = container(registry_with(TrustState::Trusted), ContainerConfig::default());
        container.mount();
        let err = container.execute(9, &HashMap::new()).await.unwrap_err();
        assert!(matches!(err, ContainerError::UnknownComponent { index: 9 }));
    }

    #[tokio::test]
    async fn execute_requires_idle() {
        let container = container(registry_with(TrustState::Trusted), ContainerConfig::default());
        // Not mounted: still checking-supportability.
        let err = container.execute(0, &HashMap::new()).await.unwrap_err();
        assert!(matches!(err, ContainerError::NotIdle { .. }));
    }

    #[tokio::test]
    async fn cancelled_connect_returns_to_idle_without_error() {
        let container = container(registry_with(TrustState::Trusted), ContainerConfig::default());
        container.mount();
        container.execute(0, &HashMap::new()).await.unwrap();
        let state = container.state();
        assert_eq!(state.status, ExecutionStatus::Idle);
        assert!(state.error_message.is_none());
        assert!(state.executing_component.is_none());
    }

    #[test]
    fn live_data_delay_is_clamped_to_the_floor() {
        let fast = LiveDataConfig {
            enabled: true,
            delay_ms: Some(50),
        };
        assert_eq!(live_data_delay(fast), Duration::from_millis(1000));

        let slow = LiveDataConfig {
            enabled: true,
            delay_ms: Some(5000),
        };
        assert_eq!(live_data_delay(slow), Duration::from_millis(5000));

        let unset = LiveDataConfig {
            enabled: true,
            delay_ms: None,
        };
        assert_eq!(live_data_delay(unset), Duration::from_millis(1000));
    }

    #[test]
    fn spawn_live_data_requires_opt_in() {
        let container = container(registry_with(TrustState::Trusted), ContainerConfig::default());
        // Manifest never opted in; no task is spawned.
        assert!(container.spawn_live_data().is_none());
    }

    #[tokio::test]
    async fn spawn_live_data_skips_disabled_config() {
        let mut m = manifest();
        m.experimental = Some(ExperimentalFeatures {
            live_data: Some(LiveDataConfig {
                enabled: false,
                delay_ms: Some(2000),
            }),
        });
        let container = BlinkContainer::new(
            HttpGateway::new(),
            registry_with(TrustState::Trusted),
            Arc::new(NullAdapter),
            BlinkInstance::hydrate(
                Url::parse("https://provider.com/api/act").unwrap(),
                m,
                Supportability::default(),
                None,
            ),
            ContainerConfig::default(),
        );
        assert!(container.spawn_live_data().is_none());
    }
}
