//! The injected wallet collaborator.

use async_trait::async_trait;
use url::Url;

/// Context handed to every adapter call.
#[derive(Debug, Clone)]
pub struct ActionContext {
    /// The action's source URL.
    pub url: Url,
    /// Manifest title.
    pub action_title: String,
    /// Label of the triggered component, when one triggered this call.
    pub component_label: Option<String>,
}

/// Static adapter capabilities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterMetadata {
    /// CAIP-2 blockchain ids the wallet can sign for.
    pub supported_blockchain_ids: Vec<String>,
}

/// Outcome of a signing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignOutcome {
    /// The user signed; carries the signature.
    Signature(String),
    /// The wallet declined or the user cancelled.
    Error(String),
}

/// The wallet seam: everything cryptographic or chain-facing lives behind
/// this trait. The container owns sequencing and state; the adapter owns
/// keys and RPC.
#[async_trait]
pub trait WalletAdapter: Send + Sync {
    /// What the wallet supports.
    fn metadata(&self) -> AdapterMetadata;

    /// Connect and return the account, or `None` when the user cancels.
    async fn connect(&self, context: &ActionContext) -> Option<String>;

    /// Sign a base64-encoded transaction.
    async fn sign_transaction(&self, transaction: &str, context: &ActionContext) -> SignOutcome;

    /// Wait for a signed transaction to confirm on chain.
    async fn confirm_transaction(
        &self,
        signature: &str,
        context: &ActionContext,
    ) -> Result<(), String>;

    /// Sign an arbitrary message.
    async fn sign_message(&self, data: &str, context: &ActionContext) -> SignOutcome;
}
