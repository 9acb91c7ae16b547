//! Action POST wire types.

use blinks_core::NextActionLink;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of an action POST.
///
/// `data` carries only the parameters that were not substituted into the
/// href's placeholders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRequest {
    /// The connected account, as the wallet adapter reported it.
    pub account: String,
    /// Link type being executed, when not the default `transaction`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub action_type: Option<String>,
    /// Un-substituted parameter values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Map<String, Value>>,
}

/// Success body of an action POST.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    /// Base64 transaction to sign; absent for `post`-type links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction: Option<String>,
    /// Message shown on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Followup chaining links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<PostResponseLinks>,
}

/// The `links` object of a POST response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostResponseLinks {
    /// The followup action to chain to.
    pub next: NextActionLink,
}

impl PostResponse {
    /// The followup link, if the response chains.
    #[must_use]
    pub fn next_link(&self) -> Option<&NextActionLink> {
        self.links.as_ref().map(|l| &l.next)
    }
}

/// Body POSTed to a `post`-type next-action link while chaining.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainData {
    /// The connected account.
    pub account: String,
    /// Signature of the just-confirmed transaction, when one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}
