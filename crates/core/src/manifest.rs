//! The action manifest wire shape.
//!
//! An action provider answers a manifest GET with this JSON document. Field
//! names on the wire are camelCase; everything optional is `#[serde(default)]`
//! so a minimal manifest (icon/title/description/label) still parses.

use serde::{Deserialize, Serialize};

use crate::parameter::ActionParameter;

/// A fetched action manifest describing a transaction-triggering UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionManifest {
    /// Image URL shown alongside the action.
    pub icon: String,
    /// Short title.
    pub title: String,
    /// Longer description.
    pub description: String,
    /// Label for the fallback button when no links are present.
    pub label: String,
    /// Whether the whole action is disabled.
    #[serde(default)]
    pub disabled: bool,
    /// Manifest kind; `completed` manifests render a single inert button.
    #[serde(default, rename = "type")]
    pub action_type: ActionType,
    /// Provider-supplied error to surface to the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ActionError>,
    /// Linked sub-actions (buttons/forms) derived into components.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<ActionLinks>,
    /// Opt-in experimental features.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experimental: Option<ExperimentalFeatures>,
}

/// Kind of a manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    /// A live, executable action.
    #[default]
    Action,
    /// A finished action; rendered but no longer executable.
    Completed,
}

/// Provider-supplied error message carried on manifests and POST failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionError {
    /// Human-readable message.
    pub message: String,
}

/// The `links` object of a manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionLinks {
    /// Linked actions in declared order.
    pub actions: Vec<LinkedAction>,
}

/// One linked action inside a manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedAction {
    /// Target href; may contain `{param}` placeholders.
    pub href: String,
    /// Button / submit label.
    pub label: String,
    /// How executing this link resolves.
    #[serde(default, rename = "type")]
    pub link_type: LinkedActionType,
    /// Typed user inputs collected before the POST.
    #[serde(default)]
    pub parameters: Vec<ActionParameter>,
}

/// How a linked action resolves when executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkedActionType {
    /// POST resolves to a transaction to sign.
    #[default]
    Transaction,
    /// POST resolves to a followup action without a transaction.
    Post,
    /// Navigates away; nothing to sign.
    ExternalLink,
}

/// Experimental manifest features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentalFeatures {
    /// Live-data refresh opt-in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_data: Option<LiveDataConfig>,
}

/// Live-data polling configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveDataConfig {
    /// Whether the provider wants the manifest re-polled while idle.
    pub enabled: bool,
    /// Requested poll delay in milliseconds; clamped to a floor by the
    /// container.
    #[serde(default)]
    pub delay_ms: Option<u64>,
}

/// Followup link attached to a successful action POST response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NextActionLink {
    /// The followup manifest is embedded in the response.
    Inline {
        /// The embedded manifest.
        action: ActionManifest,
    },
    /// The followup manifest is obtained by POSTing to `href`.
    Post {
        /// Same-origin target; cross-origin hrefs are refused by `chain`.
        href: String,
    },
}

impl ActionManifest {
    /// Requested live-data config, if the manifest opted in.
    #[must_use]
    pub fn live_data(&self) -> Option<LiveDataConfig> {
        self.experimental.as_ref().and_then(|e| e.live_data)
    }

    /// Linked actions in declared order, empty when none are present.
    #[must_use]
    pub fn linked_actions(&self) -> &[LinkedAction] {
        self.links.as_ref().map_or(&[], |l| l.actions.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn minimal_manifest_parses_with_defaults() {
        let manifest: ActionManifest = serde_json::from_str(
            r#"{"icon":"https://x/i.png","title":"t","description":"d","label":"Go"}"#,
        )
        .unwrap();
        assert!(!manifest.disabled);
        assert_eq!(manifest.action_type, ActionType::Action);
        assert!(manifest.error.is_none());
        assert!(manifest.linked_actions().is_empty());
        assert!(manifest.live_data().is_none());
    }

    #[test]
    fn completed_type_parses() {
        let manifest: ActionManifest = serde_json::from_str(
            r#"{"icon":"i","title":"t","description":"d","label":"Done","type":"completed"}"#,
        )
        .unwrap();
        assert_eq!(manifest.action_type, ActionType::Completed);
    }

    #[test]
    fn linked_action_type_defaults_to_transaction() {
        let link: LinkedAction =
            serde_json::from_str(r#"{"href":"/api/act","label":"Act"}"#).unwrap();
        assert_eq!(link.link_type, LinkedActionType::Transaction);
        assert!(link.parameters.is_empty());
    }

    #[test]
    fn next_action_link_is_tagged_by_type() {
        let link: NextActionLink =
            serde_json::from_str(r#"{"type":"post","href":"/api/next"}"#).unwrap();
        assert_eq!(
            link,
            NextActionLink::Post {
                href: "/api/next".into()
            }
        );

        let inline: NextActionLink = serde_json::from_str(
            r#"{"type":"inline","action":{"icon":"i","title":"t","description":"d","label":"l"}}"#,
        )
        .unwrap();
        assert!(matches!(inline, NextActionLink::Inline { .. }));
    }

    #[test]
    fn live_data_config_reads_delay() {
        let manifest: ActionManifest = serde_json::from_str(
            r#"{"icon":"i","title":"t","description":"d","label":"l",
                "experimental":{"liveData":{"enabled":true,"delayMs":5000}}}"#,
        )
        .unwrap();
        let live = manifest.live_data().unwrap();
        assert!(live.enabled);
        assert_eq!(live.delay_ms, Some(5000));
    }
}
