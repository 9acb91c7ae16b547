//! Interactive components derived from a manifest's linked actions.
//!
//! Components are a tagged union rather than a class hierarchy: dispatch is
//! an exhaustive `match` on the variant, and a Form's per-field views
//! reference their owning form by index in the component list — a
//! foreign-key-style reference, never an ownership edge.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::ComponentError;
use crate::manifest::{ActionManifest, ActionType, LinkedActionType};
use crate::parameter::ActionParameter;

/// Discriminant of an [`ActionComponent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// Plain trigger, no inputs.
    Button,
    /// One single-valued input plus a trigger.
    SingleValue,
    /// One multi-valued input plus a trigger.
    MultiValue,
    /// Several inputs submitted together.
    Form,
}

/// An interactive component built from one linked action.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionComponent {
    /// Plain trigger, no inputs.
    Button {
        /// Button label.
        label: String,
        /// Target href.
        href: String,
        /// How execution resolves.
        link_type: LinkedActionType,
    },
    /// One single-valued input plus a trigger.
    SingleValue {
        /// Submit label.
        label: String,
        /// Target href, may carry a `{param}` placeholder.
        href: String,
        /// How execution resolves.
        link_type: LinkedActionType,
        /// The input collected before executing.
        parameter: ActionParameter,
    },
    /// One multi-valued input (checkbox group) plus a trigger.
    MultiValue {
        /// Submit label.
        label: String,
        /// Target href, may carry a `{param}` placeholder.
        href: String,
        /// How execution resolves.
        link_type: LinkedActionType,
        /// The input collected before executing.
        parameter: ActionParameter,
    },
    /// Several inputs submitted together.
    Form {
        /// Submit label.
        label: String,
        /// Target href, may carry `{param}` placeholders.
        href: String,
        /// How execution resolves.
        link_type: LinkedActionType,
        /// Inputs in declared order.
        parameters: Vec<ActionParameter>,
    },
}

/// A per-field view of a Form component.
///
/// `form_index` points back at the owning Form in the instance's component
/// list, purely so input callbacks can route to it.
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    /// Index of the owning Form in the component list.
    pub form_index: usize,
    /// The field's parameter.
    pub parameter: ActionParameter,
}

/// The submit-trigger view of a Form component, referencing its owner the
/// same way [`FormField`] does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormButton {
    /// Index of the owning Form in the component list.
    pub form_index: usize,
    /// Submit label.
    pub label: String,
}

/// An href resolved against user input, ready to POST.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRequest {
    /// Href with all placeholders substituted.
    pub href: String,
    /// Parameter values not substituted into the href; these travel in the
    /// POST body's `data` map instead.
    pub data: serde_json::Map<String, Value>,
}

impl ActionComponent {
    /// The variant discriminant.
    #[must_use]
    pub fn kind(&self) -> ComponentKind {
        match self {
            Self::Button { .. } => ComponentKind::Button,
            Self::SingleValue { .. } => ComponentKind::SingleValue,
            Self::MultiValue { .. } => ComponentKind::MultiValue,
            Self::Form { .. } => ComponentKind::Form,
        }
    }

    /// Display label.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Button { label, .. }
            | Self::SingleValue { label, .. }
            | Self::MultiValue { label, .. }
            | Self::Form { label, .. } => label,
        }
    }

    /// Unresolved href template.
    #[must_use]
    pub fn href_template(&self) -> &str {
        match self {
            Self::Button { href, .. }
            | Self::SingleValue { href, .. }
            | Self::MultiValue { href, .. }
            | Self::Form { href, .. } => href,
        }
    }

    /// How executing this component resolves.
    #[must_use]
    pub fn link_type(&self) -> LinkedActionType {
        match self {
            Self::Button { link_type, .. }
            | Self::SingleValue { link_type, .. }
            | Self::MultiValue { link_type, .. }
            | Self::Form { link_type, .. } => *link_type,
        }
    }

    /// The parameters this component collects, in declared order.
    #[must_use]
    pub fn parameters(&self) -> &[ActionParameter] {
        match self {
            Self::Button { .. } => &[],
            Self::SingleValue { parameter, .. } | Self::MultiValue { parameter, .. } => {
                std::slice::from_ref(parameter)
            }
            Self::Form { parameters, .. } => parameters,
        }
    }

    /// Per-field views of a Form; empty for every other variant.
    #[must_use]
    pub fn form_fields(&self, form_index: usize) -> Vec<FormField> {
        match self {
            Self::Form { parameters, .. } => parameters
                .iter()
                .cloned()
                .map(|parameter| FormField {
                    form_index,
                    parameter,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// The submit-trigger view of a Form; `None` for every other variant.
    #[must_use]
    pub fn form_button(&self, form_index: usize) -> Option<FormButton> {
        match self {
            Self::Form { label, .. } => Some(FormButton {
                form_index,
                label: label.clone(),
            }),
            _ => None,
        }
    }

    /// Resolve the href against user input.
    ///
    /// Each `{name}` placeholder is substituted with the (url-encoded)
    /// value; multi-valued inputs join with `,`. Values not referenced by
    /// the href land in [`ResolvedRequest::data`]. Fails if a required
    /// parameter is missing or any placeholder remains unresolved.
    pub fn resolve(
        &self,
        values: &HashMap<String, Vec<String>>,
    ) -> Result<ResolvedRequest, ComponentError> {
        let mut href = self.href_template().to_string();
        let mut data = serde_json::Map::new();

        for param in self.parameters() {
            let provided = values.get(&param.name).filter(|v| !v.is_empty());
            let Some(provided) = provided else {
                if param.required {
                    return Err(ComponentError::MissingParameter {
                        name: param.name.clone(),
                    });
                }
                continue;
            };

            let placeholder = format!("{{{}}}", param.name);
            if href.contains(&placeholder) {
                let joined = provided
                    .iter()
                    .map(|v| encode(v))
                    .collect::<Vec<_>>()
                    .join(",");
                href = href.replace(&placeholder, &joined);
            } else if param.kind.is_multi_value() {
                data.insert(
                    param.name.clone(),
                    Value::Array(provided.iter().cloned().map(Value::String).collect()),
                );
            } else {
                data.insert(param.name.clone(), Value::String(provided[0].clone()));
            }
        }

        if has_placeholder(&href) {
            return Err(ComponentError::UnresolvedPlaceholders { href });
        }

        Ok(ResolvedRequest { href, data })
    }
}

/// Build the component list for a manifest.
///
/// Deterministic mapping: no parameters ⇒ Button; more than one ⇒ Form;
/// exactly one multi-value parameter ⇒ MultiValue; else SingleValue. A
/// manifest with no links, or of type `completed`, yields one fallback
/// Button targeting the action URL itself.
#[must_use]
pub fn components_for(manifest: &ActionManifest, action_url: &str) -> Vec<ActionComponent> {
    let links = manifest.linked_actions();
    if links.is_empty() || manifest.action_type == ActionType::Completed {
        return vec![ActionComponent::Button {
            label: manifest.label.clone(),
            href: action_url.to_string(),
            link_type: LinkedActionType::Transaction,
        }];
    }

    links
        .iter()
        .map(|link| match link.parameters.as_slice() {
            [] => ActionComponent::Button {
                label: link.label.clone(),
                href: link.href.clone(),
                link_type: link.link_type,
            },
            [parameter] if parameter.kind.is_multi_value() => ActionComponent::MultiValue {
                label: link.label.clone(),
                href: link.href.clone(),
                link_type: link.link_type,
                parameter: parameter.clone(),
            },
            [parameter] => ActionComponent::SingleValue {
                label: link.label.clone(),
                href: link.href.clone(),
                link_type: link.link_type,
                parameter: parameter.clone(),
            },
            _ => ActionComponent::Form {
                label: link.label.clone(),
                href: link.href.clone(),
                link_type: link.link_type,
                parameters: link.parameters.clone(),
            },
        })
        .collect()
}

fn encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

fn has_placeholder(href: &str) -> bool {
    // Placeholders are `{name}` with a non-empty body.
    let mut rest = href;
    while let Some(open) = rest.find('{') {
        if let Some(close) = rest[open + 1..].find('}') {
            if close > 0 {
                return true;
            }
            rest = &rest[open + close + 2..];
        } else {
            return false;
        }
    }
    false
}
