//! Typed user inputs declared by a linked action.

use serde::{Deserialize, Serialize};

/// The kind of a parameter, determining its input widget and value
/// semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParameterKind {
    /// Free-form text (the default when a manifest omits the type).
    #[default]
    Text,
    /// Email address input.
    Email,
    /// URL input.
    Url,
    /// Numeric input.
    Number,
    /// Calendar date input.
    Date,
    /// Date + time input (wire name `datetime-local`).
    DatetimeLocal,
    /// Multi-select checkboxes.
    Checkbox,
    /// Single-select radio group.
    Radio,
    /// Single-select dropdown.
    Select,
    /// Multi-line text input.
    Textarea,
}

impl ParameterKind {
    /// Returns `true` if this kind collects multiple values at once.
    ///
    /// Multi-value kinds join their selections with `,` on href
    /// interpolation and POST as an array.
    #[must_use]
    pub fn is_multi_value(&self) -> bool {
        matches!(self, Self::Checkbox)
    }

    /// Returns `true` if this kind selects from declared [`ParameterOption`]s.
    #[must_use]
    pub fn has_options(&self) -> bool {
        matches!(self, Self::Checkbox | Self::Radio | Self::Select)
    }
}

/// One selectable option of a checkbox / radio / select parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterOption {
    /// Display label.
    pub label: String,
    /// Value submitted when chosen.
    pub value: String,
    /// Pre-selected in the UI.
    #[serde(default)]
    pub selected: bool,
}

/// A typed input a linked action collects before POSTing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionParameter {
    /// Key used in href placeholders and the POST `data` map.
    pub name: String,
    /// Input widget kind.
    #[serde(default, rename = "type")]
    pub kind: ParameterKind,
    /// Placeholder / display label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Whether a value must be provided before executing.
    #[serde(default)]
    pub required: bool,
    /// Options for kinds that select from a list.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ParameterOption>,
    /// Minimum value / length, kind-dependent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Maximum value / length, kind-dependent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Client-side validation regex.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Message shown when `pattern` rejects the input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_description: Option<String>,
}

impl ActionParameter {
    /// A bare named parameter of the given kind, for construction in code.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ParameterKind) -> Self {
        Self {
            name: name.into(),
            kind,
            label: None,
            required: false,
            options: Vec::new(),
            min: None,
            max: None,
            pattern: None,
            pattern_description: None,
        }
    }
}
