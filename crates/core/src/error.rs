//! Component-level error types.

use thiserror::Error;

/// Errors raised while resolving a component into a POSTable request.
#[derive(Debug, Error)]
pub enum ComponentError {
    /// A required parameter has no value.
    #[error("missing required parameter: {name}")]
    MissingParameter {
        /// Name of the parameter.
        name: String,
    },

    /// The href still carries `{placeholder}` markers after substitution.
    ///
    /// An href with unresolved placeholders must never be POSTed.
    #[error("unresolved placeholders in href: {href}")]
    UnresolvedPlaceholders {
        /// The offending href.
        href: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_parameter_display() {
        let err = ComponentError::MissingParameter {
            name: "amount".into(),
        };
        assert_eq!(err.to_string(), "missing required parameter: amount");
    }

    #[test]
    fn unresolved_placeholders_display() {
        let err = ComponentError::UnresolvedPlaceholders {
            href: "/api/buy?q={amount}".into(),
        };
        assert!(err.to_string().contains("{amount}"));
    }
}
