//! errors raised while reading typed values
//!
//! Flattening and store mutation never fail. Only interpolation and type coercion
//! produce a [ConfigError], plus mutation attempts on read-only key spaces.

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("'{0}' doesn't map to an existing value")]
    MissingKey(String),

    #[error("'{key}' doesn't map to a {expected} value (found {found})")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("'{key}' is not a valid {expected}: {reason}")]
    Format {
        key: String,
        expected: &'static str,
        reason: String,
    },

    #[error("infinite loop in property interpolation of '{key}' ({chain})")]
    InterpolationCycle { key: String, chain: String },

    #[error("property interpolation of '{key}' exceeds the maximum depth of {max_depth}")]
    InterpolationDepth { key: String, max_depth: usize },

    #[error("{operation} is not supported by {target}")]
    Unsupported {
        operation: &'static str,
        target: &'static str,
    },
}
