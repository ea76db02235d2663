//! Error types for cluster configuration.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::duration::ConfigDuration;

/// Configuration result type.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// A constraint broken at the validation checkpoint.
///
/// Violations are collected after every option has been applied, so a
/// single failed build reports all of them at once.
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    /// A required string field is absent or empty.
    MissingRequiredField { field: &'static str },
    /// An integer field is outside its declared bounds.
    OutOfRangeField {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
    /// A duration field is below its floor.
    BelowMinimumDuration {
        field: &'static str,
        value: ConfigDuration,
        min: ConfigDuration,
    },
}

impl Violation {
    /// Name of the option that failed.
    pub fn field(&self) -> &'static str {
        match self {
            Violation::MissingRequiredField { field }
            | Violation::OutOfRangeField { field, .. }
            | Violation::BelowMinimumDuration { field, .. } => *field,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::MissingRequiredField { field } => {
                write!(f, "{} is required", field)
            }
            Violation::OutOfRangeField {
                field,
                value,
                min,
                max,
            } => write!(f, "{} must be between {} and {}, got {}", field, min, max, value),
            Violation::BelowMinimumDuration { field, value, min } => {
                write!(f, "{} must be at least {}, got {}", field, min, value)
            }
        }
    }
}

/// Cluster configuration errors.
///
/// Every variant is fatal to startup. `Parse`, `InvalidValue` and
/// `UnknownOption` are raised as soon as the offending option is applied;
/// `Validation` is raised by the checkpoint that runs before a config is
/// handed out.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A JSON-valued option is malformed or not an object of strings.
    #[error("Failed to parse {key}: {source}")]
    Parse {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Option text does not parse as the option's type.
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    /// The option is not recognized.
    #[error("Unknown configuration option: {key}")]
    UnknownOption { key: String },

    /// One or more constraints failed at the validation checkpoint.
    #[error("Invalid configuration: {}", join_violations(.0))]
    Validation(Vec<Violation>),

    /// A properties or TOML source is malformed.
    #[error("Malformed configuration source: {message}")]
    Source { message: String },

    /// A configuration file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The cluster address does not form a valid URI.
    #[error("Invalid cluster address: {reason}")]
    InvalidAddress { reason: String },
}

impl ConfigError {
    /// Create a malformed-source error.
    pub fn source_error(message: impl Into<String>) -> Self {
        Self::Source {
            message: message.into(),
        }
    }

    /// Violations reported by the validation checkpoint, if any.
    pub fn violations(&self) -> &[Violation] {
        match self {
            ConfigError::Validation(violations) => violations,
            _ => &[],
        }
    }

    /// Prefix option keys with the cluster namespace they were read from.
    pub(crate) fn qualify(self, prefix: &str) -> Self {
        if prefix.is_empty() {
            return self;
        }
        let qualified = |key: String| format!("{}.{}", prefix, key);
        match self {
            ConfigError::Parse { key, source } => ConfigError::Parse {
                key: qualified(key),
                source,
            },
            ConfigError::InvalidValue { key, value, reason } => ConfigError::InvalidValue {
                key: qualified(key),
                value,
                reason,
            },
            ConfigError::UnknownOption { key } => ConfigError::UnknownOption {
                key: qualified(key),
            },
            other => other,
        }
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(Violation::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
