//! Error types for rule evaluation and configuration loading.

use std::path::PathBuf;

use thiserror::Error;

/// Failure raised from inside a rule's condition or action.
///
/// The fail-open engine logs these and moves on; the strict engine wraps the
/// first one in [`RuleError::Failed`] and returns it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// The rule could not compute its result (bad input, overflow, ...).
    #[error("evaluation failed: {0}")]
    Evaluation(String),

    /// A rule failed during a strict pass.
    #[error("rule `{rule_id}` failed: {source}")]
    Failed {
        rule_id: String,
        #[source]
        source: Box<RuleError>,
    },
}

impl RuleError {
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    pub fn failed(rule_id: impl Into<String>, source: RuleError) -> Self {
        Self::Failed {
            rule_id: rule_id.into(),
            source: Box::new(source),
        }
    }

    /// Id of the failing rule, when known.
    pub fn rule_id(&self) -> Option<&str> {
        match self {
            Self::Failed { rule_id, .. } => Some(rule_id),
            Self::Evaluation(_) => None,
        }
    }
}

/// Failure loading or validating a [`crate::RulesConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }
}
