use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatchError {
    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Rule type '{rule_type}' is not a known rule contributor")]
    InvalidRuleType { rule_type: String },

    #[error("Rule '{rule_type}' has duplicated parameters")]
    DuplicatedParameters { rule_type: String },

    #[error("Parameter '{parameter}' is not declared by rule '{rule_type}'")]
    InvalidParameter { parameter: String, rule_type: String },

    #[error("Rule '{rule_type}' is not registered in the contributor registry")]
    RuleNotRegistered { rule_type: String },

    #[error("Person {id} not found")]
    PersonNotFound { id: String },

    #[error("Strategy {reference} not found")]
    StrategyNotFound { reference: String },

    #[error("Strategy with name '{name}' already exists")]
    StrategyAlreadyExists { name: String },

    #[error("Lookup of {what} timed out after {timeout_ms}ms")]
    LookupTimeout { what: String, timeout_ms: u64 },

    #[error("Configuration error in '{field}': {message}")]
    ConfigError { field: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Coarse grouping of errors, mirrors how a transport layer would answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Caller supplied bad input (400).
    Validation,
    /// Referenced person or strategy does not exist (404).
    NotFound,
    /// Write clashes with existing state (409).
    Conflict,
    /// Deployment or configuration bug (500).
    Configuration,
    /// Anything else going wrong on our side (500).
    Internal,
}

impl MatchError {
    pub fn validation(message: impl Into<String>) -> Self {
        MatchError::ValidationError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            MatchError::ValidationError { .. }
            | MatchError::InvalidRuleType { .. }
            | MatchError::DuplicatedParameters { .. }
            | MatchError::InvalidParameter { .. } => ErrorCategory::Validation,
            MatchError::PersonNotFound { .. } | MatchError::StrategyNotFound { .. } => {
                ErrorCategory::NotFound
            }
            MatchError::StrategyAlreadyExists { .. } => ErrorCategory::Conflict,
            MatchError::RuleNotRegistered { .. } | MatchError::ConfigError { .. } => {
                ErrorCategory::Configuration
            }
            MatchError::LookupTimeout { .. }
            | MatchError::IoError(_)
            | MatchError::SerializationError(_) => ErrorCategory::Internal,
        }
    }

    /// True when retrying with corrected input can succeed.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Validation | ErrorCategory::NotFound | ErrorCategory::Conflict
        )
    }
}

pub type Result<T> = std::result::Result<T, MatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(
            MatchError::validation("bad").category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            MatchError::RuleNotRegistered {
                rule_type: "Unknown".to_string()
            }
            .category(),
            ErrorCategory::Configuration
        );
        assert_eq!(
            MatchError::PersonNotFound {
                id: "42".to_string()
            }
            .category(),
            ErrorCategory::NotFound
        );
    }

    #[test]
    fn test_client_errors() {
        assert!(MatchError::StrategyAlreadyExists {
            name: "Default".to_string()
        }
        .is_client_error());
        assert!(!MatchError::RuleNotRegistered {
            rule_type: "Unknown".to_string()
        }
        .is_client_error());
    }
}
