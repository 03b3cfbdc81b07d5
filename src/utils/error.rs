use thiserror::Error;

#[derive(Error, Debug)]
pub enum CondoTvError {
    #[error("{entity} not found: {key}")]
    NotFound { entity: String, key: String },

    #[error("Manager '{manager}' reached the limit of {limit} notices (currently {current})")]
    QuotaExceeded {
        manager: String,
        limit: usize,
        current: usize,
    },

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("News provider '{source_name}' failed: {message}")]
    NewsProviderError {
        source_name: String,
        message: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Lookup,
    Network,
    Storage,
    Configuration,
    Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CondoTvError {
    pub fn not_found(entity: &str, key: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            key: key.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::Lookup,
            Self::HttpError(_) | Self::NewsProviderError { .. } => ErrorCategory::Network,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::Storage,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::QuotaExceeded { .. } | Self::ValidationError { .. } => ErrorCategory::Input,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Lookup | ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "Check the identifier or connection code and try again",
            Self::QuotaExceeded { .. } => {
                "Remove an existing notice or raise the manager's notice limit"
            }
            Self::HttpError(_) | Self::NewsProviderError { .. } => {
                "Check network connectivity and the configured feed URLs"
            }
            Self::IoError(_) => "Make sure the snapshot path exists and is writable",
            Self::SerializationError(_) => "Make sure the snapshot file is valid JSON",
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => "Review the TOML configuration file",
            Self::ValidationError { .. } => "Correct the input values and retry",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::NotFound { entity, .. } => format!("{} was not found", entity),
            Self::HttpError(_) => "Could not reach an external service".to_string(),
            Self::SerializationError(_) => "Stored data could not be read".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CondoTvError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_lookup_error() {
        let err = CondoTvError::not_found("TV", "12345");
        assert_eq!(err.category(), ErrorCategory::Lookup);
        assert_eq!(err.to_string(), "TV not found: 12345");
        assert_eq!(err.user_friendly_message(), "TV was not found");
    }

    #[test]
    fn test_severity_ordering() {
        let news = CondoTvError::NewsProviderError {
            source_name: "feed".to_string(),
            message: "timeout".to_string(),
        };
        let io = CondoTvError::IoError(std::io::Error::other("disk"));
        assert!(news.severity() < io.severity());
    }
}
