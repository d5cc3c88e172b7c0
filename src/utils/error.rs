use thiserror::Error;

#[derive(Error, Debug)]
pub enum QaError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("{service} API returned {status}: {message}")]
    ApiError {
        service: String,
        status: u16,
        message: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Index '{name}' was not found")]
    IndexNotFound { name: String },

    #[error("Embedding count mismatch: expected {expected} vectors, got {actual}")]
    EmbeddingCountMismatch { expected: usize, actual: usize },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    ExternalService,
    Configuration,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl QaError {
    pub fn api(service: &str, status: u16, message: impl Into<String>) -> Self {
        QaError::ApiError {
            service: service.to_string(),
            status,
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            QaError::HttpError(_) => ErrorCategory::Network,
            QaError::ApiError { .. } | QaError::IndexNotFound { .. } => {
                ErrorCategory::ExternalService
            }
            QaError::ConfigValidationError { .. }
            | QaError::InvalidConfigValueError { .. }
            | QaError::MissingConfigError { .. } => ErrorCategory::Configuration,
            QaError::SerializationError(_)
            | QaError::EmbeddingCountMismatch { .. }
            | QaError::ProcessingError { .. } => ErrorCategory::Data,
            QaError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            QaError::HttpError(_) => ErrorSeverity::Medium,
            // 429 and 5xx are worth running again later
            QaError::ApiError { status, .. } if *status == 429 || *status >= 500 => {
                ErrorSeverity::Medium
            }
            QaError::ApiError { .. }
            | QaError::IndexNotFound { .. }
            | QaError::ConfigValidationError { .. }
            | QaError::InvalidConfigValueError { .. }
            | QaError::MissingConfigError { .. }
            | QaError::SerializationError(_)
            | QaError::EmbeddingCountMismatch { .. }
            | QaError::ProcessingError { .. } => ErrorSeverity::High,
            QaError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            QaError::HttpError(_) => {
                "Check your network connection and the configured service URLs".to_string()
            }
            QaError::ApiError { status: 401, service, .. }
            | QaError::ApiError { status: 403, service, .. } => {
                format!("Check that the {} API key is valid", service)
            }
            QaError::ApiError { status: 429, .. } => {
                "Rate limit reached, wait a moment and try again".to_string()
            }
            QaError::ApiError { service, .. } => {
                format!("Inspect the {} response above and your request settings", service)
            }
            QaError::IndexNotFound { .. } => {
                "Run `docqa setup` to create the index first".to_string()
            }
            QaError::ConfigValidationError { .. } | QaError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command-line flags".to_string()
            }
            QaError::MissingConfigError { field } => {
                format!("Set '{}' in the config file or its environment variable", field)
            }
            QaError::EmbeddingCountMismatch { .. } => {
                "Check that the embedding model accepts batched input".to_string()
            }
            QaError::SerializationError(_) | QaError::ProcessingError { .. } => {
                "Check the input documents and service responses".to_string()
            }
            QaError::IoError(_) => "Check file paths and permissions".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach a remote service: {}", self),
            ErrorCategory::ExternalService => format!("A remote service rejected the request: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Data => format!("Could not process the data: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, QaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_is_retryable_severity() {
        let err = QaError::api("OpenAI", 429, "slow down");
        assert_eq!(err.category(), ErrorCategory::ExternalService);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.recovery_suggestion().contains("Rate limit"));
    }

    #[test]
    fn test_auth_failure_names_service() {
        let err = QaError::api("Pinecone", 401, "invalid key");
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(err.recovery_suggestion(), "Check that the Pinecone API key is valid");
        assert_eq!(err.to_string(), "Pinecone API returned 401: invalid key");
    }

    #[test]
    fn test_missing_config_message() {
        let err = QaError::MissingConfigError {
            field: "openai.api_key".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(err.user_friendly_message().starts_with("Configuration problem"));
        assert!(err.recovery_suggestion().contains("openai.api_key"));
    }

    #[test]
    fn test_invalid_values_point_at_config() {
        let errors = [
            QaError::ConfigValidationError {
                field: "config".to_string(),
                message: "bad toml".to_string(),
            },
            QaError::InvalidConfigValueError {
                field: "index.metric".to_string(),
                value: "manhattan".to_string(),
                reason: "unknown metric".to_string(),
            },
        ];
        for err in errors {
            assert_eq!(err.category(), ErrorCategory::Configuration);
            assert_eq!(err.severity(), ErrorSeverity::High);
            assert_eq!(
                err.recovery_suggestion(),
                "Fix the configuration file or command-line flags"
            );
        }
    }

    #[test]
    fn test_io_error_is_critical() {
        let err = QaError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }
}
