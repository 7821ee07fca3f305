use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarketplaceError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    ApiStatusError { status: u16, message: String },

    #[error("Authentication rejected ({status}): {message}")]
    AuthError { status: u16, message: String },

    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    #[error("Background request task failed: {0}")]
    TaskError(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Authentication,
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

impl MarketplaceError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            // 2xx 但回應內容解析失敗
            Self::ApiError(e) if e.is_decode() => ErrorCategory::Data,
            Self::ApiError(_) | Self::ApiStatusError { .. } | Self::TaskError(_) => {
                ErrorCategory::Network
            }
            Self::AuthError { .. } => ErrorCategory::Authentication,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::NotFound { .. } | Self::SerializationError(_) | Self::ValidationError { .. } => {
                ErrorCategory::Data
            }
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ApiError(e) if e.is_decode() => ErrorSeverity::High,
            // 伺服器暫時性錯誤，使用者可以自行重試
            Self::ApiError(_) => ErrorSeverity::Medium,
            Self::ApiStatusError { status, .. } if *status >= 500 => ErrorSeverity::Medium,
            Self::ApiStatusError { .. } => ErrorSeverity::High,
            Self::NotFound { .. } | Self::ValidationError { .. } => ErrorSeverity::High,
            Self::AuthError { .. } => ErrorSeverity::High,
            Self::SerializationError(_) => ErrorSeverity::High,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorSeverity::High,
            Self::IoError(_) | Self::TaskError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::ApiError(e) if e.is_decode() => {
                "Check that api.base_url points at the marketplace API; the response body was not the expected JSON".to_string()
            }
            Self::ApiError(_) => {
                "Check network connectivity and that api.base_url is reachable".to_string()
            }
            Self::ApiStatusError { status, .. } if *status >= 500 => {
                "The marketplace backend is failing; try again later".to_string()
            }
            Self::ApiStatusError { .. } => {
                "Check the request values against what the backend accepts".to_string()
            }
            Self::AuthError { .. } => {
                "Refresh your access token and set DSP_API_TOKEN or --token".to_string()
            }
            Self::NotFound { resource, .. } => {
                format!("Verify the {} id exists and is visible to this account", resource)
            }
            Self::TaskError(_) => "Re-run the command; no partial results were kept".to_string(),
            Self::IoError(_) => "Check file paths and write permissions".to_string(),
            Self::SerializationError(_) => {
                "Check that the JSON input matches the expected record shape".to_string()
            }
            Self::ConfigError { .. } | Self::ConfigValidationError { .. } => {
                "Fix the configuration file and try again".to_string()
            }
            Self::InvalidConfigValueError { field, .. } => {
                format!("Correct the value of '{}' in the configuration", field)
            }
            Self::MissingConfigError { field } => {
                format!("Add '{}' to the configuration or pass it on the command line", field)
            }
            Self::ValidationError { .. } => "Fill in the required fields".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ApiError(e) if e.is_decode() => {
                "The marketplace service sent a response that could not be read".to_string()
            }
            Self::ApiError(_) => "Could not reach the marketplace service".to_string(),
            Self::ApiStatusError { message, .. } => format!("The server rejected the request: {}", message),
            Self::AuthError { .. } => "Your session is not authorized".to_string(),
            Self::NotFound { resource, id } => format!("{} '{}' was not found", resource, id),
            Self::ValidationError { message } => message.clone(),
            Self::MissingConfigError { field } => format!("Missing setting: {}", field),
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            other => other.to_string(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.severity() == ErrorSeverity::Medium
    }
}

pub type Result<T> = std::result::Result<T, MarketplaceError>;
