use crate::domain::model::BulkResult;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PushError {
    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Validation error: token at index {index}: {message}")]
    InvalidTokenError { index: usize, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Template source could not be parsed: {message}")]
    TemplateParseError { message: String },

    #[error("Gateway error: {message}")]
    GatewayError { message: String },

    #[error("Gateway request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Dispatch cancelled before all batches were sent")]
    Cancelled,

    #[error("Dispatch stopped after {} tokens: {source}", .completed.total)]
    PartialDelivery {
        completed: BulkResult,
        #[source]
        source: Box<PushError>,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Transport,
    Cancellation,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PushError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    pub fn gateway(message: impl Into<String>) -> Self {
        Self::GatewayError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ValidationError { .. } | Self::InvalidTokenError { .. } => ErrorCategory::Input,
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. }
            | Self::TemplateParseError { .. } => ErrorCategory::Configuration,
            Self::GatewayError { .. } | Self::HttpError(_) => ErrorCategory::Transport,
            Self::PartialDelivery { source, .. } => source.category(),
            Self::Cancelled => ErrorCategory::Cancellation,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Cancellation => ErrorSeverity::Low,
            ErrorCategory::Transport => ErrorSeverity::Medium,
            ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Whether the caller can fix this by changing the request alone.
    pub fn is_client_error(&self) -> bool {
        self.category() == ErrorCategory::Input
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ValidationError { .. } => {
                "Check that tokens, task id and task type are present and well formed"
            }
            Self::InvalidTokenError { .. } => "Remove or fix the empty token at the reported index",
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Review the configuration file and environment",
            Self::TemplateParseError { .. } => {
                "Make sure the messages file defines default, short, near, relaxed and scheduled"
            }
            Self::GatewayError { .. } | Self::HttpError(_) => {
                "Check gateway credentials and connectivity, then resend the request"
            }
            Self::PartialDelivery { .. } => {
                "Resend only the tokens that are missing from the partial result"
            }
            Self::Cancelled => "Resend the request if the notification is still relevant",
            Self::IoError(_) => "Check file paths and permissions",
            Self::SerializationError(_) => "Check that the JSON input is well formed",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Invalid request: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Transport => format!("Push gateway error: {}", self),
            ErrorCategory::Cancellation => "Notification dispatch was cancelled".to_string(),
            ErrorCategory::System => format!("Unexpected error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, PushError>;
