use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Remote request failed ({content_type}): {status}")]
    RemoteStatusError { content_type: String, status: u16 },

    #[error("Request failed ({url}): {status}")]
    HttpStatusError { url: String, status: u16 },

    #[error("Failed to load required document {path}: {message}")]
    LocalReadError { path: String, message: String },

    #[error("Source '{origin}' unavailable: {reason}")]
    SourceUnavailable { origin: String, reason: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration parse error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Cache storage error: {message}")]
    StorageError { message: String },

    #[error("Content load failed: {0}")]
    LoadFailed(Arc<ContentError>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Source,
    Configuration,
    Storage,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ContentError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ContentError::HttpError(_)
            | ContentError::RemoteStatusError { .. }
            | ContentError::HttpStatusError { .. } => ErrorCategory::Network,
            ContentError::LocalReadError { .. } | ContentError::SourceUnavailable { .. } => {
                ErrorCategory::Source
            }
            ContentError::ConfigError { .. }
            | ContentError::InvalidConfigValueError { .. }
            | ContentError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            ContentError::IoError(_) | ContentError::StorageError { .. } => ErrorCategory::Storage,
            ContentError::SerializationError(_) => ErrorCategory::Data,
            ContentError::LoadFailed(inner) => inner.category(),
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ContentError::StorageError { .. } => ErrorSeverity::Low,
            ContentError::HttpError(_)
            | ContentError::RemoteStatusError { .. }
            | ContentError::HttpStatusError { .. }
            | ContentError::SourceUnavailable { .. } => ErrorSeverity::Medium,
            ContentError::ConfigError { .. }
            | ContentError::InvalidConfigValueError { .. }
            | ContentError::ConfigValidationError { .. }
            | ContentError::SerializationError(_)
            | ContentError::IoError(_) => ErrorSeverity::High,
            // 本地資料集是唯一的保底來源
            ContentError::LocalReadError { .. } => ErrorSeverity::Critical,
            ContentError::LoadFailed(inner) => inner.severity(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check network connectivity and the remote API credentials",
            ErrorCategory::Source => {
                "Make sure the bundled dataset exists and is valid JSON, or enable the remote source"
            }
            ErrorCategory::Configuration => "Review the settings file and command-line overrides",
            ErrorCategory::Storage => "Check cache directory permissions or disable the cache",
            ErrorCategory::Data => "Inspect the JSON document for syntax errors",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ContentError::LoadFailed(inner) => inner.user_friendly_message(),
            ContentError::LocalReadError { path, .. } => {
                format!("Content could not be loaded: dataset '{}' is unavailable", path)
            }
            ContentError::RemoteStatusError {
                content_type,
                status,
            } => format!(
                "The content service rejected the request for '{}' (HTTP {})",
                content_type, status
            ),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ContentError>;
