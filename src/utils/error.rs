use crate::domain::model::ThemeIssue;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DesignError {
    #[error("Validation error on {field}: {message}")]
    ItemValidation { field: String, message: String },

    #[error("Theme validation failed: {message}")]
    ThemeValidation {
        message: String,
        issues: Vec<ThemeIssue>,
    },

    #[error("API request failed: {message}")]
    Api { status: Option<u16>, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Reordered navigation must contain exactly the current items")]
    NotAPermutation,

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    /// Rejection that carries no concrete error, e.g. a validation step that was
    /// abandoned rather than failed.
    #[error("operation aborted")]
    Aborted,

    #[error("operation cancelled")]
    Cancelled,

    #[error("no access token available")]
    NotAuthenticated,
}

impl DesignError {
    pub fn item_validation(field: &str, message: &str) -> Self {
        DesignError::ItemValidation {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    pub fn api(status: Option<u16>, message: impl Into<String>) -> Self {
        DesignError::Api {
            status,
            message: message.into(),
        }
    }

    /// Errors that must never reach the notification service.
    pub fn is_silent(&self) -> bool {
        matches!(self, DesignError::Aborted | DesignError::Cancelled)
    }

    pub fn theme_issues(&self) -> Option<&[ThemeIssue]> {
        match self {
            DesignError::ThemeValidation { issues, .. } => Some(issues),
            _ => None,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            DesignError::ItemValidation { message, .. } => message.clone(),
            DesignError::ThemeValidation { message, issues } => {
                format!("{} ({} issue(s) reported)", message, issues.len())
            }
            DesignError::Api {
                status: Some(status),
                message,
            } => format!("Server responded with {}: {}", status, message),
            DesignError::Api { status: None, message } => message.clone(),
            DesignError::Http(_) => "Could not reach the server, check your connection".to_string(),
            DesignError::NotAuthenticated => "You need to sign in again".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DesignError>;
