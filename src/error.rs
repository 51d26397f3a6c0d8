//! Domain error types for the platform
//!
//! Errors are structured internally for logging/debugging but provide
//! generic responses to users to avoid leaking sensitive information.

use thiserror::Error;

/// Top-level platform error type
#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Assistant error: {0}")]
    Completion(#[from] CompletionError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Password hashing error: {0}")]
    Hashing(String),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: i64 },

    #[error("{0} already exists")]
    Conflict(String),

    #[error("Database unavailable: {0}")]
    Unavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Map a driver error, keeping uniqueness violations apart from outages.
    pub fn from_insert(err: sqlx::Error, what: impl Into<String>) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::Conflict(what.into())
            }
            _ => StoreError::Unavailable(Box::new(err)),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Unavailable(Box::new(err))
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Username must be between 3 and 15 characters long.")]
    UsernameLength,

    #[error("Username cannot contain spaces.")]
    UsernameSpace,

    #[error("Username can only contain letters and numbers.")]
    UsernameCharacter,

    #[error("Password must be at least 8 characters long.")]
    PasswordLength,

    #[error("Password must contain at least one uppercase letter.")]
    PasswordUppercase,

    #[error("Password must contain at least one number.")]
    PasswordDigit,

    #[error("Passwords do not match.")]
    PasswordMismatch,

    #[error("{0} is a required field.")]
    MissingField(&'static str),

    #[error("{field} must be a whole number, got '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("{field} must be a number of hours, got '{value}'")]
    InvalidHours { field: &'static str, value: String },

    #[error("'{value}' is not a valid {field}")]
    InvalidChoice { field: &'static str, value: String },

    #[error("{field} must be a date (YYYY-MM-DD), got '{value}'")]
    InvalidDate { field: &'static str, value: String },

    #[error("No {0} available to analyze.")]
    NoData(&'static str),
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Login required")]
    Required,

    #[error("Username '{0}' already exists")]
    DuplicateAccount(String),

    #[error("Invalid credentials for user: {0}")]
    InvalidCredentials(String),
}

#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("Assistant is not configured (missing API key)")]
    NotConfigured,

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Authentication with the completion service failed")]
    AuthFailed,

    #[error("Rate limited by the completion service")]
    RateLimited,

    #[error("Request timeout")]
    Timeout,

    #[error("Completion service returned no text")]
    EmptyResponse,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("File not found: {0}")]
    FileNotFound(String),
}

impl PlatformError {
    /// Get a user-safe message (generic, no internal details).
    ///
    /// Validation failures are returned verbatim since they only describe
    /// the user's own input.
    pub fn client_message(&self) -> String {
        match self {
            PlatformError::Validation(e) => e.to_string(),

            PlatformError::Auth(AuthError::Required) => {
                "You must be logged in to view the dashboard.".into()
            }
            PlatformError::Auth(AuthError::DuplicateAccount(_)) => {
                "Username already exists.".into()
            }
            PlatformError::Auth(AuthError::InvalidCredentials(_)) => {
                "The username or password was incorrect.".into()
            }

            PlatformError::Store(StoreError::NotFound { kind, id }) => {
                format!("{kind} {id} not found.")
            }
            PlatformError::Store(StoreError::Conflict(what)) => {
                format!("{what} already exists.")
            }
            PlatformError::Store(StoreError::Unavailable(_)) => {
                "Service temporarily unavailable".into()
            }

            PlatformError::Completion(CompletionError::NotConfigured) => {
                "AI analysis unavailable: no API key configured.".into()
            }
            PlatformError::Completion(CompletionError::RateLimited) => {
                "AI service is busy, try again later.".into()
            }
            PlatformError::Completion(_) => "AI service request failed.".into(),

            PlatformError::Config(_) | PlatformError::Hashing(_) => {
                "Service temporarily unavailable".into()
            }
        }
    }
}
