//! Error types for Billbook

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Encryption error: {0}")]
    Encryption(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Chart rendering error: {0}")]
    Chart(String),

    /// Non-numeric or non-positive usage/rate, or an unparseable bill month
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Date cannot be in the future: {0}")]
    FutureDate(chrono::NaiveDate),

    /// Malformed filter date bound (expected YYYY-MM-DD)
    #[error("Invalid {field} format: {value:?} (use YYYY-MM-DD)")]
    InvalidDateFormat { field: &'static str, value: String },

    #[error("Unknown bill type: {0}")]
    UnknownCategory(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Username already exists: {0}")]
    UsernameTaken(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Weak password: {0}")]
    WeakPassword(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),
}

impl Error {
    /// True for errors caused by the caller's input rather than the system
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_)
                | Self::FutureDate(_)
                | Self::InvalidDateFormat { .. }
                | Self::UnknownCategory(_)
                | Self::WeakPassword(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
