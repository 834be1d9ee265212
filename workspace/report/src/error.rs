use thiserror::Error;

/// Error types for the report module
#[derive(Error, Debug)]
pub enum ReportError {
    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Type alias for Result with ReportError
pub type Result<T> = std::result::Result<T, ReportError>;
