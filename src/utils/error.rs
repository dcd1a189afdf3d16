use thiserror::Error;

/// Failure modes of a single extraction attempt. These are recovered locally:
/// the scheduler records them in the scrape log and moves on, while the manual
/// refresh path surfaces them to the caller.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Navigation timed out")]
    Timeout,

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Could not extract product title")]
    MissingTitle,

    #[error("Browser error: {0}")]
    Browser(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Scraping error: {0}")]
    Scrape(#[from] ScrapeError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(format!("{}", err))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
