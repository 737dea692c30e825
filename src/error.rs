use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid date pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("no column looks like a date column (best: {best:?}, score {score:.2})")]
    DateColumnNotFound { best: Option<String>, score: f64 },

    #[error("column `{0}` not found in CSV header")]
    MissingColumn(String),

    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
