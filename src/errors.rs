use chrono::NaiveDate;
use thiserror::Error;

use crate::ledger::TransactionId;

/// Error type that captures common ledger failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Invalid transaction: {0}")]
    Validation(String),
    #[error("Invalid date `{0}`, expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("Start date {start} is later than end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
    #[error("Transaction not found: {0}")]
    NotFound(TransactionId),
    #[error("Corrupt data: {0}")]
    CorruptData(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;

impl LedgerError {
    /// Whether the error comes from bad user input rather than the environment.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            LedgerError::Validation(_)
                | LedgerError::InvalidDate(_)
                | LedgerError::InvalidRange { .. }
                | LedgerError::NotFound(_)
        )
    }
}
