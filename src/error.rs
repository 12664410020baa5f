use thiserror::Error;

use crate::command::ConvertionError;

#[derive(Error, Debug, PartialEq)]
pub enum BankError {
    #[error("No account is logged in")]
    NotLoggedIn,
    #[error("Invalid username or pin")]
    InvalidCredentials,
    #[error("Insufficient balance for transfer")]
    InsufficientBalance,
    #[error("Cannot transfer to the same account")]
    SelfTransfer,
    #[error("Amount must be positive")]
    NonPositiveAmount,
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Account not found: {0}")]
    AccountNotFound(String),
    #[error("Amount would take a balance out of range")]
    AmountOutOfRange,
    #[error("Time is out of range")]
    TimeOutOfRange,
    #[error("No deposit of at least 10% of the requested loan")]
    LoanNotEligible,
    #[error("Invalid entry for command conversion: {0}")]
    InvalidEntryForConversion(ConvertionError),
}

impl From<ConvertionError> for BankError {
    fn from(error: ConvertionError) -> Self {
        match error {
            ConvertionError::InvalidPin(_) => Self::InvalidCredentials,
            ConvertionError::InvalidAmount(amount) => Self::InvalidAmount(amount),
            error => Self::InvalidEntryForConversion(error),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read accounts file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse accounts file: {0}")]
    Json(#[from] serde_json::Error),
}
