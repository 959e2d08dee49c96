//! Error types for tindung.

/// Result type for tindung operations.
pub type Result<T> = std::result::Result<T, CreditError>;

/// Errors that can occur in tindung operations.
#[derive(Debug, thiserror::Error)]
pub enum CreditError {
    /// No contract matches the code in its variant's table.
    #[error("contract not found: {code}")]
    ContractNotFound {
        /// The contract code that was not found.
        code: String,
    },

    /// The code carries neither the credit-loan nor the installment prefix.
    #[error("invalid contract code: {code}")]
    InvalidContractCode {
        /// The rejected code.
        code: String,
    },

    /// An input value is out of range or a patch is malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A record with the same key already exists.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Storage failure while reading or committing.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CreditError {
    /// Shorthand for [`CreditError::InvalidArgument`].
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}
