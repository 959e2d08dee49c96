//! Tindung Client SDK.
//!
//! This crate provides a typed client for the tindung credit service.
//!
//! # Example
//!
//! ```no_run
//! use tindung_client::CreditClient;
//! use tindung_core::ContractCode;
//!
//! # async fn example() -> Result<(), tindung_client::ClientError> {
//! let client = CreditClient::new("http://localhost:8080")?;
//!
//! // Back-fill the payment history of a credit loan
//! let code: ContractCode = "TC001".parse().map_err(|_| {
//!     tindung_client::ClientError::Configuration("bad code".to_string())
//! })?;
//! let summary = client.generate_schedule(&code).await?;
//!
//! println!("{}: {}", summary.contract_code, summary.message);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;
mod types;

pub use client::{ClientOptions, CreditClient, Page};
pub use error::ClientError;
pub use types::{ApiResponse, CountResponse, HealthStatus};

// Re-export the payload types callers need
pub use tindung_core::{
    ContractCode, CreditLoan, CreditLoanDraft, CreditLoanPatch, HistoryId, HistoryPatch,
    HistoryRecord, InstallmentLoan, InstallmentLoanDraft, InstallmentLoanPatch, Loan,
    NewHistoryRecord, Patch, PaymentStatus, ScheduleSummary,
};
