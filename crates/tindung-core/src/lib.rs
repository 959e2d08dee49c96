//! Core types and utilities for tindung.
//!
//! This crate provides the foundational types used throughout the credit service:
//!
//! - **Identifiers**: `ContractCode`, `HistoryId`, `LoanKind`
//! - **Contracts**: `CreditLoan` (tín chấp), `InstallmentLoan` (trả góp), `Contract`
//! - **History**: `HistoryRecord`, `NewHistoryRecord`, `HistoryPatch`
//! - **Status**: `PaymentStatus`
//! - **Schedule**: `plan_schedule`, `ScheduleOutcome`, `ScheduleSummary`
//! - **Time**: `Clock`, `SystemClock`, `FixedClock`
//!
//! # Amounts
//!
//! All money amounts are whole đồng stored as `i64`. Per-period installment
//! amounts use integer floor division; remainders are dropped.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod clock;
pub mod contract;
pub mod error;
pub mod history;
pub mod ids;
pub mod patch;
pub mod schedule;
pub mod status;

pub use clock::{Clock, FixedClock, SystemClock};
pub use contract::{
    Contract, CreditLoan, CreditLoanDraft, CreditLoanPatch, InstallmentLoan,
    InstallmentLoanDraft, InstallmentLoanPatch, Loan,
};
pub use error::{CreditError, Result};
pub use history::{HistoryPatch, HistoryRecord, NewHistoryRecord};
pub use ids::{ContractCode, HistoryId, LoanKind};
pub use patch::Patch;
pub use schedule::{
    plan_schedule, plan_schedule_with_limit, PlannedPeriod, ScheduleOutcome, SchedulePlan,
    ScheduleSummary, DEFAULT_MAX_PERIODS,
};
pub use status::PaymentStatus;
