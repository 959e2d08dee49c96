//! Repayment-schedule planning.
//!
//! Back-fills the payment periods that have elapsed between a contract's loan
//! date and today. Every elapsed period produces one history entry; all but
//! the most recent carry a zero placeholder amount and the most recent carries
//! the cumulative amount owed across every period.
//!
//! Planning is pure: it reads a [`Contract`] and a date and returns the rows
//! to write. Persisting them atomically is the caller's job.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use tindung_core::{plan_schedule, Contract, CreditLoan, PaymentStatus, ScheduleOutcome};
//!
//! let loan = CreditLoan {
//!     code: "TC001".parse().unwrap(),
//!     borrower_name: "Nguyễn Văn An".into(),
//!     loan_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!     principal: 20_000_000,
//!     period_length_days: 30,
//!     interest: 500_000,
//!     status: PaymentStatus::NotPaid,
//! };
//! let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
//!
//! let ScheduleOutcome::Due(plan) = plan_schedule(&Contract::from(loan), today).unwrap() else {
//!     panic!("two periods have elapsed");
//! };
//! assert_eq!(plan.periods.len(), 2);
//! assert_eq!(plan.cumulative_amount, 1_000_000);
//! ```

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::contract::Contract;
use crate::error::{CreditError, Result};
use crate::history::NewHistoryRecord;
use crate::ids::{ContractCode, LoanKind};
use crate::status::PaymentStatus;

/// Status written on every generated entry.
pub const GENERATED_STATUS: PaymentStatus = PaymentStatus::InterestOverdue;

/// `total_paid` written on every generated entry.
pub const GENERATED_TOTAL_PAID: &str = "0";

/// Most periods a single run may write unless a caller sets its own limit.
pub const DEFAULT_MAX_PERIODS: usize = 3_660;

/// One elapsed payment period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedPeriod {
    /// 1-based period number.
    pub number: usize,
    /// Due date of the period.
    pub payment_date: NaiveDate,
    /// Amount to record: zero except on the last period.
    pub amount: i64,
}

impl PlannedPeriod {
    /// Human-readable label stored in the entry's note.
    #[must_use]
    pub fn note(&self) -> String {
        format!("period {}", self.number)
    }
}

/// The entries owed for a contract as of a given day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulePlan {
    /// Contract the plan is for.
    pub contract_code: ContractCode,
    /// Product of the contract.
    pub kind: LoanKind,
    /// Fixed amount owed per period.
    pub per_period_amount: i64,
    /// `per_period_amount` times the number of periods.
    pub cumulative_amount: i64,
    /// Elapsed periods, oldest first. Never empty.
    pub periods: Vec<PlannedPeriod>,
}

impl SchedulePlan {
    /// History rows to insert, in period order.
    #[must_use]
    pub fn records(&self) -> Vec<NewHistoryRecord> {
        self.periods
            .iter()
            .map(|period| NewHistoryRecord {
                contract_code: self.contract_code.clone(),
                payment_date: period.payment_date,
                amount: period.amount,
                note: Some(period.note()),
                status: GENERATED_STATUS,
                total_paid: GENERATED_TOTAL_PAID.to_string(),
            })
            .collect()
    }
}

/// Result of planning a schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleOutcome {
    /// The loan date is today or later; nothing is owed yet.
    NotStarted,
    /// The loan has started but the first period has not been reached.
    NoPeriodDue,
    /// At least one period has elapsed.
    Due(SchedulePlan),
}

impl ScheduleOutcome {
    /// Summarise the outcome once its rows, if any, are written.
    #[must_use]
    pub fn summary(&self, contract_code: &ContractCode) -> ScheduleSummary {
        match self {
            Self::NotStarted => ScheduleSummary::empty(
                contract_code,
                "loan date is today or later; no history to generate",
            ),
            Self::NoPeriodDue => {
                ScheduleSummary::empty(contract_code, "first payment period is not yet due")
            }
            Self::Due(plan) => ScheduleSummary {
                contract_code: contract_code.clone(),
                records_created: plan.periods.len(),
                message: format!("created {} payment history records", plan.periods.len()),
                loan_kind: Some(plan.kind),
                per_period_amount: Some(plan.per_period_amount),
                cumulative_amount: Some(plan.cumulative_amount),
            },
        }
    }
}

/// What a schedule run did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    /// Contract the run was for.
    pub contract_code: ContractCode,
    /// Number of history rows written.
    pub records_created: usize,
    /// Human-readable result.
    pub message: String,
    /// Product of the contract, when rows were written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loan_kind: Option<LoanKind>,
    /// Fixed per-period amount, when rows were written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_period_amount: Option<i64>,
    /// Amount on the last row, when rows were written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cumulative_amount: Option<i64>,
}

impl ScheduleSummary {
    fn empty(contract_code: &ContractCode, message: &str) -> Self {
        Self {
            contract_code: contract_code.clone(),
            records_created: 0,
            message: message.to_string(),
            loan_kind: None,
            per_period_amount: None,
            cumulative_amount: None,
        }
    }
}

/// Plan the history rows owed by `contract` as of `today`, allowing at most
/// [`DEFAULT_MAX_PERIODS`] periods.
///
/// # Errors
///
/// Returns `CreditError::InvalidArgument` when the contract's installment
/// count or period length is not positive, when a date or amount would
/// overflow, or when more periods have elapsed than the limit allows.
pub fn plan_schedule(contract: &Contract, today: NaiveDate) -> Result<ScheduleOutcome> {
    plan_schedule_with_limit(contract, today, DEFAULT_MAX_PERIODS)
}

/// Like [`plan_schedule`] with an explicit cap on the number of periods.
///
/// # Errors
///
/// As [`plan_schedule`], with `max_periods` as the limit.
pub fn plan_schedule_with_limit(
    contract: &Contract,
    today: NaiveDate,
    max_periods: usize,
) -> Result<ScheduleOutcome> {
    let loan_date = contract.loan_date();
    if loan_date >= today {
        return Ok(ScheduleOutcome::NotStarted);
    }

    let per_period_amount = contract.per_period_amount()?;

    let step = u64::try_from(contract.period_length_days())
        .ok()
        .filter(|days| *days > 0)
        .map(Days::new)
        .ok_or_else(|| {
            CreditError::invalid(format!(
                "period_length_days must be greater than 0 for contract {}",
                contract.code()
            ))
        })?;

    let dates = due_dates(loan_date, step, today, max_periods, contract.code())?;
    let Some(last) = dates.len().checked_sub(1) else {
        return Ok(ScheduleOutcome::NoPeriodDue);
    };

    let count = i64::try_from(dates.len())
        .map_err(|_| CreditError::invalid("too many elapsed periods"))?;
    let cumulative_amount = per_period_amount.checked_mul(count).ok_or_else(|| {
        CreditError::invalid(format!(
            "cumulative amount overflows for contract {}",
            contract.code()
        ))
    })?;

    let periods = dates
        .into_iter()
        .enumerate()
        .map(|(idx, payment_date)| PlannedPeriod {
            number: idx + 1,
            payment_date,
            amount: if idx == last { cumulative_amount } else { 0 },
        })
        .collect();

    Ok(ScheduleOutcome::Due(SchedulePlan {
        contract_code: contract.code().clone(),
        kind: contract.kind(),
        per_period_amount,
        cumulative_amount,
        periods,
    }))
}

/// Due dates `start + step`, `start + 2·step`, … up to and including `until`.
fn due_dates(
    start: NaiveDate,
    step: Days,
    until: NaiveDate,
    max_periods: usize,
    code: &ContractCode,
) -> Result<Vec<NaiveDate>> {
    let overflow = || CreditError::invalid(format!("payment date overflows for contract {code}"));

    let mut dates = Vec::new();
    let mut current = start.checked_add_days(step).ok_or_else(overflow)?;
    while current <= until {
        if dates.len() == max_periods {
            return Err(CreditError::invalid(format!(
                "contract {code} has more than {max_periods} elapsed periods"
            )));
        }
        dates.push(current);
        current = match current.checked_add_days(step) {
            Some(next) => next,
            // Past the representable range, so necessarily past `until`.
            None => break,
        };
    }
    Ok(dates)
}
