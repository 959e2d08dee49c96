//! Payment-history records (lịch sử trả lãi).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CreditError, Result};
use crate::ids::{ContractCode, HistoryId};
use crate::patch::Patch;
use crate::status::PaymentStatus;

/// A stored payment-history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Sequence number assigned on insert.
    pub id: HistoryId,
    /// Contract this entry belongs to. Not checked by the store.
    pub contract_code: ContractCode,
    /// Scheduled due date of the period.
    pub payment_date: NaiveDate,
    /// Amount recorded for the period.
    pub amount: i64,
    /// Free-form description, e.g. "period 3".
    pub note: Option<String>,
    /// Status when written.
    pub status: PaymentStatus,
    /// Total paid to date. Kept as an opaque string.
    pub total_paid: String,
}

/// A history entry before the store assigns its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewHistoryRecord {
    /// Contract this entry belongs to.
    pub contract_code: ContractCode,
    /// Scheduled due date of the period.
    pub payment_date: NaiveDate,
    /// Amount recorded for the period.
    pub amount: i64,
    /// Free-form description.
    #[serde(default)]
    pub note: Option<String>,
    /// Status label.
    pub status: PaymentStatus,
    /// Total paid to date.
    pub total_paid: String,
}

impl NewHistoryRecord {
    /// Check a caller-supplied entry. Generated entries skip this since their
    /// placeholder periods carry a zero amount.
    ///
    /// # Errors
    ///
    /// Returns `CreditError::InvalidArgument` unless `amount > 0`.
    pub fn validate(&self) -> Result<()> {
        if self.amount <= 0 {
            return Err(CreditError::invalid("amount must be greater than 0"));
        }
        Ok(())
    }

    /// Attach the id the store assigned.
    #[must_use]
    pub fn with_id(self, id: HistoryId) -> HistoryRecord {
        HistoryRecord {
            id,
            contract_code: self.contract_code,
            payment_date: self.payment_date,
            amount: self.amount,
            note: self.note,
            status: self.status,
            total_paid: self.total_paid,
        }
    }
}

/// Partial update of a history entry.
///
/// `note: null` clears the note; `null` on any other field is rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryPatch {
    /// Move the entry to another contract.
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub contract_code: Patch<ContractCode>,
    /// New due date.
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub payment_date: Patch<NaiveDate>,
    /// New amount.
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub amount: Patch<i64>,
    /// New note, or `null` to clear it.
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub note: Patch<String>,
    /// New status.
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub status: Patch<PaymentStatus>,
    /// New total paid.
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub total_paid: Patch<String>,
}

impl HistoryRecord {
    /// Merge a partial update. On error the record is unchanged.
    ///
    /// # Errors
    ///
    /// Returns `CreditError::InvalidArgument` when a required field is `null`
    /// or a new `amount` is not positive. Generated placeholder rows keep
    /// their zero amount unless the patch replaces it.
    pub fn apply_patch(&mut self, patch: HistoryPatch) -> Result<()> {
        if matches!(patch.amount, Patch::Value(amount) if amount <= 0) {
            return Err(CreditError::invalid("amount must be greater than 0"));
        }
        let mut next = self.clone();
        patch
            .contract_code
            .apply_required("contract_code", &mut next.contract_code)?;
        patch
            .payment_date
            .apply_required("payment_date", &mut next.payment_date)?;
        patch.amount.apply_required("amount", &mut next.amount)?;
        patch.note.apply_optional(&mut next.note);
        patch.status.apply_required("status", &mut next.status)?;
        patch
            .total_paid
            .apply_required("total_paid", &mut next.total_paid)?;
        *self = next;
        Ok(())
    }
}
