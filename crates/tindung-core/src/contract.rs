//! Loan contract types.
//!
//! Both products share one record shape and differ in how the per-period
//! amount is derived (see [`crate::schedule`]). [`Contract`] is the tagged
//! union the store persists; [`Loan`] lets services and handlers be written
//! once for both products.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{CreditError, Result};
use crate::ids::{ContractCode, LoanKind};
use crate::patch::Patch;
use crate::status::PaymentStatus;

// ============================================================================
// Records
// ============================================================================

/// Tín chấp: a credit loan without collateral.
///
/// `interest` is a fixed amount owed every period; principal is repaid outside
/// the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditLoan {
    /// Contract code (`TC…`).
    pub code: ContractCode,
    /// Borrower's full name.
    pub borrower_name: String,
    /// Origination date.
    pub loan_date: NaiveDate,
    /// Amount lent.
    pub principal: i64,
    /// Days between consecutive payment periods.
    pub period_length_days: i64,
    /// Interest owed every period.
    pub interest: i64,
    /// Current status.
    pub status: PaymentStatus,
}

/// Trả góp: an installment loan.
///
/// `interest` is the total over the whole term; principal plus interest is
/// split evenly across `installment_count` payments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentLoan {
    /// Contract code (`TG…`).
    pub code: ContractCode,
    /// Borrower's full name.
    pub borrower_name: String,
    /// Origination date.
    pub loan_date: NaiveDate,
    /// Amount lent.
    pub principal: i64,
    /// Days between consecutive payment periods.
    pub period_length_days: i64,
    /// Total number of scheduled payments.
    pub installment_count: i64,
    /// Total interest over the full term.
    pub interest: i64,
    /// Current status.
    pub status: PaymentStatus,
}

/// A contract of either product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Contract {
    /// Tín chấp.
    Credit(CreditLoan),
    /// Trả góp.
    Installment(InstallmentLoan),
}

impl Contract {
    /// Which product this is.
    #[must_use]
    pub const fn kind(&self) -> LoanKind {
        match self {
            Self::Credit(_) => LoanKind::Credit,
            Self::Installment(_) => LoanKind::Installment,
        }
    }

    /// The contract code.
    #[must_use]
    pub const fn code(&self) -> &ContractCode {
        match self {
            Self::Credit(loan) => &loan.code,
            Self::Installment(loan) => &loan.code,
        }
    }

    /// Origination date.
    #[must_use]
    pub const fn loan_date(&self) -> NaiveDate {
        match self {
            Self::Credit(loan) => loan.loan_date,
            Self::Installment(loan) => loan.loan_date,
        }
    }

    /// Days between payment periods.
    #[must_use]
    pub const fn period_length_days(&self) -> i64 {
        match self {
            Self::Credit(loan) => loan.period_length_days,
            Self::Installment(loan) => loan.period_length_days,
        }
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> PaymentStatus {
        match self {
            Self::Credit(loan) => loan.status,
            Self::Installment(loan) => loan.status,
        }
    }

    /// Fixed amount owed each period.
    ///
    /// # Errors
    ///
    /// Returns `CreditError::InvalidArgument` for an installment loan whose
    /// `installment_count` is not positive, or when the sum overflows.
    pub fn per_period_amount(&self) -> Result<i64> {
        match self {
            Self::Credit(loan) => Ok(loan.interest),
            Self::Installment(loan) => {
                if loan.installment_count <= 0 {
                    return Err(CreditError::invalid(format!(
                        "installment_count must be greater than 0 for contract {}",
                        loan.code
                    )));
                }
                let total = loan.principal.checked_add(loan.interest).ok_or_else(|| {
                    CreditError::invalid(format!("principal + interest overflows for {}", loan.code))
                })?;
                // Floor division, also for a negative total.
                Ok(total.div_euclid(loan.installment_count))
            }
        }
    }
}

impl From<CreditLoan> for Contract {
    fn from(loan: CreditLoan) -> Self {
        Self::Credit(loan)
    }
}

impl From<InstallmentLoan> for Contract {
    fn from(loan: InstallmentLoan) -> Self {
        Self::Installment(loan)
    }
}

// ============================================================================
// Create payloads
// ============================================================================

/// Input for a new credit loan. Status is always [`PaymentStatus::NotPaid`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditLoanDraft {
    /// Borrower's full name.
    pub borrower_name: String,
    /// Origination date.
    pub loan_date: NaiveDate,
    /// Amount lent, > 0.
    pub principal: i64,
    /// Days between periods, > 0.
    pub period_length_days: i64,
    /// Interest per period, >= 0.
    pub interest: i64,
}

/// Input for a new installment loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallmentLoanDraft {
    /// Borrower's full name.
    pub borrower_name: String,
    /// Origination date.
    pub loan_date: NaiveDate,
    /// Amount lent, > 0.
    pub principal: i64,
    /// Days between periods, > 0.
    pub period_length_days: i64,
    /// Number of scheduled payments, >= 0.
    #[serde(default)]
    pub installment_count: i64,
    /// Total interest, >= 0.
    pub interest: i64,
    /// Initial status, chosen by the caller.
    pub status: PaymentStatus,
}

fn validate_common(
    borrower_name: &str,
    principal: i64,
    period_length_days: i64,
    interest: i64,
) -> Result<()> {
    if borrower_name.trim().is_empty() {
        return Err(CreditError::invalid("borrower_name must not be empty"));
    }
    if principal <= 0 {
        return Err(CreditError::invalid("principal must be greater than 0"));
    }
    if period_length_days <= 0 {
        return Err(CreditError::invalid(
            "period_length_days must be greater than 0",
        ));
    }
    if interest < 0 {
        return Err(CreditError::invalid("interest must not be negative"));
    }
    Ok(())
}

fn validate_installment_count(installment_count: i64) -> Result<()> {
    if installment_count < 0 {
        return Err(CreditError::invalid("installment_count must not be negative"));
    }
    Ok(())
}

// ============================================================================
// Partial updates
// ============================================================================

/// Partial update of a credit loan. Omitted fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreditLoanPatch {
    /// New borrower name.
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub borrower_name: Patch<String>,
    /// New origination date.
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub loan_date: Patch<NaiveDate>,
    /// New principal.
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub principal: Patch<i64>,
    /// New period length.
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub period_length_days: Patch<i64>,
    /// New per-period interest.
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub interest: Patch<i64>,
    /// New status.
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub status: Patch<PaymentStatus>,
}

/// Partial update of an installment loan. Omitted fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstallmentLoanPatch {
    /// New borrower name.
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub borrower_name: Patch<String>,
    /// New origination date.
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub loan_date: Patch<NaiveDate>,
    /// New principal.
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub principal: Patch<i64>,
    /// New period length.
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub period_length_days: Patch<i64>,
    /// New number of installments.
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub installment_count: Patch<i64>,
    /// New total interest.
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub interest: Patch<i64>,
    /// New status.
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub status: Patch<PaymentStatus>,
}

// ============================================================================
// Product abstraction
// ============================================================================

/// Operations shared by both loan products.
pub trait Loan:
    Clone + Serialize + DeserializeOwned + Into<Contract> + Send + Sync + 'static
{
    /// Which product this type represents.
    const KIND: LoanKind;

    /// Create payload.
    type Draft: Serialize + DeserializeOwned + Send;

    /// Partial-update payload.
    type Patch: Serialize + DeserializeOwned + Default + Send;

    /// Build a record from a validated draft and a freshly assigned code.
    ///
    /// # Errors
    ///
    /// Returns `CreditError::InvalidArgument` when a draft field is out of range.
    fn from_draft(code: ContractCode, draft: Self::Draft) -> Result<Self>;

    /// Merge a partial update into this record.
    ///
    /// # Errors
    ///
    /// Returns `CreditError::InvalidArgument` when a required field is sent as
    /// `null` or the merged record fails the checks `from_draft` runs. The
    /// record is left unchanged in that case.
    fn apply_patch(&mut self, patch: Self::Patch) -> Result<()>;

    /// Narrow a [`Contract`] to this product.
    fn from_contract(contract: Contract) -> Option<Self>;

    /// The contract code.
    fn code(&self) -> &ContractCode;
}

impl Loan for CreditLoan {
    const KIND: LoanKind = LoanKind::Credit;
    type Draft = CreditLoanDraft;
    type Patch = CreditLoanPatch;

    fn from_draft(code: ContractCode, draft: CreditLoanDraft) -> Result<Self> {
        validate_common(
            &draft.borrower_name,
            draft.principal,
            draft.period_length_days,
            draft.interest,
        )?;
        Ok(Self {
            code,
            borrower_name: draft.borrower_name,
            loan_date: draft.loan_date,
            principal: draft.principal,
            period_length_days: draft.period_length_days,
            interest: draft.interest,
            status: PaymentStatus::NotPaid,
        })
    }

    fn apply_patch(&mut self, patch: CreditLoanPatch) -> Result<()> {
        let mut next = self.clone();
        patch.borrower_name.apply_required("borrower_name", &mut next.borrower_name)?;
        patch.loan_date.apply_required("loan_date", &mut next.loan_date)?;
        patch.principal.apply_required("principal", &mut next.principal)?;
        patch
            .period_length_days
            .apply_required("period_length_days", &mut next.period_length_days)?;
        patch.interest.apply_required("interest", &mut next.interest)?;
        patch.status.apply_required("status", &mut next.status)?;
        validate_common(
            &next.borrower_name,
            next.principal,
            next.period_length_days,
            next.interest,
        )?;
        *self = next;
        Ok(())
    }

    fn from_contract(contract: Contract) -> Option<Self> {
        match contract {
            Contract::Credit(loan) => Some(loan),
            Contract::Installment(_) => None,
        }
    }

    fn code(&self) -> &ContractCode {
        &self.code
    }
}

impl Loan for InstallmentLoan {
    const KIND: LoanKind = LoanKind::Installment;
    type Draft = InstallmentLoanDraft;
    type Patch = InstallmentLoanPatch;

    fn from_draft(code: ContractCode, draft: InstallmentLoanDraft) -> Result<Self> {
        validate_common(
            &draft.borrower_name,
            draft.principal,
            draft.period_length_days,
            draft.interest,
        )?;
        validate_installment_count(draft.installment_count)?;
        Ok(Self {
            code,
            borrower_name: draft.borrower_name,
            loan_date: draft.loan_date,
            principal: draft.principal,
            period_length_days: draft.period_length_days,
            installment_count: draft.installment_count,
            interest: draft.interest,
            status: draft.status,
        })
    }

    fn apply_patch(&mut self, patch: InstallmentLoanPatch) -> Result<()> {
        let mut next = self.clone();
        patch.borrower_name.apply_required("borrower_name", &mut next.borrower_name)?;
        patch.loan_date.apply_required("loan_date", &mut next.loan_date)?;
        patch.principal.apply_required("principal", &mut next.principal)?;
        patch
            .period_length_days
            .apply_required("period_length_days", &mut next.period_length_days)?;
        patch
            .installment_count
            .apply_required("installment_count", &mut next.installment_count)?;
        patch.interest.apply_required("interest", &mut next.interest)?;
        patch.status.apply_required("status", &mut next.status)?;
        validate_common(
            &next.borrower_name,
            next.principal,
            next.period_length_days,
            next.interest,
        )?;
        validate_installment_count(next.installment_count)?;
        *self = next;
        Ok(())
    }

    fn from_contract(contract: Contract) -> Option<Self> {
        match contract {
            Contract::Installment(loan) => Some(loan),
            Contract::Credit(_) => None,
        }
    }

    fn code(&self) -> &ContractCode {
        &self.code
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn credit_draft() -> CreditLoanDraft {
        CreditLoanDraft {
            borrower_name: "Nguyễn Văn An".into(),
            loan_date: date(2024, 1, 1),
            principal: 20_000_000,
            period_length_days: 30,
            interest: 500_000,
        }
    }

    fn installment_draft() -> InstallmentLoanDraft {
        InstallmentLoanDraft {
            borrower_name: "Trần Thị Bình".into(),
            loan_date: date(2024, 2, 1),
            principal: 10_000_000,
            period_length_days: 30,
            installment_count: 12,
            interest: 200_000,
            status: PaymentStatus::InterestDue,
        }
    }

    #[test]
    fn credit_loan_starts_not_paid() {
        let loan = CreditLoan::from_draft("TC001".parse().unwrap(), credit_draft()).unwrap();
        assert_eq!(loan.status, PaymentStatus::NotPaid);
        assert_eq!(loan.code.as_str(), "TC001");
    }

    #[test]
    fn installment_loan_keeps_caller_status() {
        let loan =
            InstallmentLoan::from_draft("TG001".parse().unwrap(), installment_draft()).unwrap();
        assert_eq!(loan.status, PaymentStatus::InterestDue);
    }

    #[test]
    fn draft_validation() {
        let code: ContractCode = "TC001".parse().unwrap();

        let mut draft = credit_draft();
        draft.principal = 0;
        assert!(CreditLoan::from_draft(code.clone(), draft).is_err());

        let mut draft = credit_draft();
        draft.period_length_days = 0;
        assert!(CreditLoan::from_draft(code.clone(), draft).is_err());

        let mut draft = credit_draft();
        draft.interest = -1;
        assert!(CreditLoan::from_draft(code.clone(), draft).is_err());

        let mut draft = credit_draft();
        draft.interest = 0;
        assert!(CreditLoan::from_draft(code, draft).is_ok());
    }

    #[test]
    fn installment_count_zero_is_storable() {
        let mut draft = installment_draft();
        draft.installment_count = 0;
        let loan = InstallmentLoan::from_draft("TG002".parse().unwrap(), draft).unwrap();
        assert_eq!(loan.installment_count, 0);
    }

    #[test]
    fn installment_count_defaults_to_zero() {
        let json = serde_json::json!({
            "borrower_name": "Lê Văn Cường",
            "loan_date": "2024-02-01",
            "principal": 1_000_000,
            "period_length_days": 30,
            "interest": 0,
            "status": "not-paid"
        });
        let draft: InstallmentLoanDraft = serde_json::from_value(json).unwrap();
        assert_eq!(draft.installment_count, 0);
    }

    #[test]
    fn patch_changes_only_supplied_fields() {
        let mut loan = CreditLoan::from_draft("TC001".parse().unwrap(), credit_draft()).unwrap();
        let before = loan.clone();

        let patch: CreditLoanPatch =
            serde_json::from_value(serde_json::json!({"interest": 650_000})).unwrap();
        loan.apply_patch(patch).unwrap();

        assert_eq!(loan.interest, 650_000);
        assert_eq!(loan.borrower_name, before.borrower_name);
        assert_eq!(loan.loan_date, before.loan_date);
        assert_eq!(loan.principal, before.principal);
        assert_eq!(loan.period_length_days, before.period_length_days);
        assert_eq!(loan.status, before.status);
    }

    #[test]
    fn patch_with_null_required_field_leaves_record_untouched() {
        let mut loan =
            InstallmentLoan::from_draft("TG001".parse().unwrap(), installment_draft()).unwrap();
        let before = loan.clone();

        let patch: InstallmentLoanPatch = serde_json::from_value(serde_json::json!({
            "principal": 1,
            "borrower_name": null
        }))
        .unwrap();
        let err = loan.apply_patch(patch).unwrap_err();

        assert!(matches!(err, CreditError::InvalidArgument(_)));
        assert_eq!(loan, before);
    }

    #[test]
    fn patch_out_of_range_values_are_rejected() {
        let mut loan = CreditLoan::from_draft("TC001".parse().unwrap(), credit_draft()).unwrap();
        let before = loan.clone();

        for body in [
            serde_json::json!({"principal": -5}),
            serde_json::json!({"period_length_days": 0}),
            serde_json::json!({"interest": -1}),
            serde_json::json!({"borrower_name": "  "}),
        ] {
            let patch: CreditLoanPatch = serde_json::from_value(body).unwrap();
            assert!(matches!(
                loan.apply_patch(patch),
                Err(CreditError::InvalidArgument(_))
            ));
            assert_eq!(loan, before);
        }

        let mut loan =
            InstallmentLoan::from_draft("TG001".parse().unwrap(), installment_draft()).unwrap();
        let patch: InstallmentLoanPatch =
            serde_json::from_value(serde_json::json!({"installment_count": -1})).unwrap();
        assert!(loan.apply_patch(patch).is_err());
        assert_eq!(loan.installment_count, 12);
    }

    #[test]
    fn per_period_amount_by_kind() {
        let credit =
            Contract::from(CreditLoan::from_draft("TC001".parse().unwrap(), credit_draft()).unwrap());
        assert_eq!(credit.per_period_amount().unwrap(), 500_000);

        let installment = Contract::from(
            InstallmentLoan::from_draft("TG001".parse().unwrap(), installment_draft()).unwrap(),
        );
        // floor(10_200_000 / 12)
        assert_eq!(installment.per_period_amount().unwrap(), 850_000);
    }

    #[test]
    fn per_period_amount_drops_remainder() {
        let mut draft = installment_draft();
        draft.principal = 1_000;
        draft.interest = 1;
        draft.installment_count = 3;
        let loan = Contract::from(InstallmentLoan::from_draft("TG003".parse().unwrap(), draft).unwrap());
        assert_eq!(loan.per_period_amount().unwrap(), 333);
    }

    #[test]
    fn per_period_amount_rejects_zero_installments() {
        let mut draft = installment_draft();
        draft.installment_count = 0;
        let loan = Contract::from(InstallmentLoan::from_draft("TG004".parse().unwrap(), draft).unwrap());
        assert!(matches!(
            loan.per_period_amount(),
            Err(CreditError::InvalidArgument(_))
        ));
    }

    #[test]
    fn contract_serde_is_tagged() {
        let loan = CreditLoan::from_draft("TC001".parse().unwrap(), credit_draft()).unwrap();
        let json = serde_json::to_value(Contract::from(loan)).unwrap();
        assert_eq!(json["kind"], "credit");
        assert_eq!(json["code"], "TC001");
        assert_eq!(json["loan_date"], "2024-01-01");
    }
}
