//! Schedule generator: back-fills elapsed payment periods of a contract.

use tindung_core::{
    plan_schedule_with_limit, Clock, ContractCode, Result, ScheduleOutcome, ScheduleSummary,
    DEFAULT_MAX_PERIODS,
};
use tindung_store::Store;

use super::contracts::find_contract;

/// Writes the history entries owed by a contract as of today.
///
/// Runs are not idempotent: generating twice on the same day writes the same
/// periods twice.
pub struct ScheduleGenerator<'a> {
    store: &'a dyn Store,
    clock: &'a dyn Clock,
    max_periods: usize,
}

impl<'a> ScheduleGenerator<'a> {
    /// Create a generator over the given store and clock.
    #[must_use]
    pub fn new(store: &'a dyn Store, clock: &'a dyn Clock) -> Self {
        Self {
            store,
            clock,
            max_periods: DEFAULT_MAX_PERIODS,
        }
    }

    /// Cap the number of periods a single run may write.
    #[must_use]
    pub fn with_max_periods(mut self, max_periods: usize) -> Self {
        self.max_periods = max_periods;
        self
    }

    /// Plan the schedule for `code` and persist it in one atomic batch.
    ///
    /// # Errors
    ///
    /// - `CreditError::InvalidContractCode` if the prefix is neither `TC` nor `TG`.
    /// - `CreditError::ContractNotFound` if the product table has no such code.
    /// - `CreditError::InvalidArgument` for a contract the amount cannot be
    ///   computed for, or one with more elapsed periods than the cap.
    /// - `CreditError::Internal` if the batch cannot be committed; no rows are
    ///   written in that case.
    pub fn generate(&self, code: &ContractCode) -> Result<ScheduleSummary> {
        let contract = find_contract(self.store, code)?;
        let today = self.clock.today();
        let outcome = plan_schedule_with_limit(&contract, today, self.max_periods)?;

        if let ScheduleOutcome::Due(plan) = &outcome {
            let inserted = match self.store.insert_history_batch(plan.records()) {
                Ok(inserted) => inserted,
                Err(e) => {
                    tracing::error!(code = %code, error = %e, "Schedule batch insert failed");
                    return Err(e.into());
                }
            };
            tracing::info!(
                code = %code,
                kind = %plan.kind,
                %today,
                records = inserted.len(),
                per_period_amount = plan.per_period_amount,
                cumulative_amount = plan.cumulative_amount,
                "Payment schedule generated"
            );
        } else {
            tracing::debug!(code = %code, %today, outcome = ?outcome, "No payment periods due");
        }

        Ok(outcome.summary(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tindung_core::{Contract, CreditError, FixedClock, InstallmentLoan, PaymentStatus};
    use tindung_store::MemoryStore;

    fn today() -> FixedClock {
        FixedClock::new(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap())
    }

    #[test]
    fn unknown_prefix_touches_nothing() {
        let store = MemoryStore::new();
        let clock = today();
        let generator = ScheduleGenerator::new(&store, &clock);

        let code: ContractCode = "XX001".parse().unwrap();
        assert!(matches!(
            generator.generate(&code),
            Err(CreditError::InvalidContractCode { .. })
        ));
        assert_eq!(store.count_history().unwrap(), 0);
    }

    #[test]
    fn installment_single_period() {
        let store = MemoryStore::new();
        store
            .insert_contract(&Contract::Installment(InstallmentLoan {
                code: "TG001".parse().unwrap(),
                borrower_name: "Trần Thị Bình".into(),
                loan_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                principal: 10_000_000,
                period_length_days: 30,
                installment_count: 12,
                interest: 200_000,
                status: PaymentStatus::NotPaid,
            }))
            .unwrap();
        let clock = today();
        let generator = ScheduleGenerator::new(&store, &clock);

        let code: ContractCode = "TG001".parse().unwrap();
        let summary = generator.generate(&code).unwrap();
        assert_eq!(summary.records_created, 1);
        assert_eq!(summary.per_period_amount, Some(850_000));

        let records = store.list_history_by_contract(&code).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].amount, 850_000);
        assert_eq!(
            records[0].payment_date,
            NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()
        );
    }
}
