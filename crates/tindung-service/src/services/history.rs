//! History service: CRUD over payment-history records.

use tindung_core::{
    ContractCode, CreditError, HistoryId, HistoryPatch, HistoryRecord, LoanKind,
    NewHistoryRecord, Patch, Result,
};
use tindung_store::Store;

/// CRUD operations for payment history.
pub struct HistoryService<'a> {
    store: &'a dyn Store,
}

impl<'a> HistoryService<'a> {
    /// Create a service over the given store.
    #[must_use]
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Record a single payment entry.
    ///
    /// The contract must exist in either product table.
    ///
    /// # Errors
    ///
    /// Returns `CreditError::InvalidArgument` unless `amount > 0` and
    /// `CreditError::ContractNotFound` for an unknown contract.
    pub fn create(&self, draft: NewHistoryRecord) -> Result<HistoryRecord> {
        draft.validate()?;
        if !self.contract_exists(&draft.contract_code)? {
            return Err(CreditError::ContractNotFound {
                code: draft.contract_code.to_string(),
            });
        }

        let record = self.store.insert_history(draft)?;
        tracing::info!(
            id = %record.id,
            contract_code = %record.contract_code,
            amount = record.amount,
            "Payment history recorded"
        );
        Ok(record)
    }

    fn contract_exists(&self, code: &ContractCode) -> Result<bool> {
        for kind in [LoanKind::Credit, LoanKind::Installment] {
            if self.store.get_contract(kind, code)?.is_some() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Get a record by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn get(&self, id: HistoryId) -> Result<Option<HistoryRecord>> {
        Ok(self.store.get_history(id)?)
    }

    /// List records in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn list(&self, skip: usize, limit: usize) -> Result<Vec<HistoryRecord>> {
        Ok(self.store.list_history(skip, limit)?)
    }

    /// All records of one contract, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn list_by_contract(&self, code: &ContractCode) -> Result<Vec<HistoryRecord>> {
        Ok(self.store.list_history_by_contract(code)?)
    }

    /// Merge a partial update. Returns `None` for an unknown id.
    ///
    /// # Errors
    ///
    /// Returns `CreditError::InvalidArgument` when the patch sends `null` for
    /// a required field or a non-positive amount, and
    /// `CreditError::ContractNotFound` when it moves the record to an unknown
    /// contract. Nothing is written in either case.
    pub fn update(&self, id: HistoryId, patch: HistoryPatch) -> Result<Option<HistoryRecord>> {
        let Some(mut record) = self.store.get_history(id)? else {
            return Ok(None);
        };
        if let Patch::Value(code) = &patch.contract_code {
            if !self.contract_exists(code)? {
                return Err(CreditError::ContractNotFound {
                    code: code.to_string(),
                });
            }
        }
        record.apply_patch(patch)?;
        self.store.put_history(&record)?;

        tracing::info!(id = %id, "Payment history updated");
        Ok(Some(record))
    }

    /// Delete a record. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn delete(&self, id: HistoryId) -> Result<bool> {
        let deleted = self.store.delete_history(id)?;
        if deleted {
            tracing::info!(id = %id, "Payment history deleted");
        }
        Ok(deleted)
    }

    /// Count all records.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn count(&self) -> Result<usize> {
        Ok(self.store.count_history()?)
    }

    /// Count the records of one contract.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn count_by_contract(&self, code: &ContractCode) -> Result<usize> {
        Ok(self.store.count_history_by_contract(code)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tindung_core::{Contract, CreditLoan, PaymentStatus};
    use tindung_store::MemoryStore;

    fn store_with_contract() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .insert_contract(&Contract::Credit(CreditLoan {
                code: "TC001".parse().unwrap(),
                borrower_name: "Nguyễn Văn An".into(),
                loan_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                principal: 20_000_000,
                period_length_days: 30,
                interest: 500_000,
                status: PaymentStatus::NotPaid,
            }))
            .unwrap();
        store
    }

    fn draft(code: &str, amount: i64) -> NewHistoryRecord {
        NewHistoryRecord {
            contract_code: code.parse().unwrap(),
            payment_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            amount,
            note: Some("period 1".into()),
            status: PaymentStatus::FullyPaid,
            total_paid: "500000".into(),
        }
    }

    #[test]
    fn create_requires_known_contract() {
        let store = store_with_contract();
        let service = HistoryService::new(&store);

        let record = service.create(draft("TC001", 500_000)).unwrap();
        assert_eq!(record.id, HistoryId::new(1));

        assert!(matches!(
            service.create(draft("TC404", 500_000)),
            Err(CreditError::ContractNotFound { .. })
        ));
        assert!(matches!(
            service.create(draft("ZZ001", 500_000)),
            Err(CreditError::ContractNotFound { .. })
        ));
        assert_eq!(service.count().unwrap(), 1);
    }

    #[test]
    fn create_rejects_non_positive_amount() {
        let store = store_with_contract();
        let service = HistoryService::new(&store);

        assert!(matches!(
            service.create(draft("TC001", 0)),
            Err(CreditError::InvalidArgument(_))
        ));
        assert_eq!(service.count().unwrap(), 0);
    }

    #[test]
    fn update_clears_note_and_keeps_other_fields() {
        let store = store_with_contract();
        let service = HistoryService::new(&store);
        let record = service.create(draft("TC001", 500_000)).unwrap();

        let patch = HistoryPatch {
            note: Patch::Null,
            ..HistoryPatch::default()
        };
        let updated = service.update(record.id, patch).unwrap().unwrap();
        assert_eq!(updated.note, None);
        assert_eq!(updated.amount, 500_000);
        assert_eq!(service.get(record.id).unwrap(), Some(updated));

        assert!(service
            .update(HistoryId::new(99), HistoryPatch::default())
            .unwrap()
            .is_none());
    }

    #[test]
    fn update_rejects_unknown_contract() {
        let store = store_with_contract();
        let service = HistoryService::new(&store);
        let record = service.create(draft("TC001", 500_000)).unwrap();

        let patch = HistoryPatch {
            contract_code: Patch::Value("ZZ999".parse().unwrap()),
            ..HistoryPatch::default()
        };
        assert!(matches!(
            service.update(record.id, patch),
            Err(CreditError::ContractNotFound { .. })
        ));
        assert_eq!(service.get(record.id).unwrap(), Some(record));
    }

    #[test]
    fn delete_reports_missing_id() {
        let store = store_with_contract();
        let service = HistoryService::new(&store);
        let record = service.create(draft("TC001", 500_000)).unwrap();

        assert!(service.delete(record.id).unwrap());
        assert!(!service.delete(record.id).unwrap());
        let code: ContractCode = "TC001".parse().unwrap();
        assert_eq!(service.count_by_contract(&code).unwrap(), 0);
        assert!(service.list_by_contract(&code).unwrap().is_empty());
    }
}
