//! In-memory storage implementation.
//!
//! All state sits behind one `RwLock`, so every trait method is atomic with
//! respect to the others.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tindung_core::{
    Contract, ContractCode, HistoryId, HistoryRecord, LoanKind, NewHistoryRecord, PaymentStatus,
};

use crate::error::{Result, StoreError};
use crate::Store;

#[derive(Debug, Default)]
struct Tables {
    credit_loans: BTreeMap<ContractCode, Contract>,
    installment_loans: BTreeMap<ContractCode, Contract>,
    history: BTreeMap<HistoryId, HistoryRecord>,
    last_history_id: u64,
}

impl Tables {
    fn contracts(&self, kind: LoanKind) -> &BTreeMap<ContractCode, Contract> {
        match kind {
            LoanKind::Credit => &self.credit_loans,
            LoanKind::Installment => &self.installment_loans,
        }
    }

    fn contracts_mut(&mut self, kind: LoanKind) -> &mut BTreeMap<ContractCode, Contract> {
        match kind {
            LoanKind::Credit => &mut self.credit_loans,
            LoanKind::Installment => &mut self.installment_loans,
        }
    }
}

/// Process-local storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| StoreError::Database("memory store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| StoreError::Database("memory store lock poisoned".into()))
    }
}

impl Store for MemoryStore {
    // =========================================================================
    // Contract Operations
    // =========================================================================

    fn insert_contract(&self, contract: &Contract) -> Result<()> {
        let mut tables = self.write()?;
        let table = tables.contracts_mut(contract.kind());
        if table.contains_key(contract.code()) {
            return Err(StoreError::Conflict(contract.code().to_string()));
        }
        table.insert(contract.code().clone(), contract.clone());
        Ok(())
    }

    fn put_contract(&self, contract: &Contract) -> Result<()> {
        self.write()?
            .contracts_mut(contract.kind())
            .insert(contract.code().clone(), contract.clone());
        Ok(())
    }

    fn get_contract(&self, kind: LoanKind, code: &ContractCode) -> Result<Option<Contract>> {
        Ok(self.read()?.contracts(kind).get(code).cloned())
    }

    fn delete_contract(&self, kind: LoanKind, code: &ContractCode) -> Result<bool> {
        Ok(self.write()?.contracts_mut(kind).remove(code).is_some())
    }

    fn list_contracts(
        &self,
        kind: LoanKind,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Contract>> {
        Ok(self
            .read()?
            .contracts(kind)
            .values()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    fn list_contracts_by_status(
        &self,
        kind: LoanKind,
        status: PaymentStatus,
    ) -> Result<Vec<Contract>> {
        Ok(self
            .read()?
            .contracts(kind)
            .values()
            .filter(|c| c.status() == status)
            .cloned()
            .collect())
    }

    fn count_contracts(&self, kind: LoanKind, status: Option<PaymentStatus>) -> Result<usize> {
        let tables = self.read()?;
        let table = tables.contracts(kind);
        Ok(match status {
            Some(status) => table.values().filter(|c| c.status() == status).count(),
            None => table.len(),
        })
    }

    fn contract_codes(&self, kind: LoanKind) -> Result<Vec<ContractCode>> {
        Ok(self.read()?.contracts(kind).keys().cloned().collect())
    }

    // =========================================================================
    // History Operations
    // =========================================================================

    fn insert_history_batch(&self, records: Vec<NewHistoryRecord>) -> Result<Vec<HistoryRecord>> {
        let mut tables = self.write()?;

        let count = u64::try_from(records.len())
            .map_err(|_| StoreError::Database("batch too large".into()))?;
        let last = tables.last_history_id;
        tables.last_history_id = last
            .checked_add(count)
            .ok_or_else(|| StoreError::Database("history sequence exhausted".into()))?;

        let inserted: Vec<HistoryRecord> = records
            .into_iter()
            .zip(1..)
            .map(|(record, n)| (record, last + n))
            .map(|(record, id)| record.with_id(HistoryId::new(id)))
            .collect();
        for record in &inserted {
            tables.history.insert(record.id, record.clone());
        }
        Ok(inserted)
    }

    fn get_history(&self, id: HistoryId) -> Result<Option<HistoryRecord>> {
        Ok(self.read()?.history.get(&id).cloned())
    }

    fn put_history(&self, record: &HistoryRecord) -> Result<()> {
        let mut tables = self.write()?;
        let slot = tables.history.get_mut(&record.id).ok_or(StoreError::NotFound)?;
        *slot = record.clone();
        Ok(())
    }

    fn delete_history(&self, id: HistoryId) -> Result<bool> {
        Ok(self.write()?.history.remove(&id).is_some())
    }

    fn list_history(&self, offset: usize, limit: usize) -> Result<Vec<HistoryRecord>> {
        Ok(self
            .read()?
            .history
            .values()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    fn list_history_by_contract(&self, code: &ContractCode) -> Result<Vec<HistoryRecord>> {
        Ok(self
            .read()?
            .history
            .values()
            .filter(|r| &r.contract_code == code)
            .cloned()
            .collect())
    }

    fn count_history(&self) -> Result<usize> {
        Ok(self.read()?.history.len())
    }

    fn count_history_by_contract(&self, code: &ContractCode) -> Result<usize> {
        Ok(self
            .read()?
            .history
            .values()
            .filter(|r| &r.contract_code == code)
            .count())
    }
}
