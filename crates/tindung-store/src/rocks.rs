//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `Store` trait.
//! Writes that check before they write, and every write touching the history
//! sequence, run under one mutex so the check and the `WriteBatch` commit are
//! not interleaved with another writer.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, Direction, IteratorMode,
    MultiThreaded, Options, WriteBatch,
};

use tindung_core::{
    Contract, ContractCode, HistoryId, HistoryRecord, LoanKind, NewHistoryRecord, PaymentStatus,
};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf, contract_family, HISTORY_SEQUENCE_KEY};
use crate::Store;

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
    write_lock: Mutex<()>,
}

fn db_err(e: rocksdb::Error) -> StoreError {
    StoreError::Database(e.to_string())
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(db_err)?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Mutex::new(()),
        })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| StoreError::Database("write lock poisoned".into()))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Decode every contract of one product, in key order.
    fn scan_contracts(&self, kind: LoanKind) -> Result<Vec<Contract>> {
        let cf = self.cf(contract_family(kind))?;
        self.db
            .iterator_cf(&cf, IteratorMode::Start)
            .map(|item| {
                let (_, value) = item.map_err(db_err)?;
                Self::deserialize(&value)
            })
            .collect()
    }

    /// Ids indexed under one contract, in insertion order.
    fn history_ids_for(&self, code: &ContractCode) -> Result<Vec<HistoryId>> {
        let cf = self.cf(cf::PAYMENT_HISTORY_BY_CONTRACT)?;
        let prefix = keys::contract_history_prefix(code);

        let mut ids = Vec::new();
        for item in self
            .db
            .iterator_cf(&cf, IteratorMode::From(&prefix, Direction::Forward))
        {
            let (key, _) = item.map_err(db_err)?;
            if !key.starts_with(&prefix) {
                break;
            }
            let id = keys::extract_history_id(&key)
                .ok_or_else(|| StoreError::Database("malformed history index key".into()))?;
            ids.push(id);
        }
        Ok(ids)
    }

    fn last_history_id(&self) -> Result<u64> {
        let cf = self.cf(cf::META)?;
        match self.db.get_cf(&cf, HISTORY_SEQUENCE_KEY).map_err(db_err)? {
            Some(value) => keys::decode_sequence(&value)
                .ok_or_else(|| StoreError::Database("malformed history sequence".into())),
            None => Ok(0),
        }
    }
}

impl Store for RocksStore {
    // =========================================================================
    // Contract Operations
    // =========================================================================

    fn insert_contract(&self, contract: &Contract) -> Result<()> {
        let _guard = self.lock()?;
        let cf = self.cf(contract_family(contract.kind()))?;
        let key = keys::contract_key(contract.code());

        if self.db.get_cf(&cf, &key).map_err(db_err)?.is_some() {
            return Err(StoreError::Conflict(contract.code().to_string()));
        }

        let value = Self::serialize(contract)?;
        self.db.put_cf(&cf, key, value).map_err(db_err)
    }

    fn put_contract(&self, contract: &Contract) -> Result<()> {
        let cf = self.cf(contract_family(contract.kind()))?;
        let key = keys::contract_key(contract.code());
        let value = Self::serialize(contract)?;

        self.db.put_cf(&cf, key, value).map_err(db_err)
    }

    fn get_contract(&self, kind: LoanKind, code: &ContractCode) -> Result<Option<Contract>> {
        let cf = self.cf(contract_family(kind))?;

        self.db
            .get_cf(&cf, keys::contract_key(code))
            .map_err(db_err)?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn delete_contract(&self, kind: LoanKind, code: &ContractCode) -> Result<bool> {
        let _guard = self.lock()?;
        let cf = self.cf(contract_family(kind))?;
        let key = keys::contract_key(code);

        if self.db.get_cf(&cf, &key).map_err(db_err)?.is_none() {
            return Ok(false);
        }
        self.db.delete_cf(&cf, key).map_err(db_err)?;
        Ok(true)
    }

    fn list_contracts(
        &self,
        kind: LoanKind,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Contract>> {
        let cf = self.cf(contract_family(kind))?;
        self.db
            .iterator_cf(&cf, IteratorMode::Start)
            .skip(offset)
            .take(limit)
            .map(|item| {
                let (_, value) = item.map_err(db_err)?;
                Self::deserialize(&value)
            })
            .collect()
    }

    fn list_contracts_by_status(
        &self,
        kind: LoanKind,
        status: PaymentStatus,
    ) -> Result<Vec<Contract>> {
        let mut contracts = self.scan_contracts(kind)?;
        contracts.retain(|c| c.status() == status);
        Ok(contracts)
    }

    fn count_contracts(&self, kind: LoanKind, status: Option<PaymentStatus>) -> Result<usize> {
        match status {
            Some(status) => Ok(self.list_contracts_by_status(kind, status)?.len()),
            None => {
                let cf = self.cf(contract_family(kind))?;
                let mut count = 0;
                for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
                    item.map_err(db_err)?;
                    count += 1;
                }
                Ok(count)
            }
        }
    }

    fn contract_codes(&self, kind: LoanKind) -> Result<Vec<ContractCode>> {
        let cf = self.cf(contract_family(kind))?;
        self.db
            .iterator_cf(&cf, IteratorMode::Start)
            .map(|item| {
                let (key, _) = item.map_err(db_err)?;
                std::str::from_utf8(&key)
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(|| StoreError::Database("malformed contract key".into()))
            })
            .collect()
    }

    // =========================================================================
    // History Operations
    // =========================================================================

    fn insert_history_batch(&self, records: Vec<NewHistoryRecord>) -> Result<Vec<HistoryRecord>> {
        let _guard = self.lock()?;
        let cf_history = self.cf(cf::PAYMENT_HISTORY)?;
        let cf_by_contract = self.cf(cf::PAYMENT_HISTORY_BY_CONTRACT)?;
        let cf_meta = self.cf(cf::META)?;

        let last = self.last_history_id()?;
        let count = u64::try_from(records.len())
            .map_err(|_| StoreError::Database("batch too large".into()))?;
        let new_last = last
            .checked_add(count)
            .ok_or_else(|| StoreError::Database("history sequence exhausted".into()))?;

        let mut batch = WriteBatch::default();
        let mut inserted = Vec::with_capacity(records.len());
        for (record, n) in records.into_iter().zip(1u64..) {
            let record = record.with_id(HistoryId::new(last + n));
            let value = Self::serialize(&record)?;
            batch.put_cf(&cf_history, keys::history_key(record.id), &value);
            batch.put_cf(
                &cf_by_contract,
                keys::contract_history_key(&record.contract_code, record.id),
                [],
            );
            inserted.push(record);
        }
        batch.put_cf(&cf_meta, HISTORY_SEQUENCE_KEY, new_last.to_be_bytes());

        // Rows and counter advance together or not at all.
        self.db.write(batch).map_err(db_err)?;

        Ok(inserted)
    }

    fn get_history(&self, id: HistoryId) -> Result<Option<HistoryRecord>> {
        let cf = self.cf(cf::PAYMENT_HISTORY)?;

        self.db
            .get_cf(&cf, keys::history_key(id))
            .map_err(db_err)?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn put_history(&self, record: &HistoryRecord) -> Result<()> {
        let _guard = self.lock()?;
        let cf_history = self.cf(cf::PAYMENT_HISTORY)?;
        let cf_by_contract = self.cf(cf::PAYMENT_HISTORY_BY_CONTRACT)?;

        let existing = self.get_history(record.id)?.ok_or(StoreError::NotFound)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(
            &cf_history,
            keys::history_key(record.id),
            Self::serialize(record)?,
        );
        if existing.contract_code != record.contract_code {
            batch.delete_cf(
                &cf_by_contract,
                keys::contract_history_key(&existing.contract_code, record.id),
            );
            batch.put_cf(
                &cf_by_contract,
                keys::contract_history_key(&record.contract_code, record.id),
                [],
            );
        }

        self.db.write(batch).map_err(db_err)
    }

    fn delete_history(&self, id: HistoryId) -> Result<bool> {
        let _guard = self.lock()?;
        let cf_history = self.cf(cf::PAYMENT_HISTORY)?;
        let cf_by_contract = self.cf(cf::PAYMENT_HISTORY_BY_CONTRACT)?;

        let Some(existing) = self.get_history(id)? else {
            return Ok(false);
        };

        let mut batch = WriteBatch::default();
        batch.delete_cf(&cf_history, keys::history_key(id));
        batch.delete_cf(
            &cf_by_contract,
            keys::contract_history_key(&existing.contract_code, id),
        );
        self.db.write(batch).map_err(db_err)?;

        Ok(true)
    }

    fn list_history(&self, offset: usize, limit: usize) -> Result<Vec<HistoryRecord>> {
        let cf = self.cf(cf::PAYMENT_HISTORY)?;
        self.db
            .iterator_cf(&cf, IteratorMode::Start)
            .skip(offset)
            .take(limit)
            .map(|item| {
                let (_, value) = item.map_err(db_err)?;
                Self::deserialize(&value)
            })
            .collect()
    }

    fn list_history_by_contract(&self, code: &ContractCode) -> Result<Vec<HistoryRecord>> {
        let mut records = Vec::new();
        for id in self.history_ids_for(code)? {
            if let Some(record) = self.get_history(id)? {
                records.push(record);
            }
        }
        Ok(records)
    }

    fn count_history(&self) -> Result<usize> {
        let cf = self.cf(cf::PAYMENT_HISTORY)?;
        let mut count = 0;
        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            item.map_err(db_err)?;
            count += 1;
        }
        Ok(count)
    }

    fn count_history_by_contract(&self, code: &ContractCode) -> Result<usize> {
        Ok(self.history_ids_for(code)?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;
    use tindung_core::{CreditLoan, InstallmentLoan};

    fn create_test_store() -> (RocksStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();
        (store, dir)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn credit(code: &str, status: PaymentStatus) -> Contract {
        Contract::Credit(CreditLoan {
            code: code.parse().unwrap(),
            borrower_name: "Nguyễn Văn An".into(),
            loan_date: date(2024, 1, 1),
            principal: 20_000_000,
            period_length_days: 30,
            interest: 500_000,
            status,
        })
    }

    fn entry(code: &str, amount: i64) -> NewHistoryRecord {
        NewHistoryRecord {
            contract_code: code.parse().unwrap(),
            payment_date: date(2024, 1, 31),
            amount,
            note: Some("period 1".into()),
            status: PaymentStatus::InterestOverdue,
            total_paid: "0".into(),
        }
    }

    #[test]
    fn contract_crud() {
        let (store, _dir) = create_test_store();
        let loan = credit("TC001", PaymentStatus::NotPaid);
        let code = loan.code().clone();

        // Create
        store.insert_contract(&loan).unwrap();
        assert!(matches!(
            store.insert_contract(&loan),
            Err(StoreError::Conflict(_))
        ));

        // Read
        let retrieved = store.get_contract(LoanKind::Credit, &code).unwrap();
        assert_eq!(retrieved, Some(loan));
        assert!(store
            .get_contract(LoanKind::Installment, &code)
            .unwrap()
            .is_none());

        // Update
        store
            .put_contract(&credit("TC001", PaymentStatus::Settled))
            .unwrap();
        assert_eq!(
            store
                .count_contracts(LoanKind::Credit, Some(PaymentStatus::Settled))
                .unwrap(),
            1
        );

        // Delete
        assert!(store.delete_contract(LoanKind::Credit, &code).unwrap());
        assert!(!store.delete_contract(LoanKind::Credit, &code).unwrap());
    }

    #[test]
    fn contract_listing() {
        let (store, _dir) = create_test_store();
        for code in ["TC002", "TC001", "TC003"] {
            store
                .insert_contract(&credit(code, PaymentStatus::NotPaid))
                .unwrap();
        }
        store
            .insert_contract(&Contract::Installment(InstallmentLoan {
                code: "TG001".parse().unwrap(),
                borrower_name: "Trần Thị Bình".into(),
                loan_date: date(2024, 2, 1),
                principal: 10_000_000,
                period_length_days: 30,
                installment_count: 12,
                interest: 200_000,
                status: PaymentStatus::NotPaid,
            }))
            .unwrap();

        let page = store.list_contracts(LoanKind::Credit, 1, 10).unwrap();
        let codes: Vec<_> = page.iter().map(|c| c.code().to_string()).collect();
        assert_eq!(codes, vec!["TC002", "TC003"]);

        assert_eq!(store.count_contracts(LoanKind::Credit, None).unwrap(), 3);
        assert_eq!(store.contract_codes(LoanKind::Installment).unwrap().len(), 1);
    }

    #[test]
    fn history_batch_and_index() {
        let (store, _dir) = create_test_store();
        let inserted = store
            .insert_history_batch(vec![entry("TC001", 0), entry("TG001", 5), entry("TC001", 9)])
            .unwrap();
        let ids: Vec<u64> = inserted.iter().map(|r| r.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let code: ContractCode = "TC001".parse().unwrap();
        let records = store.list_history_by_contract(&code).unwrap();
        assert_eq!(records.iter().map(|r| r.amount).collect::<Vec<_>>(), vec![0, 9]);
        assert_eq!(store.count_history().unwrap(), 3);
        assert_eq!(store.list_history(1, 1).unwrap()[0].amount, 5);
    }

    #[test]
    fn history_sequence_survives_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store = RocksStore::open(dir.path()).unwrap();
            let record = store.insert_history(entry("TC001", 1)).unwrap();
            assert!(store.delete_history(record.id).unwrap());
        }

        let store = RocksStore::open(dir.path()).unwrap();
        let record = store.insert_history(entry("TC001", 1)).unwrap();
        assert_eq!(record.id.get(), 2);
    }

    #[test]
    fn put_history_moves_index_entry() {
        let (store, _dir) = create_test_store();
        let mut record = store.insert_history(entry("TC001", 1)).unwrap();

        record.contract_code = "TG001".parse().unwrap();
        store.put_history(&record).unwrap();

        let old: ContractCode = "TC001".parse().unwrap();
        let new: ContractCode = "TG001".parse().unwrap();
        assert_eq!(store.count_history_by_contract(&old).unwrap(), 0);
        assert_eq!(store.list_history_by_contract(&new).unwrap(), vec![record]);

        let missing = entry("TC001", 1).with_id(HistoryId::new(42));
        assert!(matches!(
            store.put_history(&missing),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn delete_history_removes_index_entry() {
        let (store, _dir) = create_test_store();
        let record = store.insert_history(entry("TC001", 1)).unwrap();

        assert!(store.delete_history(record.id).unwrap());
        assert!(!store.delete_history(record.id).unwrap());
        assert_eq!(
            store
                .count_history_by_contract(&record.contract_code)
                .unwrap(),
            0
        );
    }
}
