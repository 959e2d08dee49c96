//! Storage layer for tindung.
//!
//! This crate persists contracts and payment history behind the [`Store`]
//! trait. Two backends are provided:
//!
//! - [`MemoryStore`]: process-local maps, used by tests and as the fallback
//!   when the service is built without `RocksDB`.
//! - `RocksStore` (feature `rocksdb-backend`): column families with CBOR values.
//!
//! # Architecture
//!
//! The `RocksDB` backend uses the following column families:
//!
//! - `credit_loans`: credit loans, keyed by contract code
//! - `installment_loans`: installment loans, keyed by contract code
//! - `payment_history`: history records, keyed by big-endian id
//! - `payment_history_by_contract`: index for listing history by contract
//! - `meta`: the history sequence counter
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use tindung_core::{ContractCode, NewHistoryRecord, PaymentStatus};
//! use tindung_store::{MemoryStore, Store};
//!
//! let store = MemoryStore::new();
//! let code: ContractCode = "TC001".parse().unwrap();
//!
//! let record = store
//!     .insert_history(NewHistoryRecord {
//!         contract_code: code.clone(),
//!         payment_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
//!         amount: 500_000,
//!         note: None,
//!         status: PaymentStatus::NotPaid,
//!         total_paid: "0".into(),
//!     })
//!     .unwrap();
//!
//! assert_eq!(store.count_history_by_contract(&code).unwrap(), 1);
//! assert_eq!(store.get_history(record.id).unwrap(), Some(record));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod memory;
#[cfg(feature = "rocksdb-backend")]
pub mod rocks;
pub mod schema;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
#[cfg(feature = "rocksdb-backend")]
pub use rocks::RocksStore;

use tindung_core::{
    Contract, ContractCode, HistoryId, HistoryRecord, LoanKind, NewHistoryRecord, PaymentStatus,
};

/// The storage trait defining all database operations.
///
/// Each method is one atomic unit of work. Contracts of the two products live
/// in disjoint tables selected by [`LoanKind`].
pub trait Store: Send + Sync {
    // =========================================================================
    // Contract Operations
    // =========================================================================

    /// Insert a new contract.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if a contract with the same code exists.
    fn insert_contract(&self, contract: &Contract) -> Result<()>;

    /// Insert or replace a contract.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_contract(&self, contract: &Contract) -> Result<()>;

    /// Get a contract by code from the given product's table.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_contract(&self, kind: LoanKind, code: &ContractCode) -> Result<Option<Contract>>;

    /// Delete a contract. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn delete_contract(&self, kind: LoanKind, code: &ContractCode) -> Result<bool>;

    /// List contracts of one product in code order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_contracts(&self, kind: LoanKind, offset: usize, limit: usize)
        -> Result<Vec<Contract>>;

    /// List contracts of one product that carry `status`, in code order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_contracts_by_status(
        &self,
        kind: LoanKind,
        status: PaymentStatus,
    ) -> Result<Vec<Contract>>;

    /// Count contracts of one product, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn count_contracts(&self, kind: LoanKind, status: Option<PaymentStatus>) -> Result<usize>;

    /// All codes stored for one product.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn contract_codes(&self, kind: LoanKind) -> Result<Vec<ContractCode>>;

    // =========================================================================
    // History Operations
    // =========================================================================

    /// Insert one history record, assigning the next id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn insert_history(&self, record: NewHistoryRecord) -> Result<HistoryRecord> {
        self.insert_history_batch(vec![record])?
            .pop()
            .ok_or_else(|| StoreError::Database("batch insert returned no record".into()))
    }

    /// Insert records in one atomic write, assigning consecutive ids in input
    /// order. On error nothing is written and no id is consumed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn insert_history_batch(&self, records: Vec<NewHistoryRecord>) -> Result<Vec<HistoryRecord>>;

    /// Get a history record by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_history(&self, id: HistoryId) -> Result<Option<HistoryRecord>>;

    /// Replace an existing history record.
    ///
    /// This also moves the contract index entry when `contract_code` changed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no record has this id.
    fn put_history(&self, record: &HistoryRecord) -> Result<()>;

    /// Delete a history record. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn delete_history(&self, id: HistoryId) -> Result<bool>;

    /// List history records in id order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_history(&self, offset: usize, limit: usize) -> Result<Vec<HistoryRecord>>;

    /// List the history of one contract in id order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_history_by_contract(&self, code: &ContractCode) -> Result<Vec<HistoryRecord>>;

    /// Count all history records.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn count_history(&self) -> Result<usize>;

    /// Count the history records of one contract.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn count_history_by_contract(&self, code: &ContractCode) -> Result<usize>;
}
