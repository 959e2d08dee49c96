//! Contract service: CRUD over one loan product.

use std::marker::PhantomData;

use tindung_core::{Contract, ContractCode, CreditError, Loan, PaymentStatus, Result};
use tindung_store::Store;

use super::codes::CodeGenerator;

/// CRUD operations for the product `L`.
pub struct ContractService<'a, L: Loan> {
    store: &'a dyn Store,
    codes: &'a dyn CodeGenerator,
    _loan: PhantomData<L>,
}

impl<'a, L: Loan> ContractService<'a, L> {
    /// Create a service over the given store.
    #[must_use]
    pub fn new(store: &'a dyn Store, codes: &'a dyn CodeGenerator) -> Self {
        Self {
            store,
            codes,
            _loan: PhantomData,
        }
    }

    /// Validate a draft, assign the next code and persist it.
    ///
    /// # Errors
    ///
    /// Returns `CreditError::InvalidArgument` for an out-of-range draft and
    /// `CreditError::Conflict` if the assigned code is already taken.
    pub fn create(&self, draft: L::Draft) -> Result<L> {
        let code = self.codes.next_code(self.store, L::KIND)?;
        let loan = L::from_draft(code, draft)?;
        self.store.insert_contract(&loan.clone().into())?;

        tracing::info!(code = %loan.code(), kind = %L::KIND, "Contract created");
        Ok(loan)
    }

    /// Get a contract by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn get(&self, code: &ContractCode) -> Result<Option<L>> {
        self.store
            .get_contract(L::KIND, code)?
            .map(narrow)
            .transpose()
    }

    /// List contracts in code order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn list(&self, skip: usize, limit: usize) -> Result<Vec<L>> {
        self.store
            .list_contracts(L::KIND, skip, limit)?
            .into_iter()
            .map(narrow)
            .collect()
    }

    /// List contracts that carry `status`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn list_by_status(&self, status: PaymentStatus) -> Result<Vec<L>> {
        self.store
            .list_contracts_by_status(L::KIND, status)?
            .into_iter()
            .map(narrow)
            .collect()
    }

    /// Merge a partial update. Returns `None` for an unknown code.
    ///
    /// # Errors
    ///
    /// Returns `CreditError::InvalidArgument` when the patch sends `null` for
    /// a required field. Nothing is written in that case.
    pub fn update(&self, code: &ContractCode, patch: L::Patch) -> Result<Option<L>> {
        let Some(mut loan) = self.get(code)? else {
            return Ok(None);
        };
        loan.apply_patch(patch)?;
        self.store.put_contract(&loan.clone().into())?;

        tracing::info!(code = %code, kind = %L::KIND, "Contract updated");
        Ok(Some(loan))
    }

    /// Delete a contract. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn delete(&self, code: &ContractCode) -> Result<bool> {
        let deleted = self.store.delete_contract(L::KIND, code)?;
        if deleted {
            tracing::info!(code = %code, kind = %L::KIND, "Contract deleted");
        }
        Ok(deleted)
    }

    /// Count contracts, optionally only those with `status`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn count(&self, status: Option<PaymentStatus>) -> Result<usize> {
        Ok(self.store.count_contracts(L::KIND, status)?)
    }
}

fn narrow<L: Loan>(contract: Contract) -> Result<L> {
    let code = contract.code().clone();
    L::from_contract(contract).ok_or_else(|| {
        CreditError::Internal(format!("contract {code} is stored in the wrong table"))
    })
}

/// Resolve a code to its contract by prefix, then look it up in that
/// product's table only.
///
/// # Errors
///
/// Returns `CreditError::InvalidContractCode` for an unknown prefix, without
/// touching the store, and `CreditError::ContractNotFound` when the table has
/// no such code.
pub fn find_contract(store: &dyn Store, code: &ContractCode) -> Result<Contract> {
    let kind = code.require_kind()?;
    store
        .get_contract(kind, code)?
        .ok_or_else(|| CreditError::ContractNotFound {
            code: code.to_string(),
        })
}
