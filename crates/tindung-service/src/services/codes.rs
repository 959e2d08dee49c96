//! Contract code generation.

use tindung_core::{ContractCode, CreditError, LoanKind, Result};
use tindung_store::Store;

/// Produces the code for a newly created contract.
pub trait CodeGenerator: Send + Sync {
    /// Next unused code for `kind`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or codes are exhausted.
    fn next_code(&self, store: &dyn Store, kind: LoanKind) -> Result<ContractCode>;
}

/// Numbers codes one past the highest numeric suffix already stored:
/// `TC001`, `TC002`, ... and `TG001`, ...
///
/// Two concurrent creates can be handed the same code; the second insert
/// then fails with a conflict.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialCodeGenerator;

impl CodeGenerator for SequentialCodeGenerator {
    fn next_code(&self, store: &dyn Store, kind: LoanKind) -> Result<ContractCode> {
        let highest = store
            .contract_codes(kind)?
            .iter()
            .filter(|code| code.kind() == Some(kind))
            .filter_map(ContractCode::number)
            .max()
            .unwrap_or(0);

        let next = highest
            .checked_add(1)
            .ok_or_else(|| CreditError::Internal(format!("{} codes exhausted", kind.prefix())))?;

        Ok(ContractCode::from_parts(kind, next))
    }
}
