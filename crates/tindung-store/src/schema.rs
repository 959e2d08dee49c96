//! Database schema definitions and column families.

use tindung_core::LoanKind;

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Credit loans, keyed by contract code.
    pub const CREDIT_LOANS: &str = "credit_loans";

    /// Installment loans, keyed by contract code.
    pub const INSTALLMENT_LOANS: &str = "installment_loans";

    /// Payment history, keyed by big-endian `HistoryId`.
    pub const PAYMENT_HISTORY: &str = "payment_history";

    /// Index: history by contract, keyed by `len(code) || code || id`.
    /// Value is empty (index only).
    pub const PAYMENT_HISTORY_BY_CONTRACT: &str = "payment_history_by_contract";

    /// Counters and other single values.
    pub const META: &str = "meta";
}

/// Key in [`cf::META`] holding the last assigned history id.
pub const HISTORY_SEQUENCE_KEY: &[u8] = b"history_sequence";

/// Contract table for a product.
#[must_use]
pub const fn contract_family(kind: LoanKind) -> &'static str {
    match kind {
        LoanKind::Credit => cf::CREDIT_LOANS,
        LoanKind::Installment => cf::INSTALLMENT_LOANS,
    }
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![
        cf::CREDIT_LOANS,
        cf::INSTALLMENT_LOANS,
        cf::PAYMENT_HISTORY,
        cf::PAYMENT_HISTORY_BY_CONTRACT,
        cf::META,
    ]
}
