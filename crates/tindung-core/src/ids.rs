//! Identifier types for tindung.
//!
//! Contracts are keyed by a business code whose two-letter prefix names the
//! product (`TC` for tín chấp, `TG` for trả góp). History records are keyed by
//! an auto-assigned sequence number.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CreditError;

/// The two loan products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanKind {
    /// Non-collateral credit loan (tín chấp): flat interest every period.
    Credit,
    /// Installment loan (trả góp): principal plus total interest spread over
    /// a fixed number of payments.
    Installment,
}

impl LoanKind {
    /// Code prefix for this product.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Credit => "TC",
            Self::Installment => "TG",
        }
    }

    /// Resolve the product from a contract code prefix.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        if code.starts_with(Self::Installment.prefix()) {
            Some(Self::Installment)
        } else if code.starts_with(Self::Credit.prefix()) {
            Some(Self::Credit)
        } else {
            None
        }
    }
}

impl fmt::Display for LoanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Credit => write!(f, "credit"),
            Self::Installment => write!(f, "installment"),
        }
    }
}

/// A contract code such as `TC001` or `TG042`.
///
/// Any non-empty string is a valid code; whether it resolves to a product is
/// checked by [`ContractCode::kind`].
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContractCode(String);

impl ContractCode {
    /// Build a code from its parts, zero-padding the number to three digits.
    #[must_use]
    pub fn from_parts(kind: LoanKind, number: u32) -> Self {
        Self(format!("{}{number:03}", kind.prefix()))
    }

    /// The product this code belongs to, if the prefix is recognised.
    #[must_use]
    pub fn kind(&self) -> Option<LoanKind> {
        LoanKind::from_code(&self.0)
    }

    /// Like [`ContractCode::kind`] but fails for an unrecognised prefix.
    ///
    /// # Errors
    ///
    /// Returns `CreditError::InvalidContractCode` when neither prefix matches.
    pub fn require_kind(&self) -> Result<LoanKind, CreditError> {
        self.kind().ok_or_else(|| CreditError::InvalidContractCode {
            code: self.0.clone(),
        })
    }

    /// Numeric suffix after the product prefix, if there is one.
    #[must_use]
    pub fn number(&self) -> Option<u32> {
        let kind = self.kind()?;
        self.0[kind.prefix().len()..].parse().ok()
    }

    /// The code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ContractCode {
    type Err = CreditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(CreditError::invalid("contract code must not be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl TryFrom<String> for ContractCode {
    type Error = CreditError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ContractCode> for String {
    fn from(code: ContractCode) -> Self {
        code.0
    }
}

impl fmt::Debug for ContractCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContractCode({})", self.0)
    }
}

impl fmt::Display for ContractCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<[u8]> for ContractCode {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

/// Sequence number of a payment-history record (số thứ tự).
///
/// Assigned by the store on insert; strictly increasing and never reused.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryId(u64);

impl HistoryId {
    /// Wrap a raw sequence number.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// The raw sequence number.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Big-endian bytes, so byte order equals numeric order.
    #[must_use]
    pub const fn to_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    /// Inverse of [`HistoryId::to_bytes`].
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 8]) -> Self {
        Self(u64::from_be_bytes(bytes))
    }
}

impl fmt::Debug for HistoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HistoryId({})", self.0)
    }
}

impl fmt::Display for HistoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
