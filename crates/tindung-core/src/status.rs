//! Payment status (trạng thái thanh toán).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a contract or a payment-history entry.
///
/// Serialized as a kebab-case label. The Vietnamese labels used by earlier
/// clients are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentStatus {
    /// Nothing paid yet. Initial status of every credit loan.
    #[serde(alias = "Chưa thanh toán")]
    NotPaid,

    /// Paid in full for the period.
    #[serde(alias = "Đóng đủ")]
    FullyPaid,

    /// Part of the amount due was paid.
    #[serde(alias = "Thanh toán một phần")]
    PartiallyPaid,

    /// Interest is due now.
    #[serde(alias = "Đến hạn trả lãi")]
    InterestDue,

    /// Interest is past due. Set on every generated history entry.
    #[serde(alias = "Quá hạn trả lãi")]
    InterestOverdue,

    /// Contract settled.
    #[serde(alias = "Đã tất toán")]
    Settled,
}

impl PaymentStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 6] = [
        Self::NotPaid,
        Self::FullyPaid,
        Self::PartiallyPaid,
        Self::InterestDue,
        Self::InterestOverdue,
        Self::Settled,
    ];

    /// Boundary label, identical to the serde representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotPaid => "not-paid",
            Self::FullyPaid => "fully-paid",
            Self::PartiallyPaid => "partially-paid",
            Self::InterestDue => "interest-due",
            Self::InterestOverdue => "interest-overdue",
            Self::Settled => "settled",
        }
    }

    /// Vietnamese display label.
    #[must_use]
    pub const fn vietnamese_label(self) -> &'static str {
        match self {
            Self::NotPaid => "Chưa thanh toán",
            Self::FullyPaid => "Đóng đủ",
            Self::PartiallyPaid => "Thanh toán một phần",
            Self::InterestDue => "Đến hạn trả lãi",
            Self::InterestOverdue => "Quá hạn trả lãi",
            Self::Settled => "Đã tất toán",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
