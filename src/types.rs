use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::Money;

/// unique identifier for a customer (borrower or card holder)
pub type CustomerId = Uuid;

/// unique identifier for a loan
pub type LoanId = Uuid;

/// unique identifier for a scheduled repayment
pub type ScheduledRepaymentId = Uuid;

/// unique identifier for a received repayment
pub type ReceivedRepaymentId = Uuid;

/// unique identifier for a debit card
pub type CardId = Uuid;

/// unique identifier for a debit card transaction
pub type CardTransactionId = Uuid;

/// loan status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    /// principal still outstanding
    Due,
    /// fully paid off
    Repaid,
}

/// scheduled repayment (installment) status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepaymentStatus {
    /// nothing paid yet
    Due,
    /// some but not all of the installment paid
    Partial,
    /// fully paid
    Repaid,
}

impl RepaymentStatus {
    /// status implied by an installment's outstanding balance
    pub fn from_outstanding(outstanding: Money, amount: Money) -> Self {
        if outstanding <= Money::ZERO {
            RepaymentStatus::Repaid
        } else if outstanding >= amount {
            RepaymentStatus::Due
        } else {
            RepaymentStatus::Partial
        }
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, RepaymentStatus::Repaid)
    }
}
