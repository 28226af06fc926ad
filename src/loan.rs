use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{LedgerError, Result};
use crate::money::{CurrencyCode, Money};
use crate::types::{
    CustomerId, LoanId, LoanStatus, ReceivedRepaymentId, RepaymentStatus, ScheduledRepaymentId,
};

/// a consumer loan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub borrower_id: CustomerId,
    /// original principal
    pub amount: Money,
    pub currency_code: CurrencyCode,
    /// number of installments
    pub terms: u32,
    /// principal not yet repaid across all installments
    pub outstanding_amount: Money,
    /// origination date
    pub processed_at: NaiveDate,
    pub status: LoanStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Loan {
    pub fn new(
        borrower_id: CustomerId,
        amount: Money,
        currency_code: CurrencyCode,
        terms: u32,
        processed_at: NaiveDate,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            borrower_id,
            amount,
            currency_code,
            terms,
            outstanding_amount: amount,
            processed_at,
            status: LoanStatus::Due,
            created_at: now,
            updated_at: now,
        }
    }

    /// reduce the outstanding balance by the full received amount
    pub fn apply_repayment(&mut self, amount: Money, now: DateTime<Utc>) -> Result<()> {
        self.outstanding_amount = self
            .outstanding_amount
            .checked_sub(amount)
            .ok_or(LedgerError::AmountOutOfRange {
                outstanding: self.outstanding_amount,
                provided: amount,
            })?;
        self.status = if self.outstanding_amount.is_zero() {
            LoanStatus::Repaid
        } else {
            LoanStatus::Due
        };
        self.updated_at = now;
        Ok(())
    }

    pub fn is_repaid(&self) -> bool {
        self.status == LoanStatus::Repaid
    }
}

/// one installment of a loan's principal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledRepayment {
    pub id: ScheduledRepaymentId,
    pub loan_id: LoanId,
    pub amount: Money,
    pub outstanding_amount: Money,
    pub currency_code: CurrencyCode,
    pub due_date: NaiveDate,
    pub status: RepaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ScheduledRepayment {
    pub fn new(
        loan_id: LoanId,
        amount: Money,
        currency_code: CurrencyCode,
        due_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            loan_id,
            amount,
            outstanding_amount: amount,
            currency_code,
            due_date,
            status: RepaymentStatus::Due,
            created_at: now,
            updated_at: now,
        }
    }

    /// absorb up to `available` of a payment, returning the amount absorbed
    pub fn settle(&mut self, available: Money, now: DateTime<Utc>) -> Money {
        let applied = available.min(self.outstanding_amount).max(Money::ZERO);
        self.outstanding_amount -= applied;
        self.status = RepaymentStatus::from_outstanding(self.outstanding_amount, self.amount);
        self.updated_at = now;
        applied
    }

    pub fn paid_amount(&self) -> Money {
        self.amount - self.outstanding_amount
    }
}

/// an incoming payment, recorded once and never changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceivedRepayment {
    pub id: ReceivedRepaymentId,
    pub loan_id: LoanId,
    pub amount: Money,
    pub currency_code: CurrencyCode,
    pub received_at: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl ReceivedRepayment {
    pub fn new(
        loan_id: LoanId,
        amount: Money,
        currency_code: CurrencyCode,
        received_at: NaiveDate,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            loan_id,
            amount,
            currency_code,
            received_at,
            created_at: now,
        }
    }
}
