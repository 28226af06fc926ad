pub mod allocation;
pub mod amortization;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::{CurrencyPolicy, LedgerConfig, OverpaymentPolicy};
use crate::errors::{LedgerError, Result};
use crate::loan::{Loan, ReceivedRepayment};
use crate::money::{CurrencyCode, Money};
use crate::types::LoanId;

pub use allocation::{Allocation, AllocationLine, RepaymentAllocator};
pub use amortization::{AmortizationSchedule, PlannedInstallment};

/// repayment request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepaymentRequest {
    pub loan_id: LoanId,
    pub amount: Money,
    pub currency_code: CurrencyCode,
    pub received_at: NaiveDate,
}

impl RepaymentRequest {
    /// check the request against the loan under the configured policies
    pub fn validate_against(&self, loan: &Loan, config: &LedgerConfig) -> Result<()> {
        if !self.amount.is_positive() {
            return Err(LedgerError::InvalidAmount { amount: self.amount });
        }

        if config.currency == CurrencyPolicy::RequireLoanCurrency
            && self.currency_code != loan.currency_code
        {
            return Err(LedgerError::CurrencyMismatch {
                expected: loan.currency_code,
                provided: self.currency_code,
            });
        }

        if config.overpayment == OverpaymentPolicy::Reject {
            if loan.is_repaid() {
                return Err(LedgerError::LoanAlreadyRepaid { id: loan.id });
            }
            if self.amount > loan.outstanding_amount {
                return Err(LedgerError::Overpayment {
                    outstanding: loan.outstanding_amount,
                    provided: self.amount,
                });
            }
        }

        Ok(())
    }
}

/// everything a repayment produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepaymentOutcome {
    pub received: ReceivedRepayment,
    pub allocation: Allocation,
    /// loan after the repayment
    pub loan: Loan,
}
