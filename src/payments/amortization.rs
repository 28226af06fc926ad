use chrono::{Months, NaiveDate};

use crate::errors::{LedgerError, Result};
use crate::money::Money;

/// one row of a generated schedule, before it is tied to a loan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedInstallment {
    pub installment_number: u32,
    pub amount: Money,
    pub due_date: NaiveDate,
}

/// equal-principal installment schedule with the remainder on the last row
#[derive(Debug, Clone)]
pub struct AmortizationSchedule {
    pub principal: Money,
    pub terms: u32,
    pub start_date: NaiveDate,
    pub installments: Vec<PlannedInstallment>,
}

impl AmortizationSchedule {
    /// generate the schedule: one installment per month after `start_date`
    pub fn generate(principal: Money, terms: u32, start_date: NaiveDate) -> Result<Self> {
        let (base, last) = split_principal(principal, terms)?;

        let installments = (0..terms)
            .map(|i| -> Result<PlannedInstallment> {
                let amount = if i == terms - 1 { last } else { base };
                Ok(PlannedInstallment {
                    installment_number: i + 1,
                    amount,
                    due_date: add_months(start_date, i + 1)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            principal,
            terms,
            start_date,
            installments,
        })
    }

    pub fn total(&self) -> Money {
        self.installments.iter().map(|i| i.amount).sum()
    }

    /// get installment by 1-based number
    pub fn get_installment(&self, installment_number: u32) -> Option<&PlannedInstallment> {
        installment_number
            .checked_sub(1)
            .and_then(|idx| self.installments.get(idx as usize))
    }
}

/// base installment and the last installment absorbing the remainder
pub fn split_principal(principal: Money, terms: u32) -> Result<(Money, Money)> {
    if !principal.is_positive() {
        return Err(LedgerError::InvalidAmount { amount: principal });
    }
    if terms == 0 {
        return Err(LedgerError::InvalidTermCount { terms });
    }

    let minor = principal.minor();
    let terms = i64::from(terms);
    // both operands are positive so truncation is floor
    let base = minor / terms;
    let last = minor - base * (terms - 1);

    Ok((Money::from_minor(base), Money::from_minor(last)))
}

/// calendar month addition, clamped to the last day of the target month
pub fn add_months(date: NaiveDate, months: u32) -> Result<NaiveDate> {
    date.checked_add_months(Months::new(months))
        .ok_or_else(|| LedgerError::InvalidDate {
            message: format!("{} + {} months is out of range", date, months),
        })
}
