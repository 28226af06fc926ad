use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AllocationScope;
use crate::loan::ScheduledRepayment;
use crate::money::Money;
use crate::types::{RepaymentStatus, ScheduledRepaymentId};

/// how much of a payment went to one installment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationLine {
    pub scheduled_repayment_id: ScheduledRepaymentId,
    pub due_date: NaiveDate,
    pub applied: Money,
    pub outstanding_after: Money,
    pub status_after: RepaymentStatus,
}

/// result of spreading one payment over a loan's installments
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Allocation {
    pub lines: Vec<AllocationLine>,
    /// part of the payment no eligible installment could absorb
    pub unallocated: Money,
}

impl Allocation {
    pub fn total_applied(&self) -> Money {
        self.lines.iter().map(|l| l.applied).sum()
    }

    pub fn touches(&self, id: ScheduledRepaymentId) -> bool {
        self.lines.iter().any(|l| l.scheduled_repayment_id == id)
    }
}

/// applies payments to installments, earliest due date first
#[derive(Debug, Clone, Copy)]
pub struct RepaymentAllocator {
    scope: AllocationScope,
}

impl RepaymentAllocator {
    pub fn new(scope: AllocationScope) -> Self {
        Self { scope }
    }

    pub fn is_eligible(&self, installment: &ScheduledRepayment) -> bool {
        match self.scope {
            AllocationScope::DueOnly => installment.status == RepaymentStatus::Due,
            AllocationScope::Outstanding => !installment.status.is_settled(),
        }
    }

    /// allocate `amount` across eligible installments in place
    ///
    /// Installments are ordered by due date here; the order they were handed
    /// in only breaks ties between equal due dates.
    pub fn allocate(
        &self,
        amount: Money,
        installments: &mut [ScheduledRepayment],
        now: DateTime<Utc>,
    ) -> Allocation {
        let mut eligible: Vec<&mut ScheduledRepayment> = installments
            .iter_mut()
            .filter(|i| self.is_eligible(i))
            .collect();
        eligible.sort_by_key(|i| i.due_date);

        let mut remaining = amount;
        let mut lines = Vec::new();

        for installment in eligible {
            if remaining <= Money::ZERO {
                break;
            }

            let applied = installment.settle(remaining, now);
            remaining -= applied;

            debug!(
                scheduled_repayment_id = %installment.id,
                due_date = %installment.due_date,
                applied = %applied,
                outstanding = %installment.outstanding_amount,
                status = ?installment.status,
                "installment allocated"
            );

            lines.push(AllocationLine {
                scheduled_repayment_id: installment.id,
                due_date: installment.due_date,
                applied,
                outstanding_after: installment.outstanding_amount,
                status_after: installment.status,
            });
        }

        Allocation {
            lines,
            unallocated: remaining.max(Money::ZERO),
        }
    }
}
