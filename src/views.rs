/// serializable views handed to callers for rendering
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::cards::{DebitCard, DebitCardTransaction};
use crate::loan::{Loan, ReceivedRepayment, ScheduledRepayment};
use crate::money::Money;
use crate::types::RepaymentStatus;

/// a loan with its schedule and payment history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanView {
    #[serde(flatten)]
    pub loan: Loan,
    pub scheduled_repayments: Vec<ScheduledRepayment>,
    pub received_repayments: Vec<ReceivedRepayment>,
    pub summary: LoanSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanSummary {
    pub total_received: Money,
    pub scheduled_outstanding: Money,
    pub installments_repaid: u32,
    pub installments_remaining: u32,
    pub next_due_date: Option<NaiveDate>,
    pub next_due_amount: Option<Money>,
}

impl LoanView {
    pub fn new(
        loan: Loan,
        scheduled_repayments: Vec<ScheduledRepayment>,
        received_repayments: Vec<ReceivedRepayment>,
    ) -> Self {
        let summary = LoanSummary::compute(&scheduled_repayments, &received_repayments);
        Self {
            loan,
            scheduled_repayments,
            received_repayments,
            summary,
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl LoanSummary {
    fn compute(scheduled: &[ScheduledRepayment], received: &[ReceivedRepayment]) -> Self {
        let next = scheduled
            .iter()
            .filter(|s| s.status != RepaymentStatus::Repaid)
            .min_by_key(|s| s.due_date);
        let repaid = scheduled
            .iter()
            .filter(|s| s.status == RepaymentStatus::Repaid)
            .count() as u32;

        Self {
            total_received: received.iter().map(|r| r.amount).sum(),
            scheduled_outstanding: scheduled.iter().map(|s| s.outstanding_amount).sum(),
            installments_repaid: repaid,
            installments_remaining: scheduled.len() as u32 - repaid,
            next_due_date: next.map(|s| s.due_date),
            next_due_amount: next.map(|s| s.outstanding_amount),
        }
    }
}

/// a debit card with its transactions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardView {
    #[serde(flatten)]
    pub card: DebitCard,
    pub is_active: bool,
    pub transactions: Vec<DebitCardTransaction>,
}

impl CardView {
    pub fn new(card: DebitCard, transactions: Vec<DebitCardTransaction>) -> Self {
        Self {
            is_active: card.is_active(),
            card,
            transactions,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
