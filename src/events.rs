use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::money::{CurrencyCode, Money};
use crate::types::{
    CardId, CardTransactionId, CustomerId, LoanId, ReceivedRepaymentId, ScheduledRepaymentId,
};

/// all events emitted by the ledger services
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    // loan lifecycle events
    LoanCreated {
        loan_id: LoanId,
        borrower_id: CustomerId,
        amount: Money,
        currency_code: CurrencyCode,
        terms: u32,
        timestamp: DateTime<Utc>,
    },
    InstallmentScheduled {
        loan_id: LoanId,
        scheduled_repayment_id: ScheduledRepaymentId,
        amount: Money,
        due_date: NaiveDate,
    },
    LoanRepaid {
        loan_id: LoanId,
        timestamp: DateTime<Utc>,
    },

    // repayment events
    RepaymentReceived {
        loan_id: LoanId,
        received_repayment_id: ReceivedRepaymentId,
        amount: Money,
        currency_code: CurrencyCode,
        applied: Money,
        received_at: NaiveDate,
    },
    InstallmentSettled {
        loan_id: LoanId,
        scheduled_repayment_id: ScheduledRepaymentId,
        applied: Money,
    },
    InstallmentPartiallySettled {
        loan_id: LoanId,
        scheduled_repayment_id: ScheduledRepaymentId,
        applied: Money,
        outstanding: Money,
    },
    OverpaymentAccepted {
        loan_id: LoanId,
        excess: Money,
        outstanding: Money,
    },

    // debit card events
    CardCreated {
        card_id: CardId,
        owner_id: CustomerId,
        timestamp: DateTime<Utc>,
    },
    CardActivated {
        card_id: CardId,
        timestamp: DateTime<Utc>,
    },
    CardDeactivated {
        card_id: CardId,
        timestamp: DateTime<Utc>,
    },
    CardDeleted {
        card_id: CardId,
        timestamp: DateTime<Utc>,
    },
    CardTransactionRecorded {
        card_id: CardId,
        transaction_id: CardTransactionId,
        amount: Money,
        currency_code: CurrencyCode,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn extend(&mut self, events: impl IntoIterator<Item = Event>) {
        self.events.extend(events);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }
}
