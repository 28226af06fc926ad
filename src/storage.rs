use std::collections::HashMap;

use crate::cards::{DebitCard, DebitCardTransaction};
use crate::errors::{LedgerError, Result};
use crate::loan::{Loan, ReceivedRepayment, ScheduledRepayment};
use crate::types::{CardId, CardTransactionId, CustomerId, LoanId, RepaymentStatus};

/// persistence for loans and their repayments
pub trait LedgerStore {
    fn insert_loan(&mut self, loan: &Loan) -> Result<()>;

    fn insert_scheduled_repayments(&mut self, repayments: &[ScheduledRepayment]) -> Result<()>;

    fn insert_received_repayment(&mut self, repayment: &ReceivedRepayment) -> Result<()>;

    fn update_scheduled_repayment(&mut self, repayment: &ScheduledRepayment) -> Result<()>;

    fn update_loan(&mut self, loan: &Loan) -> Result<()>;

    fn find_loan(&self, id: LoanId) -> Result<Loan>;

    fn loans_for_borrower(&self, borrower_id: CustomerId) -> Result<Vec<Loan>>;

    /// all installments of a loan, in no guaranteed order
    fn scheduled_repayments(&self, loan_id: LoanId) -> Result<Vec<ScheduledRepayment>>;

    fn received_repayments(&self, loan_id: LoanId) -> Result<Vec<ReceivedRepayment>>;

    /// installments with status Due, earliest due date first
    fn due_scheduled_repayments(&self, loan_id: LoanId) -> Result<Vec<ScheduledRepayment>> {
        let mut due: Vec<ScheduledRepayment> = self
            .scheduled_repayments(loan_id)?
            .into_iter()
            .filter(|r| r.status == RepaymentStatus::Due)
            .collect();
        due.sort_by_key(|r| r.due_date);
        Ok(due)
    }

    /// installments not yet fully repaid, earliest due date first
    fn outstanding_scheduled_repayments(&self, loan_id: LoanId) -> Result<Vec<ScheduledRepayment>> {
        let mut outstanding: Vec<ScheduledRepayment> = self
            .scheduled_repayments(loan_id)?
            .into_iter()
            .filter(|r| !r.status.is_settled())
            .collect();
        outstanding.sort_by_key(|r| r.due_date);
        Ok(outstanding)
    }

    /// run `f` as one unit: every write commits or none does
    fn transaction<T, F>(&mut self, f: F) -> Result<T>
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> Result<T>;
}

/// persistence for debit cards and their transactions
pub trait CardStore {
    fn insert_card(&mut self, card: &DebitCard) -> Result<()>;

    fn update_card(&mut self, card: &DebitCard) -> Result<()>;

    /// includes soft-deleted cards
    fn find_card(&self, id: CardId) -> Result<DebitCard>;

    fn cards_for_owner(&self, owner_id: CustomerId) -> Result<Vec<DebitCard>>;

    fn insert_card_transaction(&mut self, transaction: &DebitCardTransaction) -> Result<()>;

    fn find_card_transaction(&self, id: CardTransactionId) -> Result<DebitCardTransaction>;

    fn card_transactions(&self, card_id: CardId) -> Result<Vec<DebitCardTransaction>>;
}

/// in-memory store; rows keep insertion order
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    loans: Vec<Loan>,
    scheduled: Vec<ScheduledRepayment>,
    received: Vec<ReceivedRepayment>,
    cards: Vec<DebitCard>,
    card_transactions: Vec<DebitCardTransaction>,
    loan_index: HashMap<LoanId, usize>,
    card_index: HashMap<CardId, usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loan_count(&self) -> usize {
        self.loans.len()
    }

    fn duplicate(kind: &str, id: impl std::fmt::Display) -> LedgerError {
        LedgerError::Storage {
            message: format!("duplicate {} {}", kind, id),
        }
    }

    fn missing(kind: &str, id: impl std::fmt::Display) -> LedgerError {
        LedgerError::Storage {
            message: format!("{} {} does not exist", kind, id),
        }
    }
}

impl LedgerStore for MemoryStore {
    fn insert_loan(&mut self, loan: &Loan) -> Result<()> {
        if self.loan_index.contains_key(&loan.id) {
            return Err(Self::duplicate("loan", loan.id));
        }
        self.loan_index.insert(loan.id, self.loans.len());
        self.loans.push(loan.clone());
        Ok(())
    }

    fn insert_scheduled_repayments(&mut self, repayments: &[ScheduledRepayment]) -> Result<()> {
        for repayment in repayments {
            if !self.loan_index.contains_key(&repayment.loan_id) {
                return Err(Self::missing("loan", repayment.loan_id));
            }
            if self.scheduled.iter().any(|r| r.id == repayment.id) {
                return Err(Self::duplicate("scheduled repayment", repayment.id));
            }
            self.scheduled.push(repayment.clone());
        }
        Ok(())
    }

    fn insert_received_repayment(&mut self, repayment: &ReceivedRepayment) -> Result<()> {
        if !self.loan_index.contains_key(&repayment.loan_id) {
            return Err(Self::missing("loan", repayment.loan_id));
        }
        self.received.push(repayment.clone());
        Ok(())
    }

    fn update_scheduled_repayment(&mut self, repayment: &ScheduledRepayment) -> Result<()> {
        let row = self
            .scheduled
            .iter_mut()
            .find(|r| r.id == repayment.id)
            .ok_or_else(|| Self::missing("scheduled repayment", repayment.id))?;
        *row = repayment.clone();
        Ok(())
    }

    fn update_loan(&mut self, loan: &Loan) -> Result<()> {
        let idx = *self
            .loan_index
            .get(&loan.id)
            .ok_or(LedgerError::LoanNotFound { id: loan.id })?;
        self.loans[idx] = loan.clone();
        Ok(())
    }

    fn find_loan(&self, id: LoanId) -> Result<Loan> {
        self.loan_index
            .get(&id)
            .map(|&idx| self.loans[idx].clone())
            .ok_or(LedgerError::LoanNotFound { id })
    }

    fn loans_for_borrower(&self, borrower_id: CustomerId) -> Result<Vec<Loan>> {
        Ok(self
            .loans
            .iter()
            .filter(|l| l.borrower_id == borrower_id)
            .cloned()
            .collect())
    }

    fn scheduled_repayments(&self, loan_id: LoanId) -> Result<Vec<ScheduledRepayment>> {
        Ok(self
            .scheduled
            .iter()
            .filter(|r| r.loan_id == loan_id)
            .cloned()
            .collect())
    }

    fn received_repayments(&self, loan_id: LoanId) -> Result<Vec<ReceivedRepayment>> {
        Ok(self
            .received
            .iter()
            .filter(|r| r.loan_id == loan_id)
            .cloned()
            .collect())
    }

    fn transaction<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        let snapshot = self.clone();
        let result = f(self);
        if result.is_err() {
            *self = snapshot;
        }
        result
    }
}

impl CardStore for MemoryStore {
    fn insert_card(&mut self, card: &DebitCard) -> Result<()> {
        if self.card_index.contains_key(&card.id) {
            return Err(Self::duplicate("debit card", card.id));
        }
        self.card_index.insert(card.id, self.cards.len());
        self.cards.push(card.clone());
        Ok(())
    }

    fn update_card(&mut self, card: &DebitCard) -> Result<()> {
        let idx = *self
            .card_index
            .get(&card.id)
            .ok_or(LedgerError::CardNotFound { id: card.id })?;
        self.cards[idx] = card.clone();
        Ok(())
    }

    fn find_card(&self, id: CardId) -> Result<DebitCard> {
        self.card_index
            .get(&id)
            .map(|&idx| self.cards[idx].clone())
            .ok_or(LedgerError::CardNotFound { id })
    }

    fn cards_for_owner(&self, owner_id: CustomerId) -> Result<Vec<DebitCard>> {
        Ok(self
            .cards
            .iter()
            .filter(|c| c.owner_id == owner_id)
            .cloned()
            .collect())
    }

    fn insert_card_transaction(&mut self, transaction: &DebitCardTransaction) -> Result<()> {
        if !self.card_index.contains_key(&transaction.debit_card_id) {
            return Err(LedgerError::CardNotFound {
                id: transaction.debit_card_id,
            });
        }
        self.card_transactions.push(transaction.clone());
        Ok(())
    }

    fn find_card_transaction(&self, id: CardTransactionId) -> Result<DebitCardTransaction> {
        self.card_transactions
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(LedgerError::TransactionNotFound { id })
    }

    fn card_transactions(&self, card_id: CardId) -> Result<Vec<DebitCardTransaction>> {
        Ok(self
            .card_transactions
            .iter()
            .filter(|t| t.debit_card_id == card_id)
            .cloned()
            .collect())
    }
}
