use thiserror::Error;

use crate::money::{CurrencyCode, Money};
use crate::types::{CardId, CardTransactionId, CustomerId, LoanId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("invalid amount: {amount}")]
    InvalidAmount {
        amount: Money,
    },

    #[error("invalid term count: {terms}")]
    InvalidTermCount {
        terms: u32,
    },

    #[error("invalid currency code: {code}")]
    InvalidCurrencyCode {
        code: String,
    },

    #[error("currency mismatch: loan is in {expected}, payment in {provided}")]
    CurrencyMismatch {
        expected: CurrencyCode,
        provided: CurrencyCode,
    },

    #[error("overpayment: outstanding {outstanding}, provided {provided}")]
    Overpayment {
        outstanding: Money,
        provided: Money,
    },

    #[error("amount out of range: outstanding {outstanding}, provided {provided}")]
    AmountOutOfRange {
        outstanding: Money,
        provided: Money,
    },

    #[error("loan already repaid: {id}")]
    LoanAlreadyRepaid {
        id: LoanId,
    },

    #[error("loan not found: {id}")]
    LoanNotFound {
        id: LoanId,
    },

    #[error("debit card not found: {id}")]
    CardNotFound {
        id: CardId,
    },

    #[error("debit card transaction not found: {id}")]
    TransactionNotFound {
        id: CardTransactionId,
    },

    #[error("customer {actor} may not access this resource")]
    Forbidden {
        actor: CustomerId,
    },

    #[error("debit card {id} has transactions and cannot be deleted")]
    CardHasTransactions {
        id: CardId,
    },

    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("storage error: {message}")]
    Storage {
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, LedgerError>;
