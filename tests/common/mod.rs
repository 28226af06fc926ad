#![allow(dead_code)]

use chrono::{NaiveDate, TimeZone, Utc};
use loan_ledger_rs::{
    CurrencyCode, LedgerConfig, LedgerStore, Loan, LoanService, MemoryStore, Money,
    SafeTimeProvider, ScheduledRepayment, TimeSource, Uuid,
};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn test_time() -> SafeTimeProvider {
    SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
    ))
}

pub fn vnd(amount: i64) -> Money {
    Money::from_minor(amount)
}

pub fn service(config: LedgerConfig) -> LoanService<MemoryStore> {
    LoanService::new(MemoryStore::new(), config).unwrap()
}

/// a loan originated on 2024-01-01 in VND
pub fn originate(
    service: &mut LoanService<MemoryStore>,
    amount: i64,
    terms: u32,
    time: &SafeTimeProvider,
) -> Loan {
    service
        .create_loan(Uuid::new_v4(), vnd(amount), CurrencyCode::VND, terms, date(2024, 1, 1), time)
        .unwrap()
}

/// store holding one loan whose installments are inserted in the given order
pub fn store_with_schedule(rows: &[(NaiveDate, i64)]) -> (MemoryStore, Loan) {
    let time = test_time();
    let total: i64 = rows.iter().map(|(_, amount)| amount).sum();
    let loan = Loan::new(
        Uuid::new_v4(),
        vnd(total),
        CurrencyCode::VND,
        rows.len() as u32,
        date(2024, 1, 1),
        time.now(),
    );
    let installments: Vec<ScheduledRepayment> = rows
        .iter()
        .map(|(due, amount)| ScheduledRepayment::new(loan.id, vnd(*amount), CurrencyCode::VND, *due, time.now()))
        .collect();

    let mut store = MemoryStore::new();
    store.insert_loan(&loan).unwrap();
    store.insert_scheduled_repayments(&installments).unwrap();
    (store, loan)
}

pub fn outstanding_by_due_date(
    service: &LoanService<MemoryStore>,
    loan: &Loan,
) -> Vec<(NaiveDate, i64, loan_ledger_rs::RepaymentStatus)> {
    service
        .scheduled_repayments(loan.id)
        .unwrap()
        .into_iter()
        .map(|r| (r.due_date, r.outstanding_amount.minor(), r.status))
        .collect()
}

pub fn scheduled_total(service: &LoanService<MemoryStore>, loan: &Loan) -> Money {
    service
        .scheduled_repayments(loan.id)
        .unwrap()
        .iter()
        .map(|r| r.outstanding_amount)
        .sum()
}
