/// quick start - create a loan and make one repayment
use loan_ledger_rs::chrono::NaiveDate;
use loan_ledger_rs::{
    CurrencyCode, LedgerConfig, LoanService, MemoryStore, Money, SafeTimeProvider, TimeSource,
    Uuid,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::System);
    let mut service = LoanService::new(MemoryStore::new(), LedgerConfig::default())?;

    // 5,000 VND over 3 months
    let borrower = Uuid::new_v4();
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).ok_or("bad date")?;
    let loan = service.create_loan(borrower, Money::from_minor(5_000), CurrencyCode::VND, 3, start, &time)?;

    // pay the first installment
    service.repay_loan(loan.id, Money::from_minor(1_666), CurrencyCode::VND, start, &time)?;

    println!("{}", service.loan_view(borrower, loan.id)?.to_json_pretty()?);

    Ok(())
}
