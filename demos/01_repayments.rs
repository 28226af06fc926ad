/// repayments - partial payments, month-end schedules and both policies
use loan_ledger_rs::chrono::{Duration, NaiveDate, TimeZone, Utc};
use loan_ledger_rs::{
    CurrencyCode, LedgerConfig, LedgerError, LoanService, MemoryStore, Money, SafeTimeProvider,
    TimeSource, Uuid,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== repayment allocation ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap(),
    ));
    let control = time.test_control().unwrap();
    let start = NaiveDate::from_ymd_opt(2024, 1, 31).ok_or("bad date")?;

    // strict: overpayments and foreign currencies are refused
    let mut strict = LoanService::new(MemoryStore::new(), LedgerConfig::strict())?;
    let borrower = Uuid::new_v4();
    let loan = strict.create_loan(borrower, Money::from_minor(100_000), CurrencyCode::SGD, 4, start, &time)?;

    println!("schedule (month-end start clamps to shorter months):");
    for installment in strict.scheduled_repayments(loan.id)? {
        println!(
            "  {}  {} {}",
            installment.due_date,
            installment.amount.to_major_in(installment.currency_code),
            installment.currency_code
        );
    }

    control.advance(Duration::days(29));
    let outcome = strict.apply_repayment(
        loan_ledger_rs::RepaymentRequest {
            loan_id: loan.id,
            amount: Money::from_minor(40_000),
            currency_code: CurrencyCode::SGD,
            received_at: time.now().date_naive(),
        },
        &time,
    )?;
    println!("\nafter 400.00 SGD:");
    for line in &outcome.allocation.lines {
        println!("  {} applied {} -> {:?}", line.due_date, line.applied, line.status_after);
    }

    match strict.repay_loan(loan.id, Money::from_minor(1_000_000), CurrencyCode::SGD, start, &time) {
        Err(LedgerError::Overpayment { outstanding, provided }) => {
            println!("\noverpayment refused: outstanding {}, provided {}", outstanding, provided);
        }
        other => println!("\nunexpected: {:?}", other),
    }

    // permissive: the unguarded legacy behavior
    let mut permissive = LoanService::new(MemoryStore::new(), LedgerConfig::permissive())?;
    let loan = permissive.create_loan(borrower, Money::from_minor(300), CurrencyCode::VND, 3, start, &time)?;
    let repayment = permissive.repay_loan(loan.id, Money::from_minor(350), CurrencyCode::VND, start, &time)?;
    let loan = permissive.loan(loan.id)?;
    println!(
        "\npermissive: paid {} on a 300 loan, outstanding is now {}",
        repayment.amount, loan.outstanding_amount
    );

    println!("\nevents:");
    for event in permissive.take_events() {
        println!("  {:?}", event);
    }

    Ok(())
}
