mod common;

use common::*;
use loan_ledger_rs::{
    CurrencyCode, Event, LedgerConfig, LedgerError, LedgerStore, LoanService, LoanStatus,
    RepaymentStatus, Uuid,
};

#[test]
fn test_create_loan_schedule() {
    let time = test_time();
    let mut service = service(LedgerConfig::strict());

    let loan = originate(&mut service, 100, 3, &time);

    assert_eq!(loan.terms, 3);
    assert_eq!(loan.processed_at, date(2024, 1, 1));
    assert_eq!(
        outstanding_by_due_date(&service, &loan),
        vec![
            (date(2024, 2, 1), 33, RepaymentStatus::Due),
            (date(2024, 3, 1), 33, RepaymentStatus::Due),
            (date(2024, 4, 1), 34, RepaymentStatus::Due),
        ]
    );
    assert_eq!(scheduled_total(&service, &loan), loan.outstanding_amount);
}

#[test]
fn test_partial_repayment_across_installments() {
    let time = test_time();
    let mut service = service(LedgerConfig::strict());
    let loan = originate(&mut service, 300, 3, &time);

    let received = service
        .repay_loan(loan.id, vnd(150), CurrencyCode::VND, date(2024, 2, 1), &time)
        .unwrap();

    assert_eq!(received.amount, vnd(150));
    assert_eq!(received.received_at, date(2024, 2, 1));
    assert_eq!(
        outstanding_by_due_date(&service, &loan),
        vec![
            (date(2024, 2, 1), 0, RepaymentStatus::Repaid),
            (date(2024, 3, 1), 50, RepaymentStatus::Partial),
            (date(2024, 4, 1), 100, RepaymentStatus::Due),
        ]
    );

    let loan = service.loan(loan.id).unwrap();
    assert_eq!(loan.outstanding_amount, vnd(150));
    assert_eq!(loan.status, LoanStatus::Due);
    assert_eq!(scheduled_total(&service, &loan), loan.outstanding_amount);
}

#[test]
fn test_scheduled_repayments_repay_to_zero() {
    let time = test_time();
    let control = time.test_control().unwrap();
    let mut service = service(LedgerConfig::strict());
    let loan = originate(&mut service, 5_000, 3, &time);

    for (month, amount) in [(2, 1_666), (3, 1_666), (4, 1_668)] {
        control.advance(chrono::Duration::days(30));
        service
            .repay_loan(loan.id, vnd(amount), CurrencyCode::VND, date(2024, month, 1), &time)
            .unwrap();
    }

    let loan = service.loan(loan.id).unwrap();
    assert_eq!(loan.status, LoanStatus::Repaid);
    assert!(loan.outstanding_amount.is_zero());
    assert_eq!(loan.updated_at, time.now());
    assert!(service
        .scheduled_repayments(loan.id)
        .unwrap()
        .iter()
        .all(|r| r.status == RepaymentStatus::Repaid));
    assert_eq!(service.received_repayments(loan.id).unwrap().len(), 3);
}

#[test]
fn test_full_repayment_in_one_payment() {
    let time = test_time();
    let mut service = service(LedgerConfig::strict());
    let loan = originate(&mut service, 1_000, 4, &time);

    service
        .repay_loan(loan.id, vnd(200), CurrencyCode::VND, date(2024, 2, 1), &time)
        .unwrap();
    service.take_events();

    let current = service.loan(loan.id).unwrap();
    service
        .repay_loan(loan.id, current.outstanding_amount, CurrencyCode::VND, date(2024, 2, 15), &time)
        .unwrap();

    let loan = service.loan(loan.id).unwrap();
    assert_eq!(loan.status, LoanStatus::Repaid);
    assert!(scheduled_total(&service, &loan).is_zero());
    assert!(service
        .take_events()
        .iter()
        .any(|e| matches!(e, Event::LoanRepaid { .. })));
}

#[test]
fn test_reads_do_not_change_state() {
    let time = test_time();
    let mut service = service(LedgerConfig::strict());
    let loan = originate(&mut service, 300, 3, &time);
    service
        .repay_loan(loan.id, vnd(150), CurrencyCode::VND, date(2024, 2, 1), &time)
        .unwrap();

    let before = outstanding_by_due_date(&service, &loan);
    for _ in 0..3 {
        service.scheduled_repayments(loan.id).unwrap();
        service.store().due_scheduled_repayments(loan.id).unwrap();
        service.loan(loan.id).unwrap();
    }
    assert_eq!(outstanding_by_due_date(&service, &loan), before);
}

#[test]
fn test_earliest_due_settled_first_regardless_of_storage_order() {
    let time = test_time();
    let (store, loan) = store_with_schedule(&[
        (date(2024, 4, 1), 100),
        (date(2024, 2, 1), 100),
        (date(2024, 3, 1), 100),
    ]);
    let mut service = LoanService::new(store, LedgerConfig::strict()).unwrap();

    service
        .repay_loan(loan.id, vnd(150), CurrencyCode::VND, date(2024, 2, 1), &time)
        .unwrap();

    assert_eq!(
        outstanding_by_due_date(&service, &loan),
        vec![
            (date(2024, 2, 1), 0, RepaymentStatus::Repaid),
            (date(2024, 3, 1), 50, RepaymentStatus::Partial),
            (date(2024, 4, 1), 100, RepaymentStatus::Due),
        ]
    );
}

#[test]
fn test_strict_rejects_overpayment() {
    let time = test_time();
    let mut service = service(LedgerConfig::strict());
    let loan = originate(&mut service, 300, 3, &time);

    let result = service.repay_loan(loan.id, vnd(400), CurrencyCode::VND, date(2024, 2, 1), &time);

    assert_eq!(
        result,
        Err(LedgerError::Overpayment {
            outstanding: vnd(300),
            provided: vnd(400),
        })
    );
    assert_eq!(service.loan(loan.id).unwrap().outstanding_amount, vnd(300));
    assert!(service.received_repayments(loan.id).unwrap().is_empty());
}

#[test]
fn test_strict_rejects_foreign_currency() {
    let time = test_time();
    let mut service = service(LedgerConfig::strict());
    let loan = originate(&mut service, 300, 3, &time);

    let result = service.repay_loan(loan.id, vnd(100), CurrencyCode::SGD, date(2024, 2, 1), &time);

    assert_eq!(
        result,
        Err(LedgerError::CurrencyMismatch {
            expected: CurrencyCode::VND,
            provided: CurrencyCode::SGD,
        })
    );
}

#[test]
fn test_strict_keeps_installments_in_step_with_loan() {
    let time = test_time();
    let mut service = service(LedgerConfig::strict());
    let loan = originate(&mut service, 1_000, 3, &time);

    for amount in [120, 300, 77, 1, 200] {
        service
            .repay_loan(loan.id, vnd(amount), CurrencyCode::VND, date(2024, 2, 1), &time)
            .unwrap();
        let current = service.loan(loan.id).unwrap();
        assert_eq!(scheduled_total(&service, &loan), current.outstanding_amount);
        assert!(!current.outstanding_amount.is_negative());
    }
}

#[test]
fn test_permissive_allows_negative_outstanding() {
    let time = test_time();
    let mut service = service(LedgerConfig::permissive());
    let loan = originate(&mut service, 300, 3, &time);

    let outcome = service
        .apply_repayment(
            loan_ledger_rs::RepaymentRequest {
                loan_id: loan.id,
                amount: vnd(350),
                currency_code: CurrencyCode::VND,
                received_at: date(2024, 2, 1),
            },
            &time,
        )
        .unwrap();

    assert_eq!(outcome.loan.outstanding_amount, vnd(-50));
    assert_eq!(outcome.loan.status, LoanStatus::Due);
    assert_eq!(outcome.allocation.unallocated, vnd(50));
    assert!(service
        .take_events()
        .iter()
        .any(|e| matches!(e, Event::OverpaymentAccepted { .. })));
}

#[test]
fn test_permissive_overpayment_past_balance_range_is_rejected() {
    let time = test_time();
    let mut service = service(LedgerConfig::permissive());
    let loan = originate(&mut service, 300, 3, &time);

    service
        .repay_loan(loan.id, vnd(i64::MAX), CurrencyCode::VND, date(2024, 2, 1), &time)
        .unwrap();
    let before = service.loan(loan.id).unwrap();

    let result = service.repay_loan(loan.id, vnd(i64::MAX), CurrencyCode::VND, date(2024, 2, 2), &time);

    assert!(matches!(result, Err(LedgerError::AmountOutOfRange { .. })));
    assert_eq!(service.loan(loan.id).unwrap(), before);
    assert_eq!(service.received_repayments(loan.id).unwrap().len(), 1);

    let view = service.loan_view(loan.borrower_id, loan.id).unwrap();
    assert_eq!(view.summary.total_received, vnd(i64::MAX));
}

#[test]
fn test_zero_amount_installments_settle_without_payment() {
    let time = test_time();
    let mut service = service(LedgerConfig::strict());
    let loan = originate(&mut service, 2, 3, &time);

    service
        .repay_loan(loan.id, vnd(1), CurrencyCode::VND, date(2024, 2, 1), &time)
        .unwrap();

    assert_eq!(
        outstanding_by_due_date(&service, &loan),
        vec![
            (date(2024, 2, 1), 0, RepaymentStatus::Repaid),
            (date(2024, 3, 1), 0, RepaymentStatus::Repaid),
            (date(2024, 4, 1), 1, RepaymentStatus::Partial),
        ]
    );
    let current = service.loan(loan.id).unwrap();
    assert_eq!(current.outstanding_amount, vnd(1));
    assert_eq!(scheduled_total(&service, &loan), current.outstanding_amount);
}

#[test]
fn test_permissive_skips_partially_paid_installments() {
    let time = test_time();
    let mut service = service(LedgerConfig::permissive());
    let loan = originate(&mut service, 300, 3, &time);

    service
        .repay_loan(loan.id, vnd(150), CurrencyCode::VND, date(2024, 2, 1), &time)
        .unwrap();
    service
        .repay_loan(loan.id, vnd(50), CurrencyCode::VND, date(2024, 3, 1), &time)
        .unwrap();

    // the partial second installment is left alone, the third takes the payment
    assert_eq!(
        outstanding_by_due_date(&service, &loan),
        vec![
            (date(2024, 2, 1), 0, RepaymentStatus::Repaid),
            (date(2024, 3, 1), 50, RepaymentStatus::Partial),
            (date(2024, 4, 1), 50, RepaymentStatus::Partial),
        ]
    );
    assert_eq!(service.loan(loan.id).unwrap().outstanding_amount, vnd(100));
}

#[test]
fn test_permissive_accepts_other_currency_unconverted() {
    let time = test_time();
    let mut service = service(LedgerConfig::permissive());
    let loan = originate(&mut service, 300, 3, &time);

    let received = service
        .repay_loan(loan.id, vnd(100), CurrencyCode::THB, date(2024, 2, 1), &time)
        .unwrap();

    assert_eq!(received.currency_code, CurrencyCode::THB);
    assert_eq!(service.loan(loan.id).unwrap().outstanding_amount, vnd(200));
}

#[test]
fn test_loan_view_for_borrower_only() {
    let time = test_time();
    let mut service = service(LedgerConfig::strict());
    let loan = originate(&mut service, 300, 3, &time);
    service
        .repay_loan(loan.id, vnd(150), CurrencyCode::VND, date(2024, 2, 1), &time)
        .unwrap();

    let view = service.loan_view(loan.borrower_id, loan.id).unwrap();
    assert_eq!(view.summary.total_received, vnd(150));
    assert_eq!(view.summary.scheduled_outstanding, vnd(150));
    assert_eq!(view.summary.installments_repaid, 1);
    assert_eq!(view.summary.installments_remaining, 2);
    assert_eq!(view.summary.next_due_date, Some(date(2024, 3, 1)));
    assert_eq!(view.summary.next_due_amount, Some(vnd(50)));

    let json: serde_json::Value = serde_json::from_str(&view.to_json_pretty().unwrap()).unwrap();
    assert_eq!(json["status"], "due");
    assert_eq!(json["currency_code"], "VND");
    assert_eq!(json["scheduled_repayments"].as_array().unwrap().len(), 3);

    let stranger = Uuid::new_v4();
    assert!(matches!(
        service.loan_view(stranger, loan.id),
        Err(LedgerError::Forbidden { .. })
    ));
}

#[test]
fn test_loans_for_borrower() {
    let time = test_time();
    let mut service = service(LedgerConfig::strict());
    let loan = originate(&mut service, 300, 3, &time);
    originate(&mut service, 500, 5, &time);

    let loans = service.loans_for_borrower(loan.borrower_id).unwrap();
    assert_eq!(loans, vec![loan]);
}
