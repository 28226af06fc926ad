use chrono::NaiveDate;
use hourglass_rs::{SafeTimeProvider, TimeSource};
use tracing::{info, instrument, warn};

use crate::config::{AllocationScope, LedgerConfig};
use crate::errors::{LedgerError, Result};
use crate::events::{Event, EventStore};
use crate::loan::{Loan, ReceivedRepayment, ScheduledRepayment};
use crate::money::{CurrencyCode, Money};
use crate::payments::{AmortizationSchedule, RepaymentAllocator, RepaymentOutcome, RepaymentRequest};
use crate::storage::LedgerStore;
use crate::types::{CustomerId, LoanId, RepaymentStatus};
use crate::views::LoanView;

/// creates loans and applies repayments against a store
pub struct LoanService<S> {
    store: S,
    config: LedgerConfig,
    events: EventStore,
}

impl<S: LedgerStore> LoanService<S> {
    pub fn new(store: S, config: LedgerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            config,
            events: EventStore::new(),
        })
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// create a loan together with its full installment schedule
    #[instrument(name = "ledger.loan.create", skip(self, time_provider), err)]
    pub fn create_loan(
        &mut self,
        borrower_id: CustomerId,
        amount: Money,
        currency_code: CurrencyCode,
        terms: u32,
        processed_at: NaiveDate,
        time_provider: &SafeTimeProvider,
    ) -> Result<Loan> {
        let now = time_provider.now();
        let schedule = AmortizationSchedule::generate(amount, terms, processed_at)?;

        let loan = Loan::new(borrower_id, amount, currency_code, terms, processed_at, now);
        let installments: Vec<ScheduledRepayment> = schedule
            .installments
            .iter()
            .map(|planned| {
                ScheduledRepayment::new(loan.id, planned.amount, currency_code, planned.due_date, now)
            })
            .collect();

        self.store.transaction(|store| {
            store.insert_loan(&loan)?;
            store.insert_scheduled_repayments(&installments)
        })?;

        info!(loan_id = %loan.id, amount = %amount, terms, "loan created");

        self.events.emit(Event::LoanCreated {
            loan_id: loan.id,
            borrower_id,
            amount,
            currency_code,
            terms,
            timestamp: now,
        });
        self.events.extend(installments.iter().map(|i| Event::InstallmentScheduled {
            loan_id: loan.id,
            scheduled_repayment_id: i.id,
            amount: i.amount,
            due_date: i.due_date,
        }));

        Ok(loan)
    }

    /// record a repayment and allocate it to the loan's installments
    pub fn repay_loan(
        &mut self,
        loan_id: LoanId,
        amount: Money,
        currency_code: CurrencyCode,
        received_at: NaiveDate,
        time_provider: &SafeTimeProvider,
    ) -> Result<ReceivedRepayment> {
        let request = RepaymentRequest {
            loan_id,
            amount,
            currency_code,
            received_at,
        };
        self.apply_repayment(request, time_provider)
            .map(|outcome| outcome.received)
    }

    /// repay with system time, received today
    pub fn repay_loan_now(
        &mut self,
        loan_id: LoanId,
        amount: Money,
        currency_code: CurrencyCode,
    ) -> Result<ReceivedRepayment> {
        let time = SafeTimeProvider::new(TimeSource::System);
        let today = time.now().date_naive();
        self.repay_loan(loan_id, amount, currency_code, today, &time)
    }

    /// record, allocate and persist a repayment as one unit
    #[instrument(
        name = "ledger.loan.repay",
        skip(self, time_provider),
        fields(loan_id = %request.loan_id, amount = %request.amount),
        err
    )]
    pub fn apply_repayment(
        &mut self,
        request: RepaymentRequest,
        time_provider: &SafeTimeProvider,
    ) -> Result<RepaymentOutcome> {
        let now = time_provider.now();
        let config = &self.config;

        let outcome = self.store.transaction(|store| {
            let mut loan = store.find_loan(request.loan_id)?;
            request.validate_against(&loan, config)?;

            let received = ReceivedRepayment::new(
                loan.id,
                request.amount,
                request.currency_code,
                request.received_at,
                now,
            );
            store.insert_received_repayment(&received)?;

            let mut installments = match config.allocation_scope {
                AllocationScope::DueOnly => store.due_scheduled_repayments(loan.id)?,
                AllocationScope::Outstanding => store.outstanding_scheduled_repayments(loan.id)?,
            };
            let allocation = RepaymentAllocator::new(config.allocation_scope).allocate(
                request.amount,
                &mut installments,
                now,
            );
            for installment in installments.iter().filter(|i| allocation.touches(i.id)) {
                store.update_scheduled_repayment(installment)?;
            }

            loan.apply_repayment(request.amount, now)?;
            store.update_loan(&loan)?;

            Ok(RepaymentOutcome {
                received,
                allocation,
                loan,
            })
        });

        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(loan_id = %request.loan_id, error = %e, "repayment rejected");
                return Err(e);
            }
        };

        self.record_events(&outcome);
        info!(
            loan_id = %outcome.loan.id,
            applied = %outcome.allocation.total_applied(),
            outstanding = %outcome.loan.outstanding_amount,
            status = ?outcome.loan.status,
            "repayment applied"
        );

        Ok(outcome)
    }

    fn record_events(&mut self, outcome: &RepaymentOutcome) {
        let loan = &outcome.loan;

        self.events.emit(Event::RepaymentReceived {
            loan_id: loan.id,
            received_repayment_id: outcome.received.id,
            amount: outcome.received.amount,
            currency_code: outcome.received.currency_code,
            applied: outcome.allocation.total_applied(),
            received_at: outcome.received.received_at,
        });

        for line in &outcome.allocation.lines {
            let event = match line.status_after {
                RepaymentStatus::Repaid => Event::InstallmentSettled {
                    loan_id: loan.id,
                    scheduled_repayment_id: line.scheduled_repayment_id,
                    applied: line.applied,
                },
                _ => Event::InstallmentPartiallySettled {
                    loan_id: loan.id,
                    scheduled_repayment_id: line.scheduled_repayment_id,
                    applied: line.applied,
                    outstanding: line.outstanding_after,
                },
            };
            self.events.emit(event);
        }

        if outcome.allocation.unallocated > Money::ZERO {
            warn!(
                loan_id = %loan.id,
                excess = %outcome.allocation.unallocated,
                "repayment exceeded scheduled installments"
            );
            self.events.emit(Event::OverpaymentAccepted {
                loan_id: loan.id,
                excess: outcome.allocation.unallocated,
                outstanding: loan.outstanding_amount,
            });
        }

        if loan.is_repaid() {
            self.events.emit(Event::LoanRepaid {
                loan_id: loan.id,
                timestamp: loan.updated_at,
            });
        }
    }

    pub fn loan(&self, loan_id: LoanId) -> Result<Loan> {
        self.store.find_loan(loan_id)
    }

    pub fn loans_for_borrower(&self, borrower_id: CustomerId) -> Result<Vec<Loan>> {
        self.store.loans_for_borrower(borrower_id)
    }

    /// installments of a loan ordered by due date
    pub fn scheduled_repayments(&self, loan_id: LoanId) -> Result<Vec<ScheduledRepayment>> {
        let mut installments = self.store.scheduled_repayments(loan_id)?;
        installments.sort_by_key(|i| i.due_date);
        Ok(installments)
    }

    pub fn received_repayments(&self, loan_id: LoanId) -> Result<Vec<ReceivedRepayment>> {
        self.store.received_repayments(loan_id)
    }

    /// loan with its installments and repayments, for the borrower only
    pub fn loan_view(&self, actor: CustomerId, loan_id: LoanId) -> Result<LoanView> {
        let loan = self.store.find_loan(loan_id)?;
        if loan.borrower_id != actor {
            warn!(actor = %actor, loan_id = %loan_id, "loan access denied");
            return Err(LedgerError::Forbidden { actor });
        }
        let scheduled = self.scheduled_repayments(loan_id)?;
        let received = self.store.received_repayments(loan_id)?;
        Ok(LoanView::new(loan, scheduled, received))
    }

    pub fn events(&self) -> &[Event] {
        self.events.events()
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }
}
