pub mod cards;
pub mod config;
pub mod errors;
pub mod events;
pub mod loan;
pub mod money;
pub mod payments;
pub mod service;
pub mod storage;
pub mod types;
pub mod views;

// re-export key types
pub use cards::{DebitCard, DebitCardPolicy, DebitCardService, DebitCardTransaction};
pub use config::{AllocationScope, CurrencyPolicy, LedgerConfig, OverpaymentPolicy};
pub use errors::{LedgerError, Result};
pub use events::{Event, EventStore};
pub use loan::{Loan, ReceivedRepayment, ScheduledRepayment};
pub use money::{CurrencyCode, Money};
pub use payments::{
    AmortizationSchedule, Allocation, AllocationLine, RepaymentAllocator, RepaymentOutcome,
    RepaymentRequest,
};
pub use service::LoanService;
pub use storage::{CardStore, LedgerStore, MemoryStore};
pub use types::{
    CardId, CardTransactionId, CustomerId, LoanId, LoanStatus, ReceivedRepaymentId,
    RepaymentStatus, ScheduledRepaymentId,
};
pub use views::{CardView, LoanSummary, LoanView};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
