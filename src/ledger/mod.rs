//! Ledger domain models, persistence-friendly types, and helpers.

pub mod filter;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod obligation;
pub mod transaction;

pub use filter::{DateRange, DateWindow, TransactionFilter};
pub use ledger::{Ledger, OwnerId, CURRENT_SCHEMA_VERSION};
pub use obligation::{
    ObligationKind, ObligationStatus, Period, RecurringObligation,
    DEFAULT_NOTIFICATION_WINDOW_DAYS,
};
pub use transaction::{Transaction, TransactionKind, TRANSFER_CATEGORY};
