pub mod account_service;
pub mod balance_service;
pub mod obligation_service;
pub mod transaction_service;
pub mod transfer_service;

pub use account_service::AccountService;
pub use balance_service::{AccountBalance, BalanceService, BalanceSummary, CategoryTotal};
pub use obligation_service::{
    NewObligation, ObligationService, ObligationStatusView, PaymentReceipt,
};
pub use transaction_service::{NewTransaction, TransactionPatch, TransactionService};
pub use transfer_service::{Transfer, TransferService};
