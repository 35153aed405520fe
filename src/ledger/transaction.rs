use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sentinel category recorded on both legs of a transfer.
pub const TRANSFER_CATEGORY: &str = "Transfer";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TransactionKind {
    Income,
    Expense,
    Transfer,
}

impl TransactionKind {
    /// Income and expense entries need a caller-supplied category; transfer
    /// legs always carry the sentinel category.
    pub fn requires_category(&self) -> bool {
        matches!(self, TransactionKind::Income | TransactionKind::Expense)
    }
}

/// A single ledger record owned by exactly one account.
///
/// Income and expense entries store a positive magnitude and are signed by
/// `kind` downstream. Transfer legs store signed magnitudes directly so the
/// two legs of a transfer net to zero without kind-based sign inference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub account: String,
    /// The account on the other side of the same transfer. Legs only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counterpart_account: Option<String>,
    /// Shared by the two legs composing one transfer. Legs only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transfer_id: Option<Uuid>,
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    /// Creates an income or expense entry with a positive magnitude.
    pub fn entry(
        kind: TransactionKind,
        amount: Decimal,
        category: impl Into<String>,
        description: Option<String>,
        account: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            amount,
            category: category.into(),
            description,
            account: account.into(),
            counterpart_account: None,
            transfer_id: None,
            timestamp,
        }
    }

    /// Creates one leg of a transfer with a signed amount.
    pub fn transfer_leg(
        transfer_id: Uuid,
        amount: Decimal,
        account: impl Into<String>,
        counterpart: impl Into<String>,
        description: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: TransactionKind::Transfer,
            amount,
            category: TRANSFER_CATEGORY.to_string(),
            description,
            account: account.into(),
            counterpart_account: Some(counterpart.into()),
            transfer_id: Some(transfer_id),
            timestamp,
        }
    }

    pub fn is_transfer_leg(&self) -> bool {
        self.transfer_id.is_some()
    }

    /// Contribution of this record to its owning account's balance.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
            TransactionKind::Transfer => self.amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn legs_of_one_transfer_net_to_zero() {
        let transfer_id = Uuid::new_v4();
        let now = Utc::now();
        let out = Transaction::transfer_leg(transfer_id, dec!(-40), "Checking", "Savings", None, now);
        let into = Transaction::transfer_leg(transfer_id, dec!(40), "Savings", "Checking", None, now);
        assert_eq!(out.signed_amount() + into.signed_amount(), Decimal::ZERO);
        assert_eq!(out.category, TRANSFER_CATEGORY);
        assert!(out.is_transfer_leg() && into.is_transfer_leg());
    }

    #[test]
    fn expense_contributes_negatively() {
        let txn = Transaction::entry(
            TransactionKind::Expense,
            dec!(12.50),
            "Food",
            None,
            "Checking",
            Utc::now(),
        );
        assert_eq!(txn.signed_amount(), dec!(-12.50));
    }
}
