use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{obligation::RecurringObligation, transaction::Transaction};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

/// Principal identifier supplied by the authentication layer. Every ledger,
/// account, transaction, and obligation is scoped to one owner; the engine
/// carries it as an explicit parameter, never as ambient state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OwnerId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// One owner's complete ledger document: transactions, declared account
/// names, and recurring obligations. The durable store round-trips it as a
/// single unit, which is what makes multi-record writes atomic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    pub owner: OwnerId,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    /// Accounts declared ahead of any transaction referencing them.
    #[serde(default)]
    pub declared_accounts: BTreeSet<String>,
    #[serde(default)]
    pub obligations: Vec<RecurringObligation>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Ledger::schema_version_default")]
    pub schema_version: u8,
}

impl Ledger {
    pub fn new(owner: OwnerId) -> Self {
        let now = Utc::now();
        Self {
            owner,
            transactions: Vec::new(),
            declared_accounts: BTreeSet::new(),
            obligations: Vec::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn transaction(&self, id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    pub fn transaction_mut(&mut self, id: Uuid) -> Option<&mut Transaction> {
        self.transactions.iter_mut().find(|txn| txn.id == id)
    }

    pub fn add_transaction(&mut self, transaction: Transaction) -> Uuid {
        let id = transaction.id;
        self.transactions.push(transaction);
        self.touch();
        id
    }

    pub fn remove_transaction(&mut self, id: Uuid) -> Option<Transaction> {
        let index = self.transactions.iter().position(|txn| txn.id == id)?;
        let removed = self.transactions.remove(index);
        self.touch();
        Some(removed)
    }

    /// Removes every leg sharing `transfer_id`, in ledger order.
    pub fn remove_transfer_legs(&mut self, transfer_id: Uuid) -> Vec<Transaction> {
        let mut removed = Vec::new();
        self.transactions.retain(|txn| {
            if txn.transfer_id == Some(transfer_id) {
                removed.push(txn.clone());
                false
            } else {
                true
            }
        });
        if !removed.is_empty() {
            self.touch();
        }
        removed
    }

    pub fn obligation(&self, id: Uuid) -> Option<&RecurringObligation> {
        self.obligations.iter().find(|item| item.id == id)
    }

    pub fn obligation_mut(&mut self, id: Uuid) -> Option<&mut RecurringObligation> {
        self.obligations.iter_mut().find(|item| item.id == id)
    }

    pub fn add_obligation(&mut self, obligation: RecurringObligation) -> Uuid {
        let id = obligation.id;
        self.obligations.push(obligation);
        self.touch();
        id
    }

    pub fn remove_obligation(&mut self, id: Uuid) -> Option<RecurringObligation> {
        let index = self.obligations.iter().position(|item| item.id == id)?;
        let removed = self.obligations.remove(index);
        self.touch();
        Some(removed)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}
