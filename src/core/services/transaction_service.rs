//! Validated CRUD over individual income and expense records.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::errors::{EngineError, EngineResult};
use crate::ledger::filter::matches_search;
use crate::ledger::{Ledger, Transaction, TransactionFilter, TransactionKind};

/// Input for creating an income or expense entry. Transfer legs are built
/// exclusively by the transfer operation.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub category: String,
    pub description: Option<String>,
    pub account: String,
    pub timestamp: DateTime<Utc>,
}

/// Field updates applicable to a non-transfer transaction. `kind` and
/// transfer linkage are immutable.
#[derive(Debug, Clone, Default)]
pub struct TransactionPatch {
    pub amount: Option<Decimal>,
    pub category: Option<String>,
    pub description: Option<Option<String>>,
    pub account: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

pub struct TransactionService;

impl TransactionService {
    pub fn create(ledger: &mut Ledger, input: NewTransaction) -> EngineResult<Transaction> {
        if input.kind == TransactionKind::Transfer {
            return Err(EngineError::Validation(
                "transfer legs are created by the transfer operation".into(),
            ));
        }
        validate_amount(input.amount)?;
        let account = validate_account(&input.account)?;
        let category = input.category.trim();
        if category.is_empty() {
            return Err(EngineError::Validation(
                "a category is required for income and expense entries".into(),
            ));
        }
        let txn = Transaction::entry(
            input.kind,
            input.amount,
            category,
            normalize_description(input.description),
            account,
            input.timestamp,
        );
        ledger.add_transaction(txn.clone());
        tracing::debug!(id = %txn.id, kind = ?txn.kind, "transaction recorded");
        Ok(txn)
    }

    pub fn update(
        ledger: &mut Ledger,
        id: Uuid,
        patch: TransactionPatch,
    ) -> EngineResult<Transaction> {
        let current = ledger
            .transaction(id)
            .ok_or_else(|| EngineError::NotFound(format!("transaction {id}")))?;
        if current.is_transfer_leg() {
            return Err(EngineError::InvalidOperation(
                "transfer legs cannot be edited; delete the transfer and create a new one".into(),
            ));
        }

        let mut updated = current.clone();
        if let Some(amount) = patch.amount {
            validate_amount(amount)?;
            updated.amount = amount;
        }
        if let Some(category) = patch.category {
            let category = category.trim().to_string();
            if category.is_empty() {
                return Err(EngineError::Validation(
                    "a category is required for income and expense entries".into(),
                ));
            }
            updated.category = category;
        }
        if let Some(description) = patch.description {
            updated.description = normalize_description(description);
        }
        if let Some(account) = patch.account {
            updated.account = validate_account(&account)?;
        }
        if let Some(timestamp) = patch.timestamp {
            updated.timestamp = timestamp;
        }

        if let Some(slot) = ledger.transaction_mut(id) {
            *slot = updated.clone();
        }
        ledger.touch();
        Ok(updated)
    }

    /// Removes the transaction `id` and returns everything deleted. Deleting
    /// one leg of a transfer removes the paired leg in the same unit, so a
    /// half-transfer is never left behind.
    pub fn delete(ledger: &mut Ledger, id: Uuid) -> EngineResult<Vec<Transaction>> {
        let transfer_id = ledger
            .transaction(id)
            .ok_or_else(|| EngineError::NotFound(format!("transaction {id}")))?
            .transfer_id;
        match transfer_id {
            Some(transfer_id) => {
                let removed = ledger.remove_transfer_legs(transfer_id);
                if removed.len() != 2 {
                    return Err(EngineError::Consistency(format!(
                        "transfer {transfer_id} had {} legs instead of 2",
                        removed.len()
                    )));
                }
                Ok(removed)
            }
            None => {
                let removed = ledger
                    .remove_transaction(id)
                    .ok_or_else(|| EngineError::NotFound(format!("transaction {id}")))?;
                Ok(vec![removed])
            }
        }
    }

    /// Lists transactions newest first. The date range is resolved against
    /// `today`; the substring match runs over the already-filtered rows.
    pub fn list(
        ledger: &Ledger,
        filter: &TransactionFilter,
        today: NaiveDate,
    ) -> EngineResult<Vec<Transaction>> {
        let window = match filter.range {
            Some(range) => Some(range.resolve(today)?),
            None => None,
        };
        let needle = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty());

        let mut rows: Vec<Transaction> = ledger
            .transactions
            .iter()
            .filter(|txn| {
                window
                    .map(|w| w.contains(txn.timestamp.date_naive()))
                    .unwrap_or(true)
            })
            .filter(|txn| needle.map(|n| matches_search(txn, n)).unwrap_or(true))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(rows)
    }
}

fn validate_amount(amount: Decimal) -> EngineResult<()> {
    if amount <= Decimal::ZERO {
        return Err(EngineError::Validation(
            "amount must be greater than zero".into(),
        ));
    }
    Ok(())
}

fn validate_account(account: &str) -> EngineResult<String> {
    let account = account.trim();
    if account.is_empty() {
        return Err(EngineError::Validation(
            "account name must not be blank".into(),
        ));
    }
    Ok(account.to_string())
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
