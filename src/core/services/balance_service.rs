//! Read-only aggregation over the ledger: global totals, per-account
//! balances, and per-category sums.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::services::{AccountService, TransactionService};
use crate::errors::{EngineError, EngineResult};
use crate::ledger::{Ledger, TransactionFilter, TransactionKind};

/// Aggregate totals for a filtered view of the ledger. Transfers never move
/// `net_balance`; `transfer_total` is the moved volume, for display only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BalanceSummary {
    pub income_total: Decimal,
    pub expense_total: Decimal,
    pub transfer_total: Decimal,
    pub net_balance: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountBalance {
    pub account: String,
    pub income: Decimal,
    pub expense: Decimal,
    /// Signed sum of everything posted to the account, transfer legs
    /// included.
    pub balance: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub income: Decimal,
    pub expense: Decimal,
}

pub struct BalanceService;

impl BalanceService {
    pub fn global(
        ledger: &Ledger,
        filter: &TransactionFilter,
        today: NaiveDate,
    ) -> EngineResult<BalanceSummary> {
        let mut income_total = Decimal::ZERO;
        let mut expense_total = Decimal::ZERO;
        let mut transfer_total = Decimal::ZERO;
        for txn in TransactionService::list(ledger, filter, today)? {
            match txn.kind {
                TransactionKind::Income => income_total += txn.amount,
                TransactionKind::Expense => expense_total += txn.amount,
                TransactionKind::Transfer => {
                    if txn.amount < Decimal::ZERO {
                        transfer_total += -txn.amount;
                    }
                }
            }
        }
        Ok(BalanceSummary {
            income_total,
            expense_total,
            transfer_total,
            net_balance: income_total - expense_total,
        })
    }

    pub fn account(ledger: &Ledger, account: &str) -> EngineResult<AccountBalance> {
        let account = account.trim();
        if account.is_empty() {
            return Err(EngineError::Validation(
                "account name must not be blank".into(),
            ));
        }
        if !AccountService::exists(ledger, account) {
            return Err(EngineError::NotFound(format!("account {account}")));
        }

        let mut income = Decimal::ZERO;
        let mut expense = Decimal::ZERO;
        let mut balance = Decimal::ZERO;
        for txn in ledger.transactions.iter().filter(|txn| txn.account == account) {
            match txn.kind {
                TransactionKind::Income => income += txn.amount,
                TransactionKind::Expense => expense += txn.amount,
                TransactionKind::Transfer => {}
            }
            balance += txn.signed_amount();
        }
        Ok(AccountBalance {
            account: account.to_string(),
            income,
            expense,
            balance,
        })
    }

    /// Per-category income/expense sums within the filter. Transfer legs are
    /// excluded: the sentinel category is bookkeeping, not spending.
    pub fn category_totals(
        ledger: &Ledger,
        filter: &TransactionFilter,
        today: NaiveDate,
    ) -> EngineResult<Vec<CategoryTotal>> {
        let mut totals: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
        for txn in TransactionService::list(ledger, filter, today)? {
            match txn.kind {
                TransactionKind::Income => totals.entry(txn.category).or_default().0 += txn.amount,
                TransactionKind::Expense => totals.entry(txn.category).or_default().1 += txn.amount,
                TransactionKind::Transfer => {}
            }
        }
        Ok(totals
            .into_iter()
            .map(|(category, (income, expense))| CategoryTotal {
                category,
                income,
                expense,
            })
            .collect())
    }
}
