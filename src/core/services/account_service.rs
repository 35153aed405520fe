use std::collections::BTreeSet;

use crate::errors::{EngineError, EngineResult};
use crate::ledger::Ledger;

/// Registry over the account names in use. Accounts have no existence of
/// their own: a name exists once a transaction references it or once it has
/// been explicitly declared.
pub struct AccountService;

impl AccountService {
    /// Declares an account name ahead of any transaction referencing it.
    /// Idempotent.
    pub fn declare(ledger: &mut Ledger, name: &str) -> EngineResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::Validation(
                "account name must not be blank".into(),
            ));
        }
        if ledger.declared_accounts.insert(name.to_string()) {
            ledger.touch();
        }
        Ok(())
    }

    /// Union of declared names and accounts referenced by any stored
    /// transaction, counterpart side included. Sorted and deduplicated.
    pub fn list(ledger: &Ledger) -> Vec<String> {
        let mut names: BTreeSet<&str> = ledger
            .declared_accounts
            .iter()
            .map(String::as_str)
            .collect();
        for txn in &ledger.transactions {
            names.insert(txn.account.as_str());
            if let Some(other) = txn.counterpart_account.as_deref() {
                names.insert(other);
            }
        }
        names.into_iter().map(str::to_string).collect()
    }

    pub fn exists(ledger: &Ledger, name: &str) -> bool {
        let name = name.trim();
        ledger.declared_accounts.iter().any(|known| known == name)
            || ledger.transactions.iter().any(|txn| {
                txn.account == name || txn.counterpart_account.as_deref() == Some(name)
            })
    }
}
