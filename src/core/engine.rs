//! Owner-scoped facade over the ledger services.
//!
//! Every mutating operation stages its change on a copy of the owner's
//! ledger, persists the copy through the storage backend, and only then
//! publishes it to readers. A failed durable write therefore rolls the
//! whole unit back: memory and store both keep their previous state, and
//! readers never observe a transfer with a single committed leg.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::core::services::{
    AccountBalance, AccountService, BalanceService, BalanceSummary, CategoryTotal, NewObligation,
    NewTransaction, ObligationService, ObligationStatusView, PaymentReceipt, TransactionPatch,
    TransactionService, Transfer, TransferService,
};
use crate::errors::{EngineError, EngineResult};
use crate::ledger::{Ledger, OwnerId, RecurringObligation, Transaction, TransactionFilter};
use crate::storage::{JsonStorage, StorageBackend};

type SharedLedger = Arc<RwLock<Ledger>>;

pub struct Engine {
    storage: Box<dyn StorageBackend>,
    config: EngineConfig,
    ledgers: RwLock<HashMap<OwnerId, SharedLedger>>,
}

impl Engine {
    pub fn new(storage: Box<dyn StorageBackend>, config: EngineConfig) -> Self {
        Self {
            storage,
            config,
            ledgers: RwLock::new(HashMap::new()),
        }
    }

    /// Engine backed by the JSON store rooted at the configured data dir.
    pub fn open(config: EngineConfig) -> EngineResult<Self> {
        let storage = JsonStorage::new(config.data_dir.clone())?;
        Ok(Self::new(Box::new(storage), config))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ---- account registry ------------------------------------------------

    pub fn list_accounts(&self, owner: &OwnerId) -> EngineResult<Vec<String>> {
        self.read(owner, |ledger| Ok(AccountService::list(ledger)))
    }

    pub fn declare_account(&self, owner: &OwnerId, name: &str) -> EngineResult<()> {
        self.commit(owner, |ledger| AccountService::declare(ledger, name))
    }

    // ---- transaction ledger ----------------------------------------------

    pub fn create_transaction(
        &self,
        owner: &OwnerId,
        input: NewTransaction,
    ) -> EngineResult<Transaction> {
        self.commit(owner, |ledger| TransactionService::create(ledger, input))
    }

    pub fn update_transaction(
        &self,
        owner: &OwnerId,
        id: Uuid,
        patch: TransactionPatch,
    ) -> EngineResult<Transaction> {
        self.commit(owner, |ledger| TransactionService::update(ledger, id, patch))
    }

    /// Deletes a transaction; deleting one leg of a transfer removes both
    /// legs as one unit. Returns everything removed.
    pub fn delete_transaction(&self, owner: &OwnerId, id: Uuid) -> EngineResult<Vec<Transaction>> {
        self.commit(owner, |ledger| TransactionService::delete(ledger, id))
    }

    pub fn list_transactions(
        &self,
        owner: &OwnerId,
        filter: &TransactionFilter,
    ) -> EngineResult<Vec<Transaction>> {
        self.list_transactions_on(owner, filter, Utc::now().date_naive())
    }

    /// Named date ranges resolve against an explicit reference date.
    pub fn list_transactions_on(
        &self,
        owner: &OwnerId,
        filter: &TransactionFilter,
        today: NaiveDate,
    ) -> EngineResult<Vec<Transaction>> {
        self.read(owner, |ledger| TransactionService::list(ledger, filter, today))
    }

    // ---- balances --------------------------------------------------------

    pub fn global_balance(
        &self,
        owner: &OwnerId,
        filter: &TransactionFilter,
    ) -> EngineResult<BalanceSummary> {
        self.global_balance_on(owner, filter, Utc::now().date_naive())
    }

    pub fn global_balance_on(
        &self,
        owner: &OwnerId,
        filter: &TransactionFilter,
        today: NaiveDate,
    ) -> EngineResult<BalanceSummary> {
        self.read(owner, |ledger| BalanceService::global(ledger, filter, today))
    }

    pub fn account_balance(&self, owner: &OwnerId, account: &str) -> EngineResult<AccountBalance> {
        self.read(owner, |ledger| BalanceService::account(ledger, account))
    }

    pub fn category_totals(
        &self,
        owner: &OwnerId,
        filter: &TransactionFilter,
    ) -> EngineResult<Vec<CategoryTotal>> {
        let today = Utc::now().date_naive();
        self.read(owner, |ledger| {
            BalanceService::category_totals(ledger, filter, today)
        })
    }

    // ---- transfers -------------------------------------------------------

    pub fn transfer(
        &self,
        owner: &OwnerId,
        origin: &str,
        destination: &str,
        amount: Decimal,
        description: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> EngineResult<Transfer> {
        self.commit(owner, |ledger| {
            TransferService::execute(ledger, origin, destination, amount, description, timestamp)
        })
    }

    /// Reverses a transfer by removing both of its legs as one unit.
    pub fn delete_transfer(&self, owner: &OwnerId, transfer_id: Uuid) -> EngineResult<Transfer> {
        self.commit(owner, |ledger| TransferService::remove(ledger, transfer_id))
    }

    // ---- recurring obligations -------------------------------------------

    pub fn create_obligation(
        &self,
        owner: &OwnerId,
        input: NewObligation,
    ) -> EngineResult<RecurringObligation> {
        self.commit(owner, |ledger| ObligationService::create(ledger, input))
    }

    pub fn list_obligations(&self, owner: &OwnerId) -> EngineResult<Vec<ObligationStatusView>> {
        self.list_obligations_on(owner, Utc::now().date_naive())
    }

    /// Derived obligation state against an explicit reference date.
    pub fn list_obligations_on(
        &self,
        owner: &OwnerId,
        today: NaiveDate,
    ) -> EngineResult<Vec<ObligationStatusView>> {
        let window = self.config.notification_window_days;
        self.read(owner, |ledger| Ok(ObligationService::list(ledger, today, window)))
    }

    pub fn pay_obligation(
        &self,
        owner: &OwnerId,
        id: Uuid,
        paying_account: Option<&str>,
    ) -> EngineResult<PaymentReceipt> {
        self.pay_obligation_at(owner, id, paying_account, Utc::now())
    }

    /// Payment against an explicit clock, for deterministic period handling.
    pub fn pay_obligation_at(
        &self,
        owner: &OwnerId,
        id: Uuid,
        paying_account: Option<&str>,
        now: DateTime<Utc>,
    ) -> EngineResult<PaymentReceipt> {
        self.commit(owner, |ledger| {
            ObligationService::pay(ledger, id, paying_account, now)
        })
    }

    pub fn delete_obligation(
        &self,
        owner: &OwnerId,
        id: Uuid,
    ) -> EngineResult<RecurringObligation> {
        self.commit(owner, |ledger| ObligationService::delete(ledger, id))
    }

    // ---- internals -------------------------------------------------------

    fn ledger_cell(&self, owner: &OwnerId) -> EngineResult<SharedLedger> {
        if let Some(cell) = self
            .ledgers
            .read()
            .map_err(|_| lock_poisoned())?
            .get(owner)
        {
            return Ok(cell.clone());
        }
        let mut map = self.ledgers.write().map_err(|_| lock_poisoned())?;
        if let Some(cell) = map.get(owner) {
            return Ok(cell.clone());
        }
        let ledger = self
            .storage
            .load(owner)?
            .unwrap_or_else(|| Ledger::new(owner.clone()));
        let cell = Arc::new(RwLock::new(ledger));
        map.insert(owner.clone(), cell.clone());
        Ok(cell)
    }

    fn read<T, F>(&self, owner: &OwnerId, view: F) -> EngineResult<T>
    where
        F: FnOnce(&Ledger) -> EngineResult<T>,
    {
        let cell = self.ledger_cell(owner)?;
        let guard = cell.read().map_err(|_| lock_poisoned())?;
        view(&guard)
    }

    /// Runs `apply` against a staged copy of the owner ledger under the
    /// owner's write lock, persists the copy, and publishes it only after
    /// the durable write succeeds.
    fn commit<T, F>(&self, owner: &OwnerId, apply: F) -> EngineResult<T>
    where
        F: FnOnce(&mut Ledger) -> EngineResult<T>,
    {
        let cell = self.ledger_cell(owner)?;
        let mut guard = cell.write().map_err(|_| lock_poisoned())?;
        let mut staged = guard.clone();
        let outcome = apply(&mut staged)?;
        self.storage.save(&staged).map_err(|err| {
            tracing::warn!(%owner, error = %err, "durable write failed, unit rolled back");
            EngineError::Consistency(format!("durable write failed, unit rolled back: {err}"))
        })?;
        *guard = staged;
        Ok(outcome)
    }
}

fn lock_poisoned() -> EngineError {
    EngineError::Storage("ledger lock poisoned".into())
}
