use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};
use finance_core::config::EngineConfig;
use finance_core::core::services::NewTransaction;
use finance_core::core::Engine;
use finance_core::ledger::{OwnerId, TransactionKind};
use finance_core::storage::{JsonStorage, MemoryStorage};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the
/// test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Engine backed by process memory; enough for everything that does not
/// exercise durability.
pub fn memory_engine() -> Engine {
    Engine::new(Box::new(MemoryStorage::new()), EngineConfig::default())
}

/// Engine backed by a JSON store in an isolated temporary directory.
/// Returns the storage root so a second engine can reopen the same data.
pub fn json_engine() -> (Engine, std::path::PathBuf) {
    let temp = TempDir::new().expect("create temp dir");
    let root = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let storage = JsonStorage::new(Some(root.clone())).expect("create json storage backend");
    let engine = Engine::new(Box::new(storage), EngineConfig::default());
    (engine, root)
}

pub fn owner() -> OwnerId {
    OwnerId::new("tester")
}

pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub fn income(amount: Decimal, category: &str, account: &str) -> NewTransaction {
    entry(TransactionKind::Income, amount, category, account)
}

pub fn expense(amount: Decimal, category: &str, account: &str) -> NewTransaction {
    entry(TransactionKind::Expense, amount, category, account)
}

fn entry(kind: TransactionKind, amount: Decimal, category: &str, account: &str) -> NewTransaction {
    NewTransaction {
        kind,
        amount,
        category: category.into(),
        description: None,
        account: account.into(),
        timestamp: at(2025, 3, 10),
    }
}
