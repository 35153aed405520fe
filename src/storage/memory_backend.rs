use std::collections::HashMap;
use std::sync::RwLock;

use crate::errors::{EngineError, EngineResult};
use crate::ledger::{Ledger, OwnerId};

use super::StorageBackend;

/// Keeps ledgers in process memory. Serves tests and embedders that do not
/// need durability.
#[derive(Default)]
pub struct MemoryStorage {
    ledgers: RwLock<HashMap<OwnerId, Ledger>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn load(&self, owner: &OwnerId) -> EngineResult<Option<Ledger>> {
        let ledgers = self
            .ledgers
            .read()
            .map_err(|_| EngineError::Storage("storage lock poisoned".into()))?;
        Ok(ledgers.get(owner).cloned())
    }

    fn save(&self, ledger: &Ledger) -> EngineResult<()> {
        let mut ledgers = self
            .ledgers
            .write()
            .map_err(|_| EngineError::Storage("storage lock poisoned".into()))?;
        ledgers.insert(ledger.owner.clone(), ledger.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_per_owner() {
        let storage = MemoryStorage::new();
        let alice = OwnerId::new("alice");
        storage.save(&Ledger::new(alice.clone())).unwrap();

        assert!(storage.load(&alice).unwrap().is_some());
        assert!(storage.load(&OwnerId::new("bob")).unwrap().is_none());
    }
}
