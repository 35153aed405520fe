//! Persistence seam: the engine only ever talks to a [`StorageBackend`].

pub mod json_backend;
pub mod memory_backend;

use crate::errors::EngineResult;
use crate::ledger::{Ledger, OwnerId};

/// Abstraction over persistence backends storing one ledger document per
/// owner. `save` must be atomic: a failed write leaves any previously
/// stored document intact, which is what the engine's rollback contract
/// relies on.
pub trait StorageBackend: Send + Sync {
    fn load(&self, owner: &OwnerId) -> EngineResult<Option<Ledger>>;
    fn save(&self, ledger: &Ledger) -> EngineResult<()>;
}

pub use json_backend::JsonStorage;
pub use memory_backend::MemoryStorage;
