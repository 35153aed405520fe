use std::{
    env, fs,
    path::{Path, PathBuf},
};

use dirs::home_dir;

use crate::errors::{EngineError, EngineResult};
use crate::ledger::{Ledger, OwnerId, CURRENT_SCHEMA_VERSION};

use super::StorageBackend;

const DEFAULT_DIR_NAME: &str = ".finance_core";
const LEDGER_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";
const HOME_ENV: &str = "FINANCE_CORE_HOME";

/// Stores each owner's ledger as one JSON document under the data
/// directory. Writes stage to a temporary file and rename into place.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    root: PathBuf,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>) -> EngineResult<Self> {
        let root = root.unwrap_or_else(default_data_dir);
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn new_default() -> EngineResult<Self> {
        Self::new(None)
    }

    pub fn ledger_path(&self, owner: &OwnerId) -> PathBuf {
        self.root
            .join(format!("{}.{}", canonical_name(owner.as_str()), LEDGER_EXTENSION))
    }
}

impl StorageBackend for JsonStorage {
    fn load(&self, owner: &OwnerId) -> EngineResult<Option<Ledger>> {
        let path = self.ledger_path(owner);
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&path)?;
        let ledger: Ledger = serde_json::from_str(&data)?;
        if ledger.schema_version > CURRENT_SCHEMA_VERSION {
            return Err(EngineError::Storage(format!(
                "ledger schema v{} is newer than supported v{}",
                ledger.schema_version, CURRENT_SCHEMA_VERSION
            )));
        }
        Ok(Some(ledger))
    }

    fn save(&self, ledger: &Ledger) -> EngineResult<()> {
        let json = serde_json::to_string_pretty(ledger)?;
        write_atomic(&self.ledger_path(&ledger.owner), &json)
    }
}

/// Returns the application data directory, defaulting to `~/.finance_core`.
pub fn default_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Owner ids come from the auth layer and may hold arbitrary text; slug
/// them into safe file names.
fn canonical_name(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

fn write_atomic(path: &Path, data: &str) -> EngineResult<()> {
    let tmp = path.with_extension(TMP_SUFFIX);
    fs::write(&tmp, data)?;
    fs::rename(tmp, path)?;
    Ok(())
}
