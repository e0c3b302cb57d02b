//! Slot ledger.
//!
//! Remembers the latest successful [`DistributionRecord`] per slot in a
//! small TOML file. Recording a slot replaces its previous entry; failed
//! distributions never touch the file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::constants;
use crate::core::distribute::DistributionRecord;
use crate::core::types::SlotId;
use crate::error::{LedgerError, Result};

#[derive(Debug, Default, Serialize, Deserialize)]
struct LedgerFile {
    #[serde(default)]
    slots: BTreeMap<String, DistributionRecord>,
}

/// File-backed map of slot to active record.
#[derive(Debug)]
pub struct Ledger {
    path: PathBuf,
    slots: BTreeMap<SlotId, DistributionRecord>,
}

impl Ledger {
    /// Default ledger location under HOME.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NoHome` if HOME cannot be determined.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(LedgerError::NoHome)?;
        Ok(home.join(constants::LEDGER_FILE))
    }

    /// Open the ledger at `path`; a missing file is an empty ledger.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` if the file exists but cannot be read or parsed.
    pub fn open(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "opening ledger");

        let file: LedgerFile = if path.exists() {
            let contents = std::fs::read_to_string(path).map_err(LedgerError::Read)?;
            toml::from_str(&contents).map_err(LedgerError::Parse)?
        } else {
            LedgerFile::default()
        };

        let slots = file
            .slots
            .into_values()
            .map(|record| (record.slot_id, record))
            .collect();

        Ok(Self {
            path: path.to_path_buf(),
            slots,
        })
    }

    /// Record for a slot, if any.
    pub fn get(&self, slot_id: SlotId) -> Option<&DistributionRecord> {
        self.slots.get(&slot_id)
    }

    /// All records, ordered by slot.
    pub fn records(&self) -> impl Iterator<Item = &DistributionRecord> {
        self.slots.values()
    }

    /// Replace the slot's record and persist.
    ///
    /// Returns the record it superseded.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` if the file cannot be written.
    pub fn record(&mut self, record: DistributionRecord) -> Result<Option<DistributionRecord>> {
        debug!(slot = record.slot_id, version = record.version, "recording slot");
        let previous = self.slots.insert(record.slot_id, record);
        self.save()?;
        Ok(previous)
    }

    fn save(&self) -> Result<()> {
        let file = LedgerFile {
            slots: self
                .slots
                .iter()
                .map(|(slot, record)| (slot.to_string(), record.clone()))
                .collect(),
        };
        let contents = toml::to_string_pretty(&file).map_err(LedgerError::Serialize)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(LedgerError::Write)?;
            }
        }
        std::fs::write(&self.path, contents).map_err(LedgerError::Write)?;
        Ok(())
    }
}
