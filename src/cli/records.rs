//! Records command.
//!
//! Lists the secrets version recorded for each slot.

use std::path::PathBuf;

use chrono::Utc;

use crate::cli::output;
use crate::core::ledger::Ledger;
use crate::error::Result;

/// List recorded slots.
pub fn execute(ledger: Option<PathBuf>) -> Result<()> {
    let path = match ledger {
        Some(path) => path,
        None => Ledger::default_path()?,
    };
    let ledger = Ledger::open(&path)?;

    let now = Utc::now();
    let mut any = false;
    for record in ledger.records() {
        any = true;
        let state = if record.is_active(now) { "active" } else { "expired" };
        output::list_item(&format!(
            "slot {}  version {}  expires {}  ({})",
            record.slot_id,
            record.version,
            record.expires_at.to_rfc3339(),
            state
        ));
    }

    if !any {
        output::dimmed("no slots recorded");
    }
    Ok(())
}
