//! Append-only attendance ledger.
//!
//! CSV file with a `Name,Timestamp` header, one row per attendance event,
//! local timestamps formatted `%Y-%m-%d %H:%M:%S`. Rows are only ever
//! appended; the per-name [`LogCooldown`] lives inside the ledger so the
//! check and the write happen under one lock.

use crate::dedup::LogCooldown;
use chrono::Local;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use thiserror::Error;

const HEADER: &str = "Name,Timestamp\n";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub struct AttendanceLedger {
    path: PathBuf,
    cooldown: LogCooldown,
}

impl AttendanceLedger {
    pub fn new(path: PathBuf, cooldown_window: Duration) -> Self {
        Self {
            path,
            cooldown: LogCooldown::new(cooldown_window),
        }
    }

    /// Record one attendance event for `name`.
    ///
    /// A no-op (returns `Ok(false)`) while the name's cooldown window is
    /// live. Otherwise creates the file with its header when missing or
    /// empty, appends one row with the current local time, and arms the
    /// cooldown. Write errors propagate to the caller.
    pub fn log_attendance(&mut self, name: &str, now: Instant) -> Result<bool, LedgerError> {
        if self.cooldown.contains(name, now) {
            return Ok(false);
        }

        self.ensure_header()?;

        let timestamp = Local::now().format(TIMESTAMP_FORMAT);
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        writeln!(file, "{},{timestamp}", csv_field(name))?;

        self.cooldown.record(name, now);
        tracing::info!(name, "attendance logged");
        Ok(true)
    }

    fn ensure_header(&self) -> Result<(), LedgerError> {
        let needs_init = match fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(_) => true,
        };
        if needs_init {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&self.path, HEADER)?;
        }
        Ok(())
    }
}

/// Quote a CSV field when it carries a comma, quote or newline. Names are
/// free-form text.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
