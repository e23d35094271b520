//! Directory-backed JSON storage.
//!
//! Each piece of state lives in its own document inside one directory:
//! `formula.json`, `employees.json`, `period.json` and `history.json`. A
//! missing document means nothing has been saved yet.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::NaiveDate;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::PayrollResult;
use crate::models::{Employee, FormulaConfig, HistoryFilter, PayrollHistoryRecord, PayrollPeriod};

use super::{PayrollStore, sort_newest_first};

const FORMULA_FILE: &str = "formula.json";
const EMPLOYEES_FILE: &str = "employees.json";
const PERIOD_FILE: &str = "period.json";
const HISTORY_FILE: &str = "history.json";

/// Stores payroll data as JSON documents in a local directory.
#[derive(Debug)]
pub struct LocalStore {
    dir: PathBuf,
    // serialises read-modify-write of the history document
    history_lock: Mutex<()>,
}

impl LocalStore {
    /// Opens the store, creating the directory if needed.
    pub fn new<P: Into<PathBuf>>(dir: P) -> PayrollResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        debug!(dir = %dir.display(), "Local store ready");
        Ok(Self {
            dir,
            history_lock: Mutex::new(()),
        })
    }

    /// The directory the documents are kept in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read_document<T: DeserializeOwned>(&self, name: &str) -> PayrollResult<Option<T>> {
        let path = self.dir.join(name);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write_document<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> PayrollResult<()> {
        let path = self.dir.join(name);
        // each writer gets its own scratch file in the same directory
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(&serde_json::to_vec_pretty(value)?)?;
        tmp.persist(&path).map_err(|err| err.error)?;
        debug!(path = %path.display(), "Wrote document");
        Ok(())
    }

    fn read_history(&self) -> PayrollResult<Vec<PayrollHistoryRecord>> {
        Ok(self.read_document(HISTORY_FILE)?.unwrap_or_default())
    }
}

impl PayrollStore for LocalStore {
    fn backend_name(&self) -> &'static str {
        "local"
    }

    fn load_formula(&self) -> PayrollResult<Option<FormulaConfig>> {
        self.read_document(FORMULA_FILE)
    }

    fn load_employees(&self) -> PayrollResult<Option<Vec<Employee>>> {
        self.read_document(EMPLOYEES_FILE)
    }

    fn load_period(&self) -> PayrollResult<Option<PayrollPeriod>> {
        self.read_document(PERIOD_FILE)
    }

    fn load_history_records(
        &self,
        filter: &HistoryFilter,
    ) -> PayrollResult<Vec<PayrollHistoryRecord>> {
        let mut records: Vec<PayrollHistoryRecord> = self
            .read_history()?
            .into_iter()
            .filter(|record| filter.matches(record))
            .collect();
        sort_newest_first(&mut records);
        Ok(records)
    }

    fn save_formula(&self, formula: &FormulaConfig) -> PayrollResult<()> {
        self.write_document(FORMULA_FILE, formula)
    }

    fn save_employees(&self, employees: &[Employee]) -> PayrollResult<()> {
        self.write_document(EMPLOYEES_FILE, employees)
    }

    fn save_period(&self, period: &PayrollPeriod) -> PayrollResult<()> {
        self.write_document(PERIOD_FILE, period)
    }

    fn append_history_records(&self, records: &[PayrollHistoryRecord]) -> PayrollResult<()> {
        let _guard = self
            .history_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut history = self.read_history()?;
        history.extend_from_slice(records);
        self.write_document(HISTORY_FILE, &history)
    }

    fn delete_history_records(
        &self,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> PayrollResult<usize> {
        let _guard = self
            .history_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut history = self.read_history()?;
        let before = history.len();
        history.retain(|r| !(r.period_start == period_start && r.period_end == period_end));
        let removed = before - history.len();
        if removed > 0 {
            self.write_document(HISTORY_FILE, &history)?;
        }
        Ok(removed)
    }
}
