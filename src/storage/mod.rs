//! Persistence for payroll inputs and history.
//!
//! [`PayrollStore`] is the narrow data-access boundary the rest of the crate
//! talks to. Two tiers implement it: [`LocalStore`] keeps JSON documents in a
//! directory, and [`SqliteStore`] keeps relational tables in a SQLite file.
//! [`FallbackStore`] puts one in front of the other so a failing primary tier
//! degrades to the secondary one instead of losing data.

mod fallback;
mod local;
mod sqlite;

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::config::StorageConfig;
use crate::error::PayrollResult;
use crate::models::{Employee, FormulaConfig, HistoryFilter, PayrollHistoryRecord, PayrollPeriod};

pub use fallback::FallbackStore;
pub use local::LocalStore;
pub use sqlite::SqliteStore;

/// Read and write access to persisted payroll data.
///
/// Loads return `None` when nothing has been saved yet. Saves of the formula
/// and period replace a single stored value; saving employees replaces the
/// stored roster. History is append-only and can only be removed a whole
/// period at a time.
pub trait PayrollStore: Send + Sync {
    /// A short name used in logs and errors.
    fn backend_name(&self) -> &'static str;

    /// Loads the saved formula.
    fn load_formula(&self) -> PayrollResult<Option<FormulaConfig>>;

    /// Loads the saved roster.
    fn load_employees(&self) -> PayrollResult<Option<Vec<Employee>>>;

    /// Loads the saved payroll period.
    fn load_period(&self) -> PayrollResult<Option<PayrollPeriod>>;

    /// Loads history records matching `filter`, newest first.
    fn load_history_records(&self, filter: &HistoryFilter)
    -> PayrollResult<Vec<PayrollHistoryRecord>>;

    /// Replaces the saved formula.
    fn save_formula(&self, formula: &FormulaConfig) -> PayrollResult<()>;

    /// Replaces the saved roster.
    fn save_employees(&self, employees: &[Employee]) -> PayrollResult<()>;

    /// Replaces the saved payroll period.
    fn save_period(&self, period: &PayrollPeriod) -> PayrollResult<()>;

    /// Appends history records.
    fn append_history_records(&self, records: &[PayrollHistoryRecord]) -> PayrollResult<()>;

    /// Deletes every history record of one period, returning how many were removed.
    fn delete_history_records(
        &self,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> PayrollResult<usize>;
}

/// Builds the store described by the configuration.
///
/// Without a database path this is the local store alone; with one, the
/// SQLite store is primary and the local store is the fallback.
pub fn open_store(config: &StorageConfig) -> PayrollResult<Arc<dyn PayrollStore>> {
    let local = LocalStore::new(&config.local_dir)?;

    match &config.database_path {
        Some(database_path) => match SqliteStore::open(database_path) {
            Ok(sqlite) => {
                info!(
                    database = %database_path.display(),
                    local_dir = %config.local_dir.display(),
                    "Using SQLite storage with local fallback"
                );
                Ok(Arc::new(FallbackStore::new(sqlite, local)))
            }
            Err(err) => {
                warn!(
                    database = %database_path.display(),
                    error = %err,
                    "SQLite storage unavailable, using local storage only"
                );
                Ok(Arc::new(local))
            }
        },
        None => {
            info!(local_dir = %config.local_dir.display(), "Using local storage");
            Ok(Arc::new(local))
        }
    }
}

/// Sorts history records newest first.
pub(crate) fn sort_newest_first(records: &mut [PayrollHistoryRecord]) {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
