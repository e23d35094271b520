//! Two-tier storage with graceful degradation.

use chrono::NaiveDate;
use tracing::warn;

use crate::error::PayrollResult;
use crate::models::{Employee, FormulaConfig, HistoryFilter, PayrollHistoryRecord, PayrollPeriod};

use super::PayrollStore;

/// Sends every operation to a primary store and retries it on a fallback
/// store when the primary fails.
///
/// Only failures trigger the fallback: a primary that answers "nothing
/// saved yet" is trusted as is.
pub struct FallbackStore {
    primary: Box<dyn PayrollStore>,
    fallback: Box<dyn PayrollStore>,
}

impl FallbackStore {
    /// Creates a store that prefers `primary` and degrades to `fallback`.
    pub fn new(primary: impl PayrollStore + 'static, fallback: impl PayrollStore + 'static) -> Self {
        Self {
            primary: Box::new(primary),
            fallback: Box::new(fallback),
        }
    }

    fn with_fallback<T>(
        &self,
        operation: &str,
        run: impl Fn(&dyn PayrollStore) -> PayrollResult<T>,
    ) -> PayrollResult<T> {
        match run(self.primary.as_ref()) {
            Ok(value) => Ok(value),
            Err(err) => {
                warn!(
                    operation,
                    primary = self.primary.backend_name(),
                    fallback = self.fallback.backend_name(),
                    error = %err,
                    "Primary store failed, using fallback"
                );
                run(self.fallback.as_ref())
            }
        }
    }
}

impl PayrollStore for FallbackStore {
    fn backend_name(&self) -> &'static str {
        "fallback"
    }

    fn load_formula(&self) -> PayrollResult<Option<FormulaConfig>> {
        self.with_fallback("load_formula", |store| store.load_formula())
    }

    fn load_employees(&self) -> PayrollResult<Option<Vec<Employee>>> {
        self.with_fallback("load_employees", |store| store.load_employees())
    }

    fn load_period(&self) -> PayrollResult<Option<PayrollPeriod>> {
        self.with_fallback("load_period", |store| store.load_period())
    }

    fn load_history_records(
        &self,
        filter: &HistoryFilter,
    ) -> PayrollResult<Vec<PayrollHistoryRecord>> {
        self.with_fallback("load_history_records", |store| {
            store.load_history_records(filter)
        })
    }

    fn save_formula(&self, formula: &FormulaConfig) -> PayrollResult<()> {
        self.with_fallback("save_formula", |store| store.save_formula(formula))
    }

    fn save_employees(&self, employees: &[Employee]) -> PayrollResult<()> {
        self.with_fallback("save_employees", |store| store.save_employees(employees))
    }

    fn save_period(&self, period: &PayrollPeriod) -> PayrollResult<()> {
        self.with_fallback("save_period", |store| store.save_period(period))
    }

    fn append_history_records(&self, records: &[PayrollHistoryRecord]) -> PayrollResult<()> {
        self.with_fallback("append_history_records", |store| {
            store.append_history_records(records)
        })
    }

    fn delete_history_records(
        &self,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> PayrollResult<usize> {
        self.with_fallback("delete_history_records", |store| {
            store.delete_history_records(period_start, period_end)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PayrollError;
    use crate::storage::LocalStore;
    use crate::storage::test_support::{create_record, make_date};

    /// A primary tier that is always down.
    struct UnavailableStore;

    impl UnavailableStore {
        fn fail<T>() -> PayrollResult<T> {
            Err(PayrollError::storage("remote", "connection refused"))
        }
    }

    impl PayrollStore for UnavailableStore {
        fn backend_name(&self) -> &'static str {
            "remote"
        }
        fn load_formula(&self) -> PayrollResult<Option<FormulaConfig>> {
            Self::fail()
        }
        fn load_employees(&self) -> PayrollResult<Option<Vec<Employee>>> {
            Self::fail()
        }
        fn load_period(&self) -> PayrollResult<Option<PayrollPeriod>> {
            Self::fail()
        }
        fn load_history_records(
            &self,
            _filter: &HistoryFilter,
        ) -> PayrollResult<Vec<PayrollHistoryRecord>> {
            Self::fail()
        }
        fn save_formula(&self, _formula: &FormulaConfig) -> PayrollResult<()> {
            Self::fail()
        }
        fn save_employees(&self, _employees: &[Employee]) -> PayrollResult<()> {
            Self::fail()
        }
        fn save_period(&self, _period: &PayrollPeriod) -> PayrollResult<()> {
            Self::fail()
        }
        fn append_history_records(&self, _records: &[PayrollHistoryRecord]) -> PayrollResult<()> {
            Self::fail()
        }
        fn delete_history_records(
            &self,
            _period_start: NaiveDate,
            _period_end: NaiveDate,
        ) -> PayrollResult<usize> {
            Self::fail()
        }
    }

    fn local_store(dir: &tempfile::TempDir, name: &str) -> LocalStore {
        LocalStore::new(dir.path().join(name)).unwrap()
    }

    #[test]
    fn test_failing_primary_degrades_to_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let store = FallbackStore::new(UnavailableStore, local_store(&dir, "local"));

        let employees = vec![Employee::new("emp_a", "Anna")];
        store.save_employees(&employees).unwrap();
        store
            .append_history_records(&[create_record("Anna", "2026-01-01", "2026-01-31", "10", 1)])
            .unwrap();

        assert_eq!(store.load_employees().unwrap(), Some(employees));
        assert_eq!(
            store
                .load_history_records(&HistoryFilter::default())
                .unwrap()
                .len(),
            1
        );
        assert_eq!(
            store
                .delete_history_records(make_date("2026-01-01"), make_date("2026-01-31"))
                .unwrap(),
            1
        );

        // the data really is in the fallback tier
        let fallback = local_store(&dir, "local");
        assert!(fallback.load_employees().unwrap().is_some());
    }

    #[test]
    fn test_healthy_primary_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let store = FallbackStore::new(local_store(&dir, "primary"), local_store(&dir, "secondary"));

        store.save_formula(&FormulaConfig::default()).unwrap();

        assert!(local_store(&dir, "primary").load_formula().unwrap().is_some());
        assert!(
            local_store(&dir, "secondary")
                .load_formula()
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_both_tiers_failing_returns_error() {
        let store = FallbackStore::new(UnavailableStore, UnavailableStore);
        assert!(matches!(
            store.load_formula(),
            Err(PayrollError::Storage { .. })
        ));
    }
}
