//! SQLite-backed relational storage.
//!
//! Formula and period are single rows pinned to `id = 1`, employees are
//! keyed by their id, and history rows are append-only. Monetary values are
//! stored as decimal text so no precision is lost.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, Row, named_params, params_from_iter};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::error::PayrollResult;
use crate::models::lenient::{parse_date, parse_decimal, parse_timestamp, parse_uuid};
use crate::models::{Employee, FormulaConfig, HistoryFilter, PayrollHistoryRecord, PayrollPeriod};

use super::PayrollStore;

const SCHEMA_SQL: &str = include_str!("schema.sql");

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Stores payroll data in a SQLite database file.
///
/// A connection is opened per operation, so the store can be shared between
/// threads without locking.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    /// Opens the database, creating the file and schema if needed.
    pub fn open<P: Into<PathBuf>>(path: P) -> PayrollResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let store = Self { path };
        store.connect()?.execute_batch(SCHEMA_SQL)?;
        info!(db_path = %store.path.display(), "SQLite store ready");
        Ok(store)
    }

    /// The database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> PayrollResult<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Ok(conn)
    }
}

fn parse_date_column(row: &Row<'_>, column: &str) -> rusqlite::Result<NaiveDate> {
    let text: String = row.get(column)?;
    NaiveDate::parse_from_str(&text, DATE_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn text_column(row: &Row<'_>, column: &str) -> rusqlite::Result<String> {
    let text: Option<String> = row.get(column)?;
    Ok(text.unwrap_or_default())
}

fn decimal_column(row: &Row<'_>, column: &str) -> rusqlite::Result<Decimal> {
    let text: Option<String> = row.get(column)?;
    Ok(text.as_deref().map(parse_decimal).unwrap_or(Decimal::ZERO))
}

fn count_column(row: &Row<'_>, column: &str) -> rusqlite::Result<u32> {
    let value: Option<i64> = row.get(column)?;
    Ok(value
        .map(|v| u32::try_from(v.max(0)).unwrap_or(u32::MAX))
        .unwrap_or(0))
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    // fixed width so text order matches time order
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn map_employee(row: &Row<'_>) -> rusqlite::Result<Employee> {
    Ok(Employee {
        id: row.get("id")?,
        name: row.get("name")?,
        shifts: count_column(row, "shifts")?,
        internship_shifts: count_column(row, "internship_shifts")?,
        corkage_fee: decimal_column(row, "corkage_fee")?,
        penalties: decimal_column(row, "penalties")?,
        bar_debt: decimal_column(row, "bar_debt")?,
    })
}

fn map_history_record(row: &Row<'_>) -> rusqlite::Result<PayrollHistoryRecord> {
    Ok(PayrollHistoryRecord {
        id: parse_uuid(&text_column(row, "id")?),
        period_start: parse_date(&text_column(row, "period_start")?),
        period_end: parse_date(&text_column(row, "period_end")?),
        employee_id: text_column(row, "employee_id")?,
        employee_name: text_column(row, "employee_name")?,
        shifts: count_column(row, "shifts")?,
        internship_shifts: count_column(row, "internship_shifts")?,
        corkage_fee: decimal_column(row, "corkage_fee")?,
        penalties: decimal_column(row, "penalties")?,
        bar_debt: decimal_column(row, "bar_debt")?,
        total_salary: decimal_column(row, "total_salary")?,
        total_bar_amount: decimal_column(row, "total_bar_amount")?,
        bar_percentage: decimal_column(row, "bar_percentage")?,
        created_at: parse_timestamp(&text_column(row, "created_at")?),
    })
}

impl PayrollStore for SqliteStore {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    fn load_formula(&self) -> PayrollResult<Option<FormulaConfig>> {
        let conn = self.connect()?;
        let formula = conn
            .query_row(
                "SELECT shift_rate, internship_rate, total_bar_amount, bar_percentage
                 FROM formula WHERE id = 1",
                [],
                |row| {
                    Ok(FormulaConfig {
                        shift_rate: decimal_column(row, "shift_rate")?,
                        internship_rate: decimal_column(row, "internship_rate")?,
                        total_bar_amount: decimal_column(row, "total_bar_amount")?,
                        bar_percentage: decimal_column(row, "bar_percentage")?,
                    })
                },
            )
            .optional()?;
        Ok(formula)
    }

    fn load_employees(&self) -> PayrollResult<Option<Vec<Employee>>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare("SELECT * FROM employees ORDER BY position ASC")?;
        let rows = stmt.query_map([], map_employee)?;

        let mut employees = Vec::new();
        for row in rows {
            employees.push(row?);
        }

        if employees.is_empty() {
            // an empty table is indistinguishable from a first run
            return Ok(None);
        }
        Ok(Some(employees))
    }

    fn load_period(&self) -> PayrollResult<Option<PayrollPeriod>> {
        let conn = self.connect()?;
        let period = conn
            .query_row(
                "SELECT start_date, end_date FROM payroll_period WHERE id = 1",
                [],
                |row| {
                    Ok(PayrollPeriod {
                        start_date: parse_date_column(row, "start_date")?,
                        end_date: parse_date_column(row, "end_date")?,
                    })
                },
            )
            .optional()?;
        Ok(period)
    }

    fn load_history_records(
        &self,
        filter: &HistoryFilter,
    ) -> PayrollResult<Vec<PayrollHistoryRecord>> {
        let mut clauses: Vec<&str> = Vec::new();
        let mut values: Vec<String> = Vec::new();

        if let Some(start) = filter.period_start {
            clauses.push("period_start = ?");
            values.push(format_date(start));
        }
        if let Some(end) = filter.period_end {
            clauses.push("period_end = ?");
            values.push(format_date(end));
        }
        if let Some(name) = &filter.employee_name {
            clauses.push("employee_name = ?");
            values.push(name.clone());
        }

        let mut sql = String::from("SELECT * FROM payroll_history");
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY created_at DESC");

        let conn = self.connect()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values.iter()), map_history_record)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        debug!(count = records.len(), "Loaded history records");
        Ok(records)
    }

    fn save_formula(&self, formula: &FormulaConfig) -> PayrollResult<()> {
        let conn = self.connect()?;
        conn.execute(
            r#"
                INSERT INTO formula (id, shift_rate, internship_rate, total_bar_amount, bar_percentage)
                VALUES (1, :shift_rate, :internship_rate, :total_bar_amount, :bar_percentage)
                ON CONFLICT(id) DO UPDATE SET
                    shift_rate = excluded.shift_rate,
                    internship_rate = excluded.internship_rate,
                    total_bar_amount = excluded.total_bar_amount,
                    bar_percentage = excluded.bar_percentage,
                    updated_at = CURRENT_TIMESTAMP
            "#,
            named_params! {
                ":shift_rate": formula.shift_rate.to_string(),
                ":internship_rate": formula.internship_rate.to_string(),
                ":total_bar_amount": formula.total_bar_amount.to_string(),
                ":bar_percentage": formula.bar_percentage.to_string(),
            },
        )?;
        Ok(())
    }

    fn save_employees(&self, employees: &[Employee]) -> PayrollResult<()> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        for (position, employee) in employees.iter().enumerate() {
            tx.execute(
                r#"
                    INSERT INTO employees
                        (id, position, name, shifts, internship_shifts, corkage_fee, penalties, bar_debt)
                    VALUES
                        (:id, :position, :name, :shifts, :internship_shifts, :corkage_fee, :penalties, :bar_debt)
                    ON CONFLICT(id) DO UPDATE SET
                        position = excluded.position,
                        name = excluded.name,
                        shifts = excluded.shifts,
                        internship_shifts = excluded.internship_shifts,
                        corkage_fee = excluded.corkage_fee,
                        penalties = excluded.penalties,
                        bar_debt = excluded.bar_debt
                "#,
                named_params! {
                    ":id": employee.id,
                    ":position": i64::try_from(position).unwrap_or(i64::MAX),
                    ":name": employee.name,
                    ":shifts": employee.shifts,
                    ":internship_shifts": employee.internship_shifts,
                    ":corkage_fee": employee.corkage_fee.to_string(),
                    ":penalties": employee.penalties.to_string(),
                    ":bar_debt": employee.bar_debt.to_string(),
                },
            )?;
        }

        let keep: HashSet<&str> = employees.iter().map(|e| e.id.as_str()).collect();
        let stale: Vec<String> = {
            let mut stmt = tx.prepare("SELECT id FROM employees")?;
            let ids = stmt.query_map([], |row| row.get::<_, String>(0))?;
            let mut stale = Vec::new();
            for id in ids {
                let id = id?;
                if !keep.contains(id.as_str()) {
                    stale.push(id);
                }
            }
            stale
        };
        for id in &stale {
            tx.execute("DELETE FROM employees WHERE id = ?1", [id])?;
        }

        tx.commit()?;
        debug!(
            saved = employees.len(),
            removed = stale.len(),
            "Saved employees"
        );
        Ok(())
    }

    fn save_period(&self, period: &PayrollPeriod) -> PayrollResult<()> {
        let conn = self.connect()?;
        conn.execute(
            r#"
                INSERT INTO payroll_period (id, start_date, end_date)
                VALUES (1, :start_date, :end_date)
                ON CONFLICT(id) DO UPDATE SET
                    start_date = excluded.start_date,
                    end_date = excluded.end_date,
                    updated_at = CURRENT_TIMESTAMP
            "#,
            named_params! {
                ":start_date": format_date(period.start_date),
                ":end_date": format_date(period.end_date),
            },
        )?;
        Ok(())
    }

    fn append_history_records(&self, records: &[PayrollHistoryRecord]) -> PayrollResult<()> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        for record in records {
            tx.execute(
                r#"
                    INSERT INTO payroll_history
                        (id, period_start, period_end, employee_id, employee_name, shifts,
                         internship_shifts, corkage_fee, penalties, bar_debt, total_salary,
                         total_bar_amount, bar_percentage, created_at)
                    VALUES
                        (:id, :period_start, :period_end, :employee_id, :employee_name, :shifts,
                         :internship_shifts, :corkage_fee, :penalties, :bar_debt, :total_salary,
                         :total_bar_amount, :bar_percentage, :created_at)
                "#,
                named_params! {
                    ":id": record.id.to_string(),
                    ":period_start": format_date(record.period_start),
                    ":period_end": format_date(record.period_end),
                    ":employee_id": record.employee_id,
                    ":employee_name": record.employee_name,
                    ":shifts": record.shifts,
                    ":internship_shifts": record.internship_shifts,
                    ":corkage_fee": record.corkage_fee.to_string(),
                    ":penalties": record.penalties.to_string(),
                    ":bar_debt": record.bar_debt.to_string(),
                    ":total_salary": record.total_salary.to_string(),
                    ":total_bar_amount": record.total_bar_amount.to_string(),
                    ":bar_percentage": record.bar_percentage.to_string(),
                    ":created_at": format_timestamp(record.created_at),
                },
            )?;
        }

        tx.commit()?;
        debug!(count = records.len(), "Appended history records");
        Ok(())
    }

    fn delete_history_records(
        &self,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> PayrollResult<usize> {
        let conn = self.connect()?;
        let removed = conn.execute(
            "DELETE FROM payroll_history WHERE period_start = ?1 AND period_end = ?2",
            [format_date(period_start), format_date(period_end)],
        )?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_support::{create_record, make_date, make_time};
    use std::str::FromStr;
    use uuid::Uuid;

    fn open_store() -> (SqliteStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(dir.path().join("db").join("payroll.sqlite")).unwrap();
        (store, dir)
    }

    #[test]
    fn test_open_creates_database_file() {
        let (store, _dir) = open_store();
        assert!(store.path().exists());
    }

    fn table_count(conn: &Connection) -> i64 {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'",
            [],
            |row| row.get(0),
        )
        .unwrap()
    }

    #[test]
    fn test_open_applies_schema() {
        let (store, _dir) = open_store();
        let conn = Connection::open(store.path()).unwrap();
        assert_eq!(table_count(&conn), 4);
    }

    #[test]
    fn test_connect_leaves_schema_alone() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore {
            path: dir.path().join("bare.sqlite"),
        };

        let conn = store.connect().unwrap();
        assert_eq!(table_count(&conn), 0);
    }

    #[test]
    fn test_reopen_keeps_saved_data() {
        let (store, _dir) = open_store();
        let period = PayrollPeriod::new(make_date("2026-04-01"), make_date("2026-04-30"));
        store.save_period(&period).unwrap();

        let reopened = SqliteStore::open(store.path()).unwrap();
        assert_eq!(reopened.load_period().unwrap(), Some(period));
    }

    #[test]
    fn test_fresh_database_is_empty() {
        let (store, _dir) = open_store();
        assert!(store.load_formula().unwrap().is_none());
        assert!(store.load_employees().unwrap().is_none());
        assert!(store.load_period().unwrap().is_none());
    }

    #[test]
    fn test_formula_upsert_keeps_single_row() {
        let (store, _dir) = open_store();
        store.save_formula(&FormulaConfig::default()).unwrap();

        let updated = FormulaConfig {
            bar_percentage: Decimal::new(125, 3),
            ..FormulaConfig::default()
        };
        store.save_formula(&updated).unwrap();

        assert_eq!(store.load_formula().unwrap(), Some(updated));
        let conn = store.connect().unwrap();
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM formula", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_period_round_trip() {
        let (store, _dir) = open_store();
        let period = PayrollPeriod::new(make_date("2026-03-01"), make_date("2026-03-15"));
        store.save_period(&period).unwrap();
        assert_eq!(store.load_period().unwrap(), Some(period));
    }

    #[test]
    fn test_employees_upsert_and_remove_stale() {
        let (store, _dir) = open_store();
        let mut anna = Employee::new("emp_a", "Anna");
        anna.shifts = 20;
        anna.corkage_fee = Decimal::new(200050, 2);
        let boris = Employee::new("emp_b", "Boris");
        store.save_employees(&[anna.clone(), boris.clone()]).unwrap();

        anna.penalties = Decimal::from(-150);
        let clara = Employee::new("emp_c", "Clara");
        store.save_employees(&[clara.clone(), anna.clone()]).unwrap();

        assert_eq!(store.load_employees().unwrap(), Some(vec![clara, anna]));
    }

    #[test]
    fn test_history_filter_order_and_delete() {
        let (store, _dir) = open_store();
        store
            .append_history_records(&[
                create_record("Anna", "2026-01-01", "2026-01-31", "24700", 2),
                create_record("Boris", "2026-01-01", "2026-01-31", "24000", 2),
                create_record("Anna", "2026-02-01", "2026-02-28", "2333.3333333333", 7),
            ])
            .unwrap();

        let all = store.load_history_records(&HistoryFilter::default()).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].created_at, make_time(7));
        assert_eq!(
            all[0].total_salary,
            Decimal::from_str("2333.3333333333").unwrap()
        );
        assert_eq!(all[0].corkage_fee, Decimal::new(150050, 2));

        let anna = HistoryFilter {
            employee_name: Some("Anna".to_string()),
            ..HistoryFilter::default()
        };
        assert_eq!(store.load_history_records(&anna).unwrap().len(), 2);

        let removed = store
            .delete_history_records(make_date("2026-01-01"), make_date("2026-01-31"))
            .unwrap();
        assert_eq!(removed, 2);
        assert_eq!(
            store
                .load_history_records(&HistoryFilter::default())
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn test_null_numeric_columns_read_as_zero() {
        let (store, _dir) = open_store();
        let conn = store.connect().unwrap();
        conn.execute(
            "INSERT INTO payroll_history (id, period_start, period_end, employee_id, employee_name, created_at)
             VALUES (?1, '2026-01-01', '2026-01-31', 'emp_x', 'Xenia', '2026-02-01T00:00:00.000000Z')",
            [Uuid::new_v4().to_string()],
        )
        .unwrap();

        let records = store.load_history_records(&HistoryFilter::default()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].total_salary, Decimal::ZERO);
        assert_eq!(records[0].shifts, 0);
    }

    #[test]
    fn test_unparseable_history_columns_read_as_defaults() {
        let (store, _dir) = open_store();
        store
            .append_history_records(&[create_record("Anna", "2026-01-01", "2026-01-31", "24700", 2)])
            .unwrap();
        let conn = store.connect().unwrap();
        conn.execute(
            "INSERT INTO payroll_history (id, period_start, period_end, employee_id, employee_name, total_salary, created_at)
             VALUES ('legacy-1', '2026-01-01', '2026-01-31', 'emp_y', 'Yuri', '1500', 'yesterday')",
            [],
        )
        .unwrap();

        let records = store.load_history_records(&HistoryFilter::default()).unwrap();
        assert_eq!(records.len(), 2);
        let yuri = records.iter().find(|r| r.employee_name == "Yuri").unwrap();
        assert!(yuri.id.is_nil());
        assert_eq!(yuri.created_at, DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(yuri.total_salary, Decimal::from(1500));
    }

    #[test]
    fn test_duplicate_history_id_is_rejected() {
        let (store, _dir) = open_store();
        let record = create_record("Anna", "2026-01-01", "2026-01-31", "1", 1);
        store.append_history_records(&[record.clone()]).unwrap();

        assert!(store.append_history_records(&[record]).is_err());
    }
}
