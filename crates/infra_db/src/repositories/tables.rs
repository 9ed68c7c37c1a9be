//! Whole-table storage
//!
//! Every table is stored under its fixed name with one SQLite column per
//! table column. Column affinity follows the cells: all-integer columns are
//! `INTEGER`, numeric columns with fractions are `REAL`, text columns are
//! `TEXT`, and columns mixing numbers with text are `BLOB`, whose affinity
//! keeps each value in the storage class it was bound with. Cells map onto
//! SQLite values as follows:
//!
//! | cell          | stored as              |
//! |---------------|------------------------|
//! | `Missing`     | `NULL`                 |
//! | `Unknown`     | `'Unknown'`            |
//! | `Integer`     | `INTEGER`              |
//! | `Decimal`     | `REAL`                 |
//! | `Text`        | `TEXT`                 |
//! | `Date`        | `TEXT` (`YYYY-MM-DD`)  |
//! | `Unparseable` | `'Unparseable'`        |
//!
//! Reading back yields `Unknown` for the sentinel text, dates as text.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::sqlite::{Sqlite, SqliteRow};
use sqlx::{QueryBuilder, Row as _, SqlitePool, TypeInfo, ValueRef};
use tracing::{debug, info};

use core_kernel::{Table, Value, UNKNOWN_SENTINEL, UNPARSEABLE_MARKER};

use crate::error::DatabaseError;

/// SQLite's default limit on bound parameters per statement
const MAX_BIND_PARAMETERS: usize = 32_766;

/// Storage class of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnAffinity {
    Integer,
    Real,
    Text,
    /// Numbers and text in one column
    Mixed,
}

impl ColumnAffinity {
    pub fn as_sql(&self) -> &'static str {
        match self {
            ColumnAffinity::Integer => "INTEGER",
            ColumnAffinity::Real => "REAL",
            ColumnAffinity::Text => "TEXT",
            ColumnAffinity::Mixed => "BLOB",
        }
    }

    /// Affinity that keeps every cell of `cells` in its natural storage class
    ///
    /// Sentinel and missing cells do not constrain the affinity; SQLite keeps
    /// `'Unknown'` as text in numeric columns.
    pub fn infer<'a>(cells: impl Iterator<Item = &'a Value>) -> Self {
        let mut numeric: Option<ColumnAffinity> = None;
        let mut text = false;
        for cell in cells {
            match cell {
                Value::Missing | Value::Unknown => {}
                Value::Integer(_) => {
                    numeric.get_or_insert(ColumnAffinity::Integer);
                }
                Value::Decimal(_) => numeric = Some(ColumnAffinity::Real),
                Value::Text(_) | Value::Date(_) | Value::Unparseable(_) => text = true,
            }
        }
        match (numeric, text) {
            (Some(_), true) => ColumnAffinity::Mixed,
            (Some(affinity), false) => affinity,
            (None, _) => ColumnAffinity::Text,
        }
    }
}

/// Repository for whole tables
#[derive(Debug, Clone)]
pub struct TableRepository {
    pool: SqlitePool,
}

impl TableRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Drops any table called `name` and stores `table` in its place
    ///
    /// The drop, create and inserts run in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Schema` for a table without columns.
    pub async fn replace(&self, name: &str, table: &Table) -> Result<(), DatabaseError> {
        let columns = table.columns();
        if columns.is_empty() {
            return Err(DatabaseError::Schema(format!("table {name} has no columns")));
        }

        let definitions: Vec<String> = columns
            .iter()
            .map(|column| -> Result<String, DatabaseError> {
                let cells = table.column(column)?;
                Ok(format!("{} {}", quote_ident(column), ColumnAffinity::infer(cells).as_sql()))
            })
            .collect::<Result<_, _>>()?;

        let mut tx = self.pool.begin().await.map_err(|e| DatabaseError::from(&e))?;

        sqlx::query(&format!("DROP TABLE IF EXISTS {}", quote_ident(name)))
            .execute(&mut *tx)
            .await
            .map_err(|e| DatabaseError::from(&e))?;
        sqlx::query(&format!("CREATE TABLE {} ({})", quote_ident(name), definitions.join(", ")))
            .execute(&mut *tx)
            .await
            .map_err(|e| DatabaseError::from(&e))?;

        let column_list = columns.iter().map(|c| quote_ident(c)).collect::<Vec<_>>().join(", ");
        let rows_per_statement = (MAX_BIND_PARAMETERS / columns.len()).max(1);

        for chunk in table.rows().chunks(rows_per_statement) {
            let mut builder: QueryBuilder<Sqlite> =
                QueryBuilder::new(format!("INSERT INTO {} ({}) ", quote_ident(name), column_list));
            builder.push_values(chunk, |mut values, row| {
                for cell in row.cells() {
                    match cell {
                        Value::Missing => values.push_bind(None::<String>),
                        Value::Unknown => values.push_bind(UNKNOWN_SENTINEL),
                        Value::Integer(n) => values.push_bind(*n),
                        Value::Decimal(d) => match d.to_f64() {
                            Some(f) => values.push_bind(f),
                            None => values.push_bind(d.to_string()),
                        },
                        Value::Text(text) => values.push_bind(text.clone()),
                        Value::Date(date) => values.push_bind(date.format("%Y-%m-%d").to_string()),
                        Value::Unparseable(_) => values.push_bind(UNPARSEABLE_MARKER),
                    };
                }
            });
            builder
                .build()
                .execute(&mut *tx)
                .await
                .map_err(|e| DatabaseError::from(&e))?;
        }

        tx.commit().await.map_err(|e| DatabaseError::from(&e))?;

        info!(table = name, rows = table.len(), columns = columns.len(), "Table stored");
        Ok(())
    }

    /// Reads the table called `name` in insertion order
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` when no such table exists.
    pub async fn load(&self, name: &str) -> Result<Table, DatabaseError> {
        self.ensure_exists(name).await?;

        let columns: Vec<String> =
            sqlx::query(&format!("PRAGMA table_info({})", quote_ident(name)))
                .fetch_all(&self.pool)
                .await
                .map_err(|e| DatabaseError::from(&e))?
                .iter()
                .map(|row| row.try_get::<String, _>("name"))
                .collect::<Result<_, _>>()?;

        let rows = sqlx::query(&format!("SELECT * FROM {} ORDER BY rowid", quote_ident(name)))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DatabaseError::from(&e))?;

        let mut table = Table::new(columns)?;
        let width = table.columns().len();
        for row in &rows {
            let cells = (0..width)
                .map(|index| decode_cell(row, index))
                .collect::<Result<Vec<_>, _>>()?;
            table.push_row(cells)?;
        }

        debug!(table = name, rows = table.len(), "Table loaded");
        Ok(table)
    }

    /// Number of rows in the table called `name`
    pub async fn count(&self, name: &str) -> Result<u64, DatabaseError> {
        self.ensure_exists(name).await?;

        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", quote_ident(name)))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::from(&e))?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    pub async fn exists(&self, name: &str) -> Result<bool, DatabaseError> {
        let found: Option<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::from(&e))?;

        Ok(found.is_some())
    }

    /// Runs a trivial query to check the database responds
    pub async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::from(&e))?;
        Ok(())
    }

    async fn ensure_exists(&self, name: &str) -> Result<(), DatabaseError> {
        if self.exists(name).await? {
            Ok(())
        } else {
            Err(DatabaseError::not_found(name))
        }
    }
}

fn decode_cell(row: &SqliteRow, index: usize) -> Result<Value, DatabaseError> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(Value::Missing);
    }

    let storage = raw.type_info().name().to_string();
    let value = match storage.as_str() {
        "INTEGER" => Value::Integer(row.try_get::<i64, _>(index)?),
        "REAL" => {
            let float = row.try_get::<f64, _>(index)?;
            Decimal::try_from(float)
                .map(Value::Decimal)
                .unwrap_or_else(|_| Value::Text(float.to_string()))
        }
        "BLOB" => Value::Text(String::from_utf8_lossy(&row.try_get::<Vec<u8>, _>(index)?).into_owned()),
        _ => {
            let text = row.try_get::<String, _>(index)?;
            if text == UNKNOWN_SENTINEL {
                Value::Unknown
            } else {
                Value::Text(text)
            }
        }
    };
    Ok(value)
}

/// Quotes an SQL identifier, doubling embedded quotes
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
