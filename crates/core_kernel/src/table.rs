//! Ordered tables with a checked schema
//!
//! A [`Table`] is the unit every pipeline stage consumes and produces. Stages
//! take a table by value (or by reference) and hand back a new one; nothing
//! is shared or mutated behind a stage's back.

use serde::Serialize;
use std::collections::HashMap;

use crate::error::CoreError;
use crate::value::Value;

/// Ordered, uniquely named columns
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schema {
    columns: Vec<String>,
    index: HashMap<String, usize>,
}

impl Schema {
    /// Creates a schema, rejecting duplicate column names
    pub fn new<I, S>(columns: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut schema = Schema::default();
        for column in columns {
            schema.push(column.into())?;
        }
        Ok(schema)
    }

    fn push(&mut self, column: String) -> Result<usize, CoreError> {
        if self.index.contains_key(&column) {
            return Err(CoreError::DuplicateColumn(column));
        }
        Ok(self.append(column))
    }

    // Callers guarantee `column` is not already present.
    fn append(&mut self, column: String) -> usize {
        let position = self.columns.len();
        self.index.insert(column.clone(), position);
        self.columns.push(column);
        position
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.index.get(column).copied()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.index.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// One table row, as wide as its schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Row(Vec<Value>);

impl Row {
    pub fn new(cells: Vec<Value>) -> Self {
        Self(cells)
    }

    pub fn cells(&self) -> &[Value] {
        &self.0
    }

    pub fn get(&self, position: usize) -> Option<&Value> {
        self.0.get(position)
    }

    pub fn into_cells(self) -> Vec<Value> {
        self.0
    }

    pub(crate) fn cells_mut(&mut self) -> &mut Vec<Value> {
        &mut self.0
    }
}

/// A named, ordered collection of rows sharing one schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    schema: Schema,
    rows: Vec<Row>,
}

impl Table {
    /// Creates an empty table with the given columns
    pub fn new<I, S>(columns: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self {
            schema: Schema::new(columns)?,
            rows: Vec::new(),
        })
    }

    /// Creates a table from a schema and rows, checking every row's width
    pub fn from_rows(schema: Schema, rows: Vec<Row>) -> Result<Self, CoreError> {
        for row in &rows {
            check_width(&schema, row.cells().len())?;
        }
        Ok(Self { schema, rows })
    }

    /// Appends a row
    ///
    /// # Errors
    ///
    /// Returns `CoreError::RowWidth` if the row does not match the schema width
    pub fn push_row(&mut self, cells: Vec<Value>) -> Result<(), CoreError> {
        check_width(&self.schema, cells.len())?;
        self.rows.push(Row::new(cells));
        Ok(())
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn columns(&self) -> &[String] {
        self.schema.columns()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.schema.contains(column)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at `row` in `column`
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let position = self.schema.position(column)?;
        self.rows.get(row)?.get(position)
    }

    /// Iterates the cells of one column in row order
    ///
    /// # Errors
    ///
    /// Returns `CoreError::UnknownColumn` if the column is not in the schema
    pub fn column(&self, column: &str) -> Result<impl Iterator<Item = &Value> + '_, CoreError> {
        let position = self
            .schema
            .position(column)
            .ok_or_else(|| CoreError::unknown_column(column))?;
        Ok(self.rows.iter().map(move |row| &row.cells()[position]))
    }

    /// Returns a table with `column` set to `values`
    ///
    /// The column is appended when absent and replaced in place when present.
    pub fn with_column(mut self, column: &str, values: Vec<Value>) -> Result<Self, CoreError> {
        if values.len() != self.rows.len() {
            return Err(CoreError::validation(format!(
                "column '{}' has {} values for {} rows",
                column,
                values.len(),
                self.rows.len()
            )));
        }
        self.set_column(column, values);
        Ok(self)
    }

    /// Returns a table with `column` computed from each row
    ///
    /// Same placement rules as [`Table::with_column`]; the closure receives the
    /// row index and the row as it was before the column was set.
    pub fn with_computed_column<F>(mut self, column: &str, mut f: F) -> Self
    where
        F: FnMut(usize, &Row) -> Value,
    {
        let values = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| f(i, row))
            .collect();
        self.set_column(column, values);
        self
    }

    fn set_column(&mut self, column: &str, values: Vec<Value>) {
        match self.schema.position(column) {
            Some(position) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.cells_mut()[position] = value;
                }
            }
            None => {
                self.schema.append(column.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.cells_mut().push(value);
                }
            }
        }
    }

    /// Returns a table containing the rows at `indices`, in the order given
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        Self {
            schema: self.schema.clone(),
            rows: indices
                .iter()
                .filter_map(|&i| self.rows.get(i).cloned())
                .collect(),
        }
    }

    /// Rebuilds the table by transforming every cell
    ///
    /// The closure receives the column name and the cell.
    pub fn map_cells<F>(self, mut f: F) -> Self
    where
        F: FnMut(&str, Value) -> Value,
    {
        let Table { schema, rows } = self;
        let rows = rows
            .into_iter()
            .map(|row| {
                Row::new(
                    row.into_cells()
                        .into_iter()
                        .zip(schema.columns())
                        .map(|(value, column)| f(column, value))
                        .collect(),
                )
            })
            .collect();
        Self { schema, rows }
    }

    /// True when any cell is `Missing`
    pub fn has_missing(&self) -> bool {
        self.rows
            .iter()
            .any(|row| row.cells().iter().any(Value::is_missing))
    }

    pub fn into_parts(self) -> (Schema, Vec<Row>) {
        (self.schema, self.rows)
    }
}

fn check_width(schema: &Schema, actual: usize) -> Result<(), CoreError> {
    if actual != schema.len() {
        return Err(CoreError::RowWidth {
            expected: schema.len(),
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut table = Table::new(["ClaimID", "Provider"]).unwrap();
        table.push_row(vec![Value::text("C1"), Value::text("P1")]).unwrap();
        table.push_row(vec![Value::text("C2"), Value::Missing]).unwrap();
        table
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let err = Table::new(["a", "b", "a"]).unwrap_err();
        assert_eq!(err, CoreError::DuplicateColumn("a".to_string()));
    }

    #[test]
    fn test_push_row_checks_width() {
        let mut table = sample();
        let err = table.push_row(vec![Value::Unknown]).unwrap_err();
        assert_eq!(err, CoreError::RowWidth { expected: 2, actual: 1 });
    }

    #[test]
    fn test_with_column_appends_then_replaces() {
        let table = sample()
            .with_column("score", vec![Value::Integer(0), Value::Integer(0)])
            .unwrap();
        assert_eq!(table.columns(), ["ClaimID", "Provider", "score"]);

        let table = table
            .with_column("score", vec![Value::Integer(3), Value::Integer(2)])
            .unwrap();
        assert_eq!(table.columns().len(), 3);
        assert_eq!(table.get(0, "score"), Some(&Value::Integer(3)));
    }

    #[test]
    fn test_with_computed_column() {
        let table = sample().with_computed_column("row_number", |i, _| Value::Integer(i as i64));
        assert_eq!(table.get(1, "row_number"), Some(&Value::Integer(1)));
    }

    #[test]
    fn test_select_rows_preserves_given_order() {
        let table = sample().select_rows(&[1, 0, 9]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0, "ClaimID"), Some(&Value::text("C2")));
    }

    #[test]
    fn test_unknown_column() {
        assert!(sample().column("Amount").is_err());
    }

    #[test]
    fn test_has_missing() {
        assert!(sample().has_missing());
        let filled = sample().map_cells(|_, v| if v.is_missing() { Value::Unknown } else { v });
        assert!(!filled.has_missing());
    }
}
