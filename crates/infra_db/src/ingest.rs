//! CSV row sources
//!
//! Each source file becomes one [`Table`]. The header row names the
//! columns; every field is typed with [`Value::parse_raw`]. Rows shorter than
//! the header are padded with `Missing`, longer rows are truncated.

use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use core_kernel::{Table, Value};

use crate::error::DatabaseError;

/// Reads a CSV document into a table
///
/// # Errors
///
/// Returns `DatabaseError::Csv` for input the CSV reader rejects (invalid
/// UTF-8, I/O failures of `reader`).
pub fn read_csv<R: Read>(reader: R) -> Result<Table, DatabaseError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let mut table = Table::new(column_names(headers.iter()))?;
    let width = table.columns().len();

    let mut truncated = 0usize;
    for record in reader.records() {
        let record = record?;
        if record.len() > width {
            truncated += 1;
            warn!(
                line = record.position().map(|p| p.line()).unwrap_or_default(),
                fields = record.len(),
                expected = width,
                "Row longer than header, extra fields dropped"
            );
        }

        let mut cells: Vec<Value> = record.iter().take(width).map(Value::parse_raw).collect();
        cells.resize(width, Value::Missing);
        table.push_row(cells)?;
    }

    if truncated > 0 {
        warn!(rows = truncated, "Truncated over-long rows");
    }
    Ok(table)
}

/// Reads the CSV file at `path` on the blocking thread pool
///
/// # Errors
///
/// Returns `DatabaseError::Io` when the file cannot be opened, and the
/// errors of [`read_csv`] for its content.
pub async fn read_csv_table(path: impl AsRef<Path>) -> Result<Table, DatabaseError> {
    let path = path.as_ref().to_path_buf();
    let source = path.clone();

    let table = tokio::task::spawn_blocking(move || {
        let file = std::fs::File::open(&source).map_err(|e| io_error(&source, e))?;
        read_csv(std::io::BufReader::new(file))
    })
    .await
    .map_err(|e| io_error(&path, std::io::Error::other(e)))??;

    info!(
        path = %path.display(),
        rows = table.len(),
        columns = table.columns().len(),
        "Source file loaded"
    );
    Ok(table)
}

fn io_error(path: &Path, source: std::io::Error) -> DatabaseError {
    DatabaseError::Io {
        path: PathBuf::from(path),
        source,
    }
}

/// Header names made unique: blank names become `Unnamed: <index>`, repeats
/// get a `.1`, `.2`, ... suffix
fn column_names<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    headers
        .enumerate()
        .map(|(index, header)| {
            let base = if header.trim().is_empty() {
                format!("Unnamed: {index}")
            } else {
                header.to_string()
            };
            let mut name = base.clone();
            let mut suffix = 1;
            while used.contains(&name) {
                name = format!("{base}.{suffix}");
                suffix += 1;
            }
            used.insert(name.clone());
            name
        })
        .collect()
}
