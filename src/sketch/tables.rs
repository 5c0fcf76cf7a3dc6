//! Table Reader.
//!
//! A legacy Sketch document is a SQLite database with two key/value tables,
//! `metadata(name, value)` and `payload(name, value)`. Both are scanned in
//! stored row order. A missing table or column is fatal for the whole file
//! and leaves both tables empty. An error while iterating the rows of one
//! table only discards that table.

use std::fmt;
use std::path::Path;

use log::{error, warn};
use rusqlite::types::Value as Cell;
use rusqlite::{Connection, OpenFlags, Statement};

use super::value::Value;
use crate::common::{Error, Result};

/// The two logical tables of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Metadata,
    Payload,
}

impl Table {
    /// SQL table name.
    pub fn name(self) -> &'static str {
        match self {
            Table::Metadata => "metadata",
            Table::Payload => "payload",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One `(name, value)` row.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub name: String,
    pub value: Value,
}

/// A read error scoped to one table, or to the database as a whole when
/// `table` is `None`.
#[derive(Debug)]
pub struct TableFailure {
    pub table: Option<Table>,
    pub error: Error,
}

/// Rows of both tables plus any failures met while reading them.
#[derive(Debug, Default)]
pub struct TableRows {
    pub metadata: Vec<Row>,
    pub payload: Vec<Row>,
    pub failures: Vec<TableFailure>,
}

impl TableRows {
    /// Rows of `table`.
    pub fn rows(&self, table: Table) -> &[Row] {
        match table {
            Table::Metadata => &self.metadata,
            Table::Payload => &self.payload,
        }
    }

    /// Whether the database itself could not be opened.
    pub fn open_failed(&self) -> bool {
        self.failures.iter().any(|f| f.table.is_none())
    }
}

/// Read both tables of the container at `path`.
///
/// Never fails as a whole. An unopenable database, or a missing table or
/// column in either query, yields empty sequences for both tables. A row
/// error met while scanning one table empties that table only. Every
/// failure is logged and recorded in [`TableRows::failures`]. The connection
/// is released before returning on every path.
pub fn read_tables<P: AsRef<Path>>(path: P) -> TableRows {
    let path = path.as_ref();
    let mut result = TableRows::default();

    let conn = match open_read_only(path) {
        Ok(conn) => conn,
        Err(err) => {
            error!("Failed to open SQLite database '{}': {}", path.display(), err);
            result.failures.push(TableFailure { table: None, error: err });
            return result;
        },
    };

    read_from(&conn, path, &mut result);

    if let Err((_, err)) = conn.close() {
        warn!("Failed to close SQLite database '{}': {}", path.display(), err);
    }

    result
}

// Statements borrow the connection and are dropped before it is closed
fn read_from(conn: &Connection, path: &Path, result: &mut TableRows) {
    let mut statements = Vec::with_capacity(2);
    for table in [Table::Metadata, Table::Payload] {
        match conn.prepare(&select_sql(table)) {
            Ok(stmt) => statements.push((table, stmt)),
            Err(err) => {
                error!(
                    "Table '{}' is missing or malformed in '{}': {}",
                    table,
                    path.display(),
                    err
                );
                result.failures.push(TableFailure {
                    table: Some(table),
                    error: err.into(),
                });
            },
        }
    }
    if !result.failures.is_empty() {
        return;
    }

    for (table, mut stmt) in statements {
        match scan_rows(&mut stmt) {
            Ok(rows) => match table {
                Table::Metadata => result.metadata = rows,
                Table::Payload => result.payload = rows,
            },
            Err(err) => {
                error!(
                    "Failed to read table '{}' from '{}': {}",
                    table,
                    path.display(),
                    err
                );
                result.failures.push(TableFailure { table: Some(table), error: err });
            },
        }
    }
}

/// Open the database without write access.
pub fn open_read_only(path: &Path) -> Result<Connection> {
    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    let conn = Connection::open_with_flags(path, flags)?;
    Ok(conn)
}

/// Query selecting every `(name, value)` row of `table`.
pub fn select_sql(table: Table) -> String {
    format!("SELECT name, value FROM {}", table.name())
}

/// Scan all `(name, value)` rows of one table in stored order.
///
/// A missing table or column is caught when the statement is prepared;
/// errors returned here come from row iteration.
pub fn scan_table(conn: &Connection, table: Table) -> Result<Vec<Row>> {
    let mut stmt = conn.prepare(&select_sql(table))?;
    scan_rows(&mut stmt)
}

fn scan_rows(stmt: &mut Statement<'_>) -> Result<Vec<Row>> {
    let rows = stmt.query_map([], |row| {
        let name: Cell = row.get(0)?;
        let value: Cell = row.get(1)?;
        Ok((name, value))
    })?;

    let mut results = Vec::new();
    for row in rows {
        let (name, value) = row?;
        results.push(Row {
            name: row_name(name),
            value: Value::from(value),
        });
    }
    Ok(results)
}

// Names are TEXT in practice; anything else is keyed by its display text
fn row_name(cell: Cell) -> String {
    match cell {
        Cell::Text(s) => s,
        other => Value::from(other).to_display_text(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rusqlite::params;
    use std::path::PathBuf;

    /// Create a SQLite container at `path` with the given tables.
    ///
    /// `None` for a table leaves it out of the schema.
    pub(crate) fn create_container(
        path: &Path,
        metadata: Option<&[(&str, Cell)]>,
        payload: Option<&[(&str, Cell)]>,
    ) {
        let conn = Connection::open(path).unwrap();
        for (table, rows) in [("metadata", metadata), ("payload", payload)] {
            let Some(rows) = rows else { continue };
            conn.execute(&format!("CREATE TABLE {table} (name TEXT, value BLOB)"), [])
                .unwrap();
            for (name, value) in rows {
                conn.execute(
                    &format!("INSERT INTO {table} (name, value) VALUES (?1, ?2)"),
                    params![name, value],
                )
                .unwrap();
            }
        }
    }

    fn temp_container(
        dir: &tempfile::TempDir,
        metadata: Option<&[(&str, Cell)]>,
        payload: Option<&[(&str, Cell)]>,
    ) -> PathBuf {
        let path = dir.path().join("doc.sketch");
        create_container(&path, metadata, payload);
        path
    }

    #[test]
    fn test_reads_rows_in_stored_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_container(
            &dir,
            Some(&[
                ("k1", Cell::Text("v1".into())),
                ("k2", Cell::Integer(2)),
                ("k1", Cell::Text("v3".into())),
            ]),
            Some(&[("main", Cell::Blob(vec![1, 2, 3]))]),
        );

        let tables = read_tables(&path);
        assert!(tables.failures.is_empty());
        let names: Vec<&str> = tables.metadata.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["k1", "k2", "k1"]);
        assert_eq!(tables.metadata[1].value, Value::Integer(2));
        assert_eq!(tables.payload[0].value, Value::Data(vec![1, 2, 3]));
    }

    #[test]
    fn test_missing_payload_table_empties_both() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_container(&dir, Some(&[("app", Cell::Text("Sketch".into()))]), None);

        let tables = read_tables(&path);
        assert!(tables.metadata.is_empty());
        assert!(tables.payload.is_empty());
        assert_eq!(tables.failures.len(), 1);
        assert_eq!(tables.failures[0].table, Some(Table::Payload));
        assert!(!tables.open_failed());
    }

    #[test]
    fn test_missing_metadata_table_empties_both() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_container(&dir, None, Some(&[("main", Cell::Blob(vec![0]))]));

        let tables = read_tables(&path);
        assert!(tables.metadata.is_empty());
        assert!(tables.rows(Table::Payload).is_empty());
        assert_eq!(tables.failures[0].table, Some(Table::Metadata));
    }

    #[test]
    fn test_scan_table_reports_missing_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_container(&dir, Some(&[]), None);
        let conn = open_read_only(&path).unwrap();
        assert!(scan_table(&conn, Table::Metadata).unwrap().is_empty());
        assert!(matches!(
            scan_table(&conn, Table::Payload),
            Err(Error::ReadFailure(_))
        ));
    }

    #[test]
    fn test_missing_column_empties_both() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cols.sketch");
        let conn = Connection::open(&path).unwrap();
        conn.execute("CREATE TABLE metadata (key TEXT, value TEXT)", []).unwrap();
        conn.execute("CREATE TABLE payload (name TEXT, value BLOB)", []).unwrap();
        conn.execute(
            "INSERT INTO payload (name, value) VALUES ('main', x'00')",
            [],
        )
        .unwrap();
        drop(conn);

        let tables = read_tables(&path);
        assert!(tables.payload.is_empty());
        assert_eq!(tables.failures.len(), 1);
        assert_eq!(tables.failures[0].table, Some(Table::Metadata));
        assert!(matches!(tables.failures[0].error, Error::ReadFailure(_)));
    }

    #[test]
    fn test_unopenable_database_yields_empty_tables() {
        let dir = tempfile::tempdir().unwrap();
        let tables = read_tables(dir.path().join("missing.sketch"));
        assert!(tables.metadata.is_empty());
        assert!(tables.payload.is_empty());
        assert!(tables.open_failed());
    }

    #[test]
    fn test_non_text_names_use_display_text() {
        assert_eq!(row_name(Cell::Integer(7)), "7");
        assert_eq!(row_name(Cell::Text("main".into())), "main");
    }
}
