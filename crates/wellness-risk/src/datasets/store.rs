use std::collections::BTreeMap;
use std::fmt;
use std::fs::{self, File};
use std::path::PathBuf;

pub const DEFAULT_PEEK_LIMIT: usize = 10;
pub const MAX_PEEK_LIMIT: usize = 1000;

/// One row keyed by column header.
pub type TableRow = BTreeMap<String, String>;

/// Table identifier restricted to ASCII letters, digits and underscores.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct TableName(String);

impl TableName {
    pub fn parse(raw: &str) -> Result<Self, TableStoreError> {
        let valid = !raw.is_empty()
            && raw
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '_');
        if valid {
            Ok(Self(raw.to_string()))
        } else {
            Err(TableStoreError::InvalidName(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read-only access to the survey tables the models were trained from.
pub trait TableStore: Send + Sync {
    fn list_tables(&self) -> Result<Vec<TableName>, TableStoreError>;
    fn peek(&self, table: &TableName, limit: usize) -> Result<Vec<TableRow>, TableStoreError>;
    fn ping(&self) -> Result<(), TableStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TableStoreError {
    #[error("invalid table name '{0}'")]
    InvalidName(String),
    #[error("table '{0}' not found")]
    NotFound(String),
    #[error("limit must be at most {max}, got {requested}")]
    LimitTooLarge { requested: usize, max: usize },
    #[error("table store unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Directory of `<table>.csv` files, each with a header row.
#[derive(Debug, Clone)]
pub struct CsvTableStore {
    root: PathBuf,
}

impl CsvTableStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn table_path(&self, table: &TableName) -> PathBuf {
        self.root.join(format!("{}.csv", table.as_str()))
    }
}

impl TableStore for CsvTableStore {
    fn list_tables(&self) -> Result<Vec<TableName>, TableStoreError> {
        self.ping()?;
        let mut tables = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("csv") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            if let Ok(name) = TableName::parse(stem) {
                tables.push(name);
            }
        }
        tables.sort();
        Ok(tables)
    }

    fn peek(&self, table: &TableName, limit: usize) -> Result<Vec<TableRow>, TableStoreError> {
        if limit > MAX_PEEK_LIMIT {
            return Err(TableStoreError::LimitTooLarge {
                requested: limit,
                max: MAX_PEEK_LIMIT,
            });
        }

        let path = self.table_path(table);
        if !path.is_file() {
            return Err(TableStoreError::NotFound(table.to_string()));
        }

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(File::open(&path)?);
        let headers = reader.headers()?.clone();

        let mut rows = Vec::new();
        for record in reader.records().take(limit) {
            let record = record?;
            let row = headers
                .iter()
                .zip(record.iter())
                .map(|(column, value)| (column.to_string(), value.to_string()))
                .collect();
            rows.push(row);
        }
        Ok(rows)
    }

    fn ping(&self) -> Result<(), TableStoreError> {
        if self.root.is_dir() {
            Ok(())
        } else {
            Err(TableStoreError::Unavailable(format!(
                "{} is not a directory",
                self.root.display()
            )))
        }
    }
}
