//! Schema catalog for sqlfold.
//!
//! The catalog maps each table name to its ordered column list. It is loaded
//! once at startup from a JSON file and is read-only afterwards; wrap it in an
//! `Arc` to share it between threads.
//!
//! # File format
//!
//! ```json
//! {
//!     "users":  { "columns": ["id", "name", "age"] },
//!     "orders": ["id", "customer_id", "total"]
//! }
//! ```
//!
//! Each table maps either to an object with a `columns` list or directly to
//! the list. Table and column names are matched case-sensitively.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, SqlFoldError};

/// The one capability the validator needs from a schema source.
pub trait TableLookup {
    /// Columns of `table`, or `None` if the table is unknown.
    fn lookup(&self, table: &str) -> Option<&[String]>;
}

/// A table entry as it may appear in the schema file.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TableEntry {
    Described { columns: Vec<String> },
    Bare(Vec<String>),
}

impl TableEntry {
    fn into_columns(self) -> Vec<String> {
        match self {
            TableEntry::Described { columns } | TableEntry::Bare(columns) => columns,
        }
    }
}

/// Immutable table → columns mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    tables: BTreeMap<String, Vec<String>>,
}

impl Schema {
    /// A schema with no tables. Every table reference fails validation.
    pub fn empty() -> Self {
        Schema::default()
    }

    /// Build a schema from `(table, columns)` pairs.
    pub fn from_tables<I, T, C, S>(tables: I) -> Self
    where
        I: IntoIterator<Item = (T, C)>,
        T: Into<String>,
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tables = tables
            .into_iter()
            .map(|(name, cols)| (name.into(), cols.into_iter().map(Into::into).collect()))
            .collect();
        Schema { tables }
    }

    /// Parse a schema from JSON text.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let raw: BTreeMap<String, TableEntry> = serde_json::from_str(json)?;
        let tables = raw
            .into_iter()
            .map(|(name, entry)| (name, entry.into_columns()))
            .collect();
        Ok(Schema { tables })
    }

    /// Load a schema file, failing if it is missing or malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let schema_load = |reason: String| SqlFoldError::SchemaLoad {
            path: path.to_path_buf(),
            reason,
        };

        let text = fs::read_to_string(path).map_err(|e| schema_load(e.to_string()))?;
        let schema = Schema::from_json(&text).map_err(|e| schema_load(e.to_string()))?;
        log::debug!(
            "loaded schema from {} ({} tables)",
            path.display(),
            schema.tables.len()
        );
        Ok(schema)
    }

    /// Load a schema file, degrading to an empty schema on failure.
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        match Schema::load(path) {
            Ok(schema) => schema,
            Err(e) => {
                log::warn!("{e}; continuing with an empty schema");
                Schema::empty()
            }
        }
    }

    pub fn has_table(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }

    pub fn columns(&self, table: &str) -> Option<&[String]> {
        self.tables.get(table).map(Vec::as_slice)
    }

    /// Table names in sorted order.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl TableLookup for Schema {
    fn lookup(&self, table: &str) -> Option<&[String]> {
        self.columns(table)
    }
}
