//! Shared table registry.
//!
//! Every read hands out a [TableSnapshot] taken under the read lock, so a
//! query never sees a table whose column list and rows disagree. A join
//! reads each table separately; snapshots of different tables may come from
//! different moments.

use std::collections::HashMap;

use parking_lot::{Mutex, RwLock};
use tracing::debug;

use crate::error::{Error, Result};
use crate::table::{Row, Schema, Table, TableSnapshot};

#[derive(Default)]
pub struct TableStore {
    tables: RwLock<HashMap<String, Table>>,
    sequences: Mutex<HashMap<String, i64>>,
}

impl TableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new table. Names are case-insensitive.
    ///
    /// # Errors
    /// Returns an error if a table with the same name already exists.
    pub fn create_table(&self, name: &str, schema: Schema) -> Result<()> {
        let table = Table::new(name, schema);
        let mut tables = self.tables.write();
        if tables.contains_key(&table.name) {
            return Err(Error::DuplicateTable(table.name));
        }
        debug!(table = %table.name, columns = table.schema.columns.len(), "created table");
        tables.insert(table.name.clone(), table);
        Ok(())
    }

    /// Appends a row to a table after checking arity, types and nullability.
    pub fn insert(&self, table: &str, values: Row) -> Result<()> {
        let mut tables = self.tables.write();
        let table = tables
            .get_mut(&table.to_uppercase())
            .ok_or_else(|| Error::TableNotFound(table.to_string()))?;
        table.insert(values)
    }

    /// Returns a consistent copy of a table.
    pub fn get_table(&self, name: &str) -> Result<TableSnapshot> {
        self.tables
            .read()
            .get(&name.to_uppercase())
            .map(Table::snapshot)
            .ok_or_else(|| Error::TableNotFound(name.to_string()))
    }

    pub fn contains_table(&self, name: &str) -> bool {
        self.tables.read().contains_key(&name.to_uppercase())
    }

    /// Returns a list of all table names currently stored.
    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Next value of the named sequence, starting at 1.
    pub fn next_id(&self, sequence: &str) -> i64 {
        let mut sequences = self.sequences.lock();
        let counter = sequences.entry(sequence.to_uppercase()).or_insert(0);
        *counter += 1;
        *counter
    }
}
