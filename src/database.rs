use std::sync::Arc;

use tracing::debug;

use crate::ast::ParsedSelectData;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::executor::Executor;
use crate::parser::parse_select;
use crate::store::TableStore;
use crate::table::{Row, Schema};
use crate::value::Value;

/// The main entry point for the in-memory query engine.
/// It owns a handle to the table store and runs SELECT statements against it.
pub struct Database {
    /// Shared with any other handle created through [Database::with_store].
    store: Arc<TableStore>,
    config: EngineConfig,
}

/// Rows produced by a statement, with their output column names.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    /// Bare names for one table, `TABLE.COLUMN` for joins.
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl QueryResult {
    /// Position of an output column, matched case-insensitively.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column.eq_ignore_ascii_case(name))
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

impl Database {
    /// An empty store with the default [EngineConfig].
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self::with_store(Arc::new(TableStore::new()), config)
    }

    /// A database over an existing store.
    pub fn with_store(store: Arc<TableStore>, config: EngineConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &Arc<TableStore> {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Registers a table. Fails with [crate::Error::DuplicateTable] if the name is taken.
    pub fn create_table(&self, name: &str, schema: Schema) -> Result<()> {
        self.store.create_table(name, schema)
    }

    /// Appends a row to a table.
    pub fn insert(&self, table: &str, row: Row) -> Result<()> {
        self.store.insert(table, row)
    }

    /// Parses and alias-resolves a statement without running it.
    pub fn parse(&self, sql: &str) -> Result<ParsedSelectData> {
        parse_select(sql)
    }

    /// Runs a statement end to end:
    /// 1. **Parses** the statement and resolves aliases.
    /// 2. **Joins** the FROM tables on their equality conditions.
    /// 3. **Filters** rows on the remaining conditions.
    /// 4. **Sorts** them on the `ORDER BY` clause.
    /// 5. **Projects** the requested columns.
    ///
    /// # Example
    ///
    /// ```
    /// use memquery::{ColumnDef, DataType, Database, Schema, Value};
    ///
    /// let db = Database::new();
    /// db.create_table(
    ///     "products",
    ///     Schema::new(vec![
    ///         ColumnDef::new("name", DataType::Text),
    ///         ColumnDef::new("price", DataType::Int),
    ///     ]),
    /// )
    /// .unwrap();
    /// db.insert("products", vec![Value::Text("Laptop".into()), Value::Int(1200)]).unwrap();
    /// db.insert("products", vec![Value::Text("Mouse".into()), Value::Int(25)]).unwrap();
    ///
    /// let result = db.query("SELECT name FROM products WHERE price < 100").unwrap();
    ///
    /// assert_eq!(result.columns, vec!["NAME"]);
    /// assert_eq!(result.rows, vec![vec![Value::Text("Mouse".into())]]);
    /// ```
    ///
    /// # Errors
    /// Returns an error if:
    /// - The SQL is not a valid `SELECT` statement.
    /// - A table or column does not exist.
    /// - Two values of different types are compared.
    pub fn query(&self, sql: &str) -> Result<QueryResult> {
        debug!(sql, "query");
        let parsed = parse_select(sql)?;
        Executor::new(&self.store, &self.config).execute(&parsed)
    }
}
