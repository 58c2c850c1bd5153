use crate::column::Column;
use crate::data_type::DataType;
use crate::error::{Error, Result};
use crate::value::Value;

/// A row of values, positionally aligned with its table's columns.
pub type Row = Vec<Value>;

/// Column definition in the schema
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
}

impl ColumnDef {
    /// A nullable column. The name is stored upper-cased.
    pub fn new(name: &str, data_type: DataType) -> Self {
        Self {
            name: name.to_uppercase(),
            data_type,
            nullable: true,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub columns: Vec<ColumnDef>,
}

impl Schema {
    pub fn new(columns: Vec<ColumnDef>) -> Self {
        Self { columns }
    }
}

/// Columnar table storage.
pub struct Table {
    pub name: String,
    pub schema: Schema,
    pub columns: Vec<Column>,
    pub row_count: usize,
}

impl Table {
    pub fn new(name: &str, mut schema: Schema) -> Self {
        for col in &mut schema.columns {
            col.name = col.name.to_uppercase();
        }
        let columns = schema
            .columns
            .iter()
            .map(|column| Column::new(column.data_type))
            .collect();
        Self {
            name: name.to_uppercase(),
            schema,
            columns,
            row_count: 0,
        }
    }

    /// insert a new row
    ///
    /// The row is checked completely before any column is touched, so a
    /// rejected row leaves the table unchanged.
    pub fn insert(&mut self, values: Row) -> Result<()> {
        // different sizes
        if values.len() != self.schema.columns.len() {
            return Err(Error::Validation(format!(
                "row has {} values but table {} has {} columns",
                values.len(),
                self.name,
                self.schema.columns.len()
            )));
        }
        for (def, value) in self.schema.columns.iter().zip(&values) {
            if value.is_null() && !def.nullable {
                return Err(Error::Validation(format!(
                    "column {}.{} is not nullable",
                    self.name, def.name
                )));
            }
            def.data_type.validate(value)?;
        }
        for (column, value) in self.columns.iter_mut().zip(values) {
            column.push(value)?;
        }
        self.row_count += 1;
        Ok(())
    }

    pub fn get_row(&self, row_idx: usize) -> Option<Row> {
        if self.row_count <= row_idx {
            return None;
        }
        self.columns
            .iter()
            .map(|col| col.get(row_idx)) // -> Option<Value>
            .collect()
    }

    /// Pivots the columnar data into an ordered row list.
    pub fn snapshot(&self) -> TableSnapshot {
        let rows = (0..self.row_count)
            .filter_map(|row_idx| self.get_row(row_idx))
            .collect();
        TableSnapshot {
            name: self.name.clone(),
            columns: self.schema.columns.clone(),
            rows,
        }
    }
}

/// A consistent, row-oriented copy of a table, as handed out by the store.
#[derive(Debug, Clone)]
pub struct TableSnapshot {
    pub name: String,
    pub columns: Vec<ColumnDef>,
    pub rows: Vec<Row>,
}

impl TableSnapshot {
    /// Position of a column, matched case-insensitively.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|col| col.name.eq_ignore_ascii_case(name))
    }
}
