use std::sync::Arc;

use bitvec::prelude::*;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::data_type::DataType;
use crate::error::{Error, Result};
use crate::value::Value;

/// Typed backing vector of a [Column], one variant per [DataType].
#[derive(Debug, Clone)]
pub enum ColumnData {
    Text(Vec<Arc<str>>),
    Int(Vec<i64>),
    Decimal(Vec<Decimal>),
    Date(Vec<NaiveDateTime>),
    /// Booleans packed one bit per row.
    Bool(BitVec),
}

impl ColumnData {
    fn empty(data_type: DataType) -> Self {
        match data_type {
            DataType::Text => Self::Text(Vec::new()),
            DataType::Int => Self::Int(Vec::new()),
            DataType::Decimal => Self::Decimal(Vec::new()),
            DataType::Date => Self::Date(Vec::new()),
            DataType::Bool => Self::Bool(BitVec::new()),
        }
    }

    /// Pushes the placeholder stored under a null slot.
    fn push_placeholder(&mut self) {
        match self {
            Self::Text(v) => v.push(Arc::from("")),
            Self::Int(v) => v.push(0),
            Self::Decimal(v) => v.push(Decimal::ZERO),
            Self::Date(v) => v.push(NaiveDateTime::default()),
            Self::Bool(v) => v.push(false),
        }
    }
}

/// One column of a table in columnar layout.
///
/// `data` holds a slot for every row, nulls included, so row `i` of the
/// column is always `data[i]` unless `null_bitmap[i]` is set.
#[derive(Debug, Clone)]
pub struct Column {
    pub data_type: DataType,
    pub data: ColumnData,
    /// Set bit = the row holds `NULL`.
    pub null_bitmap: BitVec,
}

impl Column {
    pub fn new(data_type: DataType) -> Self {
        Self {
            data_type,
            data: ColumnData::empty(data_type),
            null_bitmap: BitVec::new(),
        }
    }

    /// Appends `value` as the next row.
    ///
    /// A value of another type is rejected and leaves the column untouched.
    ///
    /// ```
    /// # use memquery::column::Column;
    /// # use memquery::{DataType, Value};
    /// let mut prices = Column::new(DataType::Int);
    /// prices.push(Value::Int(120)).unwrap();
    /// prices.push(Value::Null).unwrap();
    ///
    /// assert_eq!(prices.get(0), Some(Value::Int(120)));
    /// assert_eq!(prices.get(1), Some(Value::Null));
    /// ```
    pub fn push(&mut self, value: Value) -> Result<()> {
        if value.is_null() {
            self.data.push_placeholder();
            self.null_bitmap.push(true);
            return Ok(());
        }

        self.data_type.validate(&value)?;

        match (&mut self.data, value) {
            (ColumnData::Text(slots), Value::Text(text)) => slots.push(text),
            (ColumnData::Int(slots), Value::Int(n)) => slots.push(n),
            (ColumnData::Decimal(slots), Value::Decimal(d)) => slots.push(d),
            (ColumnData::Date(slots), Value::Date(at)) => slots.push(at),
            (ColumnData::Bool(bits), Value::Bool(b)) => bits.push(b),
            (_, other) => {
                return Err(Error::Validation(format!(
                    "{} column cannot hold {other:?}",
                    self.data_type
                )));
            }
        }
        self.null_bitmap.push(false);

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.null_bitmap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.null_bitmap.is_empty()
    }

    /// Value of row `row_idx`, `None` past the end.
    pub fn get(&self, row_idx: usize) -> Option<Value> {
        if *self.null_bitmap.get(row_idx)? {
            return Some(Value::Null);
        }
        let value = match &self.data {
            ColumnData::Text(slots) => Value::Text(Arc::clone(&slots[row_idx])),
            ColumnData::Int(slots) => Value::Int(slots[row_idx]),
            ColumnData::Decimal(slots) => Value::Decimal(slots[row_idx]),
            ColumnData::Date(slots) => Value::Date(slots[row_idx]),
            ColumnData::Bool(bits) => Value::Bool(bits[row_idx]),
        };
        Some(value)
    }
}
