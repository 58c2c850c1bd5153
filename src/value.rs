use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::data_type::DataType;
use crate::error::{Error, Result};
use crate::literal;

/// A cell value. One variant per [DataType] plus an untyped `Null`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Null,
    /// Shared so that cloning a row does not copy text.
    Text(Arc<str>),
    Int(i64),
    Decimal(Decimal),
    Date(NaiveDateTime),
    Bool(bool),
}

/// Result of an ordering comparison under SQL null semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlOrdering {
    Less,
    Equal,
    Greater,
    /// At least one operand is `NULL`.
    Unknown,
}

impl From<Ordering> for SqlOrdering {
    fn from(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Less => SqlOrdering::Less,
            Ordering::Equal => SqlOrdering::Equal,
            Ordering::Greater => SqlOrdering::Greater,
        }
    }
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// `None` for `Null`, which takes the type of whatever column holds it.
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Self::Null => None,
            Self::Text(_) => Some(DataType::Text),
            Self::Int(_) => Some(DataType::Int),
            Self::Decimal(_) => Some(DataType::Decimal),
            Self::Date(_) => Some(DataType::Date),
            Self::Bool(_) => Some(DataType::Bool),
        }
    }

    /// Equality as used by joins.
    ///
    /// A `NULL` on either side is never equal to anything. Two non-null
    /// values of different types are a [Error::TypeMismatch], not `false`.
    pub fn compare_equals(&self, other: &Value) -> Result<bool> {
        match (self, other) {
            (Value::Null, _) | (_, Value::Null) => Ok(false),
            (Value::Text(l), Value::Text(r)) => Ok(l == r),
            (Value::Int(l), Value::Int(r)) => Ok(l == r),
            // Decimal equality is numeric, 1.0 == 1.00
            (Value::Decimal(l), Value::Decimal(r)) => Ok(l == r),
            (Value::Date(l), Value::Date(r)) => Ok(l == r),
            (Value::Bool(l), Value::Bool(r)) => Ok(l == r),
            _ => Err(self.mismatch(other)),
        }
    }

    /// Natural ordering of two values of the same type: lexical for text,
    /// numeric for numbers, chronological for dates.
    ///
    /// Returns [SqlOrdering::Unknown] if either operand is `NULL`.
    pub fn compare_order(&self, other: &Value) -> Result<SqlOrdering> {
        let ordering = match (self, other) {
            (Value::Null, _) | (_, Value::Null) => return Ok(SqlOrdering::Unknown),
            (Value::Text(l), Value::Text(r)) => l.cmp(r),
            (Value::Int(l), Value::Int(r)) => l.cmp(r),
            (Value::Decimal(l), Value::Decimal(r)) => l.cmp(r),
            (Value::Date(l), Value::Date(r)) => l.cmp(r),
            (Value::Bool(l), Value::Bool(r)) => l.cmp(r),
            _ => return Err(self.mismatch(other)),
        };
        Ok(ordering.into())
    }

    /// Tri-state "less than": `None` when either side is `NULL`.
    pub fn is_smaller_than(&self, other: &Value) -> Result<Option<bool>> {
        Ok(match self.compare_order(other)? {
            SqlOrdering::Unknown => None,
            ordering => Some(ordering == SqlOrdering::Less),
        })
    }

    /// Text that [DataType::convert] turns back into an equal value.
    pub fn to_literal(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Text(s) => format!("'{}'", s.replace('\'', "''")),
            Value::Int(i) => i.to_string(),
            Value::Decimal(d) => d.to_string(),
            Value::Date(d) => literal::date_to_millis_literal(d),
            Value::Bool(b) => b.to_string(),
        }
    }

    fn mismatch(&self, other: &Value) -> Error {
        Error::TypeMismatch {
            left: format!("{self:?}"),
            right: format!("{other:?}"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Text(s) => f.write_str(s),
            Value::Int(i) => write!(f, "{i}"),
            Value::Decimal(d) => write!(f, "{d}"),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d %H:%M:%S")),
            Value::Bool(b) => write!(f, "{b}"),
        }
    }
}
