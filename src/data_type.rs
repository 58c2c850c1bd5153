use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::literal;
use crate::value::Value;

/// Represents the supported data types in the database schema.
/// These types define the structure of columns and the expected format of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// A variable-length UTF-8 character string.
    Text,
    /// A 64-bit signed integer.
    Int,
    /// An exact decimal number; equality ignores scale.
    Decimal,
    /// An instant with millisecond precision.
    Date,
    /// A boolean value (true or false).
    Bool,
}

impl DataType {
    /// Converts literal text, as written in a WHERE or ON clause, into a value
    /// of this type. The `NULL` literal converts to [Value::Null] for every type.
    ///
    /// # Errors
    /// Returns [Error::Conversion] naming the literal and the target type.
    ///
    /// # Example
    /// ```
    /// # use memquery::{DataType, Value};
    /// assert_eq!(DataType::Int.convert("42").unwrap(), Value::Int(42));
    /// assert_eq!(DataType::Text.convert("'Alice'").unwrap(), Value::Text("Alice".into()));
    /// assert!(DataType::Int.convert("'abc'").is_err());
    /// ```
    pub fn convert(&self, text: &str) -> Result<Value> {
        let text = text.trim();
        if literal::is_null_literal(text) {
            return Ok(Value::Null);
        }

        match self {
            DataType::Text => Ok(Value::Text(Arc::from(literal::unquote(text)))),
            DataType::Int => literal::unquote(text)
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| Error::conversion(text, "INTEGER")),
            DataType::Decimal => Decimal::from_str(&literal::unquote(text))
                .map(Value::Decimal)
                .map_err(|_| Error::conversion(text, "DECIMAL")),
            DataType::Date => literal::parse_date(text).map(Value::Date),
            DataType::Bool => match literal::unquote(text).to_ascii_uppercase().as_str() {
                "TRUE" | "1" => Ok(Value::Bool(true)),
                "FALSE" | "0" => Ok(Value::Bool(false)),
                _ => Err(Error::conversion(text, "BOOLEAN")),
            },
        }
    }

    /// Checks that a value may be stored in a column of this type.
    /// Nullability is a column property and is not checked here.
    pub fn validate(&self, value: &Value) -> Result<()> {
        match value.data_type() {
            None => Ok(()),
            Some(data_type) if data_type == *self => Ok(()),
            Some(data_type) => Err(Error::Validation(format!(
                "value {value} has type {data_type} while column type is {self}"
            ))),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Text => "VARCHAR",
            DataType::Int => "INTEGER",
            DataType::Decimal => "DECIMAL",
            DataType::Date => "DATE",
            DataType::Bool => "BOOLEAN",
        };
        f.write_str(name)
    }
}
