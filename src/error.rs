//! Error types for the query engine

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Statement errors
    #[error("{0}")]
    Parse(String),

    #[error("Column information: <{0}> is not parseable!")]
    NotParseable(String),

    #[error("Unknown column id <{0}> detected.")]
    UnknownColumnId(String),

    #[error("This feature is not yet supported: {0}")]
    Unsupported(String),

    // Type errors
    #[error("Data type mismatch: cannot compare {left} with {right}")]
    TypeMismatch { left: String, right: String },

    #[error("Value '{value}' cannot be converted into {target}")]
    Conversion { value: String, target: String },

    #[error("Invalid value: {0}")]
    Validation(String),

    // Store errors
    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Table already exists: {0}")]
    DuplicateTable(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    // Join errors
    #[error("{source} in join clause: {clause}")]
    Join {
        clause: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Table {0} is not connected to the other tables by any join condition")]
    UnconnectedTable(String),
}

impl Error {
    pub(crate) fn parse(message: impl Into<String>) -> Self {
        Error::Parse(message.into())
    }

    pub(crate) fn conversion(value: impl Into<String>, target: impl Into<String>) -> Self {
        Error::Conversion {
            value: value.into(),
            target: target.into(),
        }
    }
}
