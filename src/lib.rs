pub mod alias;
pub mod ast;
pub mod column;
pub mod config;
pub mod cursor;
pub mod data_type;
pub mod database;
pub mod error;
pub mod executor;
pub mod join;
pub mod literal;
pub mod parser;
pub mod store;
pub mod table;
pub mod tokenizer;
pub mod value;

pub use ast::{
    Comparator, OrderCondition, ParsedSelectData, SelectPlan, SortDirection, TableId, WhereCondition,
};
pub use column::Column;
pub use config::EngineConfig;
pub use data_type::DataType;
pub use database::{Database, QueryResult};
pub use error::{Error, Result};
pub use join::{JoinStep, JoinTable, JoinedRows, build_join};
pub use parser::{SelectParser, parse_select};
pub use store::TableStore;
pub use table::{ColumnDef, Row, Schema, Table, TableSnapshot};
pub use value::{SqlOrdering, Value};
