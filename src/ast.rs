use std::fmt;

/// A table named in the FROM clause, with its optional alias.
#[derive(Debug, Clone, PartialEq)]
pub struct TableId {
    /// Upper-cased table name.
    pub table_name: String,
    /// Alias as written in the statement.
    pub alias: Option<String>,
}

impl TableId {
    pub fn new(table_name: &str, alias: Option<&str>) -> Self {
        Self {
            table_name: table_name.to_uppercase(),
            alias: alias.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    Is,
    IsNot,
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Comparator::Equal => "=",
            Comparator::NotEqual => "<>",
            Comparator::Less => "<",
            Comparator::LessOrEqual => "<=",
            Comparator::Greater => ">",
            Comparator::GreaterOrEqual => ">=",
            Comparator::Is => "IS",
            Comparator::IsNot => "IS NOT",
        };
        f.write_str(symbol)
    }
}

/// `column <comparator> value`. The value side is kept as written: it is
/// either a literal or another column identifier, which only the join engine
/// can tell apart.
#[derive(Debug, Clone, PartialEq)]
pub struct WhereCondition {
    pub column: String,
    pub comparator: Comparator,
    pub value: String,
}

impl WhereCondition {
    pub fn new(column: &str, comparator: Comparator, value: &str) -> Self {
        Self {
            column: column.to_string(),
            comparator,
            value: value.to_string(),
        }
    }
}

impl fmt::Display for WhereCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.column, self.comparator, self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderCondition {
    pub column: String,
    pub direction: SortDirection,
}

/// The parsed, alias-resolved SELECT statement.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedSelectData {
    Query(SelectPlan),
    /// `select NextId(<table>)`: the next sequence value for a table.
    NextId(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectPlan {
    /// Upper-cased table names in FROM order.
    pub tables: Vec<String>,
    /// `None` selects all columns.
    pub columns: Option<Vec<String>>,
    pub where_conditions: Vec<WhereCondition>,
    pub order_conditions: Vec<OrderCondition>,
}

impl ParsedSelectData {
    pub fn plan(&self) -> Option<&SelectPlan> {
        match self {
            ParsedSelectData::Query(plan) => Some(plan),
            ParsedSelectData::NextId(_) => None,
        }
    }

    pub fn next_id_table(&self) -> Option<&str> {
        match self {
            ParsedSelectData::NextId(table) => Some(table),
            ParsedSelectData::Query(_) => None,
        }
    }
}
