//! Turns a [ParsedSelectData] into rows: join, filter, sort, project.

use std::cmp::Ordering;

use tracing::{debug, trace};

use crate::alias;
use crate::ast::{Comparator, ParsedSelectData, SelectPlan, SortDirection, WhereCondition};
use crate::config::EngineConfig;
use crate::data_type::DataType;
use crate::database::QueryResult;
use crate::error::{Error, Result};
use crate::join::{JoinTable, build_join};
use crate::literal;
use crate::store::TableStore;
use crate::table::Row;
use crate::value::{SqlOrdering, Value};

/// Name of the single column returned by `select NextId(...)`.
pub const NEXT_ID_COLUMN: &str = "NEXTID";

pub struct Executor<'a> {
    store: &'a TableStore,
    config: &'a EngineConfig,
}

/// Right-hand side of a row filter.
#[derive(Debug)]
enum Operand {
    Column(usize),
    Literal(Value),
}

#[derive(Debug)]
struct RowFilter {
    column: usize,
    comparator: Comparator,
    operand: Operand,
}

/// One output column.
#[derive(Debug)]
enum Projection {
    Column(usize),
    Constant(Value),
    Sequence(String),
}

impl<'a> Executor<'a> {
    pub fn new(store: &'a TableStore, config: &'a EngineConfig) -> Self {
        Self { store, config }
    }

    pub fn execute(&self, parsed: &ParsedSelectData) -> Result<QueryResult> {
        match parsed {
            ParsedSelectData::NextId(table) => Ok(QueryResult {
                columns: vec![NEXT_ID_COLUMN.to_string()],
                rows: vec![vec![Value::Int(self.store.next_id(table))]],
            }),
            ParsedSelectData::Query(plan) => self.run(plan),
        }
    }

    fn run(&self, plan: &SelectPlan) -> Result<QueryResult> {
        let (table, conditions) = if plan.tables.len() == 1 {
            let snapshot = self.store.get_table(&plan.tables[0])?;
            (JoinTable::seed(snapshot), plan.where_conditions.clone())
        } else {
            let joined = build_join(self.store, plan, self.config)?;
            (joined.table, joined.remaining)
        };

        let filters = conditions
            .iter()
            .map(|condition| compile_filter(condition, &table))
            .collect::<Result<Vec<_>>>()?;
        let sort_keys = plan
            .order_conditions
            .iter()
            .map(|order| Ok((table.column_index(&order.column)?, order.direction)))
            .collect::<Result<Vec<_>>>()?;
        let (columns, projections) = self.projections(plan, &table)?;

        let mut rows = Vec::new();
        for row in table.into_rows() {
            if matches_all(&filters, &row)? {
                rows.push(row);
            }
        }
        trace!(rows = rows.len(), filters = filters.len(), "filtered rows");

        sort_rows(&mut rows, &sort_keys)?;
        if let Some(max) = self.config.max_result_rows {
            rows.truncate(max);
        }

        let rows: Vec<Vec<Value>> = rows
            .iter()
            .map(|row| {
                projections
                    .iter()
                    .map(|projection| match projection {
                        Projection::Column(idx) => row[*idx].clone(),
                        Projection::Constant(value) => value.clone(),
                        Projection::Sequence(name) => Value::Int(self.store.next_id(name)),
                    })
                    .collect()
            })
            .collect();

        debug!(tables = ?plan.tables, rows = rows.len(), "executed select");
        Ok(QueryResult { columns, rows })
    }

    /// Output names are bare for a single table and `TABLE.COLUMN` for joins.
    fn projections(&self, plan: &SelectPlan, table: &JoinTable) -> Result<(Vec<String>, Vec<Projection>)> {
        let single = table.tables().len() == 1;
        let column = |idx: usize| {
            let name = &table.columns()[idx].name;
            let name = match name.rsplit_once('.') {
                Some((_, bare)) if single => bare.to_string(),
                _ => name.clone(),
            };
            (name, Projection::Column(idx))
        };
        let all = || {
            distinct(&plan.tables)
                .into_iter()
                .flat_map(|name| columns_of(table, name))
                .map(&column)
                .collect::<Vec<_>>()
        };

        let Some(selected) = &plan.columns else {
            return Ok(all().into_iter().unzip());
        };

        let mut outputs = Vec::with_capacity(selected.len());
        for item in selected {
            let item = item.trim();
            if item == "*" {
                outputs.extend(all());
                continue;
            }
            if literal::is_quoted(item) {
                let constant = Value::Text(literal::unquote(item).into());
                outputs.push((item.to_string(), Projection::Constant(constant)));
                continue;
            }
            match alias::qualifier(item) {
                Some((qualifier, "*")) => {
                    if !table.contains_table(qualifier) {
                        return Err(Error::TableNotFound(qualifier.to_string()));
                    }
                    outputs.extend(columns_of(table, qualifier).map(&column));
                }
                Some((qualifier, name))
                    if name.eq_ignore_ascii_case(alias::NEXTVAL) && !table.contains_table(qualifier) =>
                {
                    outputs.push((item.to_string(), Projection::Sequence(qualifier.to_string())));
                }
                _ => outputs.push(column(table.column_index(item)?)),
            }
        }
        Ok(outputs.into_iter().unzip())
    }
}

fn distinct(tables: &[String]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::with_capacity(tables.len());
    for name in tables {
        if !seen.contains(&name.as_str()) {
            seen.push(name);
        }
    }
    seen
}

fn columns_of<'t>(table: &'t JoinTable, name: &'t str) -> impl Iterator<Item = usize> + 't {
    table
        .columns()
        .iter()
        .enumerate()
        .filter(move |(_, col)| {
            col.name
                .rsplit_once('.')
                .is_some_and(|(qualifier, _)| qualifier == name)
        })
        .map(|(idx, _)| idx)
}

// ───────────────────────────────────────────────────────────────
// Filtering
// ───────────────────────────────────────────────────────────────

/// Resolves column positions and converts the literal with the column type,
/// once per statement.
fn compile_filter(condition: &WhereCondition, table: &JoinTable) -> Result<RowFilter> {
    let column = table.column_index(&condition.column)?;

    let references_column = alias::qualifier(&condition.value).is_some_and(|(qualifier, name)| {
        table.contains_table(qualifier) && name != "*" && !name.eq_ignore_ascii_case(alias::NEXTVAL)
    });
    let operand = if references_column {
        Operand::Column(table.column_index(&condition.value)?)
    } else {
        let data_type = table.columns()[column].data_type;
        // bare words are unqualified columns, not text
        if data_type == DataType::Text
            && !literal::is_quoted(&condition.value)
            && !literal::is_null_literal(&condition.value)
        {
            return Err(Error::conversion(&condition.value, "TEXT (literals must be quoted)"));
        }
        Operand::Literal(data_type.convert(&condition.value)?)
    };

    let is_null_test = matches!(condition.comparator, Comparator::Is | Comparator::IsNot);
    if is_null_test && !matches!(operand, Operand::Literal(Value::Null)) {
        return Err(Error::parse(format!(
            "IS and IS NOT only compare against NULL: <{condition}>"
        )));
    }

    Ok(RowFilter {
        column,
        comparator: condition.comparator,
        operand,
    })
}

fn matches_all(filters: &[RowFilter], row: &Row) -> Result<bool> {
    for filter in filters {
        if !filter.matches(row)? {
            return Ok(false);
        }
    }
    Ok(true)
}

impl RowFilter {
    fn matches(&self, row: &Row) -> Result<bool> {
        let left = &row[self.column];
        let right = match &self.operand {
            Operand::Literal(Value::Null) => {
                return Ok(match self.comparator {
                    Comparator::Equal | Comparator::Is => left.is_null(),
                    Comparator::NotEqual | Comparator::IsNot => !left.is_null(),
                    _ => false,
                });
            }
            Operand::Literal(value) => value,
            Operand::Column(idx) => &row[*idx],
        };

        let ordering = || left.compare_order(right);
        Ok(match self.comparator {
            Comparator::Equal => left.compare_equals(right)?,
            Comparator::NotEqual => !left.is_null() && !right.is_null() && !left.compare_equals(right)?,
            Comparator::Less => ordering()? == SqlOrdering::Less,
            Comparator::LessOrEqual => matches!(ordering()?, SqlOrdering::Less | SqlOrdering::Equal),
            Comparator::Greater => ordering()? == SqlOrdering::Greater,
            Comparator::GreaterOrEqual => matches!(ordering()?, SqlOrdering::Greater | SqlOrdering::Equal),
            // rejected by compile_filter unless the operand is NULL
            Comparator::Is | Comparator::IsNot => false,
        })
    }
}

// ───────────────────────────────────────────────────────────────
// Ordering
// ───────────────────────────────────────────────────────────────

/// Stable multi-key sort. Nulls go last whatever the direction.
fn sort_rows(rows: &mut [Row], keys: &[(usize, SortDirection)]) -> Result<()> {
    if keys.is_empty() {
        return Ok(());
    }

    let mut failure = None;
    rows.sort_by(|a, b| {
        for &(idx, direction) in keys {
            let ord = match compare_for_sort(&a[idx], &b[idx], direction) {
                Ok(ord) => ord,
                Err(err) => {
                    failure.get_or_insert(err);
                    return Ordering::Equal;
                }
            };
            // if it's not equal no need to compare more
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });

    match failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn compare_for_sort(a: &Value, b: &Value, direction: SortDirection) -> Result<Ordering> {
    let ord = match a.compare_order(b)? {
        SqlOrdering::Less => Ordering::Less,
        SqlOrdering::Equal => Ordering::Equal,
        SqlOrdering::Greater => Ordering::Greater,
        SqlOrdering::Unknown => {
            return Ok(match (a.is_null(), b.is_null()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                _ => Ordering::Less,
            });
        }
    };
    Ok(match direction {
        SortDirection::Asc => ord,
        SortDirection::Desc => ord.reverse(),
    })
}
