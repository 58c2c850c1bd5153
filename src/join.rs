//! Working table for multi-table statements.
//!
//! A [JoinTable] is seeded from the first FROM table and then driven by
//! equality conditions. Each step consumes the table and hands back the next
//! one, so a step that fails leaves nothing half-built behind.

use std::collections::{BTreeSet, HashMap};

use tracing::{debug, trace};

use crate::alias;
use crate::ast::{Comparator, SelectPlan, WhereCondition};
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::store::TableStore;
use crate::table::{ColumnDef, Row, TableSnapshot};
use crate::value::Value;

/// Rows of one or more tables, with every column addressed as `TABLE.COLUMN`.
#[derive(Debug, Clone)]
pub struct JoinTable {
    tables: Vec<String>,
    columns: Vec<ColumnDef>,
    rows: Vec<Row>,
}

/// Outcome of [JoinTable::apply].
#[derive(Debug)]
pub enum JoinStep {
    /// Both sides were already present; rows were narrowed.
    Filtered(JoinTable),
    /// One side was new; its table was joined in.
    Extended(JoinTable),
    /// Neither side is present yet. The table is handed back unchanged.
    NotApplicable(JoinTable),
}

impl JoinStep {
    pub fn into_table(self) -> JoinTable {
        match self {
            JoinStep::Filtered(table) | JoinStep::Extended(table) | JoinStep::NotApplicable(table) => table,
        }
    }
}

impl JoinTable {
    pub fn seed(snapshot: TableSnapshot) -> Self {
        let columns = qualified_columns(&snapshot);
        Self {
            tables: vec![snapshot.name],
            columns,
            rows: snapshot.rows,
        }
    }

    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn contains_table(&self, table: &str) -> bool {
        self.tables.iter().any(|name| name == table)
    }

    /// Position of a column. `TABLE.COLUMN` is matched exactly (ignoring
    /// case); a bare name must be unique across the joined tables.
    pub fn column_index(&self, identifier: &str) -> Result<usize> {
        let identifier = identifier.trim();
        if alias::qualifier(identifier).is_some() {
            return self
                .columns
                .iter()
                .position(|col| col.name.eq_ignore_ascii_case(identifier))
                .ok_or_else(|| Error::ColumnNotFound(identifier.to_string()));
        }

        let mut matches = self.columns.iter().enumerate().filter(|(_, col)| {
            col.name
                .rsplit_once('.')
                .is_some_and(|(_, name)| name.eq_ignore_ascii_case(identifier))
        });
        match (matches.next(), matches.next()) {
            (Some((idx, _)), None) => Ok(idx),
            (Some(_), Some(_)) => Err(Error::parse(format!(
                "Column {identifier} is ambiguous, qualify it with a table name"
            ))),
            (None, _) => Err(Error::ColumnNotFound(identifier.to_string())),
        }
    }

    /// Index of the column a condition side refers to, or `None` if that
    /// side's table has not been joined in yet.
    fn locate(&self, identifier: &str) -> Result<Option<usize>> {
        match alias::qualifier(identifier) {
            Some((table, _)) if self.contains_table(table) => self.column_index(identifier).map(Some),
            _ => Ok(None),
        }
    }

    /// Applies one `column = column` condition.
    ///
    /// # Errors
    /// [Error::Unsupported] for any comparator but `=`. A type mismatch
    /// between the two sides is reported as [Error::Join].
    pub fn apply(self, condition: &WhereCondition, store: &TableStore, config: &EngineConfig) -> Result<JoinStep> {
        if condition.comparator != Comparator::Equal {
            return Err(Error::Unsupported(format!(
                "join comparator {} in <{condition}>",
                condition.comparator
            )));
        }

        let left = self.locate(&condition.column)?;
        let right = self.locate(&condition.value)?;
        match (left, right) {
            (Some(left), Some(right)) => self.filter(left, right, condition).map(JoinStep::Filtered),
            (Some(known), None) => self
                .extend(known, &condition.value, condition, store, config)
                .map(JoinStep::Extended),
            (None, Some(known)) => self
                .extend(known, &condition.column, condition, store, config)
                .map(JoinStep::Extended),
            (None, None) => Ok(JoinStep::NotApplicable(self)),
        }
    }

    /// Whether `condition` would join a new table into this one.
    fn extends_with(&self, condition: &WhereCondition) -> Result<bool> {
        Ok(self.locate(&condition.column)?.is_some() != self.locate(&condition.value)?.is_some())
    }

    fn filter(self, left: usize, right: usize, condition: &WhereCondition) -> Result<Self> {
        let mut rows = Vec::with_capacity(self.rows.len());
        for row in self.rows {
            if row[left].compare_equals(&row[right]).map_err(|e| join_error(condition, e))? {
                rows.push(row);
            }
        }
        trace!(%condition, rows = rows.len(), "filtered join rows");
        Ok(Self { rows, ..self })
    }

    fn extend(
        self,
        known: usize,
        other: &str,
        condition: &WhereCondition,
        store: &TableStore,
        config: &EngineConfig,
    ) -> Result<Self> {
        let (table_name, column_name) =
            alias::qualifier(other).ok_or_else(|| Error::ColumnNotFound(other.to_string()))?;
        let snapshot = store.get_table(table_name)?;
        let join_column = snapshot
            .column_index(column_name)
            .ok_or_else(|| Error::ColumnNotFound(other.to_string()))?;

        let rows = if snapshot.rows.len() >= config.hash_join_min_rows {
            hash_join(&self.rows, known, &snapshot, join_column, condition)?
        } else {
            nested_loop_join(&self.rows, known, &snapshot, join_column, condition)?
        };
        debug!(table = %snapshot.name, %condition, rows = rows.len(), "joined table");

        let mut columns = self.columns;
        columns.extend(qualified_columns(&snapshot));
        let mut tables = self.tables;
        tables.push(snapshot.name);
        Ok(Self { tables, columns, rows })
    }
}

fn qualified_columns(snapshot: &TableSnapshot) -> Vec<ColumnDef> {
    snapshot
        .columns
        .iter()
        .map(|col| ColumnDef {
            name: format!("{}.{}", snapshot.name, col.name),
            ..col.clone()
        })
        .collect()
}

fn join_error(condition: &WhereCondition, source: Error) -> Error {
    Error::Join {
        clause: condition.to_string(),
        source: Box::new(source),
    }
}

fn concat(left: &Row, right: &Row) -> Row {
    let mut row = Vec::with_capacity(left.len() + right.len());
    row.extend_from_slice(left);
    row.extend_from_slice(right);
    row
}

fn nested_loop_join(
    rows: &[Row],
    known: usize,
    snapshot: &TableSnapshot,
    join_column: usize,
    condition: &WhereCondition,
) -> Result<Vec<Row>> {
    let mut joined = Vec::new();
    for row in rows {
        for other in &snapshot.rows {
            if row[known]
                .compare_equals(&other[join_column])
                .map_err(|e| join_error(condition, e))?
            {
                joined.push(concat(row, other));
            }
        }
    }
    Ok(joined)
}

/// Same rows, same order as [nested_loop_join], with one pass over each side.
fn hash_join(
    rows: &[Row],
    known: usize,
    snapshot: &TableSnapshot,
    join_column: usize,
    condition: &WhereCondition,
) -> Result<Vec<Row>> {
    trace!(table = %snapshot.name, rows = snapshot.rows.len(), "building hash index");
    let mut index: HashMap<&Value, Vec<usize>> = HashMap::new();
    for (idx, other) in snapshot.rows.iter().enumerate() {
        if !other[join_column].is_null() {
            index.entry(&other[join_column]).or_default().push(idx);
        }
    }

    let column_type = snapshot.columns[join_column].data_type;
    let sample = snapshot.rows.iter().map(|other| &other[join_column]).find(|v| !v.is_null());

    let mut joined = Vec::new();
    for row in rows {
        let key = &row[known];
        if let (Some(key_type), Some(sample)) = (key.data_type(), sample) {
            if key_type != column_type {
                key.compare_equals(sample).map_err(|e| join_error(condition, e))?;
            }
        }
        if let Some(matches) = index.get(key) {
            joined.extend(matches.iter().map(|&idx| concat(row, &snapshot.rows[idx])));
        }
    }
    Ok(joined)
}

/// A multi-table row set together with how the WHERE conditions were used.
#[derive(Debug)]
pub struct JoinedRows {
    pub table: JoinTable,
    /// Conditions that joined a table in; one fewer than the number of tables.
    pub join_keys: Vec<WhereCondition>,
    /// Cross-table equalities applied as filters after all tables were joined.
    pub join_filters: Vec<WhereCondition>,
    /// Everything else, left for the row filter.
    pub remaining: Vec<WhereCondition>,
}

/// `TABLE.col` on both sides, naming two different tables of the plan.
fn is_cross_table(condition: &WhereCondition, tables: &[String]) -> bool {
    let side = |identifier: &str| {
        alias::qualifier(identifier)
            .filter(|(table, column)| {
                *column != "*" && !column.eq_ignore_ascii_case(alias::NEXTVAL) && tables.iter().any(|t| t.as_str() == *table)
            })
            .map(|(table, _)| table.to_string())
    };
    matches!((side(&condition.column), side(&condition.value)), (Some(l), Some(r)) if l != r)
}

/// Joins every table of `plan` together.
///
/// Starting from the first table, the first condition that reaches a table
/// not joined yet is applied, until all tables are in. A table no condition
/// reaches is rejected rather than cross-joined.
pub fn build_join(store: &TableStore, plan: &SelectPlan, config: &EngineConfig) -> Result<JoinedRows> {
    let first = plan
        .tables
        .first()
        .ok_or_else(|| Error::parse("No table defined in select statement"))?;
    let wanted: BTreeSet<&str> = plan.tables.iter().map(String::as_str).collect();

    let mut pending = Vec::new();
    let mut remaining = Vec::new();
    for condition in &plan.where_conditions {
        if !is_cross_table(condition, &plan.tables) {
            remaining.push(condition.clone());
        } else if condition.comparator != Comparator::Equal {
            return Err(Error::Unsupported(format!(
                "join comparator {} in <{condition}>",
                condition.comparator
            )));
        } else {
            pending.push(condition.clone());
        }
    }

    let mut table = JoinTable::seed(store.get_table(first)?);
    let mut join_keys = Vec::new();
    while table.tables.len() < wanted.len() {
        let mut next = None;
        for (idx, condition) in pending.iter().enumerate() {
            if table.extends_with(condition)? {
                next = Some(idx);
                break;
            }
        }
        let Some(idx) = next else {
            let missing = wanted
                .iter()
                .find(|name| !table.contains_table(name))
                .map_or_else(String::new, |name| name.to_string());
            return Err(Error::UnconnectedTable(missing));
        };

        let condition = pending.remove(idx);
        table = table.apply(&condition, store, config)?.into_table();
        join_keys.push(condition);
    }

    for condition in &pending {
        table = table.apply(condition, store, config)?.into_table();
    }

    debug!(
        tables = table.tables.len(),
        rows = table.rows.len(),
        join_keys = join_keys.len(),
        "built join"
    );
    Ok(JoinedRows {
        table,
        join_keys,
        join_filters: pending,
        remaining,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_type::DataType;
    use crate::table::Schema;

    fn store() -> TableStore {
        let store = TableStore::new();
        store
            .create_table(
                "T1",
                Schema::new(vec![
                    ColumnDef::new("ID", DataType::Int),
                    ColumnDef::new("NAME", DataType::Text),
                ]),
            )
            .unwrap();
        store
            .create_table(
                "T2",
                Schema::new(vec![
                    ColumnDef::new("ID", DataType::Int),
                    ColumnDef::new("T1_ID", DataType::Int),
                    ColumnDef::new("PRICE", DataType::Decimal),
                ]),
            )
            .unwrap();
        store
            .create_table("T3", Schema::new(vec![ColumnDef::new("T2_ID", DataType::Int)]))
            .unwrap();

        for (id, name) in [(1, "a"), (2, "b"), (3, "c")] {
            store
                .insert("T1", vec![Value::Int(id), Value::Text(name.into())])
                .unwrap();
        }
        for (id, t1_id) in [(10, 1), (11, 1), (12, 3), (13, 9)] {
            store
                .insert("T2", vec![Value::Int(id), Value::Int(t1_id), Value::Decimal(1.into())])
                .unwrap();
        }
        store.insert("T2", vec![Value::Int(14), Value::Null, Value::Null]).unwrap();
        for t2_id in [12, 10, 12] {
            store.insert("T3", vec![Value::Int(t2_id)]).unwrap();
        }
        store
    }

    fn eq(left: &str, right: &str) -> WhereCondition {
        WhereCondition::new(left, Comparator::Equal, right)
    }

    fn plan(tables: &[&str], where_conditions: Vec<WhereCondition>) -> SelectPlan {
        SelectPlan {
            tables: tables.iter().map(|t| t.to_string()).collect(),
            columns: None,
            where_conditions,
            order_conditions: vec![],
        }
    }

    fn ids(table: &JoinTable, column: &str) -> Vec<Value> {
        let idx = table.column_index(column).unwrap();
        table.rows().iter().map(|row| row[idx].clone()).collect()
    }

    // ─────────────────────────────────────────────
    // apply
    // ─────────────────────────────────────────────

    #[test]
    fn test_seed_qualifies_columns() {
        let store = store();
        let table = JoinTable::seed(store.get_table("T1").unwrap());
        let names: Vec<&str> = table.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["T1.ID", "T1.NAME"]);
        assert_eq!(table.rows().len(), 3);
    }

    #[test]
    fn test_extend_keeps_left_order_then_right_order() {
        let store = store();
        let config = EngineConfig::for_testing();
        let table = JoinTable::seed(store.get_table("T1").unwrap());

        let step = table.apply(&eq("T1.ID", "T2.T1_ID"), &store, &config).unwrap();
        let JoinStep::Extended(table) = step else {
            panic!("Expected an extension");
        };
        assert_eq!(table.columns().len(), 5);
        assert_eq!(table.tables(), &["T1".to_string(), "T2".to_string()]);
        assert_eq!(ids(&table, "T2.ID"), vec![Value::Int(10), Value::Int(11), Value::Int(12)]);
        assert_eq!(ids(&table, "T1.ID"), vec![Value::Int(1), Value::Int(1), Value::Int(3)]);
    }

    #[test]
    fn test_extend_from_the_right_side() {
        let store = store();
        let config = EngineConfig::for_testing();
        let table = JoinTable::seed(store.get_table("T1").unwrap());

        let step = table.apply(&eq("T2.T1_ID", "T1.ID"), &store, &config).unwrap();
        assert!(matches!(step, JoinStep::Extended(_)));
        assert_eq!(step.into_table().rows().len(), 3);
    }

    #[test]
    fn test_filter_when_both_sides_known() {
        let store = store();
        let config = EngineConfig::for_testing();
        let table = JoinTable::seed(store.get_table("T2").unwrap());

        let step = table.apply(&eq("T2.ID", "T2.T1_ID"), &store, &config).unwrap();
        let JoinStep::Filtered(table) = step else {
            panic!("Expected a filter");
        };
        assert!(table.rows().is_empty());
        assert_eq!(table.columns().len(), 3);
    }

    #[test]
    fn test_not_applicable() {
        let store = store();
        let config = EngineConfig::for_testing();
        let table = JoinTable::seed(store.get_table("T1").unwrap());

        let step = table.apply(&eq("T2.ID", "T3.T2_ID"), &store, &config).unwrap();
        assert!(matches!(step, JoinStep::NotApplicable(t) if t.rows().len() == 3));
    }

    #[test]
    fn test_non_equality_is_unsupported() {
        let store = store();
        let table = JoinTable::seed(store.get_table("T1").unwrap());
        let condition = WhereCondition::new("T1.ID", Comparator::Less, "T2.ID");

        let result = table.apply(&condition, &store, &EngineConfig::for_testing());
        assert!(matches!(result, Err(Error::Unsupported(_))));
    }

    #[test]
    fn test_type_mismatch_names_the_clause() {
        let store = store();
        let table = JoinTable::seed(store.get_table("T1").unwrap());

        let err = table
            .apply(&eq("T1.NAME", "T2.PRICE"), &store, &EngineConfig::for_testing())
            .unwrap_err();
        match &err {
            Error::Join { clause, source } => {
                assert_eq!(clause, "T1.NAME = T2.PRICE");
                assert!(matches!(**source, Error::TypeMismatch { .. }));
            }
            other => panic!("Expected a join error, got {other:?}"),
        }
        assert!(err.to_string().ends_with("in join clause: T1.NAME = T2.PRICE"));
    }

    #[test]
    fn test_unknown_join_column() {
        let store = store();
        let table = JoinTable::seed(store.get_table("T1").unwrap());

        let result = table.apply(&eq("T1.ID", "T2.NOPE"), &store, &EngineConfig::for_testing());
        assert_eq!(result.unwrap_err(), Error::ColumnNotFound("T2.NOPE".into()));
    }

    #[test]
    fn test_hash_join_matches_nested_loop() {
        let store = store();
        let condition = eq("T1.ID", "T2.T1_ID");

        let nested = JoinTable::seed(store.get_table("T1").unwrap())
            .apply(&condition, &store, &EngineConfig::for_testing())
            .unwrap()
            .into_table();
        let hashed = JoinTable::seed(store.get_table("T1").unwrap())
            .apply(&condition, &store, &EngineConfig::default().with_hash_join_min_rows(0))
            .unwrap()
            .into_table();

        assert_eq!(nested.rows(), hashed.rows());
    }

    #[test]
    fn test_hash_join_detects_type_mismatch() {
        let store = store();
        let config = EngineConfig::default().with_hash_join_min_rows(0);

        let result = JoinTable::seed(store.get_table("T1").unwrap()).apply(&eq("T1.NAME", "T2.PRICE"), &store, &config);
        assert!(matches!(result, Err(Error::Join { .. })));
    }

    #[test]
    fn test_column_index() {
        let store = store();
        let table = JoinTable::seed(store.get_table("T1").unwrap())
            .apply(&eq("T1.ID", "T2.T1_ID"), &store, &EngineConfig::for_testing())
            .unwrap()
            .into_table();

        assert_eq!(table.column_index("t2.price").unwrap(), 4);
        assert_eq!(table.column_index("NAME").unwrap(), 1);
        assert!(matches!(table.column_index("ID"), Err(Error::Parse(_))));
        assert!(matches!(table.column_index("X"), Err(Error::ColumnNotFound(_))));
    }

    // ─────────────────────────────────────────────
    // build_join
    // ─────────────────────────────────────────────

    #[test]
    fn test_build_join_three_tables() {
        let store = store();
        let plan = plan(
            &["T1", "T2", "T3"],
            vec![
                WhereCondition::new("T1.NAME", Comparator::Equal, "'a'"),
                eq("T3.T2_ID", "T2.ID"),
                eq("T1.ID", "T2.T1_ID"),
            ],
        );

        let joined = build_join(&store, &plan, &EngineConfig::for_testing()).unwrap();
        assert_eq!(joined.join_keys, vec![eq("T1.ID", "T2.T1_ID"), eq("T3.T2_ID", "T2.ID")]);
        assert!(joined.join_filters.is_empty());
        assert_eq!(joined.remaining.len(), 1);
        // T2 rows 10 and 12 each have T3 matches: 12 twice, 10 once
        assert_eq!(
            ids(&joined.table, "T2.ID"),
            vec![Value::Int(10), Value::Int(12), Value::Int(12)]
        );
    }

    #[test]
    fn test_build_join_extra_equality_becomes_filter() {
        let store = store();
        let plan = plan(
            &["T1", "T2"],
            vec![eq("T1.ID", "T2.T1_ID"), eq("T2.ID", "T1.ID")],
        );

        let joined = build_join(&store, &plan, &EngineConfig::for_testing()).unwrap();
        assert_eq!(joined.join_keys.len(), 1);
        assert_eq!(joined.join_filters.len(), 1);
        assert!(joined.table.rows().is_empty());
    }

    #[test]
    fn test_build_join_rejects_unconnected_table() {
        let store = store();
        let plan = plan(&["T1", "T2", "T3"], vec![eq("T1.ID", "T2.T1_ID")]);

        let result = build_join(&store, &plan, &EngineConfig::for_testing());
        assert_eq!(result.unwrap_err(), Error::UnconnectedTable("T3".into()));
    }

    #[test]
    fn test_build_join_rejects_non_equality_between_tables() {
        let store = store();
        let plan = plan(
            &["T1", "T2"],
            vec![WhereCondition::new("T1.ID", Comparator::Greater, "T2.ID")],
        );

        let result = build_join(&store, &plan, &EngineConfig::for_testing());
        assert!(matches!(result, Err(Error::Unsupported(_))));
    }

    #[test]
    fn test_build_join_empty_result() {
        let store = store();
        store
            .create_table("EMPTY", Schema::new(vec![ColumnDef::new("ID", DataType::Int)]))
            .unwrap();
        let plan = plan(&["T1", "EMPTY"], vec![eq("T1.ID", "EMPTY.ID")]);

        let joined = build_join(&store, &plan, &EngineConfig::for_testing()).unwrap();
        assert!(joined.table.rows().is_empty());
        assert_eq!(joined.table.columns().len(), 3);
    }
}
