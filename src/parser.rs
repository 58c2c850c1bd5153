use tracing::{debug, trace};

use crate::alias;
use crate::ast::*;
use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::tokenizer::{Spanned, Token, Tokenizer};

/// Words that, in alias position, reveal an outer or cross join.
const UNSUPPORTED_JOIN_WORDS: [&str; 5] = ["LEFT", "RIGHT", "FULL", "OUTER", "CROSS"];

/// Turns one SELECT statement into a [ParsedSelectData].
///
/// Clauses are cut off from the end of the statement: ORDER BY first, then
/// WHERE, then the FROM list. Every identifier in the result is
/// alias-resolved, so later stages only ever see upper-cased table names as
/// qualifiers.
pub struct SelectParser<'a> {
    sql: &'a str,
    tokens: Vec<Spanned>,
}

impl<'a> SelectParser<'a> {
    pub fn new(sql: &'a str) -> Result<Self> {
        let tokens = Tokenizer::new(sql).tokenize()?;
        Ok(Self { sql, tokens })
    }

    pub fn parse(&self) -> Result<ParsedSelectData> {
        let statement = Cursor::new(self.sql, &self.tokens);
        if statement.first() != Some(&Token::Select) {
            return Err(Error::parse(format!(
                "Not a select statement: {}",
                self.sql.trim()
            )));
        }

        if let Some(table) = self.parse_next_id(statement)? {
            debug!(%table, "parsed NextId statement");
            return Ok(ParsedSelectData::NextId(table));
        }

        let mut rest = statement;

        let mut order_conditions = Vec::new();
        if let Some(idx) = rest.find_first(&[Token::Order, Token::By]) {
            let (head, order_part) = rest.split_around(idx, 2);
            order_conditions = parse_order_conditions(order_part)?;
            rest = head;
        }

        let mut where_conditions = Vec::new();
        if let Some(idx) = rest.find_first(&[Token::Where]) {
            let (head, where_part) = rest.split_around(idx, 1);
            if where_part.is_empty() {
                return Err(Error::parse("No condition defined for where!"));
            }
            where_conditions = parse_conditions(where_part)?;
            rest = head;
        }

        // drop SELECT
        let rest = rest.skip(1);
        let from = rest.find_last(&[Token::From]).ok_or_else(|| {
            Error::parse(format!(
                "Missing FROM declaration in select statement: {}",
                self.sql.trim()
            ))
        })?;
        let (column_part, from_part) = rest.split_around(from, 1);

        let mut columns = self.parse_columns(column_part)?;

        if from_part.is_empty() {
            return Err(Error::parse(format!(
                "Missing table name in select statement: {}",
                self.sql.trim()
            )));
        }
        let tables = if from_part.contains_top_level(&Token::Join) {
            parse_ansi_join(from_part, &mut where_conditions)?
        } else {
            parse_table_list(from_part)?
        };
        trace!(?tables, "parsed FROM clause");
        check_from_list(&tables)?;

        if let [table] = tables.as_slice() {
            columns = match columns {
                Some(selected) => strip_single_table(selected, table)?,
                None => None,
            };
        } else if let Some(selected) = columns.as_mut() {
            for column in selected.iter_mut() {
                *column = alias::resolve(column, &tables);
            }
        }
        for condition in &mut where_conditions {
            condition.column = alias::resolve(&condition.column, &tables);
            condition.value = alias::resolve(&condition.value, &tables);
        }
        for condition in &mut order_conditions {
            condition.column = alias::resolve(&condition.column, &tables);
        }

        let table_names: Vec<String> = tables.into_iter().map(|t| t.table_name).collect();
        let plan = SelectPlan {
            tables: table_names,
            columns,
            where_conditions,
            order_conditions,
        };
        check_qualifiers(&plan)?;

        debug!(tables = ?plan.tables, conditions = plan.where_conditions.len(), "parsed select");
        Ok(ParsedSelectData::Query(plan))
    }

    /// `select NextId(<table>)`, with the table name quoted or bare.
    fn parse_next_id(&self, statement: Cursor<'_>) -> Result<Option<String>> {
        let is_next_id = matches!(statement.token(1), Some(Token::Ident(name)) if name.eq_ignore_ascii_case("NEXTID"))
            && statement.token(2) == Some(&Token::LeftParen);
        if !is_next_id {
            return Ok(None);
        }

        match (statement.len(), statement.token(3), statement.token(4)) {
            (
                5,
                Some(Token::QuotedIdent(name) | Token::String(name) | Token::Ident(name)),
                Some(Token::RightParen),
            ) => Ok(Some(name.clone())),
            _ => Err(Error::parse(format!(
                "Invalid NextId statement: {}",
                self.sql.trim()
            ))),
        }
    }

    /// `*` selects every column and is returned as `None`.
    fn parse_columns(&self, columns: Cursor<'_>) -> Result<Option<Vec<String>>> {
        if columns.is_empty() {
            return Err(Error::parse(format!(
                "No columns defined in select statement: {}",
                self.sql.trim()
            )));
        }
        if columns.len() == 1 && columns.first() == Some(&Token::Star) {
            return Ok(None);
        }

        columns
            .split(|token| *token == Token::Comma)
            .into_iter()
            .map(|column| {
                if column.is_empty() {
                    Err(Error::parse(format!(
                        "Empty column in select statement: {}",
                        self.sql.trim()
                    )))
                } else {
                    Ok(column.text().to_string())
                }
            })
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }
}

/// Parses a statement in one call.
pub fn parse_select(sql: &str) -> Result<ParsedSelectData> {
    SelectParser::new(sql)?.parse()
}

fn strip_single_table(selected: Vec<String>, table: &TableId) -> Result<Option<Vec<String>>> {
    let stripped = selected
        .iter()
        .map(|column| alias::strip_qualifier(column, table))
        .collect::<Result<Vec<_>>>()?;
    if stripped.len() == 1 && stripped[0] == "*" {
        return Ok(None);
    }
    Ok(Some(stripped))
}

fn check_qualifiers(plan: &SelectPlan) -> Result<()> {
    let known = &plan.tables;
    for column in plan.columns.iter().flatten() {
        alias::check_known(column, known)?;
    }
    for condition in &plan.where_conditions {
        alias::check_known(&condition.column, known)?;
        alias::check_known(&condition.value, known)?;
    }
    for condition in &plan.order_conditions {
        alias::check_known(&condition.column, known)?;
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// FROM
// ───────────────────────────────────────────────────────────────

fn parse_table_list(from: Cursor<'_>) -> Result<Vec<TableId>> {
    from.split(|token| *token == Token::Comma)
        .into_iter()
        .map(parse_table_id)
        .collect()
}

/// `a [INNER] JOIN b ON (cond) [INNER] JOIN c ON cond ...`. The ON conditions
/// are appended to `where_conditions` in join order.
fn parse_ansi_join(from: Cursor<'_>, where_conditions: &mut Vec<WhereCondition>) -> Result<Vec<TableId>> {
    let segments = from.split(|token| *token == Token::Join);
    let last = segments.len() - 1;
    let mut tables = Vec::with_capacity(segments.len());

    for (idx, mut segment) in segments.into_iter().enumerate() {
        if idx < last && segment.last() == Some(&Token::Inner) {
            segment = segment.slice(0, segment.len() - 1);
        }
        if idx == 0 {
            tables.push(parse_table_id(segment)?);
            continue;
        }

        let on = segment
            .find_first(&[Token::On])
            .ok_or_else(|| Error::parse(format!("Missing ON keyword: {}", from.text())))?;
        let (table_part, on_part) = segment.split_around(on, 1);
        tables.push(parse_table_id(table_part)?);

        let on_part = on_part.strip_parens();
        if on_part.is_empty() {
            return Err(Error::parse(format!("Missing ON condition: {}", segment.text())));
        }
        where_conditions.extend(parse_conditions(on_part)?);
    }
    Ok(tables)
}

/// A table may appear only once in FROM, and an alias may not name another
/// FROM table: either would make qualifiers resolve to the wrong table.
fn check_from_list(tables: &[TableId]) -> Result<()> {
    for (idx, table) in tables.iter().enumerate() {
        if tables[..idx].iter().any(|t| t.table_name == table.table_name) {
            return Err(Error::Unsupported(format!(
                "self joins: table {} appears twice in FROM",
                table.table_name
            )));
        }
        let Some(alias) = table.alias.as_deref() else {
            continue;
        };
        if let Some(other) = tables
            .iter()
            .find(|t| t.table_name != table.table_name && t.table_name.eq_ignore_ascii_case(alias))
        {
            return Err(Error::parse(format!(
                "Alias {alias} of table {} clashes with table {}",
                table.table_name, other.table_name
            )));
        }
    }
    Ok(())
}

/// `name`, `name alias` or `name AS alias`.
fn parse_table_id(table: Cursor<'_>) -> Result<TableId> {
    let words: Vec<&str> = table
        .tokens()
        .map(|token| match token {
            Token::Ident(word) | Token::QuotedIdent(word) => Some(word.as_str()),
            Token::As => Some("AS"),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| Error::parse(format!("Invalid table declaration: {}", table.text())))?;

    if let Some(word) = words
        .iter()
        .skip(1)
        .find(|word| UNSUPPORTED_JOIN_WORDS.iter().any(|w| w.eq_ignore_ascii_case(word)))
    {
        return Err(Error::Unsupported(format!("{} joins", word.to_uppercase())));
    }

    let is_as = |idx: usize| table.token(idx) == Some(&Token::As);
    match words.as_slice() {
        [name] if !is_as(0) => Ok(TableId::new(name, None)),
        [name, alias] if !is_as(0) && !is_as(1) => Ok(TableId::new(name, Some(*alias))),
        [name, _, alias] if !is_as(0) && is_as(1) && !is_as(2) => Ok(TableId::new(name, Some(*alias))),
        [] => Err(Error::parse("Missing table name in FROM clause")),
        _ => Err(Error::parse(format!("Invalid table declaration: {}", table.text()))),
    }
}

// ───────────────────────────────────────────────────────────────
// WHERE / ON / ORDER BY
// ───────────────────────────────────────────────────────────────

fn parse_conditions(conditions: Cursor<'_>) -> Result<Vec<WhereCondition>> {
    if conditions.contains_top_level(&Token::Or) {
        return Err(Error::Unsupported(format!("OR in conditions: {}", conditions.text())));
    }
    let nested = conditions
        .split(|token| *token == Token::And)
        .into_iter()
        .map(parse_condition)
        .collect::<Result<Vec<_>>>()?;
    Ok(nested.into_iter().flatten().collect())
}

/// One predicate, or a parenthesised AND group of them.
fn parse_condition(condition: Cursor<'_>) -> Result<Vec<WhereCondition>> {
    let condition = condition.strip_parens();
    if condition.contains_top_level(&Token::And) || condition.contains_top_level(&Token::Or) {
        return parse_conditions(condition);
    }
    let invalid = || Error::parse(format!("Invalid condition: <{}>", condition.text()));

    let idx = condition
        .position(|token| {
            matches!(
                token,
                Token::Equal
                    | Token::NotEqual
                    | Token::Lower
                    | Token::LowerEqual
                    | Token::Greater
                    | Token::GreaterEqual
                    | Token::Is
            )
        })
        .ok_or_else(invalid)?;

    let (comparator, width) = match condition.token(idx) {
        Some(Token::Equal) => (Comparator::Equal, 1),
        Some(Token::NotEqual) => (Comparator::NotEqual, 1),
        Some(Token::Lower) => (Comparator::Less, 1),
        Some(Token::LowerEqual) => (Comparator::LessOrEqual, 1),
        Some(Token::Greater) => (Comparator::Greater, 1),
        Some(Token::GreaterEqual) => (Comparator::GreaterOrEqual, 1),
        Some(Token::Is) if condition.token(idx + 1) == Some(&Token::Not) => (Comparator::IsNot, 2),
        _ => (Comparator::Is, 1),
    };

    let (column, value) = condition.split_around(idx, width);
    if column.is_empty() || value.is_empty() {
        return Err(invalid());
    }
    Ok(vec![WhereCondition::new(column.text(), comparator, value.text())])
}

fn parse_order_conditions(order: Cursor<'_>) -> Result<Vec<OrderCondition>> {
    let no_column = || Error::parse("No column defined for order by!");
    if order.is_empty() {
        return Err(no_column());
    }

    order
        .split(|token| *token == Token::Comma)
        .into_iter()
        .map(|item| {
            let (column, direction) = match item.last() {
                Some(Token::Asc) => (item.slice(0, item.len() - 1), SortDirection::Asc),
                Some(Token::Desc) => (item.slice(0, item.len() - 1), SortDirection::Desc),
                _ => (item, SortDirection::default()),
            };
            if column.is_empty() {
                return Err(no_column());
            }
            Ok(OrderCondition {
                column: column.text().to_string(),
                direction,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(sql: &str) -> SelectPlan {
        match parse_select(sql).unwrap() {
            ParsedSelectData::Query(plan) => plan,
            other => panic!("Expected a query, got {other:?}"),
        }
    }

    fn error(sql: &str) -> String {
        parse_select(sql).unwrap_err().to_string()
    }

    // ─────────────────────────────────────────────
    // Columns and tables
    // ─────────────────────────────────────────────

    #[test]
    fn test_parse_all_columns() {
        let plan = plan("select * from TEST_TABLE_NAME");
        assert_eq!(plan.tables, vec!["TEST_TABLE_NAME"]);
        assert_eq!(plan.columns, None);
        assert!(plan.where_conditions.is_empty());
    }

    #[test]
    fn test_parse_column_named_like_keyword() {
        let plan = plan("select Name, From from TEST_TABLE_NAME");
        assert_eq!(plan.columns, Some(vec!["Name".into(), "From".into()]));
        assert!(plan.where_conditions.is_empty());
    }

    #[test]
    fn test_table_name_in_front_of_columns() {
        let plan = plan("select TEST_TABLE_NAME.ID, TEST_TABLE_NAME.TYPE from TEST_TABLE_NAME");
        assert_eq!(plan.tables, vec!["TEST_TABLE_NAME"]);
        assert_eq!(plan.columns, Some(vec!["ID".into(), "TYPE".into()]));
    }

    #[test]
    fn test_table_alias_with_and_without_as() {
        for sql in [
            "select TT.ID, TT.TYPE, TT.NAME from TEST_TABLE_NAME as TT",
            "select TT.ID, TT.TYPE, TT.NAME from TEST_TABLE_NAME TT",
        ] {
            let plan = plan(sql);
            assert_eq!(plan.tables, vec!["TEST_TABLE_NAME"]);
            assert_eq!(plan.columns, Some(vec!["ID".into(), "TYPE".into(), "NAME".into()]));
        }
    }

    #[test]
    fn test_aliased_star_on_single_table() {
        let plan = plan("select m.* from modell m  where m.name = null");
        assert_eq!(plan.tables, vec!["MODELL"]);
        assert_eq!(plan.columns, None);
        assert_eq!(plan.where_conditions[0].column, "MODELL.name");
        assert_eq!(plan.where_conditions[0].value, "null");
    }

    #[test]
    fn test_unknown_alias_with_star() {
        assert_eq!(
            error("select  n.* from modell m  where m.name = null"),
            "Column information: <n.*> is not parseable!"
        );
    }

    #[test]
    fn test_trailing_semicolon() {
        assert_eq!(plan("select * from t;").tables, vec!["T"]);
    }

    #[test]
    fn test_missing_from() {
        assert_eq!(
            error("select a, b"),
            "Missing FROM declaration in select statement: select a, b"
        );
    }

    #[test]
    fn test_too_many_words_in_table_declaration() {
        assert!(matches!(
            parse_select("select * from a as b c"),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn test_not_a_select() {
        assert!(matches!(parse_select("delete from t"), Err(Error::Parse(_))));
    }

    // ─────────────────────────────────────────────
    // NextId
    // ─────────────────────────────────────────────

    #[test]
    fn test_next_id() {
        let parsed = parse_select("select NextId(\"testmodell\")").unwrap();
        assert_eq!(parsed.next_id_table(), Some("testmodell"));
        assert_eq!(parsed.plan(), None);

        let parsed = parse_select("SELECT nextid('Orders')").unwrap();
        assert_eq!(parsed, ParsedSelectData::NextId("Orders".into()));
    }

    #[test]
    fn test_invalid_next_id() {
        assert!(parse_select("select NextId(a, b)").is_err());
    }

    // ─────────────────────────────────────────────
    // WHERE
    // ─────────────────────────────────────────────

    #[test]
    fn test_where_conditions_keep_literals_as_written() {
        let plan = plan(
            "select Name, From from TEST_TABLE_NAME where Until=to_date('15.05.16','DD.MM.RR') AND ID=123",
        );
        assert_eq!(
            plan.where_conditions,
            vec![
                WhereCondition::new("Until", Comparator::Equal, "to_date('15.05.16','DD.MM.RR')"),
                WhereCondition::new("ID", Comparator::Equal, "123"),
            ]
        );
    }

    #[test]
    fn test_where_comparators() {
        let plan = plan("select * from t where a <> 1 and b != 2 and (c <= 3) and d is not null and e is null");
        let comparators: Vec<Comparator> = plan.where_conditions.iter().map(|c| c.comparator).collect();
        assert_eq!(
            comparators,
            vec![
                Comparator::NotEqual,
                Comparator::NotEqual,
                Comparator::LessOrEqual,
                Comparator::IsNot,
                Comparator::Is,
            ]
        );
        assert_eq!(plan.where_conditions[3].value, "null");
    }

    #[test]
    fn test_empty_where() {
        assert_eq!(error("select * from t where"), "No condition defined for where!");
    }

    #[test]
    fn test_condition_without_comparator() {
        assert!(matches!(
            parse_select("select * from t where a"),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn test_parenthesised_and_group() {
        let plan = plan("select * from t where (NAME = 'a' and ID = 1) and X > 2");
        assert_eq!(
            plan.where_conditions,
            vec![
                WhereCondition::new("NAME", Comparator::Equal, "'a'"),
                WhereCondition::new("ID", Comparator::Equal, "1"),
                WhereCondition::new("X", Comparator::Greater, "2"),
            ]
        );
    }

    #[test]
    fn test_or_inside_parentheses_is_unsupported() {
        assert!(matches!(
            parse_select("select * from t where (a = 1 or b = 2)"),
            Err(Error::Unsupported(_))
        ));
    }

    #[test]
    fn test_or_is_unsupported() {
        assert!(matches!(
            parse_select("select * from t where a = 1 or b = 2"),
            Err(Error::Unsupported(_))
        ));
    }

    // ─────────────────────────────────────────────
    // Joins
    // ─────────────────────────────────────────────

    #[test]
    fn test_non_ansi_join() {
        let plan = plan(
            "select T1.Name, T2.Name, T1.From, T2.Type from TEST_TABLE_NAME_1 as T1, TEST_TABLE_NAME_2 as T2 where T1.ID=T2.ID",
        );
        assert_eq!(plan.tables, vec!["TEST_TABLE_NAME_1", "TEST_TABLE_NAME_2"]);
        assert_eq!(
            plan.columns,
            Some(vec![
                "TEST_TABLE_NAME_1.Name".into(),
                "TEST_TABLE_NAME_2.Name".into(),
                "TEST_TABLE_NAME_1.From".into(),
                "TEST_TABLE_NAME_2.Type".into(),
            ])
        );
        assert_eq!(plan.where_conditions[0].column, "TEST_TABLE_NAME_1.ID");
        assert_eq!(plan.where_conditions[0].value, "TEST_TABLE_NAME_2.ID");
    }

    #[test]
    fn test_non_ansi_join_three_tables() {
        let plan = plan(
            "select T1.Name, T2.Name, T3.From, T2.Type from TEST_TABLE_NAME_1 as T1, TEST_TABLE_NAME_2 as T2, TEST_TABLE_NAME_3 as T3 where T1.ID=T2.ID and T2.ID=T3.ID",
        );
        assert_eq!(plan.tables.len(), 3);
        assert_eq!(plan.where_conditions.len(), 2);
        assert_eq!(plan.where_conditions[0].column, "TEST_TABLE_NAME_1.ID");
    }

    #[test]
    fn test_table_twice_in_from_is_unsupported() {
        assert!(matches!(
            parse_select("select * from T1 a, T1 b where a.ID = b.ID"),
            Err(Error::Unsupported(_))
        ));
        assert!(matches!(
            parse_select("select * from T1 a join t1 b on a.ID = b.ID"),
            Err(Error::Unsupported(_))
        ));
    }

    #[test]
    fn test_alias_naming_another_table() {
        assert_eq!(
            error("select x.ID from T1 as T2, T2 x where T2.ID = x.ID"),
            "Alias T2 of table T1 clashes with table T2"
        );
        // an alias equal to its own table name is harmless
        assert_eq!(plan("select t1.ID from T1 t1, T2 where t1.ID = T2.ID").tables.len(), 2);
    }

    #[test]
    fn test_unknown_alias_in_select_clause() {
        assert_eq!(
            error("select T3.Name, T2.Name, T1.From, T2.Type from TEST_TABLE_NAME_1 as T1, TEST_TABLE_NAME_2 as T2 where T1.ID=T2.ID"),
            "Unknown column id <T3.Name> detected."
        );
    }

    #[test]
    fn test_unknown_alias_in_where_clause() {
        assert_eq!(
            error("select T1.Name, T2.Name, T1.From, T2.Type from TEST_TABLE_NAME_1 as T1, TEST_TABLE_NAME_2 as T2 where T1.ID=T3.ID"),
            "Unknown column id <T3.ID> detected."
        );
    }

    #[test]
    fn test_inner_join() {
        let plan = plan("select * from TEST_TABLE_NAME_1 T1 INNER JOIN TEST_TABLE_NAME_2 T2 on T1.ID=T2.ID");
        assert_eq!(plan.tables, vec!["TEST_TABLE_NAME_1", "TEST_TABLE_NAME_2"]);
        assert_eq!(
            plan.where_conditions,
            vec![WhereCondition::new(
                "TEST_TABLE_NAME_1.ID",
                Comparator::Equal,
                "TEST_TABLE_NAME_2.ID"
            )]
        );
    }

    #[test]
    fn test_missing_on_keyword() {
        assert_eq!(
            error("select * from TEST_TABLE_NAME_1 T1 INNER JOIN TEST_TABLE_NAME_2 T2"),
            "Missing ON keyword: TEST_TABLE_NAME_1 T1 INNER JOIN TEST_TABLE_NAME_2 T2"
        );
    }

    #[test]
    fn test_join_with_where_clause() {
        let plan = plan("select * from TEST_TABLE_NAME_1 T1 JOIN TEST_TABLE_NAME_2 T2 on T1.ID=T2.ID where T1.size > 0");
        assert_eq!(plan.where_conditions.len(), 2);
        // WHERE conditions come before ON conditions
        assert_eq!(plan.where_conditions[0].column, "TEST_TABLE_NAME_1.size");
        assert_eq!(plan.where_conditions[1].value, "TEST_TABLE_NAME_2.ID");
    }

    #[test]
    fn test_join_three_tables() {
        let plan = plan(
            "select * from TEST_TABLE_NAME_1 T1 JOIN TEST_TABLE_NAME_2 T2 on T1.ID=T2.ID JOIN TEST_TABLE_NAME_3 T3 on T3.ID=T2.ID",
        );
        assert_eq!(plan.tables[2], "TEST_TABLE_NAME_3");
        assert_eq!(plan.where_conditions[1].column, "TEST_TABLE_NAME_3.ID");
        assert_eq!(plan.where_conditions[1].value, "TEST_TABLE_NAME_2.ID");
    }

    #[test]
    fn test_join_with_parenthesised_on_and_prefix_aliases() {
        let plan = plan(
            "select a.* from Table1 a join Table2 ta on (a.ID = ta.ID) join Table3 tab on (ta.ID = tab.ID) where tab.name = null and ta.name = null",
        );
        assert_eq!(plan.tables, vec!["TABLE1", "TABLE2", "TABLE3"]);
        assert_eq!(plan.columns, Some(vec!["TABLE1.*".into()]));
        assert_eq!(
            plan.where_conditions,
            vec![
                WhereCondition::new("TABLE3.name", Comparator::Equal, "null"),
                WhereCondition::new("TABLE2.name", Comparator::Equal, "null"),
                WhereCondition::new("TABLE1.ID", Comparator::Equal, "TABLE2.ID"),
                WhereCondition::new("TABLE2.ID", Comparator::Equal, "TABLE3.ID"),
            ]
        );
    }

    #[test]
    fn test_outer_join_is_unsupported() {
        assert!(matches!(
            parse_select("select * from a x LEFT OUTER JOIN b y on x.id = y.id"),
            Err(Error::Unsupported(_))
        ));
    }

    // ─────────────────────────────────────────────
    // ORDER BY
    // ─────────────────────────────────────────────

    #[test]
    fn test_order_by_defaults_to_ascending() {
        let plan = plan("select TEST_TABLE_NAME.ID, TEST_TABLE_NAME.TYPE from TEST_TABLE_NAME order by TEST_TABLE_NAME.ID");
        assert_eq!(plan.columns, Some(vec!["ID".into(), "TYPE".into()]));
        assert_eq!(plan.order_conditions[0].direction, SortDirection::Asc);
    }

    #[test]
    fn test_order_by_mixed_directions() {
        let plan = plan(
            "select TEST_TABLE_NAME.ID, TEST_TABLE_NAME.TYPE from TEST_TABLE_NAME order by TEST_TABLE_NAME.ID ASC, TEST_TABLE_NAME.TYPE desc",
        );
        assert_eq!(
            plan.order_conditions,
            vec![
                OrderCondition {
                    column: "TEST_TABLE_NAME.ID".into(),
                    direction: SortDirection::Asc
                },
                OrderCondition {
                    column: "TEST_TABLE_NAME.TYPE".into(),
                    direction: SortDirection::Desc
                },
            ]
        );
    }

    #[test]
    fn test_order_by_without_column() {
        assert_eq!(
            error("select TEST_TABLE_NAME.ID, TEST_TABLE_NAME.TYPE from TEST_TABLE_NAME order by"),
            "No column defined for order by!"
        );
    }

    #[test]
    fn test_order_by_after_where() {
        let plan = plan("select * from T t where t.a = 'x' order by t.b desc");
        assert_eq!(plan.where_conditions[0].column, "T.a");
        assert_eq!(plan.where_conditions[0].value, "'x'");
        assert_eq!(plan.order_conditions[0].column, "T.b");
    }
}
