//! Rewriting of alias-qualified identifiers into `TABLE.column` form.
//!
//! After [resolve] no alias survives: a qualified identifier either starts
//! with an upper-cased table name from the FROM list or is rejected by
//! [check_known].

use crate::ast::TableId;
use crate::error::{Error, Result};

/// Suffix of the sequence pseudo-column (`MY_SEQ.NEXTVAL`).
pub const NEXTVAL: &str = "NEXTVAL";

/// Splits `qualifier.column` (or `qualifier.*`). Anything else, such as a
/// decimal literal, a quoted string or a function call, is not qualified.
pub fn qualifier(identifier: &str) -> Option<(&str, &str)> {
    let (qualifier, column) = identifier.trim().split_once('.')?;
    (is_identifier(qualifier) && (column == "*" || is_identifier(column)))
        .then_some((qualifier, column))
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|first| first.is_alphabetic() || first == '_')
        && chars.all(|ch| ch.is_alphanumeric() || matches!(ch, '_' | '$' | '#'))
}

fn alias_matches(alias: &str, qualifier: &str) -> bool {
    qualifier == alias || qualifier == alias.to_uppercase() || qualifier == alias.to_lowercase()
}

/// Rewrites a leading alias (or a table name in any case) to the upper-cased
/// table name. The first table whose alias matches wins, in FROM order.
/// Identifiers that are not qualified, or whose qualifier is unknown, are
/// returned unchanged.
pub fn resolve(identifier: &str, tables: &[TableId]) -> String {
    let Some((qualifier, column)) = qualifier(identifier) else {
        return identifier.to_string();
    };

    let by_alias = tables.iter().find(|table| {
        table
            .alias
            .as_deref()
            .is_some_and(|alias| alias_matches(alias, qualifier))
    });
    let table = by_alias.or_else(|| {
        tables
            .iter()
            .find(|table| table.table_name.eq_ignore_ascii_case(qualifier))
    });

    match table {
        Some(table) => format!("{}.{column}", table.table_name),
        None => identifier.to_string(),
    }
}

/// Removes the qualifier of a selected column in a single-table statement.
/// `m.*` becomes `*`. Sequence pseudo-columns keep their qualifier.
///
/// # Errors
/// [Error::NotParseable] if the qualifier names neither the table nor its alias.
pub fn strip_qualifier(column: &str, table: &TableId) -> Result<String> {
    let Some((qualifier, name)) = qualifier(column) else {
        return Ok(column.to_string());
    };

    let is_alias = table
        .alias
        .as_deref()
        .is_some_and(|alias| alias.eq_ignore_ascii_case(qualifier));
    if is_alias || table.table_name.eq_ignore_ascii_case(qualifier) {
        Ok(name.to_string())
    } else if name.eq_ignore_ascii_case(NEXTVAL) {
        Ok(column.trim().to_string())
    } else {
        Err(Error::NotParseable(column.to_string()))
    }
}

/// Rejects a qualified identifier whose qualifier is not one of `table_names`.
/// Quoted literals and sequence pseudo-columns are exempt.
pub fn check_known(identifier: &str, table_names: &[String]) -> Result<()> {
    if identifier.contains('\'') {
        return Ok(());
    }
    let Some((qualifier, column)) = qualifier(identifier) else {
        return Ok(());
    };
    if column.eq_ignore_ascii_case(NEXTVAL) || table_names.iter().any(|name| name == qualifier) {
        return Ok(());
    }
    Err(Error::UnknownColumnId(identifier.trim().to_string()))
}
