//! Scanning helpers for literal text as it appears in WHERE values, ON
//! clauses and function arguments.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::{Error, Result};

/// Prefix of the internal serialisation form of an already converted date.
pub const DATE_IN_MILLIS: &str = "DATE_IN_MILLIS:";

const NOW_KEYWORDS: [&str; 3] = ["SYSDATE", "CURRENT_TIMESTAMP", "GETDATE"];
const TO_DATE: &str = "TO_DATE";

const ODBC_DATE_FORMAT: &str = "%Y-%m-%d";
const ODBC_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Returns true for the untyped `NULL` literal.
pub fn is_null_literal(text: &str) -> bool {
    text.trim().eq_ignore_ascii_case("NULL")
}

/// Returns true if the text is enclosed in single quotes.
pub fn is_quoted(text: &str) -> bool {
    let text = text.trim();
    text.len() >= 2 && text.starts_with('\'') && text.ends_with('\'')
}

/// Removes one pair of surrounding quotes (single or double) and unescapes
/// doubled single quotes. Unquoted text is returned trimmed.
pub fn unquote(text: &str) -> String {
    let text = text.trim();
    if is_quoted(text) {
        return text[1..text.len() - 1].replace("''", "'");
    }
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        return text[1..text.len() - 1].to_string();
    }
    text.to_string()
}

/// Removes `prefix` and `suffix` if both are present, trimming the result.
pub fn strip_surrounding<'a>(text: &'a str, prefix: &str, suffix: &str) -> &'a str {
    let text = text.trim();
    text.strip_prefix(prefix)
        .and_then(|rest| rest.strip_suffix(suffix))
        .map(str::trim)
        .unwrap_or(text)
}

/// Splits on `delimiter` where it is neither inside quotes nor nested in
/// parentheses.
pub fn split_top_level(text: &str, delimiter: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut in_quotes = false;
    let mut start = 0;

    for (idx, ch) in text.char_indices() {
        match ch {
            '\'' => in_quotes = !in_quotes,
            '(' if !in_quotes => depth += 1,
            ')' if !in_quotes => depth = depth.saturating_sub(1),
            c if c == delimiter && !in_quotes && depth == 0 => {
                parts.push(text[start..idx].trim());
                start = idx + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(text[start..].trim());
    parts
}

/// Converts the textual forms a DATE column accepts into an instant.
///
/// Recognised forms:
/// - `SYSDATE`, `CURRENT_TIMESTAMP`, `GETDATE` (the current instant)
/// - `{d 'yyyy-MM-dd'}` and `{ts 'yyyy-MM-dd hh:mm:ss'}`
/// - `TO_DATE('value', 'pattern')` with an Oracle style pattern
/// - `DATE_IN_MILLIS:<millis since epoch>`
pub fn parse_date(text: &str) -> Result<NaiveDateTime> {
    let text = text.trim();
    let upper = text.to_ascii_uppercase();
    let bare = upper.strip_suffix("()").unwrap_or(&upper);

    if NOW_KEYWORDS.contains(&bare) {
        return now_in_millis().ok_or_else(|| Error::conversion(text, "DATE"));
    }

    if text.starts_with('{') && text.ends_with('}') {
        return parse_odbc_date(text);
    }

    if upper.starts_with(TO_DATE) {
        return parse_to_date(&text[TO_DATE.len()..]);
    }

    if let Some(millis) = text.strip_prefix(DATE_IN_MILLIS) {
        return millis
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(|instant| instant.naive_utc())
            .ok_or_else(|| Error::conversion(text, "DATE"));
    }

    Err(Error::conversion(text, "DATE"))
}

/// The current instant, truncated to what `DATE_IN_MILLIS:` can represent.
fn now_in_millis() -> Option<NaiveDateTime> {
    DateTime::<Utc>::from_timestamp_millis(Utc::now().timestamp_millis())
        .map(|instant| instant.naive_utc())
}

/// Serialises an instant into the `DATE_IN_MILLIS:` form.
pub fn date_to_millis_literal(date: &NaiveDateTime) -> String {
    format!("{DATE_IN_MILLIS}{}", date.and_utc().timestamp_millis())
}

fn parse_odbc_date(text: &str) -> Result<NaiveDateTime> {
    let inner = strip_surrounding(text, "{", "}");

    let (body, format) = if let Some(rest) = strip_keyword(inner, "ts") {
        (rest, ODBC_TIMESTAMP_FORMAT)
    } else if let Some(rest) = strip_keyword(inner, "d") {
        (rest, ODBC_DATE_FORMAT)
    } else {
        return Err(Error::conversion(text, "DATE"));
    };

    if !is_quoted(body) {
        return Err(Error::conversion(text, "DATE"));
    }
    parse_with_pattern(&unquote(body), format)
        .ok_or_else(|| Error::conversion(text, format!("DATE with pattern {format}")))
}

fn strip_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let head = text.get(..keyword.len())?;
    let rest = &text[keyword.len()..];
    (head.eq_ignore_ascii_case(keyword) && rest.starts_with([' ', '\'']))
        .then(|| rest.trim())
}

fn parse_to_date(arguments: &str) -> Result<NaiveDateTime> {
    let arguments = strip_surrounding(arguments, "(", ")");
    let parts = split_top_level(arguments, ',');
    let [value, pattern] = parts.as_slice() else {
        return Err(Error::conversion(
            format!("TO_DATE({arguments})"),
            "DATE (expected a value and a pattern)",
        ));
    };

    let value = unquote(value);
    let pattern = translate_oracle_pattern(&unquote(pattern));
    parse_with_pattern(&value, &pattern)
        .ok_or_else(|| Error::conversion(value.clone(), format!("DATE with pattern {pattern}")))
}

fn parse_with_pattern(value: &str, pattern: &str) -> Option<NaiveDateTime> {
    if let Ok(date_time) = NaiveDateTime::parse_from_str(value, pattern) {
        return Some(date_time);
    }
    NaiveDate::parse_from_str(value, pattern)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Translates an Oracle date pattern (`DD.MM.RR`, `YYYY-MM-DD HH24:MI:SS`)
/// into chrono's strftime syntax.
pub fn translate_oracle_pattern(pattern: &str) -> String {
    // longest tokens first so `YYYY` is not read as two `YY`
    const TOKENS: [(&str, &str); 12] = [
        ("YYYY", "%Y"),
        ("RRRR", "%Y"),
        ("HH24", "%H"),
        ("HH12", "%H"),
        ("MON", "%b"),
        ("YY", "%y"),
        ("RR", "%y"),
        ("MM", "%m"),
        ("DD", "%d"),
        ("HH", "%H"),
        ("MI", "%M"),
        ("SS", "%S"),
    ];

    let upper = pattern.to_ascii_uppercase();
    let mut translated = String::with_capacity(pattern.len() * 2);
    let mut idx = 0;

    'outer: while idx < upper.len() {
        let rest = &upper[idx..];
        for (oracle, chrono) in TOKENS {
            if rest.starts_with(oracle) {
                translated.push_str(chrono);
                idx += oracle.len();
                continue 'outer;
            }
        }
        // copy the original character so literal text keeps its case
        let Some(ch) = pattern[idx..].chars().next() else {
            break;
        };
        if ch == '%' {
            translated.push('%');
        }
        translated.push(ch);
        idx += ch.len_utf8();
    }

    translated
}
