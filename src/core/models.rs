use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// One ISS row; values keep the JSON types the server sent.
pub type Row = Vec<Value>;

static NULL: Value = Value::Null;

/* ----- TABLE (the result shape of every endpoint) ----- */

/// A tabular ISS result: an ordered column schema and the rows of every page of one fetch.
///
/// The schema is the one reported by the last non-empty page of the fetch. Rows are
/// positional, so `rows[i][j]` belongs to `columns[j]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Iterates the values of one column. Short rows yield `Value::Null`.
    pub fn column<'a>(&'a self, name: &str) -> Option<impl Iterator<Item = &'a Value> + 'a> {
        let idx = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .map(move |r| r.get(idx).unwrap_or(&NULL)),
        )
    }

    /// A single cell addressed by row position and column name.
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)
    }
}

fn cell_text(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Plain-text grid: a header line, a rule and one line per row.
impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.chars().count()).collect();
        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|r| r.iter().map(cell_text).collect())
            .collect();
        for row in &cells {
            for (i, c) in row.iter().enumerate() {
                let w = c.chars().count();
                match widths.get_mut(i) {
                    Some(cur) => *cur = (*cur).max(w),
                    None => widths.push(w),
                }
            }
        }

        let line = |f: &mut fmt::Formatter<'_>, vals: &[String]| -> fmt::Result {
            let mut first = true;
            for (i, &w) in widths.iter().enumerate() {
                if !first {
                    f.write_str("  ")?;
                }
                first = false;
                let v = vals.get(i).map(String::as_str).unwrap_or("");
                write!(f, "{v:<w$}")?;
            }
            writeln!(f)
        };

        line(f, &self.columns)?;
        let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
        line(f, &rule)?;
        for row in &cells {
            line(f, row)?;
        }
        Ok(())
    }
}

/* ----- SESSION (MOEX Passport) ----- */

/// A MOEX Passport session granted by a successful login.
///
/// A session is replaced wholesale on every re-login; it is never edited in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
    expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub(crate) fn new(token: String, expires_at: Option<DateTime<Utc>>) -> Self {
        Self { token, expires_at }
    }

    /// The raw `_passport_session` cookie value.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Expiry as announced by the server. `None` means the cookie lives for the process.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|t| t <= now)
    }
}

/// The three states a client's session can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Absent,
    Valid,
    Expired,
}
