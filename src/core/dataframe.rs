use polars::prelude::*;
use serde_json::Value;

use crate::core::Table;

static NULL: Value = Value::Null;

/// Trait for converting ISS results into Polars DataFrames.
pub trait ToDataFrame {
    /// Converts the object into a Polars DataFrame.
    fn to_dataframe(&self) -> PolarsResult<DataFrame>;
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Kind {
    Int,
    Float,
    Bool,
    Text,
}

/// Narrowest column type that holds every non-null value.
fn infer(values: &[&Value]) -> Kind {
    let mut kind: Option<Kind> = None;
    for v in values {
        let k = match v {
            Value::Null => continue,
            Value::Bool(_) => Kind::Bool,
            Value::Number(n) if n.is_i64() => Kind::Int,
            Value::Number(_) => Kind::Float,
            _ => Kind::Text,
        };
        kind = Some(match (kind, k) {
            (None, k) => k,
            (Some(a), b) if a == b => a,
            (Some(Kind::Int), Kind::Float) | (Some(Kind::Float), Kind::Int) => Kind::Float,
            _ => Kind::Text,
        });
    }
    kind.unwrap_or(Kind::Text)
}

fn text(v: &Value) -> Option<String> {
    match v {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

impl ToDataFrame for Table {
    fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let mut columns: Vec<Column> = Vec::with_capacity(self.columns.len());
        for (idx, name) in self.columns.iter().enumerate() {
            let values: Vec<&Value> = self
                .rows
                .iter()
                .map(|r| r.get(idx).unwrap_or(&NULL))
                .collect();
            let name = PlSmallStr::from(name.as_str());
            let col = match infer(&values) {
                Kind::Int => {
                    let v: Vec<Option<i64>> = values.iter().map(|x| x.as_i64()).collect();
                    Column::new(name, v)
                }
                Kind::Float => {
                    let v: Vec<Option<f64>> = values.iter().map(|x| x.as_f64()).collect();
                    Column::new(name, v)
                }
                Kind::Bool => {
                    let v: Vec<Option<bool>> = values.iter().map(|x| x.as_bool()).collect();
                    Column::new(name, v)
                }
                Kind::Text => {
                    let v: Vec<Option<String>> = values.iter().map(|x| text(x)).collect();
                    Column::new(name, v)
                }
            };
            columns.push(col);
        }
        DataFrame::new(columns)
    }
}
