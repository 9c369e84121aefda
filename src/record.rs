use std::cmp::Ordering;

use chrono::NaiveDate;

/// A single typed field value. The dashboard's business records are
/// schema-less; every field is one of these variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Num(f64),
    Bool(bool),
    Date(NaiveDate),
    List(Vec<String>),
}

impl Value {
    /// String representation used for rendering, searching and filtering.
    pub fn display(&self) -> String {
        match self {
            Value::Str(s) => s.clone(),
            Value::Num(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{n}")
                }
            }
            Value::Bool(b) => b.to_string(),
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
            Value::List(items) => items.join(", "),
        }
    }

    /// Lower-cased form used by the case-insensitive search and filter stages.
    pub fn folded(&self) -> String {
        self.display().to_lowercase()
    }

    pub fn as_num(&self) -> Option<f64> {
        match self {
            Value::Num(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Num(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Num(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<Vec<&str>> for Value {
    fn from(items: Vec<&str>) -> Self {
        Value::List(items.into_iter().map(|s| s.to_string()).collect())
    }
}

/// Compare two optional field values for sorting.
///
/// Same-type values use their natural ordering (numeric, lexicographic,
/// chronological). Mixed types fall back to comparing the lower-cased
/// string forms. Missing values order after all present ones, independent
/// of the sort direction, so the sort stays total and stable.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => compare_present(a, b),
    }
}

fn compare_present(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Num(x), Value::Num(y)) => x.total_cmp(y),
        (Value::Str(x), Value::Str(y)) => x.cmp(y),
        (Value::Date(x), Value::Date(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::List(x), Value::List(y)) => x.cmp(y),
        _ => a.folded().cmp(&b.folded()),
    }
}

/// One row of business data: an ordered, field-keyed container.
///
/// Field order is preserved for the record detail view; lookup is by key.
/// A record may carry fields that no column displays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Record { fields: Vec::new() }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.push((key.to_string(), value.into()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// True if any field's string representation contains `needle`
    /// (case-insensitive). Empty needles match everything.
    pub fn matches_search(&self, needle_folded: &str) -> bool {
        if needle_folded.is_empty() {
            return true;
        }
        self.fields
            .iter()
            .any(|(_, v)| v.folded().contains(needle_folded))
    }
}

/// Declarative description of one displayed table column.
///
/// A renderer is a pure function from the cell value and the whole record
/// to a display string; without one the value's plain representation is
/// shown.
#[derive(Clone)]
pub struct ColumnSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub sortable: bool,
    pub render: Option<fn(&Value, &Record) -> String>,
}

impl ColumnSpec {
    pub fn new(key: &'static str, label: &'static str, sortable: bool) -> Self {
        ColumnSpec {
            key,
            label,
            sortable,
            render: None,
        }
    }

    pub fn with_render(mut self, render: fn(&Value, &Record) -> String) -> Self {
        self.render = Some(render);
        self
    }

    /// Cell text for `record` under this column. Missing fields render
    /// as the empty-value marker.
    pub fn cell(&self, record: &Record) -> String {
        match record.get(self.key) {
            Some(value) => match self.render {
                Some(render) => render(value, record),
                None => value.display(),
            },
            None => "∅".to_string(),
        }
    }
}
