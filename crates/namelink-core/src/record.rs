//! Records, datasets and join keys

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single cell value as loaded from a dataset
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
    Text(String),
    #[default]
    Missing,
}

impl FieldValue {
    /// Build a text value
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    /// True for `Missing`
    pub fn is_missing(&self) -> bool {
        matches!(self, FieldValue::Missing)
    }

    /// Render the value as text; `Missing` renders as the empty string
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            FieldValue::Text(s) => Cow::Borrowed(s),
            FieldValue::Integer(i) => Cow::Owned(i.to_string()),
            FieldValue::Float(f) => Cow::Owned(f.to_string()),
            FieldValue::Missing => Cow::Borrowed(""),
        }
    }

    /// Interpret the value as a whole number
    ///
    /// Floats are truncated toward zero; text is trimmed and parsed in base 10.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            FieldValue::Float(f) if f.is_finite() => Some(f.trunc() as i64),
            FieldValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Exact agreement between two values
    ///
    /// Text compares case-sensitively, numbers compare numerically, text never
    /// equals a number. `Missing` compares as the empty string.
    pub fn matches(&self, other: &FieldValue) -> bool {
        use FieldValue::*;

        match (self, other) {
            (Integer(a), Integer(b)) => a == b,
            (Integer(a), Float(b)) | (Float(b), Integer(a)) => (*a as f64) == *b,
            (Float(a), Float(b)) => a == b,
            (Text(a), Text(b)) => a == b,
            (Text(s), Missing) | (Missing, Text(s)) => s.is_empty(),
            (Missing, Missing) => true,
            _ => false,
        }
    }

    /// Key used for the equi-join
    ///
    /// `Missing` never joins, not even with another `Missing`: two rows whose
    /// keys are both blank are not paired, unlike a join that first fills
    /// blanks with the empty string.
    pub fn join_key(&self) -> Option<JoinKey> {
        match self {
            FieldValue::Integer(i) => Some(JoinKey::Integer(*i)),
            FieldValue::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                Some(JoinKey::Integer(*f as i64))
            }
            FieldValue::Float(f) => Some(JoinKey::Float(f.to_bits())),
            FieldValue::Text(s) => Some(JoinKey::Text(s.clone())),
            FieldValue::Missing => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Integer(i)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

/// Value of the join field, hashable for the equi-join
///
/// Integral floats are folded into `Integer` so `101` and `101.0` join.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JoinKey {
    Integer(i64),
    Float(u64),
    Text(String),
}

/// One row of a dataset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: HashMap<String, FieldValue>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any previous value
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Builder-style `insert`
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Get a field; absent fields read as `Missing`
    pub fn get(&self, name: &str) -> &FieldValue {
        static MISSING: FieldValue = FieldValue::Missing;
        self.fields.get(name).unwrap_or(&MISSING)
    }

    /// Number of fields set
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}

/// An ordered column header with the records that follow it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    /// Column names in file order
    pub columns: Vec<String>,

    /// Rows
    pub records: Vec<Record>,
}

impl Dataset {
    /// Create a dataset with the given header and no rows
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            records: Vec::new(),
        }
    }

    /// Create a dataset from a header and rows
    pub fn with_records(columns: Vec<String>, records: Vec<Record>) -> Self {
        Self { columns, records }
    }

    /// Append a row
    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Whether the header has the named column
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Required columns absent from the header, in the order given
    pub fn missing_columns<'a>(&self, required: &'a [String]) -> Vec<&'a str> {
        required
            .iter()
            .filter(|name| !self.has_column(name))
            .map(|name| name.as_str())
            .collect()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_integer() {
        assert_eq!(FieldValue::Integer(30).as_integer(), Some(30));
        assert_eq!(FieldValue::Float(30.7).as_integer(), Some(30));
        assert_eq!(FieldValue::text(" 12 ").as_integer(), Some(12));
        assert_eq!(FieldValue::text("abc").as_integer(), None);
        assert_eq!(FieldValue::text("12.0").as_integer(), None);
        assert_eq!(FieldValue::Float(f64::NAN).as_integer(), None);
        assert_eq!(FieldValue::Missing.as_integer(), None);
    }

    #[test]
    fn test_matches() {
        assert!(FieldValue::text("M").matches(&FieldValue::text("M")));
        assert!(!FieldValue::text("M").matches(&FieldValue::text("m")));
        assert!(FieldValue::Integer(1).matches(&FieldValue::Float(1.0)));
        assert!(!FieldValue::text("1").matches(&FieldValue::Integer(1)));
        assert!(FieldValue::Missing.matches(&FieldValue::text("")));
        assert!(FieldValue::Missing.matches(&FieldValue::Missing));
    }

    #[test]
    fn test_join_key() {
        assert_eq!(
            FieldValue::Float(101.0).join_key(),
            FieldValue::Integer(101).join_key()
        );
        assert_ne!(
            FieldValue::text("101").join_key(),
            FieldValue::Integer(101).join_key()
        );
        assert!(FieldValue::Missing.join_key().is_none());
    }

    #[test]
    fn test_record_missing_field() {
        let record = Record::new().with("childname", "Ravi");
        assert_eq!(record.get("childname").as_text(), "Ravi");
        assert!(record.get("fathername").is_missing());
    }

    #[test]
    fn test_missing_columns() {
        let dataset = Dataset::new(vec!["Village_Code".to_string(), "age".to_string()]);
        let required = vec![
            "Village_Code".to_string(),
            "childname".to_string(),
            "age".to_string(),
            "gender".to_string(),
        ];
        assert_eq!(dataset.missing_columns(&required), vec!["childname", "gender"]);
    }
}
