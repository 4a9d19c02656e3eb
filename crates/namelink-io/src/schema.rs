//! Column types and type inference for delimited text

use namelink_core::FieldValue;
use serde::{Deserialize, Serialize};

/// Inferred type of a whole column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Int64,
    Float64,
    String,
}

impl ColumnType {
    /// Convert one cell; empty cells are `Missing`
    pub fn parse(&self, raw: &str) -> FieldValue {
        if raw.is_empty() {
            return FieldValue::Missing;
        }

        match self {
            ColumnType::Int64 => raw
                .trim()
                .parse()
                .map(FieldValue::Integer)
                .unwrap_or_else(|_| FieldValue::text(raw)),
            ColumnType::Float64 => raw
                .trim()
                .parse()
                .map(FieldValue::Float)
                .unwrap_or_else(|_| FieldValue::text(raw)),
            ColumnType::String => FieldValue::text(raw),
        }
    }
}

/// Name and inferred type of one column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub dtype: ColumnType,
    /// Whether any cell in the column was empty
    pub nullable: bool,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, dtype: ColumnType) -> Self {
        Self {
            name: name.into(),
            dtype,
            nullable: false,
        }
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }
}

/// Infer a column type from every cell of the column
///
/// Empty cells are ignored. A column with no non-empty cells is text.
pub fn infer_column_type<'a>(values: impl IntoIterator<Item = &'a str>) -> ColumnType {
    let mut seen = false;
    let mut all_int = true;
    let mut all_float = true;

    for value in values.into_iter().map(str::trim).filter(|v| !v.is_empty()) {
        seen = true;
        if all_int && value.parse::<i64>().is_err() {
            all_int = false;
        }
        if value.parse::<f64>().is_err() {
            all_float = false;
            break;
        }
    }

    match (seen, all_int, all_float) {
        (false, _, _) => ColumnType::String,
        (true, true, _) => ColumnType::Int64,
        (true, false, true) => ColumnType::Float64,
        _ => ColumnType::String,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&["1", "2", "3"], ColumnType::Int64)]
    #[case(&["1", "", "3"], ColumnType::Int64)]
    #[case(&["1.5", "2", "3.25"], ColumnType::Float64)]
    #[case(&["101", "10A"], ColumnType::String)]
    #[case(&["", ""], ColumnType::String)]
    #[case(&[], ColumnType::String)]
    fn test_infer_column_type(#[case] values: &[&str], #[case] expected: ColumnType) {
        assert_eq!(infer_column_type(values.iter().copied()), expected);
    }

    #[test]
    fn test_parse_cells() {
        assert_eq!(ColumnType::Int64.parse("42"), FieldValue::Integer(42));
        assert_eq!(ColumnType::Float64.parse("7.0"), FieldValue::Float(7.0));
        assert_eq!(ColumnType::String.parse("007"), FieldValue::text("007"));
        assert_eq!(ColumnType::Int64.parse(""), FieldValue::Missing);
        assert_eq!(ColumnType::String.parse(""), FieldValue::Missing);
    }
}
