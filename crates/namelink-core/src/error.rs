//! Error types for namelink-core

use std::fmt;

use thiserror::Error;

use crate::config::ConfigError;

/// Result type alias for matching operations
pub type MatchResult<T> = std::result::Result<T, MatchError>;

/// Which input dataset an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetSide {
    Left,
    Right,
}

impl fmt::Display for DatasetSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetSide::Left => f.write_str("First"),
            DatasetSide::Right => f.write_str("Second"),
        }
    }
}

/// Main error type for matching operations
#[derive(Error, Debug)]
pub enum MatchError {
    /// A dataset lacks required columns; nothing was scored
    #[error("{side} dataset is missing columns: {}", .fields.join(", "))]
    MissingFields {
        side: DatasetSide,
        fields: Vec<String>,
    },

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_message() {
        let err = MatchError::MissingFields {
            side: DatasetSide::Right,
            fields: vec!["age".to_string(), "gender".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Second dataset is missing columns: age, gender"
        );
    }
}
