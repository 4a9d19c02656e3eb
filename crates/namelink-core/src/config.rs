//! Configuration for record matching
//!
//! Centralized settings for a matching run: which field joins the two
//! datasets, which fields must be present, which fields are scored and how
//! many points each kind of agreement is worth.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Columns every input dataset must carry
pub const DEFAULT_REQUIRED_FIELDS: [&str; 12] = [
    "State_name",
    "District",
    "Block_Name",
    "Cluster_Name",
    "Cluster_Code",
    "Village_Code",
    "uniqueid",
    "childname",
    "fathername",
    "socialcategory",
    "gender",
    "age",
];

/// Field the two datasets are joined on
pub const DEFAULT_JOIN_FIELD: &str = "Village_Code";

/// Which pair of datasets is being matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchCategory {
    /// Door-to-door survey against the enrolment registry
    #[default]
    D2dVsEnrolment,
    /// Door-to-door survey against the CIOOSG list
    D2dVsCioosg,
    /// Door-to-door survey against the GKP list
    D2dVsGkp,
}

impl MatchCategory {
    /// All categories, in menu order
    pub const ALL: [MatchCategory; 3] = [
        MatchCategory::D2dVsEnrolment,
        MatchCategory::D2dVsCioosg,
        MatchCategory::D2dVsGkp,
    ];

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            MatchCategory::D2dVsEnrolment => "D2D vs Enrolment",
            MatchCategory::D2dVsCioosg => "D2D vs CIOOSG",
            MatchCategory::D2dVsGkp => "D2D vs GKP",
        }
    }

    /// Identifier used on the command line and in config files
    pub fn slug(&self) -> &'static str {
        match self {
            MatchCategory::D2dVsEnrolment => "d2d-vs-enrolment",
            MatchCategory::D2dVsCioosg => "d2d-vs-cioosg",
            MatchCategory::D2dVsGkp => "d2d-vs-gkp",
        }
    }
}

impl fmt::Display for MatchCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MatchCategory {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        MatchCategory::ALL
            .into_iter()
            .find(|c| c.slug() == wanted || c.label().to_lowercase() == wanted)
            .ok_or_else(|| ConfigError::UnknownCategory(s.to_string()))
    }
}

/// Configuration for a matching run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Which datasets are being compared
    pub category: MatchCategory,
    /// Field used for the equi-join
    pub join_field: String,
    /// Fields both datasets must carry
    pub required_fields: Vec<String>,
    /// Suffix for left-hand columns whose name also appears on the right
    pub left_suffix: String,
    /// Suffix for right-hand columns whose name also appears on the left
    pub right_suffix: String,
    /// Names of the scored fields
    pub fields: ScoringFields,
    /// Points awarded per kind of agreement
    pub weights: ScoringWeights,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            category: MatchCategory::default(),
            join_field: DEFAULT_JOIN_FIELD.to_string(),
            required_fields: DEFAULT_REQUIRED_FIELDS.iter().map(|f| f.to_string()).collect(),
            left_suffix: "_old1".to_string(),
            right_suffix: "_new1".to_string(),
            fields: ScoringFields::default(),
            weights: ScoringWeights::default(),
        }
    }
}

/// Column names of the five scored fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringFields {
    pub child_name: String,
    pub father_name: String,
    pub gender: String,
    pub social_category: String,
    pub age: String,
}

impl Default for ScoringFields {
    fn default() -> Self {
        Self {
            child_name: "childname".to_string(),
            father_name: "fathername".to_string(),
            gender: "gender".to_string(),
            social_category: "socialcategory".to_string(),
            age: "age".to_string(),
        }
    }
}

impl ScoringFields {
    /// All scored field names
    pub fn names(&self) -> [&str; 5] {
        [
            &self.child_name,
            &self.father_name,
            &self.gender,
            &self.social_category,
            &self.age,
        ]
    }
}

/// Point values for each kind of agreement
///
/// The defaults are the established scale; downstream review thresholds
/// depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Awarded once when any name variant shares a phonetic code
    pub name_phonetic_bonus: u32,
    /// Awarded per full ten similarity points of the best name variant
    pub name_fuzzy_step: u32,
    /// Awarded when gender values are equal
    pub gender_match: u32,
    /// Awarded when social category values are equal
    pub social_category_match: u32,
    /// Points per year inside the age window
    pub age_step: u32,
    /// Age differences at or beyond this many years score nothing
    pub age_window: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            name_phonetic_bonus: 200,
            name_fuzzy_step: 20,
            gender_match: 200,
            social_category_match: 110,
            age_step: 10,
            age_window: 9,
        }
    }
}

impl ScoringWeights {
    /// Highest score a single name field can reach
    pub fn name_max(&self) -> u32 {
        self.checked_name_max().unwrap_or(u32::MAX)
    }

    /// Highest age score (identical ages)
    pub fn age_max(&self) -> u32 {
        self.checked_age_max().unwrap_or(u32::MAX)
    }

    /// Highest total a pair can reach
    pub fn max_total(&self) -> u32 {
        self.checked_max_total().unwrap_or(u32::MAX)
    }

    /// Highest total, or `None` if some score would not fit in a `u32`
    pub fn checked_max_total(&self) -> Option<u32> {
        self.checked_name_max()?
            .checked_mul(2)?
            .checked_add(self.gender_match)?
            .checked_add(self.social_category_match)?
            .checked_add(self.checked_age_max()?)
    }

    fn checked_name_max(&self) -> Option<u32> {
        self.name_fuzzy_step
            .checked_mul(10)?
            .checked_add(self.name_phonetic_bonus)
    }

    fn checked_age_max(&self) -> Option<u32> {
        self.age_step.checked_mul(self.age_window)
    }
}

impl MatchConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults for a matching category
    pub fn for_category(category: MatchCategory) -> Self {
        Self {
            category,
            ..Self::default()
        }
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json_str)?)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load configuration from a `.toml` or `.json` file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(format!("{}: {}", path.display(), e)))?;

        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&contents)?,
            _ => Self::from_toml(&contents)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.join_field.trim().is_empty() {
            return Err(ConfigError::MissingField("join_field".to_string()));
        }

        if !self.required_fields.contains(&self.join_field) {
            return Err(ConfigError::NotRequired(self.join_field.clone()));
        }

        for name in self.fields.names() {
            if name.trim().is_empty() {
                return Err(ConfigError::MissingField("scored field name".to_string()));
            }
            if !self.required_fields.iter().any(|f| f == name) {
                return Err(ConfigError::NotRequired(name.to_string()));
            }
        }

        if self.left_suffix.is_empty() || self.right_suffix.is_empty() {
            return Err(ConfigError::OutOfRange(
                "column suffixes must not be empty".to_string(),
            ));
        }

        if self.left_suffix == self.right_suffix {
            return Err(ConfigError::OutOfRange(
                "left_suffix and right_suffix must differ".to_string(),
            ));
        }

        if self.weights.checked_max_total().is_none() {
            return Err(ConfigError::OutOfRange(
                "weights are too large: the maximum total score overflows".to_string(),
            ));
        }

        if self.weights.name_fuzzy_step == 0 {
            return Err(ConfigError::OutOfRange(
                "name_fuzzy_step must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A field is referenced but not listed as required
    #[error("Field is not listed in required_fields: {0}")]
    NotRequired(String),

    /// Value is out of valid range
    #[error("Value out of range: {0}")]
    OutOfRange(String),

    /// Required setting is missing
    #[error("Missing field: {0}")]
    MissingField(String),

    /// Unknown matching category
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// Config file could not be read
    #[error("Failed to read config: {0}")]
    Read(String),

    #[error("Invalid TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Failed to write TOML config: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error("Invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
}
