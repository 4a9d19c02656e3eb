//! namelink-core - Record linkage scoring for person datasets
//!
//! Links two tables of person records (for example a door-to-door survey and
//! an enrolment registry) that share a village key but spell names
//! inconsistently, and ranks every same-village pair by a confidence score.
//!
//! - **normalize**: transliteration smoothing for South-Asian names
//! - **phonetic**: Soundex-style phonetic codes
//! - **similarity**: weighted fuzzy string similarity (0-100)
//! - **field**: per-field scoring rules
//! - **matcher**: equi-join, pair scoring and ranking
//!
//! # Design
//!
//! Every scoring function is pure. With the `parallel` feature, joined pairs
//! are scored on the rayon thread pool; results are identical to the
//! sequential run.

pub mod config;
pub mod error;
pub mod field;
pub mod matcher;
pub mod normalize;
pub mod phonetic;
pub mod record;
pub mod similarity;

pub use config::*;
pub use error::*;
pub use field::{
    age_score, exact_score, name_score, FieldScorer, FieldScores, NameVariants, SCORE_COLUMNS,
};
pub use matcher::{score, MatchTable, MatchedPair};
pub use normalize::normalize;
pub use phonetic::{encode, sounds_alike, PhoneticCode};
pub use record::*;
pub use similarity::similarity;
