//! Per-field scoring rules
//!
//! Each rule compares one attribute of an old (left) and new (right) record
//! and awards a bounded, non-negative number of points:
//!
//! - **names**: a phonetic bonus plus a fuzzy bonus from the best of four
//!   textual variants
//! - **gender / social category**: fixed points on exact agreement
//! - **age**: points shrinking linearly with the age gap

use serde::{Deserialize, Serialize};

use crate::config::{ScoringFields, ScoringWeights};
use crate::normalize::normalize;
use crate::phonetic::sounds_alike;
use crate::record::{FieldValue, Record};
use crate::similarity::similarity;

/// Names of the score columns, in output order
pub const SCORE_COLUMNS: [&str; 6] = [
    "childname_score",
    "fathername_score",
    "gender_score",
    "age_score",
    "soc_cat_score",
    "total_score",
];

/// Points awarded to one record pair, per field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldScores {
    pub child_name: u32,
    pub father_name: u32,
    pub gender: u32,
    pub age: u32,
    pub social_category: u32,
}

impl FieldScores {
    /// Sum of all field scores
    pub fn total(&self) -> u32 {
        [
            self.child_name,
            self.father_name,
            self.gender,
            self.age,
            self.social_category,
        ]
        .into_iter()
        .fold(0u32, u32::saturating_add)
    }

    /// Scores in `SCORE_COLUMNS` order, total last
    pub fn columns(&self) -> [u32; 6] {
        [
            self.child_name,
            self.father_name,
            self.gender,
            self.age,
            self.social_category,
            self.total(),
        ]
    }
}

/// The four textual forms of a name that get compared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameVariants {
    /// As entered
    pub raw: String,
    /// All whitespace removed
    pub stripped: String,
    /// First whitespace-separated token, empty if there is none
    pub first_token: String,
    /// Transliteration-normalized form of `stripped`
    pub normalized: String,
}

impl NameVariants {
    pub fn new(name: &str) -> Self {
        let stripped: String = name.chars().filter(|c| !c.is_whitespace()).collect();
        let first_token = name.split_whitespace().next().unwrap_or("").to_string();
        let normalized = normalize(&stripped);

        Self {
            raw: name.to_string(),
            stripped,
            first_token,
            normalized,
        }
    }

    fn forms(&self) -> [&str; 4] {
        [&self.raw, &self.stripped, &self.first_token, &self.normalized]
    }
}

/// Score two names
///
/// The phonetic bonus is awarded once if any variant pair shares a phonetic
/// code. The fuzzy bonus uses only the best variant similarity, counted in
/// whole tens.
pub fn name_score(old: &str, new: &str, weights: &ScoringWeights) -> u32 {
    let old = NameVariants::new(old);
    let new = NameVariants::new(new);

    let pairs = old.forms().into_iter().zip(new.forms());

    let mut phonetic_match = false;
    let mut best_similarity: u8 = 0;
    for (a, b) in pairs {
        phonetic_match = phonetic_match || sounds_alike(a, b);
        best_similarity = best_similarity.max(similarity(a, b));
    }

    let bonus = if phonetic_match {
        weights.name_phonetic_bonus
    } else {
        0
    };

    weights
        .name_fuzzy_step
        .saturating_mul(u32::from(best_similarity / 10))
        .saturating_add(bonus)
}

/// Fixed points when the two values agree exactly
pub fn exact_score(old: &FieldValue, new: &FieldValue, points: u32) -> u32 {
    if old.matches(new) {
        points
    } else {
        0
    }
}

/// Points shrinking with the age gap; 0 if either age is not a whole number
pub fn age_score(old: &FieldValue, new: &FieldValue, weights: &ScoringWeights) -> u32 {
    let (Some(old), Some(new)) = (old.as_integer(), new.as_integer()) else {
        return 0;
    };

    let gap = new.abs_diff(old);
    let remaining = u64::from(weights.age_window).saturating_sub(gap);
    // remaining <= age_window, so it fits
    weights.age_step.saturating_mul(remaining as u32)
}

/// Applies every field rule to a record pair
#[derive(Debug, Clone, Copy)]
pub struct FieldScorer<'a> {
    fields: &'a ScoringFields,
    weights: &'a ScoringWeights,
}

impl<'a> FieldScorer<'a> {
    pub fn new(fields: &'a ScoringFields, weights: &'a ScoringWeights) -> Self {
        Self { fields, weights }
    }

    /// Score one old/new record pair
    pub fn score(&self, old: &Record, new: &Record) -> FieldScores {
        let fields = self.fields;
        let weights = self.weights;

        FieldScores {
            child_name: name_score(
                &old.get(&fields.child_name).as_text(),
                &new.get(&fields.child_name).as_text(),
                weights,
            ),
            father_name: name_score(
                &old.get(&fields.father_name).as_text(),
                &new.get(&fields.father_name).as_text(),
                weights,
            ),
            gender: exact_score(
                old.get(&fields.gender),
                new.get(&fields.gender),
                weights.gender_match,
            ),
            age: age_score(old.get(&fields.age), new.get(&fields.age), weights),
            social_category: exact_score(
                old.get(&fields.social_category),
                new.get(&fields.social_category),
                weights.social_category_match,
            ),
        }
    }
}
