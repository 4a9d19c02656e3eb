//! Village-keyed record matching
//!
//! Joins two datasets on an exact key, scores every joined pair with the
//! field rules and ranks the pairs by total score.

use std::collections::HashMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Serialize;

use crate::config::MatchConfig;
use crate::error::{DatasetSide, MatchError, MatchResult};
use crate::field::{FieldScorer, FieldScores, SCORE_COLUMNS};
use crate::record::{Dataset, FieldValue, JoinKey, Record};

/// One joined old/new pair with its scores
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedPair {
    /// Row index in the left dataset
    pub left_index: usize,
    /// Row index in the right dataset
    pub right_index: usize,
    /// Left then right values, aligned with `MatchTable::columns`
    pub values: Vec<FieldValue>,
    /// Per-field scores
    pub scores: FieldScores,
}

impl MatchedPair {
    /// Sum of the field scores
    pub fn total(&self) -> u32 {
        self.scores.total()
    }
}

/// Where each output column takes its value from
#[derive(Debug, Clone, Copy)]
enum ColumnSource {
    Left(usize),
    Right(usize),
}

/// Ranked result of a matching run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchTable {
    /// Data column names, suffixed where both sides share a name
    pub columns: Vec<String>,
    /// Pairs ordered by descending total score
    pub pairs: Vec<MatchedPair>,
}

impl MatchTable {
    /// Number of pairs
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The `n` best pairs
    pub fn top(&self, n: usize) -> &[MatchedPair] {
        &self.pairs[..n.min(self.pairs.len())]
    }

    /// Flat header: data columns followed by score columns
    pub fn header(&self) -> Vec<String> {
        self.columns
            .iter()
            .cloned()
            .chain(SCORE_COLUMNS.iter().map(|c| c.to_string()))
            .collect()
    }

    /// Flat row for a pair, aligned with `header`
    pub fn row(&self, pair: &MatchedPair) -> Vec<String> {
        pair.values
            .iter()
            .map(|v| v.as_text().into_owned())
            .chain(pair.scores.columns().iter().map(|s| s.to_string()))
            .collect()
    }

    /// Value of a named data column in a pair
    pub fn value<'a>(&self, pair: &'a MatchedPair, column: &str) -> Option<&'a FieldValue> {
        let index = self.columns.iter().position(|c| c == column)?;
        pair.values.get(index)
    }
}

/// Join two datasets on the configured key, score every pair and rank them
///
/// Fails when the configuration is invalid or either dataset lacks a required
/// field. A join that produces no pairs returns an empty table.
pub fn score(left: &Dataset, right: &Dataset, config: &MatchConfig) -> MatchResult<MatchTable> {
    config.validate()?;
    check_required(left, DatasetSide::Left, config)?;
    check_required(right, DatasetSide::Right, config)?;

    let (columns, sources) = output_layout(left, right, config);
    let joined = join_indices(left, right, &config.join_field);

    tracing::info!(
        "{}: joined {} left x {} right rows on {} into {} pairs",
        config.category,
        left.len(),
        right.len(),
        config.join_field,
        joined.len()
    );

    if joined.is_empty() {
        tracing::warn!(
            "No records matched on {} between the two datasets",
            config.join_field
        );
        return Ok(MatchTable {
            columns,
            pairs: Vec::new(),
        });
    }

    let scorer = FieldScorer::new(&config.fields, &config.weights);
    let build = |&(li, ri): &(usize, usize)| {
        let old = &left.records[li];
        let new = &right.records[ri];
        MatchedPair {
            left_index: li,
            right_index: ri,
            values: flatten(old, new, left, right, &sources),
            scores: scorer.score(old, new),
        }
    };

    #[cfg(feature = "parallel")]
    let mut pairs: Vec<MatchedPair> = joined.par_iter().map(build).collect();

    #[cfg(not(feature = "parallel"))]
    let mut pairs: Vec<MatchedPair> = joined.iter().map(build).collect();

    // Stable: equal totals keep join order
    pairs.sort_by(|a, b| b.total().cmp(&a.total()));

    if let Some(best) = pairs.first() {
        tracing::info!("Scored {} pairs, best total {}", pairs.len(), best.total());
    }

    Ok(MatchTable { columns, pairs })
}

fn check_required(dataset: &Dataset, side: DatasetSide, config: &MatchConfig) -> MatchResult<()> {
    let missing = dataset.missing_columns(&config.required_fields);
    if missing.is_empty() {
        return Ok(());
    }

    tracing::debug!("{} dataset header: {:?}", side, dataset.columns);
    Err(MatchError::MissingFields {
        side,
        fields: missing.into_iter().map(String::from).collect(),
    })
}

/// Inner equi-join: left rows in order, each followed by its right matches in order
fn join_indices(left: &Dataset, right: &Dataset, join_field: &str) -> Vec<(usize, usize)> {
    let mut by_key: HashMap<JoinKey, Vec<usize>> = HashMap::new();
    for (i, record) in right.records.iter().enumerate() {
        if let Some(key) = record.get(join_field).join_key() {
            by_key.entry(key).or_default().push(i);
        }
    }

    let mut joined = Vec::new();
    for (li, record) in left.records.iter().enumerate() {
        let Some(key) = record.get(join_field).join_key() else {
            continue;
        };
        if let Some(matches) = by_key.get(&key) {
            joined.extend(matches.iter().map(|&ri| (li, ri)));
        }
    }

    joined
}

/// Output column names and where each one's value comes from
///
/// All left columns in order, then right columns except the join field.
/// A name present on both sides is suffixed on both copies.
fn output_layout(
    left: &Dataset,
    right: &Dataset,
    config: &MatchConfig,
) -> (Vec<String>, Vec<ColumnSource>) {
    let join = config.join_field.as_str();
    let shared = |name: &str, other: &Dataset| name != join && other.has_column(name);

    let mut columns: Vec<String> = Vec::with_capacity(left.columns.len() + right.columns.len());
    let mut sources: Vec<ColumnSource> = Vec::with_capacity(columns.capacity());

    for (i, name) in left.columns.iter().enumerate() {
        if shared(name.as_str(), right) {
            columns.push(format!("{}{}", name, config.left_suffix));
        } else {
            columns.push(name.clone());
        }
        sources.push(ColumnSource::Left(i));
    }

    for (i, name) in right.columns.iter().enumerate() {
        if name == join {
            continue;
        }
        if shared(name.as_str(), left) {
            columns.push(format!("{}{}", name, config.right_suffix));
        } else {
            columns.push(name.clone());
        }
        sources.push(ColumnSource::Right(i));
    }

    (columns, sources)
}

fn flatten(
    old: &Record,
    new: &Record,
    left: &Dataset,
    right: &Dataset,
    sources: &[ColumnSource],
) -> Vec<FieldValue> {
    sources
        .iter()
        .map(|source| match *source {
            ColumnSource::Left(i) => old.get(&left.columns[i]).clone(),
            ColumnSource::Right(i) => new.get(&right.columns[i]).clone(),
        })
        .collect()
}
