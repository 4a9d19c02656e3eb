//! Weighted fuzzy string similarity
//!
//! `similarity` combines several strategies and keeps the best one:
//!
//! - **ratio**: normalized Indel similarity over the whole strings
//! - **partial ratio**: best alignment of the shorter string inside the longer
//! - **token sort ratio**: whitespace tokens sorted before comparing
//! - **token set ratio**: shared tokens compared against the leftovers
//!
//! Partial strategies are scaled down as the length gap grows so a short
//! query contained in a long target does not automatically score 100.
//!
//! The strategy functions compare their inputs as given (case-sensitive);
//! only `similarity` preprocesses.

use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Scale applied to token strategies relative to a plain ratio
const UNBASE_SCALE: f64 = 0.95;

/// Length ratio below which strings are treated as comparable in size
const COMPARABLE_LENGTH_RATIO: f64 = 1.5;

/// Length ratio above which partial matches are heavily discounted
const LONG_TARGET_LENGTH_RATIO: f64 = 8.0;

/// Similarity of two strings on a 0-100 scale
///
/// Case-insensitive and symmetric. Returns 0 when either string has no
/// ASCII letters or digits, including when both are empty.
pub fn similarity(a: &str, b: &str) -> u8 {
    let a = preprocess(a);
    let b = preprocess(b);
    let score = weighted_ratio(&a, &b).round_ties_even();
    score.clamp(0.0, 100.0) as u8
}

/// Prepare a string for comparison
///
/// Drops non-ASCII characters, replaces anything that is not a letter or
/// digit with a space, lower-cases and trims.
pub fn preprocess(s: &str) -> String {
    let processed: String = s
        .chars()
        .filter(char::is_ascii)
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect();

    processed.trim().to_string()
}

/// Best-of-strategies score, unrounded
pub fn weighted_ratio(a: &str, b: &str) -> f64 {
    let len_a = a.chars().count();
    let len_b = b.chars().count();
    if len_a == 0 || len_b == 0 {
        return 0.0;
    }

    let len_ratio = len_a.max(len_b) as f64 / len_a.min(len_b) as f64;
    let base = ratio(a, b);

    if len_ratio < COMPARABLE_LENGTH_RATIO {
        let token = token_sort_ratio(a, b).max(token_set_ratio(a, b));
        return base.max(token * UNBASE_SCALE);
    }

    let partial_scale = if len_ratio <= LONG_TARGET_LENGTH_RATIO {
        0.9
    } else {
        0.6
    };

    base.max(partial_ratio(a, b) * partial_scale)
        .max(partial_token_ratio(a, b) * UNBASE_SCALE * partial_scale)
}

/// Normalized Indel similarity: `100 * 2 * LCS / (len_a + len_b)`
///
/// Two empty strings are identical and score 100.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    char_ratio(&a, &b)
}

/// Best `ratio` of the shorter string against any window of the longer one
///
/// Windows slide across the full length of the longer string, including
/// partial windows hanging off either end. Equal-length inputs are tried in
/// both directions.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    match a.len().cmp(&b.len()) {
        Ordering::Less => best_window(&a, &b),
        Ordering::Greater => best_window(&b, &a),
        Ordering::Equal => best_window(&a, &b).max(best_window(&b, &a)),
    }
}

fn best_window(short: &[char], long: &[char]) -> f64 {
    if short.is_empty() {
        return if long.is_empty() { 100.0 } else { 0.0 };
    }

    let m = short.len() as isize;
    let n = long.len() as isize;
    let mut best: f64 = 0.0;

    for start in (1 - m)..n {
        let lo = start.max(0) as usize;
        let hi = (start + m).min(n) as usize;
        let score = char_ratio(short, &long[lo..hi]);
        if score > best {
            best = score;
            if best >= 100.0 {
                break;
            }
        }
    }

    best
}

/// `ratio` after sorting whitespace-separated tokens
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

/// Compare shared tokens against each side's leftover tokens
///
/// Scores 0 when either side has no tokens.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a = token_set(a);
    let tokens_b = token_set(b);
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let intersection = join(tokens_a.intersection(&tokens_b));
    let diff_ab = join(tokens_a.difference(&tokens_b));
    let diff_ba = join(tokens_b.difference(&tokens_a));

    let combined_ab = join_nonempty(&intersection, &diff_ab);
    let combined_ba = join_nonempty(&intersection, &diff_ba);

    let mut best = ratio(&combined_ab, &combined_ba);
    if !intersection.is_empty() {
        best = best
            .max(ratio(&intersection, &combined_ab))
            .max(ratio(&intersection, &combined_ba));
    }

    best
}

/// Partial matching over tokens; any shared token scores 100
pub fn partial_token_ratio(a: &str, b: &str) -> f64 {
    let tokens_a = token_set(a);
    let tokens_b = token_set(b);
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    if tokens_a.intersection(&tokens_b).next().is_some() {
        return 100.0;
    }

    let by_sort = partial_ratio(&sorted_tokens(a), &sorted_tokens(b));
    let by_set = partial_ratio(&join(tokens_a.iter()), &join(tokens_b.iter()));
    by_sort.max(by_set)
}

fn char_ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }

    100.0 * (2 * lcs_len(a, b)) as f64 / total as f64
}

/// Length of the longest common subsequence
fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn token_set(s: &str) -> BTreeSet<&str> {
    s.split_whitespace().collect()
}

fn join<'a, 'b: 'a>(tokens: impl Iterator<Item = &'a &'b str>) -> String {
    tokens.copied().collect::<Vec<_>>().join(" ")
}

fn join_nonempty(head: &str, tail: &str) -> String {
    match (head.is_empty(), tail.is_empty()) {
        (true, _) => tail.to_string(),
        (false, true) => head.to_string(),
        (false, false) => format!("{} {}", head, tail),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical() {
        assert_eq!(similarity("a", "a"), 100);
        assert_eq!(similarity("Ravi Kumar", "ravi kumar"), 100);
    }

    #[test]
    fn test_disjoint() {
        assert!(similarity("abc", "xyz") < 20);
    }

    #[test]
    fn test_token_order() {
        assert!(similarity("john smith", "smith john") >= 90);
    }

    #[test]
    fn test_empty() {
        assert_eq!(similarity("", ""), 0);
        assert_eq!(similarity("ravi", ""), 0);
        assert_eq!(similarity("--", "ravi"), 0);
    }

    #[test]
    fn test_preprocess() {
        assert_eq!(preprocess("  Ravi-Kumar. "), "ravi kumar");
        assert_eq!(preprocess("Zoë"), "zo");
    }

    #[test]
    fn test_ratio() {
        assert_eq!(ratio("abcd", "abcd"), 100.0);
        assert_eq!(ratio("abcd", "wxyz"), 0.0);
        assert_eq!(ratio("ab", "abcd"), 100.0 * 4.0 / 6.0);
        assert_eq!(ratio("", ""), 100.0);
    }

    #[test]
    fn test_partial_ratio() {
        assert_eq!(partial_ratio("kumar", "ravi kumar singh"), 100.0);
        assert_eq!(partial_ratio("ravi kumar singh", "kumar"), 100.0);
        assert_eq!(partial_ratio("", "abc"), 0.0);
    }

    #[test]
    fn test_token_set_ratio() {
        assert_eq!(token_set_ratio("ravi kumar", "kumar ravi ravi"), 100.0);
        assert_eq!(token_set_ratio("ravi", ""), 0.0);
    }

    #[test]
    fn test_partial_token_ratio() {
        assert_eq!(partial_token_ratio("mohammad ali", "mo ali"), 100.0);
    }

    #[test]
    fn test_length_gap_discount() {
        // Containment in a much longer string caps at the partial scale
        assert_eq!(similarity("ali", "mohammad ali khan"), 90);
    }
}
