//! Soundex-style phonetic codes
//!
//! A phonetic code buckets spelling variants of a name: "Robert" and
//! "Rupert" both encode to `R163`. Equal codes are a coarse match signal,
//! unrelated names can and do collide.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of digits following the lead letter
const CODE_DIGITS: usize = 3;

/// A four-character phonetic code: one upper-case letter and three digits
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhoneticCode(String);

impl PhoneticCode {
    /// The code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Soundex digit for a lower-case letter
fn digit(c: char) -> Option<char> {
    match c {
        'b' | 'f' | 'p' | 'v' => Some('1'),
        'c' | 'g' | 'j' | 'k' | 'q' | 's' | 'x' | 'z' => Some('2'),
        'd' | 't' => Some('3'),
        'l' => Some('4'),
        'm' | 'n' => Some('5'),
        'r' => Some('6'),
        _ => None,
    }
}

/// Encode a name
///
/// Returns `None` when the input has no alphabetic characters.
pub fn encode(name: &str) -> Option<PhoneticCode> {
    let lowered = name.to_lowercase();
    let mut letters = lowered.chars().filter(|c| c.is_alphabetic());

    let lead = letters.next()?;

    let mut digits: Vec<char> = Vec::with_capacity(CODE_DIGITS + 1);
    for d in letters
        .filter(|c| !matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y' | 'h' | 'w'))
        .filter_map(digit)
    {
        if digits.last() != Some(&d) {
            digits.push(d);
        }
    }

    // A repeat of the lead letter's own sound is not counted twice
    if digits.first().is_some() && digits.first().copied() == digit(lead) {
        digits.remove(0);
    }

    digits.truncate(CODE_DIGITS);
    digits.resize(CODE_DIGITS, '0');

    let mut code: String = lead.to_uppercase().collect();
    code.extend(digits);
    Some(PhoneticCode(code))
}

/// True when both names encode and their codes are equal
///
/// Two names without a code never match each other.
pub fn sounds_alike(a: &str, b: &str) -> bool {
    match (encode(a), encode(b)) {
        (Some(code_a), Some(code_b)) => code_a == code_b,
        _ => false,
    }
}
