//! Transliteration normalization for South-Asian names
//!
//! The same spoken name is written many ways in Latin script
//! ("MOHAMMAD"/"MOHAMMADA", "SINGH"/"SING"/"SIMHA", "JEET"/"JIT").
//! `normalize` folds the common variants together so phonetic and fuzzy
//! comparison downstream sees less orthographic noise.
//!
//! The rules are applied in a fixed order; later rules see the output of
//! earlier ones. The result is not guaranteed to be a fixed point.

/// Digraph and trigraph rewrites, applied in order as full scan-and-replace passes.
const SUBSTITUTIONS: [(&str, &str); 16] = [
    ("JJ", "GY"),
    ("CHH", "CH"),
    ("EE", "I"),
    ("OO", "U"),
    ("AI", "E"),
    ("AU", "O"),
    ("OU", "O"),
    ("EO", "EV"),
    ("PH", "F"),
    ("W", "V"),
    ("J", "Z"),
    ("SH", "S"),
    ("CA", "CHA"),
    ("KSH", "X"),
    ("KS", "X"),
    ("AY", "E"),
];

/// Normalize a name for comparison
///
/// - Upper-cases the input
/// - Folds honorific prefixes ("MOHAMMAD" -> "MO")
/// - Canonicalizes "SINGH" spellings
/// - Strips "DEVI", "BANO" and "BANU" unless they are the whole name
/// - Rewrites common transliteration digraphs
/// - Collapses doubled letters
/// - Turns "M" before a consonant into "N"
pub fn normalize(name: &str) -> String {
    let mut word = name.to_uppercase();
    if word.is_empty() {
        return word;
    }

    // MOHAMMADA first so it is not left as "MOA"
    word = word.replace("MOHAMMADA", "MO").replace("MOHAMMAD", "MO");

    word = word.replace("SIMHA", "SINGH");
    if !word.contains("SINGH") {
        word = word.replace("SING", "SINGH");
    }

    if word != "DEVI" {
        word = word.replace("DEVI", "");
    }
    if word != "BANO" && word != "BANU" {
        word = word.replace("BANO", "").replace("BANU", "");
    }

    for (from, to) in SUBSTITUTIONS {
        word = word.replace(from, to);
    }

    let word = collapse_repeats(&word);
    nasalize_m(&word)
}

/// Collapse runs of the same character to a single occurrence
fn collapse_repeats(word: &str) -> String {
    let mut result = String::with_capacity(word.len());
    let mut prev: Option<char> = None;

    for c in word.chars() {
        if prev != Some(c) {
            result.push(c);
        }
        prev = Some(c);
    }

    result
}

/// Replace an `M` followed by anything other than a vowel with `N`
fn nasalize_m(word: &str) -> String {
    let chars: Vec<char> = word.chars().collect();

    chars
        .iter()
        .enumerate()
        .map(|(i, &c)| match chars.get(i + 1) {
            Some(next) if c.eq_ignore_ascii_case(&'M') && !is_vowel(*next) => 'N',
            _ => c,
        })
        .collect()
}

fn is_vowel(c: char) -> bool {
    matches!(c.to_ascii_uppercase(), 'A' | 'E' | 'I' | 'O' | 'U')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_singh_unchanged() {
        assert_eq!(normalize("SINGH"), "SINGH");
        assert_eq!(normalize("singh"), "SINGH");
    }

    #[test]
    fn test_sing_and_simha_expand() {
        assert_eq!(normalize("RAMSING"), "RANSINGH");
        assert_eq!(normalize("SIMHA"), "SINGH");
    }

    #[test]
    fn test_mohammad_prefix() {
        assert!(normalize("MOHAMMAD ABC").starts_with("MO"));
        assert_eq!(normalize("MOHAMMADALI"), "MOLI");
    }

    #[test]
    fn test_devi_and_bano() {
        assert_eq!(normalize("DEVI"), "DEVI");
        assert_eq!(normalize("SITADEVI"), "SITA");
        assert_eq!(normalize("BANO"), "BANO");
        assert_eq!(normalize("BANU"), "BANU");
        assert_eq!(normalize("SHAHBANO"), "SAH");
    }

    #[test]
    fn test_collapse_repeats() {
        assert_eq!(collapse_repeats("AAB"), "AB");
        assert_eq!(collapse_repeats("ALLLA"), "ALA");
        assert_eq!(normalize("AAB"), "AB");
    }

    #[test]
    fn test_m_before_consonant() {
        assert_eq!(normalize("MN"), "NN");
        assert_eq!(normalize("RAM"), "RAM");
        assert_eq!(normalize("MA"), "MA");
    }

    #[test]
    fn test_digraphs() {
        assert_eq!(normalize("DEEPAK"), "DIPAK");
        assert_eq!(normalize("POOJA"), "PUZA");
        assert_eq!(normalize("PHOOL"), "FUL");
        assert_eq!(normalize("LAKSHMI"), "LAXMI");
    }
}
