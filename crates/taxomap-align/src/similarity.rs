//! String similarity scorers for normalized labels.

use crate::normalize::normalize_label;
use std::fmt;
use std::str::FromStr;

/// Which similarity measure to apply to a pair of labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scorer {
    /// Ratcliff/Obershelp matching-blocks ratio.
    #[default]
    Ratio,
    JaroWinkler,
    /// 1 - Levenshtein distance / longest length.
    Levenshtein,
    /// Sørensen–Dice coefficient over character bigrams.
    SorensenDice,
}

impl Scorer {
    pub fn name(self) -> &'static str {
        match self {
            Self::Ratio => "ratio",
            Self::JaroWinkler => "jaro_winkler",
            Self::Levenshtein => "levenshtein",
            Self::SorensenDice => "sorensen_dice",
        }
    }

    /// Score two already-normalized strings in [0.0, 1.0].
    pub fn score(self, a: &str, b: &str) -> f64 {
        match self {
            Self::Ratio => sequence_ratio(a, b),
            Self::JaroWinkler => strsim::jaro_winkler(a, b),
            Self::Levenshtein => strsim::normalized_levenshtein(a, b),
            Self::SorensenDice => strsim::sorensen_dice(a, b),
        }
    }
}

impl fmt::Display for Scorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown scorer `{0}` (expected ratio, jaro_winkler, levenshtein or sorensen_dice)")]
pub struct UnknownScorer(pub String);

impl FromStr for Scorer {
    type Err = UnknownScorer;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "ratio" | "sequence" | "ratcliff" => Ok(Self::Ratio),
            "jaro_winkler" | "jaro" => Ok(Self::JaroWinkler),
            "levenshtein" => Ok(Self::Levenshtein),
            "sorensen_dice" | "dice" => Ok(Self::SorensenDice),
            _ => Err(UnknownScorer(s.to_string())),
        }
    }
}

/// Similarity of two raw labels: both are normalized, then scored.
pub fn label_similarity(a: &str, b: &str, scorer: Scorer) -> f64 {
    scorer.score(&normalize_label(a), &normalize_label(b))
}

/// Ratcliff/Obershelp similarity: `2 * M / T`, where `M` is the number of chars in
/// matching blocks and `T` the combined length. Two empty strings score 1.0.
///
/// Blocks are found by repeatedly taking the longest common substring (earliest
/// in `a`, then earliest in `b`) and recursing on the unmatched sides. No junk
/// heuristic is applied.
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, k) = longest_match(a, b, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        matched += k;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            pending.push((i + k, ahi, j + k, bhi));
        }
    }
    matched
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]` as (i, j, len).
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_k) = (alo, blo, 0);
    // run[j] = length of the common suffix ending at a[i-1], b[j-1].
    let mut prev = vec![0usize; bhi - blo + 1];
    let mut cur = vec![0usize; bhi - blo + 1];

    for i in alo..ahi {
        for j in blo..bhi {
            let col = j - blo + 1;
            if a[i] == b[j] {
                let k = prev[col - 1] + 1;
                cur[col] = k;
                if k > best_k {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_k = k;
                }
            } else {
                cur[col] = 0;
            }
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    (best_i, best_j, best_k)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_ratio_identical_and_disjoint() {
        assert_eq!(sequence_ratio("grant fraud", "grant fraud"), 1.0);
        assert_eq!(sequence_ratio("abc", "xyz"), 0.0);
        assert_eq!(sequence_ratio("", ""), 1.0);
        assert_eq!(sequence_ratio("abc", ""), 0.0);
    }

    #[test]
    fn test_ratio_known_values() {
        // "abcd" vs "bcde": block "bcd" → 2*3/8
        assert!(approx(sequence_ratio("abcd", "bcde"), 0.75));
        // "grant" vs "grants": 2*5/11
        assert!(approx(sequence_ratio("grant", "grants"), 10.0 / 11.0));
        // the classic difflib example: "abcd" vs "acbd" → 2*3/8
        assert!(approx(sequence_ratio("abcd", "acbd"), 0.75));
    }

    #[test]
    fn test_ratio_recurses_on_both_sides() {
        // blocks: "x" (left of "abc"), "abc", "y" (right)
        assert!(approx(sequence_ratio("xabcy", "xqabcqy"), 2.0 * 5.0 / 12.0));
    }

    #[test]
    fn test_label_similarity_normalizes() {
        assert_eq!(label_similarity("Grant Fraud!", "grant   fraud", Scorer::Ratio), 1.0);
    }

    #[test]
    fn test_scorer_from_str() {
        assert_eq!("ratio".parse::<Scorer>().unwrap(), Scorer::Ratio);
        assert_eq!("Jaro-Winkler".parse::<Scorer>().unwrap(), Scorer::JaroWinkler);
        assert_eq!("dice".parse::<Scorer>().unwrap(), Scorer::SorensenDice);
        assert!("cosine".parse::<Scorer>().is_err());
    }

    #[test]
    fn test_alternative_scorers_bounded() {
        for scorer in [Scorer::JaroWinkler, Scorer::Levenshtein, Scorer::SorensenDice] {
            let s = scorer.score("grant fraud", "grants");
            assert!((0.0..=1.0).contains(&s), "{} out of range: {}", scorer, s);
            assert_eq!(scorer.score("loan", "loan"), 1.0);
        }
    }
}
