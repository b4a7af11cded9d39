use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Summary of the digits supplied in a BBFS seed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigitMultiset {
    pub distinct_digits: Vec<char>,
    pub repeated_digits: Vec<char>,
    pub counts: BTreeMap<char, usize>,
}

impl DigitMultiset {
    pub fn is_empty(&self) -> bool {
        self.distinct_digits.is_empty()
    }

    /// Number of digits in the cleaned input.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn supply(&self, digit: char) -> usize {
        self.counts.get(&digit).copied().unwrap_or(0)
    }
}

/// Keeps only the ASCII digits of `raw`, in input order.
pub fn clean_digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

pub fn analyze(raw: &str) -> DigitMultiset {
    let mut counts: BTreeMap<char, usize> = BTreeMap::new();
    for c in raw.chars().filter(|c| c.is_ascii_digit()) {
        *counts.entry(c).or_insert(0) += 1;
    }

    // BTreeMap keys iterate ascending, so both lists come out sorted.
    let distinct_digits: Vec<char> = counts.keys().copied().collect();
    let repeated_digits: Vec<char> = counts
        .iter()
        .filter(|&(_, &n)| n > 1)
        .map(|(&d, _)| d)
        .collect();

    DigitMultiset {
        distinct_digits,
        repeated_digits,
        counts,
    }
}

/// Characters of `s` sorted ascending. Two combinations with the same
/// signature hold the same digits in a different order.
pub fn signature(s: &str) -> String {
    let mut chars: Vec<char> = s.chars().collect();
    chars.sort_unstable();
    chars.into_iter().collect()
}
