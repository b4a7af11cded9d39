use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Class {
    /// Every digit distinct.
    Single,
    /// Exactly one digit appears twice.
    Twin,
    /// A triple or more, or several pairs.
    TwinPlus,
}

impl Class {
    pub const ALL: [Class; 3] = [Class::Single, Class::Twin, Class::TwinPlus];

    pub fn label(&self) -> &'static str {
        match self {
            Class::Single => "SGL",
            Class::Twin => "TWN",
            Class::TwinPlus => "TWN+",
        }
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn distinct_symbols(s: &str) -> usize {
    s.chars().collect::<BTreeSet<_>>().len()
}

/// Buckets a combination by how many distinct digits it uses relative to
/// its length.
pub fn classify(s: &str) -> Class {
    let k = s.chars().count();
    let unique = distinct_symbols(s);
    if unique == k {
        Class::Single
    } else if unique + 1 == k {
        Class::Twin
    } else {
        Class::TwinPlus
    }
}

pub fn has_repeat(s: &str) -> bool {
    classify(s) != Class::Single
}

pub fn is_twin(s: &str) -> bool {
    classify(s) == Class::Twin
}

pub fn is_twin_plus(s: &str) -> bool {
    classify(s) == Class::TwinPlus
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_buckets() {
        assert_eq!(classify("1234"), Class::Single);
        assert_eq!(classify("1123"), Class::Twin);
        assert_eq!(classify("1112"), Class::TwinPlus);
        assert_eq!(classify("1122"), Class::TwinPlus);
        assert_eq!(classify("11"), Class::Twin);
        assert_eq!(classify("7"), Class::Single);
        assert_eq!(classify(""), Class::Single);
    }

    #[test]
    fn test_classify_five_digits() {
        assert_eq!(classify("12345"), Class::Single);
        assert_eq!(classify("12341"), Class::Twin);
        assert_eq!(classify("12121"), Class::TwinPlus);
        assert_eq!(classify("99999"), Class::TwinPlus);
    }

    #[test]
    fn test_predicates() {
        assert!(!has_repeat("120"));
        assert!(has_repeat("121"));
        assert!(is_twin("121"));
        assert!(!is_twin_plus("121"));
        assert!(is_twin_plus("111"));
    }

    #[test]
    fn test_class_labels() {
        assert_eq!(Class::Single.to_string(), "SGL");
        assert_eq!(Class::TwinPlus.to_string(), "TWN+");
    }
}
