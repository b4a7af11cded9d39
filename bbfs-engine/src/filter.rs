use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::classify::{classify, Class};
use crate::digits::signature;

/// Value range of the digits in a combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeBucket {
    /// Every digit in 0-4.
    Small,
    Mix,
    /// Every digit in 5-9.
    Large,
}

pub fn size_bucket(s: &str) -> SizeBucket {
    let digits: Vec<u32> = s.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.iter().all(|&d| d <= 4) {
        SizeBucket::Small
    } else if digits.iter().all(|&d| d >= 5) {
        SizeBucket::Large
    } else {
        SizeBucket::Mix
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HistoryFilter {
    #[default]
    All,
    /// Only combinations whose signature appeared in a past result.
    InDb,
    /// Only combinations never seen in a past result.
    Fresh,
}

/// Signatures of every suffix of length 2..=len of each historical result.
pub fn history_signatures<'a>(results: impl IntoIterator<Item = &'a str>) -> HashSet<String> {
    let mut sigs = HashSet::new();
    for res in results {
        let chars: Vec<char> = res.chars().filter(|c| c.is_ascii_digit()).collect();
        for len in 2..=chars.len() {
            let tail: String = chars[chars.len() - len..].iter().collect();
            sigs.insert(signature(&tail));
        }
    }
    sigs
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSet {
    pub single: bool,
    pub twin: bool,
    pub twin_plus: bool,
    pub small: bool,
    pub mix: bool,
    pub large: bool,
    pub history: HistoryFilter,
}

impl Default for FilterSet {
    fn default() -> Self {
        Self {
            single: true,
            twin: true,
            twin_plus: true,
            small: true,
            mix: true,
            large: true,
            history: HistoryFilter::All,
        }
    }
}

impl FilterSet {
    pub fn allows_class(&self, class: Class) -> bool {
        match class {
            Class::Single => self.single,
            Class::Twin => self.twin,
            Class::TwinPlus => self.twin_plus,
        }
    }

    pub fn allows_size(&self, bucket: SizeBucket) -> bool {
        match bucket {
            SizeBucket::Small => self.small,
            SizeBucket::Mix => self.mix,
            SizeBucket::Large => self.large,
        }
    }

    pub fn matches(&self, item: &str, signatures: &HashSet<String>) -> bool {
        if !self.allows_class(classify(item)) || !self.allows_size(size_bucket(item)) {
            return false;
        }
        match self.history {
            HistoryFilter::All => true,
            HistoryFilter::InDb => signatures.contains(&signature(item)),
            HistoryFilter::Fresh => !signatures.contains(&signature(item)),
        }
    }

    pub fn apply(&self, items: &[String], signatures: &HashSet<String>) -> Vec<String> {
        items
            .iter()
            .filter(|item| self.matches(item, signatures))
            .cloned()
            .collect()
    }
}
