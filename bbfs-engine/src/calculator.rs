use std::collections::{HashMap, HashSet};

use crate::classify::{classify, Class};
use crate::digits::{analyze, clean_digits};
use crate::dimension::Dimension;
use crate::filter::FilterSet;
use crate::permutation::{generate_single, generate_twin_with_ceiling};
use crate::pricing::PerDimension;

/// Combinations of one dimension, split by class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DimensionResults {
    pub single: Vec<String>,
    pub twin: Vec<String>,
    pub twin_plus: Vec<String>,
}

impl DimensionResults {
    pub fn class(&self, class: Class) -> &[String] {
        match class {
            Class::Single => &self.single,
            Class::Twin => &self.twin,
            Class::TwinPlus => &self.twin_plus,
        }
    }

    fn push_classified(&mut self, item: String) {
        match classify(&item) {
            Class::Single => self.single.push(item),
            Class::Twin => self.twin.push(item),
            Class::TwinPlus => self.twin_plus.push(item),
        }
    }

    pub fn counts(&self) -> [usize; 3] {
        [self.single.len(), self.twin.len(), self.twin_plus.len()]
    }

    pub fn len(&self) -> usize {
        self.single.len() + self.twin.len() + self.twin_plus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn filtered(&self, filter: &FilterSet, signatures: &HashSet<String>) -> DimensionResults {
        DimensionResults {
            single: filter.apply(&self.single, signatures),
            twin: filter.apply(&self.twin, signatures),
            twin_plus: filter.apply(&self.twin_plus, signatures),
        }
    }
}

pub type BbfsResults = PerDimension<DimensionResults>;

impl BbfsResults {
    pub fn counts(&self) -> PerDimension<[usize; 3]> {
        PerDimension::from_fn(|dim| self.get(dim).counts())
    }

    pub fn filtered(&self, filter: &FilterSet, signatures: &HashSet<String>) -> BbfsResults {
        PerDimension::from_fn(|dim| self.get(dim).filtered(filter, signatures))
    }

    /// Selected dimensions in ascending order, each contributing single,
    /// then twin, then twin+.
    pub fn collect_selected(&self, selected: &[Dimension]) -> Vec<String> {
        let mut combined = Vec::new();
        for dim in Dimension::ALL {
            if !selected.contains(&dim) {
                continue;
            }
            let res = self.get(dim);
            combined.extend(res.single.iter().cloned());
            combined.extend(res.twin.iter().cloned());
            combined.extend(res.twin_plus.iter().cloned());
        }
        combined
    }
}

/// Generates every dimension for a BBFS seed. Fewer than two digits gives
/// nothing.
pub fn compute_bbfs(raw: &str, twin_ceiling: usize) -> BbfsResults {
    let mut data = BbfsResults::default();
    if clean_digits(raw).len() < 2 {
        return data;
    }

    let multiset = analyze(raw);
    for dim in Dimension::ALL {
        let k = dim.len();
        let entry = data.get_mut(dim);
        entry.single = generate_single(&multiset.distinct_digits, k);

        let repeats = generate_twin_with_ceiling(
            &multiset.distinct_digits,
            &multiset.repeated_digits,
            k,
            Some(&multiset.counts),
            twin_ceiling,
        );
        for item in repeats {
            match classify(&item) {
                Class::Twin => entry.twin.push(item),
                Class::TwinPlus => entry.twin_plus.push(item),
                Class::Single => {}
            }
        }
        log::debug!(
            "bbfs {dim}: {} single, {} twin, {} twin+",
            entry.single.len(),
            entry.twin.len(),
            entry.twin_plus.len()
        );
    }
    data
}

/// Positional generation: each of the five positions has its own candidate
/// digits. 5D uses p1..p5, 4D p2..p5, 3D p3..p5 and 2D p4..p5; a dimension
/// is produced only when all of its positions are filled.
pub fn compute_poltar(positions: [&str; 5]) -> BbfsResults {
    let cleaned: Vec<Vec<char>> = positions
        .iter()
        .map(|p| clean_digits(p).chars().collect())
        .collect();

    let mut data = BbfsResults::default();
    for dim in Dimension::ALL {
        let slots = &cleaned[5 - dim.len()..];
        if slots.iter().any(|s| s.is_empty()) {
            continue;
        }
        let entry = data.get_mut(dim);
        for item in cartesian(slots) {
            entry.push_classified(item);
        }
    }
    data
}

fn cartesian(slots: &[Vec<char>]) -> Vec<String> {
    let mut out = vec![String::new()];
    for slot in slots {
        let mut next = Vec::with_capacity(out.len() * slot.len());
        for prefix in &out {
            for &c in slot {
                let mut s = prefix.clone();
                s.push(c);
                next.push(s);
            }
        }
        out = next;
    }
    out
}

/// Caches BBFS results by cleaned seed and ceiling.
#[derive(Debug, Default)]
pub struct Memo {
    entries: HashMap<(String, usize), BbfsResults>,
}

impl Memo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bbfs(&mut self, raw: &str, twin_ceiling: usize) -> &BbfsResults {
        let key = (clean_digits(raw), twin_ceiling);
        if self.entries.contains_key(&key) {
            log::debug!("memo hit for {:?}", key.0);
        }
        self.entries
            .entry(key)
            .or_insert_with_key(|(digits, ceiling)| compute_bbfs(digits, *ceiling))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permutation::{arrangements, TWIN_MAX_DIMENSION};

    #[test]
    fn test_compute_bbfs_distinct_seed() {
        let res = compute_bbfs("1234", TWIN_MAX_DIMENSION);
        assert_eq!(res.d2.single.len(), 12);
        assert_eq!(res.d3.single.len(), 24);
        assert_eq!(res.d4.single.len(), 24);
        assert!(res.d5.single.is_empty());
        for dim in Dimension::ALL {
            assert!(res.get(dim).twin.is_empty());
            assert!(res.get(dim).twin_plus.is_empty());
        }
    }

    #[test]
    fn test_compute_bbfs_splits_twin_classes() {
        let res = compute_bbfs("11222", TWIN_MAX_DIMENSION);
        // 3D repeats: 112 121 122 211 212 221 are pairs, 222 is a triple
        assert_eq!(res.d3.twin, vec!["112", "121", "122", "211", "212", "221"]);
        assert_eq!(res.d3.twin_plus, vec!["222"]);
        assert!(res.d3.single.is_empty());
        assert_eq!(res.d2.single, vec!["12", "21"]);
        assert_eq!(res.d2.twin, vec!["11", "22"]);
    }

    #[test]
    fn test_compute_bbfs_short_input() {
        for raw in ["", "7", "a7b"] {
            let res = compute_bbfs(raw, TWIN_MAX_DIMENSION);
            assert!(Dimension::ALL.iter().all(|&d| res.get(d).is_empty()));
        }
    }

    #[test]
    fn test_compute_bbfs_respects_ceiling() {
        let res = compute_bbfs("1122334455", 3);
        assert!(!res.d3.twin.is_empty());
        assert!(res.d4.twin.is_empty());
        assert!(res.d4.twin_plus.is_empty());
        assert_eq!(res.d4.single.len(), arrangements(5, 4));
    }

    #[test]
    fn test_poltar_counts() {
        let res = compute_poltar(["12", "3", "45", "67", "89"]);
        assert_eq!(res.d5.len(), 2 * 1 * 2 * 2 * 2);
        assert_eq!(res.d4.len(), 1 * 2 * 2 * 2);
        assert_eq!(res.d3.len(), 2 * 2 * 2);
        assert_eq!(res.d2.len(), 4);
        assert_eq!(res.d2.single, vec!["68", "69", "78", "79"]);
    }

    #[test]
    fn test_poltar_missing_position() {
        let res = compute_poltar(["", "1", "2", "3", "4"]);
        assert!(res.d5.is_empty());
        assert_eq!(res.d4.single, vec!["1234"]);

        let res = compute_poltar(["1", "2", "3", "", "5"]);
        assert!(Dimension::ALL.iter().all(|&d| res.get(d).is_empty()));
    }

    #[test]
    fn test_poltar_classifies_and_keeps_duplicates() {
        let res = compute_poltar(["", "", "11", "1", "1"]);
        assert_eq!(res.d3.twin_plus, vec!["111", "111"]);
        assert_eq!(res.d2.twin, vec!["11"]);
    }

    #[test]
    fn test_collect_selected_order() {
        let res = compute_bbfs("112", TWIN_MAX_DIMENSION);
        let all = res.collect_selected(&[Dimension::D3, Dimension::D2]);
        assert_eq!(&all[..3], &["12", "21", "11"]);
        assert_eq!(all.len(), 3 + res.d3.len());
        assert!(res.collect_selected(&[]).is_empty());
    }

    #[test]
    fn test_filtered_counts() {
        let res = compute_bbfs("11222", TWIN_MAX_DIMENSION);
        let filter = FilterSet {
            twin_plus: false,
            ..FilterSet::default()
        };
        let counts = res.filtered(&filter, &HashSet::new()).counts();
        assert_eq!(counts.d3, [0, 6, 0]);
    }

    #[test]
    fn test_memo_reuses_entries() {
        let mut memo = Memo::new();
        let first = memo.bbfs("1 2 3", TWIN_MAX_DIMENSION).clone();
        let second = memo.bbfs("123", TWIN_MAX_DIMENSION).clone();
        assert_eq!(first, second);
        assert_eq!(memo.len(), 1);
        memo.bbfs("123", 4);
        assert_eq!(memo.len(), 2);
        memo.clear();
        assert!(memo.is_empty());
    }
}
