use std::collections::{BTreeMap, BTreeSet};

/// Largest dimension for which repeated-digit combinations are generated.
/// The search space grows as `distinct^k` before pruning; above this the
/// generator returns nothing.
pub const TWIN_MAX_DIMENSION: usize = 5;

/// Every ordered arrangement of `k` distinct symbols taken from `pool`,
/// in backtracking order over `pool`.
///
/// Returns `P(n, k)` strings, or nothing when `k == 0` or `k > n`.
pub fn generate_single(pool: &[char], k: usize) -> Vec<String> {
    if k == 0 || k > pool.len() {
        return Vec::new();
    }

    let mut results = Vec::with_capacity(arrangements(pool.len(), k));
    let mut current = String::with_capacity(k);
    let mut used = vec![false; pool.len()];
    single_step(pool, k, &mut used, &mut current, &mut results);
    results
}

fn single_step(
    pool: &[char],
    k: usize,
    used: &mut [bool],
    current: &mut String,
    results: &mut Vec<String>,
) {
    if current.len() == k {
        results.push(current.clone());
        return;
    }

    for i in 0..pool.len() {
        if used[i] {
            continue;
        }
        used[i] = true;
        current.push(pool[i]);
        single_step(pool, k, used, current, results);
        current.pop();
        used[i] = false;
    }
}

/// Number of ordered arrangements `n! / (n - k)!`.
pub fn arrangements(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    ((n - k + 1)..=n).product()
}

/// Combinations of length `k` over `pool` where at least one digit repeats
/// and no digit is used more often than `counts` supplies it.
///
/// Sorted ascending, without duplicates. Empty for `k <= 1`, for an empty
/// `repeated` list, when `counts` is absent, and above [`TWIN_MAX_DIMENSION`].
pub fn generate_twin(
    pool: &[char],
    repeated: &[char],
    k: usize,
    counts: Option<&BTreeMap<char, usize>>,
) -> Vec<String> {
    generate_twin_with_ceiling(pool, repeated, k, counts, TWIN_MAX_DIMENSION)
}

pub fn generate_twin_with_ceiling(
    pool: &[char],
    repeated: &[char],
    k: usize,
    counts: Option<&BTreeMap<char, usize>>,
    ceiling: usize,
) -> Vec<String> {
    let counts = match counts {
        Some(c) if k > 1 && !repeated.is_empty() => c,
        _ => return Vec::new(),
    };
    if pool.is_empty() || k > ceiling {
        log::debug!("twin generation skipped: k={k}, ceiling={ceiling}");
        return Vec::new();
    }

    let caps: Vec<usize> = pool
        .iter()
        .map(|d| counts.get(d).copied().unwrap_or(0))
        .collect();

    let mut search = TwinSearch {
        pool,
        caps: &caps,
        k,
        usage: vec![0; pool.len()],
        current: String::with_capacity(k),
        results: BTreeSet::new(),
    };
    search.step();
    search.results.into_iter().collect()
}

struct TwinSearch<'a> {
    pool: &'a [char],
    caps: &'a [usize],
    k: usize,
    // usage[i] is the number of times pool[i] occurs in `current`
    usage: Vec<usize>,
    current: String,
    results: BTreeSet<String>,
}

impl TwinSearch<'_> {
    fn step(&mut self) {
        if self.current.len() == self.k {
            if self.usage.iter().any(|&n| n > 1) {
                self.results.insert(self.current.clone());
            }
            return;
        }

        for i in 0..self.pool.len() {
            if self.usage[i] >= self.caps[i] {
                continue;
            }
            self.usage[i] += 1;
            self.current.push(self.pool[i]);
            self.step();
            self.current.pop();
            self.usage[i] -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digits::analyze;

    fn count_of(s: &str, d: char) -> usize {
        s.chars().filter(|&c| c == d).count()
    }

    fn has_repeat(s: &str) -> bool {
        let mut seen = BTreeSet::new();
        s.chars().any(|c| !seen.insert(c))
    }

    #[test]
    fn test_single_scenario_a_exact_order() {
        let m = analyze("1234");
        let got = generate_single(&m.distinct_digits, 2);
        let expected = vec![
            "12", "13", "14", "21", "23", "24", "31", "32", "34", "41", "42", "43",
        ];
        assert_eq!(got, expected);
    }

    #[test]
    fn test_single_counts_match_arrangements() {
        let pool: Vec<char> = "0123456789".chars().collect();
        for n in 1..=6 {
            for k in 1..=5 {
                let got = generate_single(&pool[..n], k);
                assert_eq!(got.len(), arrangements(n, k), "n={n} k={k}");
            }
        }
        assert_eq!(arrangements(10, 5), 30240);
        assert_eq!(arrangements(4, 4), 24);
    }

    #[test]
    fn test_single_too_few_digits() {
        let pool = vec!['1', '2'];
        assert!(generate_single(&pool, 3).is_empty());
        assert!(generate_single(&pool, 0).is_empty());
        assert!(generate_single(&[], 1).is_empty());
    }

    #[test]
    fn test_single_k1_is_pool() {
        let pool = vec!['0', '5', '9'];
        assert_eq!(generate_single(&pool, 1), vec!["0", "5", "9"]);
    }

    #[test]
    fn test_single_outputs_have_no_repeat() {
        let pool: Vec<char> = "13579".chars().collect();
        let got = generate_single(&pool, 4);
        assert!(got.iter().all(|s| !has_repeat(s)));
        let unique: BTreeSet<_> = got.iter().collect();
        assert_eq!(unique.len(), got.len());
    }

    #[test]
    fn test_twin_scenario_a_no_repeats() {
        let m = analyze("1234");
        for k in 1..=6 {
            let got = generate_twin(&m.distinct_digits, &m.repeated_digits, k, Some(&m.counts));
            assert!(got.is_empty(), "k={k}");
        }
    }

    #[test]
    fn test_twin_scenario_b() {
        let m = analyze("1123");
        let got = generate_twin(&m.distinct_digits, &m.repeated_digits, 2, Some(&m.counts));
        assert_eq!(got, vec!["11"]);

        let got3 = generate_twin(&m.distinct_digits, &m.repeated_digits, 3, Some(&m.counts));
        assert_eq!(
            got3,
            vec!["112", "113", "121", "131", "211", "311"]
        );
    }

    #[test]
    fn test_twin_scenario_c_exact_set() {
        let m = analyze("11222");
        let got = generate_twin(&m.distinct_digits, &m.repeated_digits, 3, Some(&m.counts));
        // "111" needs three 1s but only two are supplied
        assert_eq!(
            got,
            vec!["112", "121", "122", "211", "212", "221", "222"]
        );
    }

    #[test]
    fn test_twin_trivial_empty_cases() {
        let m = analyze("11223");
        assert!(generate_twin(&m.distinct_digits, &m.repeated_digits, 1, Some(&m.counts)).is_empty());
        assert!(generate_twin(&m.distinct_digits, &m.repeated_digits, 0, Some(&m.counts)).is_empty());
        assert!(generate_twin(&m.distinct_digits, &[], 3, Some(&m.counts)).is_empty());
        assert!(generate_twin(&m.distinct_digits, &m.repeated_digits, 3, None).is_empty());
    }

    #[test]
    fn test_twin_ceiling() {
        let m = analyze("001122334455667788990123456789");
        let got = generate_twin(&m.distinct_digits, &m.repeated_digits, 6, Some(&m.counts));
        assert!(got.is_empty());

        let relaxed = generate_twin_with_ceiling(
            &['1', '2'],
            &['1'],
            6,
            Some(&analyze("112222").counts),
            6,
        );
        assert!(!relaxed.is_empty());
        assert!(relaxed.iter().all(|s| s.len() == 6));
    }

    #[test]
    fn test_twin_properties() {
        let m = analyze("1122345");
        for k in 2..=5 {
            let got = generate_twin(&m.distinct_digits, &m.repeated_digits, k, Some(&m.counts));
            assert!(!got.is_empty());

            let mut sorted = got.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(got, sorted, "k={k} must be sorted and unique");

            for r in &got {
                assert_eq!(r.len(), k);
                assert!(has_repeat(r), "{r} has no repeat");
                for (&d, &supply) in &m.counts {
                    assert!(count_of(r, d) <= supply, "{r} overuses {d}");
                }
            }
        }
    }

    #[test]
    fn test_single_and_twin_are_disjoint() {
        for raw in ["1123", "11222", "1234", "998877", "0102030"] {
            let m = analyze(raw);
            for k in 2..=5 {
                let single: BTreeSet<String> =
                    generate_single(&m.distinct_digits, k).into_iter().collect();
                let twin: BTreeSet<String> =
                    generate_twin(&m.distinct_digits, &m.repeated_digits, k, Some(&m.counts))
                        .into_iter()
                        .collect();
                assert!(single.is_disjoint(&twin), "input {raw} k={k}");
            }
        }
    }

    #[test]
    fn test_twin_covers_all_supply_respecting_repeats() {
        // brute force over pool^k for a small case
        let m = analyze("11223");
        let k = 3;
        let pool = &m.distinct_digits;
        let mut expected = BTreeSet::new();
        for a in pool {
            for b in pool {
                for c in pool {
                    let s: String = [*a, *b, *c].iter().collect();
                    let fits = m.counts.iter().all(|(&d, &n)| count_of(&s, d) <= n);
                    if fits && has_repeat(&s) {
                        expected.insert(s);
                    }
                }
            }
        }
        let got = generate_twin(pool, &m.repeated_digits, k, Some(&m.counts));
        assert_eq!(got, expected.into_iter().collect::<Vec<_>>());
    }
}
