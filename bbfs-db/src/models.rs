use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use bbfs_engine::digits::{clean_digits, signature};

/// Draw times of day, in chronological order.
pub const TIME_SLOTS: [&str; 8] = [
    "JAM 01", "JAM 13", "JAM 15", "JAM 16", "JAM 19", "JAM 21", "JAM 22", "JAM 23",
];

/// A drawn result, keyed by date and time slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub date: String,
    pub slot: String,
    pub result: String,
    pub digits: String,
}

impl HistoryEntry {
    /// Strips non-digits from `result` and `digits`; an empty `digits` is
    /// derived from the sorted result.
    pub fn new(date: &str, slot: &str, result: &str, digits: &str) -> Self {
        let result = clean_digits(result);
        let mut digits = clean_digits(digits);
        if digits.is_empty() {
            digits = signature(&result);
        }
        let slot = normalize_slot(slot);
        Self {
            id: entry_id(date, &slot),
            date: date.trim().to_string(),
            slot,
            result,
            digits,
        }
    }

    pub fn slot_order(&self) -> usize {
        slot_order(&self.slot).unwrap_or(TIME_SLOTS.len())
    }
}

pub fn entry_id(date: &str, slot: &str) -> String {
    format!("{}|{}", date.trim(), slot)
}

pub fn slot_order(slot: &str) -> Option<usize> {
    TIME_SLOTS.iter().position(|s| *s == slot)
}

/// Accepts "JAM 13", "jam 13", "13" or "1".
pub fn normalize_slot(raw: &str) -> String {
    let upper = raw.trim().to_uppercase();
    let hour = upper.strip_prefix("JAM").unwrap_or(&upper).trim();
    match hour.parse::<u8>() {
        Ok(h) => format!("JAM {:02}", h),
        Err(_) => upper,
    }
}

/// ISO dates pass through; DD/MM/YYYY is converted.
pub fn normalize_date(raw: &str) -> Result<String> {
    let raw = raw.trim();
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d/%m/%Y"))
        .with_context(|| format!("Invalid date format: '{}'", raw))?;
    Ok(date.format("%Y-%m-%d").to_string())
}

pub fn validate_entry(entry: &HistoryEntry) -> Result<()> {
    if NaiveDate::parse_from_str(&entry.date, "%Y-%m-%d").is_err() {
        bail!("Invalid date '{}' (expected YYYY-MM-DD)", entry.date);
    }
    if slot_order(&entry.slot).is_none() {
        bail!("Unknown slot '{}' (expected one of {})", entry.slot, TIME_SLOTS.join(", "));
    }
    if !entry.result.chars().all(|c| c.is_ascii_digit()) {
        bail!("Result '{}' must contain digits only", entry.result);
    }
    if entry.digits.is_empty() {
        bail!("Entry {} has neither a result nor BBFS digits", entry.id);
    }
    if !entry.digits.chars().all(|c| c.is_ascii_digit()) {
        bail!("BBFS digits '{}' must contain digits only", entry.digits);
    }
    Ok(())
}

/// The n-th time a BBFS digit set came back, counted chronologically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateOccurrence {
    pub date: String,
    pub slot: String,
    pub digits: String,
    pub occurrence: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entry_derives_digits() {
        let e = HistoryEntry::new("2026-02-03", "JAM 13", "4 8-2 1", "");
        assert_eq!(e.result, "4821");
        assert_eq!(e.digits, "1248");
        assert_eq!(e.id, "2026-02-03|JAM 13");
    }

    #[test]
    fn test_new_entry_keeps_explicit_digits() {
        let e = HistoryEntry::new("2026-02-03", "13", "4821", "1234567");
        assert_eq!(e.digits, "1234567");
        assert_eq!(e.slot, "JAM 13");
    }

    #[test]
    fn test_normalize_slot() {
        assert_eq!(normalize_slot("jam 1"), "JAM 01");
        assert_eq!(normalize_slot("23"), "JAM 23");
        assert_eq!(normalize_slot("JAM 19"), "JAM 19");
        assert_eq!(normalize_slot("night"), "NIGHT");
    }

    #[test]
    fn test_slot_order() {
        assert_eq!(slot_order("JAM 01"), Some(0));
        assert_eq!(slot_order("JAM 23"), Some(7));
        assert_eq!(slot_order("JAM 02"), None);
    }

    #[test]
    fn test_normalize_date() {
        assert_eq!(normalize_date("17/02/2026").unwrap(), "2026-02-17");
        assert_eq!(normalize_date("2026-02-01").unwrap(), "2026-02-01");
        assert!(normalize_date("2026-13-01").is_err());
        assert!(normalize_date("yesterday").is_err());
    }

    #[test]
    fn test_validate_entry_ok() {
        assert!(validate_entry(&HistoryEntry::new("2026-02-01", "JAM 01", "1234", "")).is_ok());
        assert!(validate_entry(&HistoryEntry::new("2026-02-01", "JAM 22", "", "0189")).is_ok());
    }

    #[test]
    fn test_validate_entry_rejects() {
        assert!(validate_entry(&HistoryEntry::new("01/02/2026", "JAM 01", "1234", "")).is_err());
        assert!(validate_entry(&HistoryEntry::new("2026-02-01", "JAM 02", "1234", "")).is_err());
        assert!(validate_entry(&HistoryEntry::new("2026-02-01", "JAM 01", "", "")).is_err());

        let mut e = HistoryEntry::new("2026-02-01", "JAM 01", "1234", "");
        e.result = "12a4".to_string();
        assert!(validate_entry(&e).is_err());
    }
}
