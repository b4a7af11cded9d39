use anyhow::{Context, Result};
use bbfs_db::rusqlite::Connection;
use serde::Deserialize;
use std::path::Path;

use bbfs_db::db::{insert_entry, upsert_entry};
use bbfs_db::models::{normalize_date, validate_entry, HistoryEntry};

#[derive(Debug, Default)]
pub struct ImportResult {
    pub total_records: u32,
    pub inserted: u32,
    pub skipped: u32,
    pub errors: u32,
}

/// Entry as exported from the browser calculator's local storage.
#[derive(Debug, Deserialize)]
struct StoredEntry {
    date: String,
    label: String,
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    digits: Option<String>,
}

impl StoredEntry {
    fn into_entry(self) -> Result<HistoryEntry> {
        let date = normalize_date(&self.date)?;
        Ok(HistoryEntry::new(
            &date,
            &self.label,
            self.result.as_deref().unwrap_or_default(),
            self.digits.as_deref().unwrap_or_default(),
        ))
    }
}

/// `date;slot;result[;digits]`
fn parse_record(record: &csv::StringRecord) -> Result<HistoryEntry> {
    let get = |idx: usize| -> Result<String> {
        record
            .get(idx)
            .map(|s| s.trim().to_string())
            .with_context(|| format!("Missing field at index {}", idx))
    };

    let date = normalize_date(&get(0)?)?;
    let slot = get(1)?;
    let result = get(2)?;
    let digits = get(3).unwrap_or_default();

    Ok(HistoryEntry::new(&date, &slot, &result, &digits))
}

pub fn parse_json(json: &str) -> Result<Vec<Result<HistoryEntry>>> {
    let stored: Vec<StoredEntry> = serde_json::from_str(json)
        .context("Expected a JSON array of entries")?;
    Ok(stored.into_iter().map(StoredEntry::into_entry).collect())
}

fn store(conn: &Connection, entry: Result<HistoryEntry>, replace: bool, result: &mut ImportResult) {
    result.total_records += 1;
    let line = result.total_records;
    let outcome = entry.and_then(|e| {
        validate_entry(&e)?;
        if replace {
            upsert_entry(conn, &e)?;
            Ok(true)
        } else {
            insert_entry(conn, &e)
        }
    });
    match outcome {
        Ok(true) => result.inserted += 1,
        Ok(false) => result.skipped += 1,
        Err(e) => {
            eprintln!("Record {}: {}", line, e);
            log::warn!("import record {} rejected: {:#}", line, e);
            result.errors += 1;
        }
    }
}

/// Imports a `.json` local-storage dump or a `;`-separated CSV file.
pub fn import_file(conn: &Connection, path: &Path, replace: bool) -> Result<ImportResult> {
    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let tx = conn.unchecked_transaction()
        .context("Cannot start transaction")?;
    let mut result = ImportResult::default();

    if is_json {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open {:?}", path))?;
        for entry in parse_json(&json)? {
            store(&tx, entry, replace, &mut result);
        }
    } else {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("Cannot open {:?}", path))?;
        for record_result in reader.records() {
            let entry = record_result
                .context("Unreadable line")
                .and_then(|record| parse_record(&record));
            store(&tx, entry, replace, &mut result);
        }
    }

    tx.commit().context("Commit failed")?;
    log::info!(
        "imported {:?}: {} inserted, {} skipped, {} errors",
        path,
        result.inserted,
        result.skipped,
        result.errors
    );
    Ok(result)
}
