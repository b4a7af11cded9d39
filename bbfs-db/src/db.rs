use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{Connection, Row};

use crate::models::{DuplicateOccurrence, HistoryEntry};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS entries (
    id          TEXT PRIMARY KEY,
    date        TEXT NOT NULL,
    slot        TEXT NOT NULL,
    slot_order  INTEGER NOT NULL,
    result      TEXT NOT NULL DEFAULT '',
    digits      TEXT NOT NULL,
    UNIQUE (date, slot)
);
CREATE INDEX IF NOT EXISTS entries_date ON entries (date);
";

const COLUMNS: &str = "id, date, slot, result, digits";

pub fn db_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("bbfs.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create directory {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Cannot open database {:?}", path))?;
    log::debug!("opened database {:?}", path);
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Migration failed")?;
    Ok(())
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<HistoryEntry> {
    Ok(HistoryEntry {
        id: row.get(0)?,
        date: row.get(1)?,
        slot: row.get(2)?,
        result: row.get(3)?,
        digits: row.get(4)?,
    })
}

/// Inserts `entry` unless one already exists for its date and slot.
pub fn insert_entry(conn: &Connection, entry: &HistoryEntry) -> Result<bool> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO entries (id, date, slot, slot_order, result, digits)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
            entry.id,
            entry.date,
            entry.slot,
            entry.slot_order() as i64,
            entry.result,
            entry.digits,
        ],
    ).context("Insert failed")?;
    Ok(changed > 0)
}

/// Inserts `entry`, replacing whatever was stored for its date and slot.
pub fn upsert_entry(conn: &Connection, entry: &HistoryEntry) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO entries (id, date, slot, slot_order, result, digits)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
            entry.id,
            entry.date,
            entry.slot,
            entry.slot_order() as i64,
            entry.result,
            entry.digits,
        ],
    ).context("Upsert failed")?;
    Ok(())
}

pub fn delete_entry(conn: &Connection, date: &str, slot: &str) -> Result<bool> {
    let changed = conn
        .execute(
            "DELETE FROM entries WHERE date = ?1 AND slot = ?2",
            rusqlite::params![date, slot],
        )
        .context("Delete failed")?;
    Ok(changed > 0)
}

pub fn wipe(conn: &Connection) -> Result<usize> {
    let changed = conn.execute("DELETE FROM entries", []).context("Wipe failed")?;
    Ok(changed)
}

pub fn count_entries(conn: &Connection) -> Result<u32> {
    let count: u32 = conn.query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))?;
    Ok(count)
}

/// Most recent first: by date, then by slot within the day.
pub fn fetch_last_entries(conn: &Connection, limit: u32) -> Result<Vec<HistoryEntry>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM entries ORDER BY date DESC, slot_order DESC LIMIT ?1"
    ))?;
    let entries = stmt
        .query_map([limit], entry_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(entries)
}

/// Entries whose date, result or BBFS digits contain `term`.
pub fn search_entries(conn: &Connection, term: &str, limit: u32) -> Result<Vec<HistoryEntry>> {
    let pattern = format!("%{}%", term.trim());
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM entries
         WHERE date LIKE ?1 OR result LIKE ?1 OR digits LIKE ?1
         ORDER BY date DESC, slot_order DESC LIMIT ?2"
    ))?;
    let entries = stmt
        .query_map(rusqlite::params![pattern, limit], entry_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(entries)
}

/// Non-empty results drawn on or after `since` (every result when `None`).
pub fn fetch_results_since(conn: &Connection, since: Option<&str>) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT result FROM entries
         WHERE result <> '' AND (?1 IS NULL OR date >= ?1)
         ORDER BY date ASC, slot_order ASC",
    )?;
    let results = stmt
        .query_map([since], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(results)
}

/// For every BBFS digit set stored more than once, numbers its occurrences
/// in chronological order.
pub fn duplicate_occurrences(conn: &Connection) -> Result<Vec<DuplicateOccurrence>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM entries ORDER BY date ASC, slot_order ASC"
    ))?;
    let entries = stmt
        .query_map([], entry_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    let mut totals: HashMap<&str, usize> = HashMap::new();
    for e in &entries {
        *totals.entry(e.digits.as_str()).or_insert(0) += 1;
    }

    let mut seen: HashMap<&str, usize> = HashMap::new();
    let mut out = Vec::new();
    for e in &entries {
        if totals[e.digits.as_str()] < 2 {
            continue;
        }
        let n = seen.entry(e.digits.as_str()).or_insert(0);
        *n += 1;
        out.push(DuplicateOccurrence {
            date: e.date.clone(),
            slot: e.slot.clone(),
            digits: e.digits.clone(),
            occurrence: *n,
        });
    }
    Ok(out)
}
