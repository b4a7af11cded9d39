mod display;
mod import;

use std::collections::HashSet;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};

use bbfs_db::db::{
    count_entries, db_path, delete_entry, duplicate_occurrences, fetch_last_entries,
    fetch_results_since, insert_entry, migrate, open_db, search_entries, upsert_entry, wipe,
};
use bbfs_db::models::{normalize_date, normalize_slot, validate_entry, HistoryEntry};
use bbfs_db::rusqlite::Connection;
use bbfs_engine::calculator::{compute_bbfs, compute_poltar, BbfsResults};
use bbfs_engine::config::{EngineConfig, DEFAULT_CONFIG_FILE};
use bbfs_engine::digits::analyze;
use bbfs_engine::dimension::Dimension;
use bbfs_engine::export::ExportCursor;
use bbfs_engine::filter::{history_signatures, FilterSet, HistoryFilter};
use bbfs_engine::pricing::{summarize_costs, PriceTier};
use crate::display::{
    display_duplicates, display_entries, display_import_summary, display_multiset,
    display_results, display_summary,
};

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum HistoryArg {
    #[default]
    All,
    InDb,
    Fresh,
}

impl From<HistoryArg> for HistoryFilter {
    fn from(arg: HistoryArg) -> Self {
        match arg {
            HistoryArg::All => HistoryFilter::All,
            HistoryArg::InDb => HistoryFilter::InDb,
            HistoryArg::Fresh => HistoryFilter::Fresh,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum TierArg {
    #[default]
    Full,
    Diskon,
    Super,
}

impl From<TierArg> for PriceTier {
    fn from(arg: TierArg) -> Self {
        match arg {
            TierArg::Full => PriceTier::Full,
            TierArg::Diskon => PriceTier::Diskon,
            TierArg::Super => PriceTier::Super,
        }
    }
}

#[derive(Args, Debug, Clone)]
struct FilterArgs {
    /// Dimensions to include (comma separated)
    #[arg(short, long, value_delimiter = ',', default_value = "2,3,4,5")]
    dims: Vec<Dimension>,

    /// Hide combinations without repeated digits
    #[arg(long)]
    no_single: bool,

    /// Hide combinations with exactly one pair
    #[arg(long)]
    no_twin: bool,

    /// Hide combinations with a triple or several pairs
    #[arg(long)]
    no_twin_plus: bool,

    /// Hide combinations made only of digits 0-4
    #[arg(long)]
    no_small: bool,

    /// Hide combinations mixing 0-4 and 5-9
    #[arg(long)]
    no_mix: bool,

    /// Hide combinations made only of digits 5-9
    #[arg(long)]
    no_large: bool,

    /// Keep everything, only combinations already drawn, or only fresh ones
    #[arg(long, value_enum, default_value = "all")]
    history: HistoryArg,

    /// Earliest draw date taken into account by --history (YYYY-MM-DD)
    #[arg(long)]
    since: Option<String>,
}

impl FilterArgs {
    fn filter_set(&self) -> FilterSet {
        FilterSet {
            single: !self.no_single,
            twin: !self.no_twin,
            twin_plus: !self.no_twin_plus,
            small: !self.no_small,
            mix: !self.no_mix,
            large: !self.no_large,
            history: self.history.into(),
        }
    }
}

#[derive(Parser)]
#[command(name = "bbfs", about = "BBFS combination calculator")]
struct Cli {
    /// Configuration file (defaults are used if it does not exist)
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate every combination of a BBFS seed
    Generate {
        /// Seed digits, e.g. 12366
        digits: String,

        #[command(flatten)]
        filters: FilterArgs,

        /// Print the combinations, not only the summary
        #[arg(short, long)]
        list: bool,

        /// Price tier used for the cost columns
        #[arg(short, long, value_enum, default_value = "full")]
        tier: TierArg,
    },

    /// Generate combinations from per-position candidate digits
    Poltar {
        #[arg(long, default_value = "")]
        p1: String,
        #[arg(long, default_value = "")]
        p2: String,
        #[arg(long, default_value = "")]
        p3: String,
        #[arg(long, default_value = "")]
        p4: String,
        #[arg(long, default_value = "")]
        p5: String,

        #[command(flatten)]
        filters: FilterArgs,

        #[arg(short, long)]
        list: bool,

        #[arg(short, long, value_enum, default_value = "full")]
        tier: TierArg,
    },

    /// Print combinations as a '*'-separated line, optionally one chunk at a time
    Export {
        digits: String,

        #[command(flatten)]
        filters: FilterArgs,

        /// Chunk size (defaults to copy_limit from the configuration)
        #[arg(short, long)]
        chunk: Option<usize>,

        /// Zero-based chunk number
        #[arg(short, long, default_value = "0")]
        index: usize,

        /// Print everything in one line
        #[arg(long)]
        all: bool,
    },

    /// Import draw results from a CSV (date;slot;result[;digits]) or JSON file
    Import {
        #[arg(short, long)]
        file: PathBuf,

        /// Replace entries that already exist for the same date and slot
        #[arg(long)]
        replace: bool,
    },

    /// Add one draw result
    Add {
        /// Draw date (YYYY-MM-DD or DD/MM/YYYY)
        #[arg(long)]
        date: String,

        /// Time slot, e.g. "JAM 13" or 13
        #[arg(long)]
        slot: String,

        #[arg(long, default_value = "")]
        result: String,

        /// BBFS digits (defaults to the sorted result)
        #[arg(long, default_value = "")]
        digits: String,

        /// Overwrite an existing entry for the same date and slot
        #[arg(long)]
        replace: bool,
    },

    /// List the latest draw results
    List {
        #[arg(short, long, default_value = "20")]
        last: u32,

        /// Only entries whose date, result or BBFS contains this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Delete one draw result
    Delete {
        #[arg(long)]
        date: String,
        #[arg(long)]
        slot: String,
    },

    /// Delete every stored draw result
    Wipe {
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Show BBFS digit sets that came out more than once
    Duplicates,

    /// Print the database path
    DbPath,

    /// Print the effective configuration
    Config {
        /// Write it to the configuration file
        #[arg(long)]
        init: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = EngineConfig::load(&cli.config)?;

    let path = db_path();
    let conn = open_db(&path)?;
    migrate(&conn)?;

    match cli.command {
        Command::Generate { digits, filters, list, tier } => {
            display_multiset(&analyze(&digits));
            let results = compute_bbfs(&digits, config.twin_max_dimension);
            cmd_report(&conn, &config, &results, &filters, list, tier.into())
        }
        Command::Poltar { p1, p2, p3, p4, p5, filters, list, tier } => {
            let results = compute_poltar([p1.as_str(), p2.as_str(), p3.as_str(), p4.as_str(), p5.as_str()]);
            cmd_report(&conn, &config, &results, &filters, list, tier.into())
        }
        Command::Export { digits, filters, chunk, index, all } => {
            cmd_export(&conn, &config, &digits, &filters, chunk, index, all)
        }
        Command::Import { file, replace } => {
            let result = import::import_file(&conn, &file, replace)?;
            display_import_summary(&result);
            Ok(())
        }
        Command::Add { date, slot, result, digits, replace } => {
            cmd_add(&conn, &date, &slot, &result, &digits, replace)
        }
        Command::List { last, search } => cmd_list(&conn, last, search.as_deref()),
        Command::Delete { date, slot } => cmd_delete(&conn, &date, &slot),
        Command::Wipe { yes } => cmd_wipe(&conn, yes),
        Command::Duplicates => {
            display_duplicates(&duplicate_occurrences(&conn)?);
            Ok(())
        }
        Command::DbPath => {
            println!("{}", path.display());
            Ok(())
        }
        Command::Config { init } => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            if init {
                config.save(&cli.config)?;
                println!("\nConfiguration written to {}", cli.config.display());
            }
            Ok(())
        }
    }
}

/// Historical signatures for the in-db / fresh filters. Empty when the
/// filter does not look at history.
fn load_signatures(
    conn: &Connection,
    config: &EngineConfig,
    filters: &FilterArgs,
) -> Result<HashSet<String>> {
    if matches!(filters.history, HistoryArg::All) {
        return Ok(HashSet::new());
    }
    let since = match filters.since.as_deref().or(config.history_since.as_deref()) {
        Some(raw) => Some(normalize_date(raw)?),
        None => None,
    };
    let results = fetch_results_since(conn, since.as_deref())?;
    if results.is_empty() {
        println!("No draw results in the database; history filter matches nothing.");
    }
    let sigs = history_signatures(results.iter().map(|s| s.as_str()));
    log::debug!("{} results since {:?} -> {} signatures", results.len(), since, sigs.len());
    Ok(sigs)
}

fn filtered_results(
    conn: &Connection,
    config: &EngineConfig,
    results: &BbfsResults,
    filters: &FilterArgs,
) -> Result<BbfsResults> {
    let signatures = load_signatures(conn, config, filters)?;
    Ok(results.filtered(&filters.filter_set(), &signatures))
}

fn cmd_report(
    conn: &Connection,
    config: &EngineConfig,
    results: &BbfsResults,
    filters: &FilterArgs,
    list: bool,
    tier: PriceTier,
) -> Result<()> {
    let filtered = filtered_results(conn, config, results, filters)?;
    let rows = summarize_costs(
        &filtered.counts(),
        &filters.dims,
        &config.prices,
        &config.discounts,
        tier,
    );
    display_summary(&rows, tier);
    if list {
        display_results(&filtered, &filters.dims);
    }
    Ok(())
}

fn cmd_export(
    conn: &Connection,
    config: &EngineConfig,
    digits: &str,
    filters: &FilterArgs,
    chunk: Option<usize>,
    index: usize,
    all: bool,
) -> Result<()> {
    let results = compute_bbfs(digits, config.twin_max_dimension);
    let filtered = filtered_results(conn, config, &results, filters)?;
    let list = filtered.collect_selected(&filters.dims);
    if list.is_empty() {
        bail!("Nothing to export");
    }

    if all {
        let mut cursor = ExportCursor::new();
        if let Some(line) = cursor.all(&list) {
            println!("{line}");
        }
        return Ok(());
    }

    let size = chunk.unwrap_or(config.copy_limit);
    if size == 0 {
        bail!("Chunk size must be positive");
    }
    let mut cursor = ExportCursor::at(index.saturating_mul(size));
    match cursor.next_chunk(&list, size) {
        Some(line) => {
            println!("{line}");
            eprintln!(
                "chunk {} of {} ({} remaining)",
                index + 1,
                list.len().div_ceil(size),
                cursor.remaining(&list)
            );
            Ok(())
        }
        None => bail!("Chunk {} is past the end ({} combinations)", index, list.len()),
    }
}

fn cmd_add(
    conn: &Connection,
    date: &str,
    slot: &str,
    result: &str,
    digits: &str,
    replace: bool,
) -> Result<()> {
    let date = normalize_date(date)?;
    let entry = HistoryEntry::new(&date, slot, result, digits);
    validate_entry(&entry)?;

    display_entries(std::slice::from_ref(&entry));
    if replace {
        upsert_entry(conn, &entry)?;
        println!("Entry saved.");
    } else if insert_entry(conn, &entry)? {
        println!("Entry saved.");
    } else {
        println!("An entry already exists for {} {} (use --replace).", entry.date, entry.slot);
    }
    Ok(())
}

fn cmd_list(conn: &Connection, last: u32, search: Option<&str>) -> Result<()> {
    let n = count_entries(conn)?;
    if n == 0 {
        println!("Empty database. Start with: bbfs import --file <history.csv>");
        return Ok(());
    }
    let entries = match search {
        Some(term) => search_entries(conn, term, last)?,
        None => fetch_last_entries(conn, last)?,
    };
    display_entries(&entries);
    println!("{} of {} entries", entries.len(), n);
    Ok(())
}

fn cmd_delete(conn: &Connection, date: &str, slot: &str) -> Result<()> {
    let date = normalize_date(date)?;
    let slot = normalize_slot(slot);
    if delete_entry(conn, &date, &slot)? {
        println!("Deleted {} {}.", date, slot);
    } else {
        println!("No entry for {} {}.", date, slot);
    }
    Ok(())
}

fn cmd_wipe(conn: &Connection, yes: bool) -> Result<()> {
    if !yes {
        let confirm = prompt("Delete ALL stored draw results? (y/n) : ")?;
        if confirm.to_lowercase() != "y" {
            println!("Cancelled.");
            return Ok(());
        }
    }
    let removed = wipe(conn)?;
    println!("{} entries removed.", removed);
    Ok(())
}

fn prompt(msg: &str) -> Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Read error")?;
    Ok(input.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_generate() {
        let cli = Cli::try_parse_from([
            "bbfs", "generate", "12366", "--dims", "2,4D", "--no-twin-plus", "--history", "fresh",
        ])
        .unwrap();
        match cli.command {
            Command::Generate { digits, filters, list, .. } => {
                assert_eq!(digits, "12366");
                assert_eq!(filters.dims, vec![Dimension::D2, Dimension::D4]);
                assert!(!list);
                let set = filters.filter_set();
                assert!(!set.twin_plus);
                assert!(set.twin);
                assert_eq!(set.history, HistoryFilter::Fresh);
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_cli_rejects_bad_dimension() {
        assert!(Cli::try_parse_from(["bbfs", "generate", "123", "--dims", "6"]).is_err());
    }

    #[test]
    fn test_cli_default_filters() {
        let cli = Cli::try_parse_from(["bbfs", "export", "1234"]).unwrap();
        match cli.command {
            Command::Export { filters, chunk, index, all, .. } => {
                assert_eq!(filters.dims, Dimension::ALL.to_vec());
                assert_eq!(filters.filter_set(), FilterSet::default());
                assert_eq!(chunk, None);
                assert_eq!(index, 0);
                assert!(!all);
            }
            _ => panic!("expected export"),
        }
    }

    #[test]
    fn test_load_signatures_respects_since() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        insert_entry(&conn, &HistoryEntry::new("2026-01-15", "JAM 01", "1234", "")).unwrap();
        insert_entry(&conn, &HistoryEntry::new("2026-02-02", "JAM 01", "5678", "")).unwrap();

        let cli = Cli::try_parse_from(["bbfs", "generate", "1", "--history", "in-db"]).unwrap();
        let Command::Generate { filters, .. } = cli.command else {
            panic!("expected generate");
        };

        let config = EngineConfig::default();
        let sigs = load_signatures(&conn, &config, &filters).unwrap();
        assert!(sigs.contains("78"));
        assert!(!sigs.contains("34"));

        let config = EngineConfig { history_since: None, ..EngineConfig::default() };
        let sigs = load_signatures(&conn, &config, &filters).unwrap();
        assert!(sigs.contains("34"));
    }
}
