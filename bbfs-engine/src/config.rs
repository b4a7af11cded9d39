use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::permutation::TWIN_MAX_DIMENSION;
use crate::pricing::{default_discounts, DiscountTable, PriceBook};

pub const DEFAULT_CONFIG_FILE: &str = "bbfs.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Largest dimension for which repeated-digit combinations are built.
    pub twin_max_dimension: usize,
    /// Default chunk size when exporting results.
    pub copy_limit: usize,
    /// Historical results before this ISO date are ignored by the
    /// in-db / fresh filters.
    pub history_since: Option<String>,
    pub discounts: DiscountTable,
    pub prices: PriceBook,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            twin_max_dimension: TWIN_MAX_DIMENSION,
            copy_limit: 25,
            history_since: Some("2026-02-01".to_string()),
            discounts: default_discounts(),
            prices: PriceBook::default(),
        }
    }
}

impl EngineConfig {
    /// Reads the configuration at `path`, or the defaults when the file
    /// does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read {}", path.display()))?;
        let config: EngineConfig = serde_json::from_str(&json)
            .with_context(|| format!("Invalid JSON in {}", path.display()))?;
        log::info!("config loaded from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Cannot write {}", path.display()))?;
        Ok(())
    }
}
