use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path, path::PathBuf, time::Duration};

/// Explicit run configuration. Everything the pipeline touches comes through
/// here; nothing is read from process-wide mutable state.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site root the advertised web-table endpoint hangs off.
    pub base_url: String,
    /// Directory for verbatim raw downloads, one artifact per table id.
    pub raw_dir: PathBuf,
    /// Directory the cleaned CSV is written to.
    pub clean_dir: PathBuf,
    /// Per-request timeout in seconds. One attempt per candidate, no backoff.
    pub timeout_secs: u64,
    /// Inclusive age band kept by the cleaner.
    pub min_age: u32,
    pub max_age: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://www.censtatd.gov.hk".to_string(),
            raw_dir: PathBuf::from("data/raw"),
            clean_dir: PathBuf::from("data/cleaned"),
            timeout_secs: 30,
            min_age: 18,
            max_age: 80,
        }
    }
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Load from a JSON file; absent keys fall back to the defaults above.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))
    }
}
