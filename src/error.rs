use std::path::PathBuf;
use thiserror::Error;

/// Transport-level failure for a single candidate URL. One attempt per
/// candidate; the pipeline moves to the next candidate on any of these.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} from {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("invalid candidate URL {url}: {source}")]
    BadUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Terminal pipeline errors, surfaced to the caller.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Every candidate was tried; none yielded classifiable tabular content.
    /// `raw_html` points at the last HTML response, kept for manual follow-up.
    #[error("no candidate for table {table_id} yielded tabular content")]
    UnresolvedSource {
        table_id: String,
        raw_html: Option<PathBuf>,
    },

    /// All candidates were unreachable; carries the last transport error.
    #[error("all candidates for table {table_id} unreachable")]
    AllCandidatesFailed {
        table_id: String,
        #[source]
        last: FetchError,
    },

    #[error(transparent)]
    Clean(#[from] CleanError),

    #[error("writing artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures of the extractor/cleaner as a whole. Per-row parse problems are
/// never errors; they drop the row and bump the outcome's dropped count.
#[derive(Debug, Error)]
pub enum CleanError {
    #[error("raw table is missing required columns (age: {age_found}, sex: {sex_found})")]
    MissingColumns { age_found: bool, sex_found: bool },

    #[error("reading raw CSV: {0}")]
    Csv(#[from] csv::Error),
}
