//! Orchestration: resolve → fetch → classify → (link fallback) → clean.
//!
//! One candidate at a time, single attempt each; the raw payload of the
//! winning candidate is persisted verbatim before cleaning so every cleaned
//! table can be audited against what the site actually served.

use crate::{
    config::Config,
    error::{FetchError, ScrapeError},
    fetch::{links, Fetch, RawResource},
    process::{classify, clean, write_cleaned, ContentKind},
    resolve::{resolve, PatternProvider},
};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{info, warn};
use url::Url;

/// Summary of a successful run.
#[derive(Debug)]
pub struct RunReport {
    pub table_id: String,
    pub source_url: String,
    pub raw_path: PathBuf,
    pub cleaned_path: PathBuf,
    pub rows_written: usize,
    pub rows_dropped: usize,
}

/// Run the whole pipeline for one table id.
///
/// Candidates come from the pattern provider in likelihood order. An HTML
/// response is kept on disk and mined for static tabular links before moving
/// on; if every candidate is exhausted the run fails with
/// [`ScrapeError::UnresolvedSource`] (raw HTML retained) or, when nothing was
/// reachable at all, the last [`FetchError`].
#[tracing::instrument(level = "info", skip(fetcher, provider, config))]
pub async fn run(
    fetcher: &impl Fetch,
    provider: &impl PatternProvider,
    config: &Config,
    table_id: &str,
) -> Result<RunReport, ScrapeError> {
    let candidates = resolve(provider, &config.base_url, table_id);
    if candidates.is_empty() {
        warn!(table_id, "no registered pattern; manual resolution required");
        return Err(ScrapeError::UnresolvedSource {
            table_id: table_id.to_string(),
            raw_html: None,
        });
    }
    info!(count = candidates.len(), "resolved candidates");

    let mut last_fetch_err: Option<FetchError> = None;
    let mut saved_html: Option<PathBuf> = None;
    let mut fetched_any = false;

    for url in &candidates {
        let resource = match fetcher.fetch(url).await {
            Ok(r) => r,
            Err(e) => {
                warn!(url, error = %e, "candidate fetch failed");
                last_fetch_err = Some(e);
                continue;
            }
        };
        fetched_any = true;

        match classify(&resource.bytes) {
            ContentKind::Csv => {
                return finish_with_csv(config, table_id, &resource);
            }
            ContentKind::Html => {
                let html_path = persist_raw(config, table_id, "html", &resource.bytes)?;
                info!(path = %html_path.display(), "saved HTML response for inspection");
                saved_html = Some(html_path);

                // Static markup may still carry the real download link.
                if let Some(report) =
                    try_static_links(fetcher, config, table_id, &resource).await?
                {
                    return Ok(report);
                }
            }
            ContentKind::Unknown => {
                warn!(url, "unclassifiable payload; trying next candidate");
            }
        }
    }

    match (fetched_any, last_fetch_err) {
        (false, Some(last)) => Err(ScrapeError::AllCandidatesFailed {
            table_id: table_id.to_string(),
            last,
        }),
        _ => Err(ScrapeError::UnresolvedSource {
            table_id: table_id.to_string(),
            raw_html: saved_html,
        }),
    }
}

/// Follow anchors found in a fetched page. Link-extraction failures are
/// treated like any other dead candidate.
async fn try_static_links(
    fetcher: &impl Fetch,
    config: &Config,
    table_id: &str,
    page: &RawResource,
) -> Result<Option<RunReport>, ScrapeError> {
    let Ok(base) = Url::parse(&page.url) else {
        return Ok(None);
    };

    for link in links::extract_tabular_links(&page.text(), &base) {
        let resource = match fetcher.fetch(link.as_str()).await {
            Ok(r) => r,
            Err(e) => {
                warn!(url = %link, error = %e, "linked download failed");
                continue;
            }
        };
        if classify(&resource.bytes) == ContentKind::Csv {
            return finish_with_csv(config, table_id, &resource).map(Some);
        }
    }
    Ok(None)
}

fn finish_with_csv(
    config: &Config,
    table_id: &str,
    resource: &RawResource,
) -> Result<RunReport, ScrapeError> {
    let raw_path = persist_raw(config, table_id, "csv", &resource.bytes)?;

    let outcome = clean(&resource.text(), config.min_age, config.max_age)?;

    let cleaned_path = config.clean_dir.join(format!("{}_cleaned.csv", table_id));
    ensure_parent(&cleaned_path)?;
    write_cleaned(&cleaned_path, &outcome.rows)?;

    info!(
        rows = outcome.rows.len(),
        dropped = outcome.dropped,
        path = %cleaned_path.display(),
        "cleaned table written"
    );

    Ok(RunReport {
        table_id: table_id.to_string(),
        source_url: resource.url.clone(),
        raw_path,
        cleaned_path,
        rows_written: outcome.rows.len(),
        rows_dropped: outcome.dropped,
    })
}

fn persist_raw(
    config: &Config,
    table_id: &str,
    ext: &str,
    bytes: &[u8],
) -> Result<PathBuf, ScrapeError> {
    let path = config.raw_dir.join(format!("{}_raw.{}", table_id, ext));
    ensure_parent(&path)?;
    fs::write(&path, bytes).map_err(|source| ScrapeError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

fn ensure_parent(path: &Path) -> Result<(), ScrapeError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| ScrapeError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}
