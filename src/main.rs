use anyhow::{Context, Result};
use csdscraper::{
    config::Config,
    fetch::HttpFetcher,
    pipeline,
    resolve::PatternTable,
};
use std::{env, fs};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_TABLE_ID: &str = "HEA001";

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) load config + table id ───────────────────────────────────
    let config = match env::var_os("CSDSCRAPER_CONFIG") {
        Some(path) => Config::from_file(&path)?,
        None => Config::default(),
    };
    let table_id = env::args().nth(1).unwrap_or_else(|| DEFAULT_TABLE_ID.to_string());

    for dir in [&config.raw_dir, &config.clean_dir] {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating directory {}", dir.display()))?;
    }

    // ─── 3) run the pipeline ─────────────────────────────────────────
    let fetcher = HttpFetcher::new(config.timeout()).context("building HTTP client")?;
    let provider = PatternTable::builtin();

    let report = pipeline::run(&fetcher, &provider, &config, &table_id).await?;

    info!(
        table_id = %report.table_id,
        source = %report.source_url,
        raw = %report.raw_path.display(),
        cleaned = %report.cleaned_path.display(),
        rows = report.rows_written,
        dropped = report.rows_dropped,
        "done"
    );
    Ok(())
}
