pub mod links;

use crate::error::FetchError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

const USER_AGENT: &str = "csdscraper/0.1";

/// What the transport thinks the payload is. Advisory only; the classifier's
/// read of the body wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentHint {
    Csv,
    Html,
    Unknown,
}

/// One fetched candidate: verbatim bytes plus the transport's hint.
/// Immutable once constructed; persisted as-is for audit.
#[derive(Debug, Clone)]
pub struct RawResource {
    pub url: String,
    pub bytes: Vec<u8>,
    pub hint: ContentHint,
}

impl RawResource {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// Injectable transport. Production uses [`HttpFetcher`]; tests substitute a
/// canned map of responses.
#[async_trait]
pub trait Fetch {
    async fn fetch(&self, url: &str) -> Result<RawResource, FetchError>;
}

/// `reqwest`-backed fetcher with a bounded per-request timeout.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url_str: &str) -> Result<RawResource, FetchError> {
        let url = Url::parse(url_str).map_err(|source| FetchError::BadUrl {
            url: url_str.to_string(),
            source,
        })?;

        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url_str.to_string(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url_str.to_string(),
                status,
            });
        }

        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();
        let hint = hint_from(&content_type, url.path());
        debug!(url = %url, content_type = %content_type, ?hint, "fetched");

        let bytes = resp
            .bytes()
            .await
            .map_err(|source| FetchError::Transport {
                url: url_str.to_string(),
                source,
            })?;

        Ok(RawResource {
            url: url_str.to_string(),
            bytes: bytes.to_vec(),
            hint,
        })
    }
}

fn hint_from(content_type: &str, path: &str) -> ContentHint {
    if content_type.contains("text/csv") || path.to_ascii_lowercase().ends_with(".csv") {
        ContentHint::Csv
    } else if content_type.contains("text/html") {
        ContentHint::Html
    } else {
        ContentHint::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_hint_from_header_or_extension() {
        assert_eq!(hint_from("text/csv; charset=utf-8", "/x"), ContentHint::Csv);
        assert_eq!(
            hint_from("text/html", "/Table_HEA001_en.csv"),
            ContentHint::Csv
        );
        assert_eq!(
            hint_from("text/html; charset=utf-8", "/page"),
            ContentHint::Html
        );
        assert_eq!(
            hint_from("application/octet-stream", "/blob"),
            ContentHint::Unknown
        );
    }
}
