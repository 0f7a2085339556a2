//! Bucharest Stock Exchange provider.
//!
//! Fetches the per-instrument detail page and pulls the YTM out of its text,
//! and downloads the bond catalog. There is no retry: a failed instrument is
//! simply absent from this run, and the next refresh run tries again.
//!
//! The detail page has no API contract. Any markup or wording change shows up
//! as `YieldNotFound` for every instrument rather than as a hard failure.

use super::extract::{LabelPatternExtractor, YieldExtractor};
use super::provider::{DataError, YieldSource};
use crate::config::SourceConfig;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE, USER_AGENT};
use std::fs;
use std::path::Path;

/// Detail-page yield source.
pub struct BvbProvider {
    client: reqwest::blocking::Client,
    source: SourceConfig,
    extractor: Box<dyn YieldExtractor>,
}

impl BvbProvider {
    /// Build a provider using the label-pattern extractor from `source`.
    pub fn new(source: SourceConfig) -> Result<Self, DataError> {
        let extractor = LabelPatternExtractor::new(source.yield_label.clone());
        Self::with_extractor(source, Box::new(extractor))
    }

    pub fn with_extractor(
        source: SourceConfig,
        extractor: Box<dyn YieldExtractor>,
    ) -> Result<Self, DataError> {
        let client = build_client(&source).map_err(|reason| DataError::FetchFailed {
            code: String::new(),
            reason,
        })?;
        Ok(Self {
            client,
            source,
            extractor,
        })
    }

    /// Turn a completed response into a yield.
    fn yield_from_response(
        &self,
        code: &str,
        status: reqwest::StatusCode,
        body: &str,
    ) -> Result<f64, DataError> {
        if !status.is_success() {
            return Err(DataError::FetchFailed {
                code: code.to_string(),
                reason: format!("HTTP {status}"),
            });
        }
        self.extractor
            .extract_yield(body)
            .ok_or_else(|| DataError::YieldNotFound {
                code: code.to_string(),
            })
    }
}

impl YieldSource for BvbProvider {
    fn name(&self) -> &str {
        "bvb"
    }

    fn try_fetch(&self, code: &str) -> Result<f64, DataError> {
        let url = self.source.detail_url(code);
        tracing::debug!(code, %url, "fetching detail page");

        let fetch_failed = |e: reqwest::Error| DataError::FetchFailed {
            code: code.to_string(),
            reason: e.to_string(),
        };

        let resp = self.client.get(&url).send().map_err(fetch_failed)?;
        let status = resp.status();
        let body = resp.text().map_err(fetch_failed)?;

        self.yield_from_response(code, status, &body)
    }
}

/// Download the bond catalog to `dest`.
///
/// The body is written to a .tmp sibling and renamed into place, so a failed
/// download never clobbers the previous catalog.
pub fn download_catalog(source: &SourceConfig, dest: &Path) -> Result<u64, DataError> {
    let client = build_client(source).map_err(DataError::CatalogDownloadFailed)?;
    let failed = |e: reqwest::Error| DataError::CatalogDownloadFailed(e.to_string());

    let resp = client
        .get(&source.catalog_url)
        .header(COOKIE, &source.catalog_cookie)
        .send()
        .map_err(failed)?;

    let status = resp.status();
    if !status.is_success() {
        return Err(DataError::CatalogDownloadFailed(format!(
            "HTTP {status} from {}",
            source.catalog_url
        )));
    }
    let bytes = resp.bytes().map_err(failed)?;

    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| DataError::CatalogDownloadFailed(format!("create dir: {e}")))?;
    }
    let tmp_path = dest.with_extension("download.tmp");
    fs::write(&tmp_path, &bytes)
        .map_err(|e| DataError::CatalogDownloadFailed(format!("write: {e}")))?;
    fs::rename(&tmp_path, dest).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        DataError::CatalogDownloadFailed(format!("atomic rename failed: {e}"))
    })?;

    tracing::info!(path = %dest.display(), bytes = bytes.len(), "bond catalog saved");
    Ok(bytes.len() as u64)
}

/// Client with the configured User-Agent and timeout. Errors are plain reasons;
/// callers pick the `DataError` variant for their operation.
fn build_client(source: &SourceConfig) -> Result<reqwest::blocking::Client, String> {
    let mut headers = HeaderMap::new();
    let agent = HeaderValue::from_str(&source.user_agent)
        .map_err(|_| format!("invalid user agent '{}'", source.user_agent))?;
    headers.insert(USER_AGENT, agent);

    reqwest::blocking::Client::builder()
        .timeout(source.timeout())
        .default_headers(headers)
        .build()
        .map_err(|e| format!("failed to build HTTP client: {e}"))
}
