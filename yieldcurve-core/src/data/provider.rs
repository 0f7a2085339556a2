//! Yield source trait and structured error types.
//!
//! The YieldSource trait abstracts over where a yield comes from (the exchange
//! detail page, a fixture in tests) so the orchestrator never knows about HTTP.

use std::path::PathBuf;
use thiserror::Error;

/// Structured error types for data operations.
///
/// These are designed to be displayable in both CLI and log contexts.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("catalog file not found: {} (download it first with --download-index)", path.display())]
    CatalogUnavailable { path: PathBuf },

    #[error("catalog could not be parsed: {0}")]
    CatalogMalformed(String),

    #[error("catalog download failed: {0}")]
    CatalogDownloadFailed(String),

    #[error("yield cache {} is corrupt: {reason}", path.display())]
    CacheCorrupt { path: PathBuf, reason: String },

    #[error("cache I/O error: {0}")]
    CacheIo(String),

    #[error("fetch failed for {code}: {reason}")]
    FetchFailed { code: String, reason: String },

    #[error("yield not found in detail page for {code}")]
    YieldNotFound { code: String },

    #[error("malformed maturity date '{text}' for {code} (expected DD.MM.YYYY)")]
    MalformedMaturityDate { code: String, text: String },
}

/// Something that can look up the current yield-to-maturity of an instrument.
pub trait YieldSource {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Fetch the YTM percentage for one instrument code.
    fn try_fetch(&self, code: &str) -> Result<f64, DataError>;

    /// Fetch, converting every failure into `None` after logging it.
    fn fetch(&self, code: &str) -> Option<f64> {
        match self.try_fetch(code) {
            Ok(ytm) => {
                tracing::info!(code, ytm, source = self.name(), "retrieved YTM");
                Some(ytm)
            }
            Err(e) => {
                tracing::warn!(code, source = self.name(), error = %e, "no YTM this run");
                None
            }
        }
    }
}
