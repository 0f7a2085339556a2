//! Acquisition orchestrator: catalog + cache + source -> currency series.
//!
//! Per instrument, in catalog order:
//! - cache-only mode reads the cache and never touches the network; a code
//!   missing from the cache is left out of this run
//! - refresh mode asks the source, stores a successful value in the cache,
//!   and pauses before the next instrument whatever the outcome
//!
//! A failed fetch never removes or overwrites a cached value. The cache is
//! written once, after the whole catalog has been processed.

use super::cache::{CorruptCachePolicy, YieldCache};
use super::catalog::read_catalog;
use super::pacing::Pacer;
use super::provider::{DataError, YieldSource};
use crate::config::AppConfig;
use crate::domain::{Currency, CurrencyClassifier, Instrument};
use crate::series::CurrencySeries;
use std::path::PathBuf;

/// Where yields come from for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AcquireMode {
    /// Offline: trust the cache only.
    #[default]
    CacheOnly,
    /// Query the source for every instrument.
    Refresh,
}

impl AcquireMode {
    pub fn from_refresh(refresh: bool) -> Self {
        if refresh {
            Self::Refresh
        } else {
            Self::CacheOnly
        }
    }
}

/// Counts for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AcquisitionSummary {
    pub total: usize,
    pub from_cache: usize,
    pub fetched: usize,
    /// Instruments with no value this run.
    pub missing: usize,
}

/// Output of a run: one series per currency bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct Acquisition {
    pub ron: CurrencySeries,
    pub eur: CurrencySeries,
    pub summary: AcquisitionSummary,
}

impl Acquisition {
    pub fn series(&self, currency: Currency) -> &CurrencySeries {
        match currency {
            Currency::Ron => &self.ron,
            Currency::Eur => &self.eur,
        }
    }

    fn series_mut(&mut self, currency: Currency) -> &mut CurrencySeries {
        match currency {
            Currency::Ron => &mut self.ron,
            Currency::Eur => &mut self.eur,
        }
    }
}

/// Resolve a yield for every instrument and bucket it by currency.
///
/// `cache` is updated in memory only; persisting it is the caller's job.
pub fn acquire(
    instruments: &[Instrument],
    cache: &mut YieldCache,
    mode: AcquireMode,
    source: &dyn YieldSource,
    pacer: &dyn Pacer,
    classifier: &CurrencyClassifier,
) -> Acquisition {
    let total = instruments.len();
    let mut acquisition = Acquisition {
        ron: CurrencySeries::new(Currency::Ron),
        eur: CurrencySeries::new(Currency::Eur),
        summary: AcquisitionSummary {
            total,
            ..AcquisitionSummary::default()
        },
    };

    for (i, instrument) in instruments.iter().enumerate() {
        let code = instrument.code.as_str();

        let ytm = match mode {
            AcquireMode::CacheOnly => match cache.get(code) {
                Some(ytm) => {
                    tracing::info!(code, ytm, "using cached YTM");
                    acquisition.summary.from_cache += 1;
                    Some(ytm)
                }
                None => {
                    tracing::info!(code, "no cached YTM");
                    None
                }
            },
            AcquireMode::Refresh => {
                tracing::debug!(code, index = i + 1, total, "refreshing");
                let fetched = source.fetch(code);
                if let Some(ytm) = fetched {
                    cache.insert(code, ytm);
                    acquisition.summary.fetched += 1;
                }
                if i + 1 < total {
                    pacer.pause();
                }
                fetched
            }
        };

        match ytm {
            Some(ytm) => {
                let currency = classifier.classify(code);
                acquisition
                    .series_mut(currency)
                    .insert(code, instrument.maturity.as_str(), ytm);
            }
            None => acquisition.summary.missing += 1,
        }
    }

    acquisition
}

/// Inputs of a full run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub catalog_path: PathBuf,
    pub cache_path: PathBuf,
    pub category: String,
    pub classifier: CurrencyClassifier,
    pub mode: AcquireMode,
    pub on_corrupt: CorruptCachePolicy,
}

impl RunOptions {
    pub fn from_config(config: &AppConfig, mode: AcquireMode) -> Self {
        Self {
            catalog_path: config.paths.catalog.clone(),
            cache_path: config.paths.cache.clone(),
            category: config.catalog.category.clone(),
            classifier: config.catalog.classifier(),
            mode,
            on_corrupt: config.cache.on_corrupt,
        }
    }
}

/// Read the catalog, load the cache, acquire, and save the cache once.
///
/// A missing catalog aborts before the cache is read or any request is made.
pub fn run(
    opts: &RunOptions,
    source: &dyn YieldSource,
    pacer: &dyn Pacer,
) -> Result<Acquisition, DataError> {
    let instruments = read_catalog(&opts.catalog_path, &opts.category)?;
    let mut cache = YieldCache::load_with_policy(&opts.cache_path, opts.on_corrupt)?;

    tracing::info!(
        instruments = instruments.len(),
        cached = cache.len(),
        mode = ?opts.mode,
        "starting acquisition"
    );

    let acquisition = acquire(
        &instruments,
        &mut cache,
        opts.mode,
        source,
        pacer,
        &opts.classifier,
    );

    cache.save(&opts.cache_path)?;

    let s = acquisition.summary;
    tracing::info!(
        total = s.total,
        from_cache = s.from_cache,
        fetched = s.fetched,
        missing = s.missing,
        ron = acquisition.ron.len(),
        eur = acquisition.eur.len(),
        "acquisition complete"
    );
    Ok(acquisition)
}
