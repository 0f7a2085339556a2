//! Yieldcurve Core — government bond YTM acquisition and curve preparation.
//!
//! This crate contains the decision logic of the pipeline:
//! - Catalog reader for the exchange's semicolon-delimited bond list
//! - Persisted yield cache with atomic writes
//! - Detail-page fetcher with a pluggable yield extractor
//! - Acquisition orchestrator (cache-only vs refresh, pacing, currency buckets)
//! - Series preparation (maturity-sorted points with labels)

pub mod config;
pub mod data;
pub mod domain;
pub mod series;

pub use config::{AppConfig, ConfigError};
pub use data::{AcquireMode, Acquisition, DataError, RunOptions, YieldCache, YieldSource};
pub use domain::{Currency, CurrencyClassifier, Instrument};
pub use series::{prepare, prepare_lossy, CurrencySeries, CurvePoint, PreparedSeries};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: types handed across the CLI/TUI boundary are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<Instrument>();
        require_sync::<Instrument>();
        require_send::<YieldCache>();
        require_sync::<YieldCache>();
        require_send::<CurrencySeries>();
        require_sync::<CurrencySeries>();
        require_send::<PreparedSeries>();
        require_sync::<PreparedSeries>();
        require_send::<AppConfig>();
        require_sync::<AppConfig>();
        require_send::<DataError>();
        require_sync::<DataError>();
        require_send::<data::BvbProvider>();
        require_sync::<data::BvbProvider>();
    }

    /// Architecture contract: the orchestrator receives its cache as an
    /// explicit `&mut YieldCache`; there is no process-wide cache.
    #[test]
    fn acquire_takes_cache_by_mutable_reference() {
        fn _check(
            instruments: &[Instrument],
            cache: &mut YieldCache,
            source: &dyn YieldSource,
            pacer: &dyn data::Pacer,
        ) -> Acquisition {
            data::acquire(
                instruments,
                cache,
                AcquireMode::CacheOnly,
                source,
                pacer,
                &CurrencyClassifier::default(),
            )
        }
    }
}
