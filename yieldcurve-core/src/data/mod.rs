//! Data acquisition: catalog, yield cache, exchange fetcher, orchestration

pub mod acquire;
pub mod bvb;
pub mod cache;
pub mod catalog;
pub mod extract;
pub mod html;
pub mod pacing;
pub mod provider;

pub use acquire::{acquire, run, AcquireMode, Acquisition, AcquisitionSummary, RunOptions};
pub use bvb::{download_catalog, BvbProvider};
pub use cache::{CorruptCachePolicy, YieldCache};
pub use catalog::read_catalog;
pub use extract::{LabelPatternExtractor, YieldExtractor};
pub use pacing::{NoPacing, Pacer, RandomPacer};
pub use provider::{DataError, YieldSource};
