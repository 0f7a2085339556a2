//! Domain types for the yield pipeline

pub mod currency;
pub mod instrument;

pub use currency::{Currency, CurrencyClassifier};
pub use instrument::{Instrument, MATURITY_FORMAT};
