use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::data::DataError;

/// Maturity date format used by the exchange catalog (`DD.MM.YYYY`).
pub const MATURITY_FORMAT: &str = "%d.%m.%Y";

/// A government bond listed in the catalog.
///
/// The maturity stays as raw catalog text; it is parsed only when the
/// series is prepared for charting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Instrument {
    pub code: String,
    pub maturity: String,
}

impl Instrument {
    pub fn new(code: impl Into<String>, maturity: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            maturity: maturity.into(),
        }
    }
}

/// Parse a `DD.MM.YYYY` maturity, tagging failures with the instrument code.
pub fn parse_maturity(code: &str, text: &str) -> Result<NaiveDate, DataError> {
    NaiveDate::parse_from_str(text.trim(), MATURITY_FORMAT).map_err(|_| {
        DataError::MalformedMaturityDate {
            code: code.to_string(),
            text: text.to_string(),
        }
    })
}
