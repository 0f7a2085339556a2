//! Per-currency yield series and their preparation for charting.
//!
//! A `CurrencySeries` is filled during acquisition in catalog order. It keeps
//! each instrument's maturity text and yield together, so the code sets of
//! the two mappings can never diverge. `prepare` turns it into points sorted
//! by maturity for the chart.

use crate::data::DataError;
use crate::domain::instrument::parse_maturity;
use crate::domain::Currency;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One instrument with a known yield.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesEntry {
    pub code: String,
    pub maturity: String,
    pub ytm: f64,
}

/// Instruments of one currency bucket, in catalog order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencySeries {
    currency: Currency,
    entries: Vec<SeriesEntry>,
}

impl CurrencySeries {
    pub fn new(currency: Currency) -> Self {
        Self {
            currency,
            entries: Vec::new(),
        }
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Record a yield. A code already present keeps its position and takes
    /// the new maturity and yield.
    pub fn insert(&mut self, code: impl Into<String>, maturity: impl Into<String>, ytm: f64) {
        let code = code.into();
        let maturity = maturity.into();
        match self.entries.iter_mut().find(|e| e.code == code) {
            Some(existing) => {
                existing.maturity = maturity;
                existing.ytm = ytm;
            }
            None => self.entries.push(SeriesEntry {
                code,
                maturity,
                ytm,
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[SeriesEntry] {
        &self.entries
    }

    pub fn maturity(&self, code: &str) -> Option<&str> {
        self.find(code).map(|e| e.maturity.as_str())
    }

    pub fn yield_of(&self, code: &str) -> Option<f64> {
        self.find(code).map(|e| e.ytm)
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.code.as_str())
    }

    fn find(&self, code: &str) -> Option<&SeriesEntry> {
        self.entries.iter().find(|e| e.code == code)
    }
}

/// A chart-ready point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub code: String,
    pub maturity: NaiveDate,
    pub ytm: f64,
    /// `"{maturity text} ({code})"`
    pub label: String,
}

/// Points of one currency sorted by maturity ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparedSeries {
    pub currency: Currency,
    pub points: Vec<CurvePoint>,
}

impl PreparedSeries {
    pub fn empty(currency: Currency) -> Self {
        Self {
            currency,
            points: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.maturity).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.ytm).collect()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.points.iter().map(|p| p.label.as_str()).collect()
    }

    /// Earliest and latest maturity, if any.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.points.first()?.maturity, self.points.last()?.maturity))
    }

    /// Lowest and highest yield, if any.
    pub fn ytm_range(&self) -> Option<(f64, f64)> {
        self.points.iter().map(|p| p.ytm).fold(None, |acc, y| match acc {
            None => Some((y, y)),
            Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
        })
    }
}

pub fn point_label(maturity_text: &str, code: &str) -> String {
    format!("{maturity_text} ({code})")
}

/// Sort a series by maturity. Fails on the first unparseable date.
///
/// Equal maturities keep catalog order.
pub fn prepare(series: &CurrencySeries) -> Result<PreparedSeries, DataError> {
    let points = series
        .entries()
        .iter()
        .map(to_point)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(sorted(series.currency(), points))
}

/// Like `prepare`, but drops points whose maturity does not parse.
pub fn prepare_lossy(series: &CurrencySeries) -> PreparedSeries {
    let points = series
        .entries()
        .iter()
        .filter_map(|entry| match to_point(entry) {
            Ok(p) => Some(p),
            Err(e) => {
                tracing::warn!(code = %entry.code, error = %e, "dropping point from chart");
                None
            }
        })
        .collect();
    sorted(series.currency(), points)
}

fn to_point(entry: &SeriesEntry) -> Result<CurvePoint, DataError> {
    Ok(CurvePoint {
        code: entry.code.clone(),
        maturity: parse_maturity(&entry.code, &entry.maturity)?,
        ytm: entry.ytm,
        label: point_label(entry.maturity.trim(), &entry.code),
    })
}

fn sorted(currency: Currency, mut points: Vec<CurvePoint>) -> PreparedSeries {
    // stable: ties keep insertion order
    points.sort_by_key(|p| p.maturity);
    PreparedSeries { currency, points }
}
