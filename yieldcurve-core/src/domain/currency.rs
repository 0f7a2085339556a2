//! Settlement currency buckets.
//!
//! An instrument code ending in the EUR marker settles in EUR; every other
//! code is a domestic RON instrument. There is no third bucket.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Settlement currency bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    Ron,
    Eur,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Ron => "RON",
            Currency::Eur => "EUR",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Suffix-based classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyClassifier {
    eur_suffix: String,
}

impl CurrencyClassifier {
    /// Marker used by the Bucharest exchange for EUR-denominated issues.
    pub const DEFAULT_EUR_SUFFIX: &'static str = "E";

    pub fn new(eur_suffix: impl Into<String>) -> Self {
        Self {
            eur_suffix: eur_suffix.into(),
        }
    }

    pub fn classify(&self, code: &str) -> Currency {
        if code.ends_with(self.eur_suffix.as_str()) {
            Currency::Eur
        } else {
            Currency::Ron
        }
    }
}

impl Default for CurrencyClassifier {
    fn default() -> Self {
        Self::new(Self::DEFAULT_EUR_SUFFIX)
    }
}
