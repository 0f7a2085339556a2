//! Yield extraction from a detail-page body.
//!
//! The exchange shows the yield as `Randament (YTM)* 7,50%`. Extraction is a
//! trait so a structured strategy can replace the label scan without touching
//! the fetcher or the orchestrator.

use super::html::visible_text;

/// Pulls a YTM percentage out of a response body.
pub trait YieldExtractor: Send + Sync {
    fn extract_yield(&self, body: &str) -> Option<f64>;
}

/// Finds `label`, optional whitespace, `digits,digits` and a `%` sign in the
/// visible text of an HTML body.
#[derive(Debug, Clone)]
pub struct LabelPatternExtractor {
    label: String,
}

impl LabelPatternExtractor {
    pub const DEFAULT_LABEL: &'static str = "Randament (YTM)*";

    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    /// Scan already-extracted text. The first label occurrence followed by a
    /// well-formed percentage wins.
    pub fn extract_from_text(&self, text: &str) -> Option<f64> {
        if self.label.is_empty() {
            return None;
        }
        text.match_indices(self.label.as_str())
            .find_map(|(at, label)| parse_comma_percent(&text[at + label.len()..]))
    }
}

impl Default for LabelPatternExtractor {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LABEL)
    }
}

impl YieldExtractor for LabelPatternExtractor {
    fn extract_yield(&self, body: &str) -> Option<f64> {
        self.extract_from_text(&visible_text(body))
    }
}

/// Parse `\s*(\d+,\d+)%` at the start of `s`.
fn parse_comma_percent(s: &str) -> Option<f64> {
    let s = s.trim_start_matches(char::is_whitespace);

    let int_len = leading_digits(s);
    if int_len == 0 {
        return None;
    }
    let rest = s[int_len..].strip_prefix(',')?;

    let frac_len = leading_digits(rest);
    if frac_len == 0 || !rest[frac_len..].starts_with('%') {
        return None;
    }

    format!("{}.{}", &s[..int_len], &rest[..frac_len])
        .parse()
        .ok()
}

fn leading_digits(s: &str) -> usize {
    s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len())
}
