//! Bare dotted-number extraction

use regex::Regex;

use crate::version::strategy::{ExtractStrategy, Extracted, Provenance};

/// Matches the first `v?N.N[.N[.N]]` in document order.
///
/// At least two groups are required so that lone integers (status codes,
/// counts) are not mistaken for versions. The match is unanchored: letters
/// glued to either side (`build1.4.0`, `1.2.3rc1`) do not shorten or skip it.
pub struct BareNumericStrategy {
    re: Regex,
}

impl BareNumericStrategy {
    pub fn new() -> Self {
        Self {
            re: Regex::new(r"(?i)v?(\d+(?:\.\d+){1,3})").unwrap(),
        }
    }
}

impl Default for BareNumericStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractStrategy for BareNumericStrategy {
    fn provenance(&self) -> Provenance {
        Provenance::BareNumeric
    }

    fn extract(&self, body: &str) -> Option<Extracted> {
        let caps = self.re.captures(body)?;
        Some(Extracted::version(caps.get(1)?.as_str()))
    }
}
