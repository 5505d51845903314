//! Whole-body version check

use regex::Regex;

use crate::version::strategy::{ExtractStrategy, Extracted, Provenance};

/// Treats the body itself as the version when it is nothing but `v?N(.N)*`
pub struct WholeBodyStrategy {
    re: Regex,
}

impl WholeBodyStrategy {
    pub fn new() -> Self {
        Self {
            re: Regex::new(r"(?i)^v?(\d+(?:\.\d+)*)$").unwrap(),
        }
    }
}

impl Default for WholeBodyStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractStrategy for WholeBodyStrategy {
    fn provenance(&self) -> Provenance {
        Provenance::WholeBody
    }

    fn extract(&self, body: &str) -> Option<Extracted> {
        let caps = self.re.captures(body.trim())?;
        Some(Extracted::version(caps.get(1)?.as_str()))
    }
}
