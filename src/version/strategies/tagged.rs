//! XML-like tagged field fallback

use regex::Regex;

use crate::version::strategy::{ExtractStrategy, Extracted, Provenance};

/// Extracts the inner text of `<version>...</version>`
pub struct TaggedFieldStrategy {
    re: Regex,
}

impl TaggedFieldStrategy {
    pub fn new() -> Self {
        Self {
            re: Regex::new(r"(?i)<version>\s*([^<]*?)\s*</version>").unwrap(),
        }
    }
}

impl Default for TaggedFieldStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractStrategy for TaggedFieldStrategy {
    fn provenance(&self) -> Provenance {
        Provenance::TaggedField
    }

    fn extract(&self, body: &str) -> Option<Extracted> {
        self.re
            .captures_iter(body)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .find(|version| !version.is_empty())
            .map(Extracted::version)
    }
}
