//! Labeled field extraction
//!
//! Finds `"version": "X"`, `'version': 'X'`, `version="X"` and `version='X'`
//! regardless of quote style or case.

use regex::Regex;

use crate::version::strategy::{
    CHANGELOG_KEYS, DOWNLOAD_URL_KEYS, ExtractStrategy, Extracted, Metadata, Provenance,
    VERSION_KEY,
};

pub struct LabeledFieldStrategy {
    version_re: Regex,
    download_url_res: Vec<Regex>,
    changelog_res: Vec<Regex>,
}

impl LabeledFieldStrategy {
    pub fn new() -> Self {
        Self {
            version_re: label_regex(VERSION_KEY),
            download_url_res: DOWNLOAD_URL_KEYS.iter().map(|k| label_regex(k)).collect(),
            changelog_res: CHANGELOG_KEYS.iter().map(|k| label_regex(k)).collect(),
        }
    }

    /// Labeled download URL and changelog, first key in priority order wins
    pub fn metadata(&self, body: &str) -> Metadata {
        Metadata {
            download_url: first_capture(&self.download_url_res, body),
            changelog: first_capture(&self.changelog_res, body),
        }
    }
}

impl Default for LabeledFieldStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractStrategy for LabeledFieldStrategy {
    fn provenance(&self) -> Provenance {
        Provenance::LabeledField
    }

    fn extract(&self, body: &str) -> Option<Extracted> {
        let version = capture(&self.version_re, body)?;
        Some(Extracted {
            version,
            metadata: self.metadata(body),
        })
    }
}

/// `key` optionally quoted, `:` or `=`, then a single- or double-quoted value
fn label_regex(key: &str) -> Regex {
    Regex::new(&format!(
        r#"(?i)["']?\b{}\b["']?\s*[:=]\s*(?:"([^"\r\n]+)"|'([^'\r\n]+)')"#,
        regex::escape(key)
    ))
    .unwrap()
}

fn capture(re: &Regex, body: &str) -> Option<String> {
    re.captures_iter(body)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().trim())
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

fn first_capture(res: &[Regex], body: &str) -> Option<String> {
    res.iter().find_map(|re| capture(re, body))
}
