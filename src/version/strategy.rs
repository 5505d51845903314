//! Extraction strategy trait for update descriptors
//!
//! Each strategy is a total function from descriptor text to an optional
//! match. Strategies never fail: input that defeats a heuristic is simply
//! "no match", and the parser moves on to the next strategy.

use std::fmt;

/// Key holding the version in structured descriptors
pub const VERSION_KEY: &str = "version";

/// Keys holding the download URL, in priority order
pub const DOWNLOAD_URL_KEYS: &[&str] = &["downloadUrl", "download_url", "url"];

/// Keys holding the changelog, in priority order
pub const CHANGELOG_KEYS: &[&str] = &["changelog", "change_log"];

/// Names the strategy that produced a descriptor's version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provenance {
    /// Top-level `key: value` scan of a brace-delimited body
    KeyValueScan,
    /// `"version": "X"` / `version="X"` style label
    LabeledField,
    /// First dotted number in the document
    BareNumeric,
    /// Body is nothing but a version
    WholeBody,
    /// `<version>X</version>`
    TaggedField,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::KeyValueScan => "key_value_scan",
            Provenance::LabeledField => "labeled_field",
            Provenance::BareNumeric => "bare_numeric",
            Provenance::WholeBody => "whole_body",
            Provenance::TaggedField => "tagged_field",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional descriptor fields besides the version
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub download_url: Option<String>,
    pub changelog: Option<String>,
}

impl Metadata {
    /// Fill fields that are still absent from `other`, never overwriting.
    pub fn fill_from(&mut self, other: Metadata) {
        if self.download_url.is_none() {
            self.download_url = other.download_url;
        }
        if self.changelog.is_none() {
            self.changelog = other.changelog;
        }
    }
}

/// A successful version extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub version: String,
    pub metadata: Metadata,
}

impl Extracted {
    pub fn version(version: &str) -> Self {
        Self {
            version: version.to_string(),
            metadata: Metadata::default(),
        }
    }
}

/// A single step of the descriptor parsing cascade
pub trait ExtractStrategy: Send + Sync {
    /// Tag recorded on descriptors this strategy produces
    fn provenance(&self) -> Provenance;

    /// Try to extract a version (and any metadata it sees) from a trimmed body
    fn extract(&self, body: &str) -> Option<Extracted>;
}
