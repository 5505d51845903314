//! Update descriptor parsing
//!
//! Turns a loosely structured response body (usually JSON, sometimes a bare
//! version or an XML-ish document) into a best-effort [`ParsedDescriptor`].
//! The version comes from the first strategy that matches; download URL and
//! changelog are then scraped opportunistically without overwriting anything
//! the winning strategy already found.

use tracing::debug;

use crate::version::strategies::{MetadataScraper, default_strategies};
use crate::version::strategy::{ExtractStrategy, Provenance};

/// Transient result of parsing one descriptor body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDescriptor {
    pub version: Option<String>,
    pub download_url: Option<String>,
    pub changelog: Option<String>,
    /// Strategy that produced the version
    pub provenance: Option<Provenance>,
}

impl ParsedDescriptor {
    pub fn is_empty(&self) -> bool {
        self.version.is_none()
    }
}

pub struct DescriptorParser {
    strategies: Vec<Box<dyn ExtractStrategy>>,
    scraper: MetadataScraper,
}

impl DescriptorParser {
    pub fn new() -> Self {
        Self::with_strategies(default_strategies())
    }

    /// Build a parser with a custom cascade, tried in the given order
    pub fn with_strategies(strategies: Vec<Box<dyn ExtractStrategy>>) -> Self {
        Self {
            strategies,
            scraper: MetadataScraper::new(),
        }
    }

    /// Parse a raw body. Never fails: an unmatched body yields an empty result.
    pub fn parse(&self, raw: &str) -> ParsedDescriptor {
        let body = raw.trim();

        let found = self.strategies.iter().find_map(|strategy| {
            strategy
                .extract(body)
                .map(|extracted| (strategy.provenance(), extracted))
        });

        let Some((provenance, extracted)) = found else {
            debug!("No version found in descriptor ({} bytes)", body.len());
            return ParsedDescriptor::default();
        };

        debug!(
            "Found version {} using {} strategy",
            extracted.version, provenance
        );

        let mut metadata = extracted.metadata;
        metadata.fill_from(self.scraper.scrape(body));

        ParsedDescriptor {
            version: Some(extracted.version),
            download_url: metadata.download_url,
            changelog: metadata.changelog,
            provenance: Some(provenance),
        }
    }
}

impl Default for DescriptorParser {
    fn default() -> Self {
        Self::new()
    }
}
