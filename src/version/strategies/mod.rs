//! Descriptor extraction strategies, in cascade order

mod bare_numeric;
mod key_value;
mod labeled;
mod tagged;
mod whole_body;

pub use bare_numeric::BareNumericStrategy;
pub use key_value::{KeyValueStrategy, scan_pairs};
pub use labeled::LabeledFieldStrategy;
pub use tagged::TaggedFieldStrategy;
pub use whole_body::WholeBodyStrategy;

use crate::version::strategy::{ExtractStrategy, Metadata};

/// The five strategies in the order they are tried
pub fn default_strategies() -> Vec<Box<dyn ExtractStrategy>> {
    vec![
        Box::new(KeyValueStrategy),
        Box::new(LabeledFieldStrategy::new()),
        Box::new(BareNumericStrategy::new()),
        Box::new(WholeBodyStrategy::new()),
        Box::new(TaggedFieldStrategy::new()),
    ]
}

/// Opportunistic metadata scraping, run after a version is found
pub struct MetadataScraper {
    labeled: LabeledFieldStrategy,
}

impl MetadataScraper {
    pub fn new() -> Self {
        Self {
            labeled: LabeledFieldStrategy::new(),
        }
    }

    /// Scrape download URL and changelog from any body shape.
    ///
    /// The key-value scan wins over labeled fields.
    pub fn scrape(&self, body: &str) -> Metadata {
        let mut metadata = key_value::metadata_from_pairs(&scan_pairs(body));
        metadata.fill_from(self.labeled.metadata(body));
        metadata
    }
}

impl Default for MetadataScraper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_strategies_are_in_cascade_order() {
        use crate::version::strategy::Provenance;

        let order: Vec<Provenance> = default_strategies()
            .iter()
            .map(|s| s.provenance())
            .collect();

        assert_eq!(
            order,
            vec![
                Provenance::KeyValueScan,
                Provenance::LabeledField,
                Provenance::BareNumeric,
                Provenance::WholeBody,
                Provenance::TaggedField,
            ]
        );
    }

    #[test]
    fn scrape_prefers_key_value_pairs_over_labels() {
        let scraper = MetadataScraper::new();
        let body = r#"{"url": "https://a.example/x.zip", "changelog": "fixes"}"#;

        let metadata = scraper.scrape(body);

        assert_eq!(
            metadata,
            Metadata {
                download_url: Some("https://a.example/x.zip".to_string()),
                changelog: Some("fixes".to_string()),
            }
        );
    }

    #[test]
    fn scrape_falls_back_to_labeled_fields_in_non_object_bodies() {
        let scraper = MetadataScraper::new();
        let body = r#"release: version="2.0" changelog="big rewrite""#;

        let metadata = scraper.scrape(body);

        assert_eq!(metadata.download_url, None);
        assert_eq!(metadata.changelog, Some("big rewrite".to_string()));
    }
}
