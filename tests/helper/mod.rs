mod fetcher;
mod listener;

pub use fetcher::StubFetcher;
pub use listener::RecordingListener;

use std::sync::Arc;

use modcheck::config::RegistryConfig;
use modcheck::registry::ComponentRegistry;

pub fn create_test_registry(fetcher: Arc<StubFetcher>) -> ComponentRegistry {
    ComponentRegistry::new(RegistryConfig::default(), fetcher)
}
