//! Component manifest read by the command line host
//!
//! ```json
//! {
//!   "components": [
//!     {
//!       "id": "cool.mod",
//!       "version": "1.0.0",
//!       "checkUrl": "https://raw.githubusercontent.com/alice/CoolMod/main/version.json",
//!       "requiredCoreVersion": "1.0.0"
//!     }
//!   ]
//! }
//! ```

use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::config::DEFAULT_CORE_VERSION;
use crate::registry::ComponentRegistry;
use crate::registry::error::RegistrationError;
use crate::version::types::UpdateSourceSpec;

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Failed to read manifest {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Invalid manifest {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Manifest {
    pub components: Vec<ComponentEntry>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComponentEntry {
    pub id: String,
    pub version: String,
    #[serde(default)]
    pub check_url: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub changelog: Option<String>,
    #[serde(default = "default_required_core_version")]
    pub required_core_version: String,
}

fn default_required_core_version() -> String {
    DEFAULT_CORE_VERSION.to_string()
}

impl ComponentEntry {
    pub fn update_source(&self) -> UpdateSourceSpec {
        UpdateSourceSpec {
            check_url: self.check_url.clone(),
            download_url: self.download_url.clone(),
            changelog: self.changelog.clone(),
        }
    }
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&contents).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Register every entry. Entries without a check URL are registered
    /// without an update source. Failures are logged and returned; they do
    /// not stop the remaining entries.
    pub fn register_all(&self, registry: &ComponentRegistry) -> Vec<RegistrationError> {
        self.components
            .iter()
            .filter_map(|entry| {
                let result = if entry.check_url.is_some() {
                    registry.register_with_update_source(
                        &entry.id,
                        &entry.version,
                        entry.update_source(),
                        &entry.required_core_version,
                    )
                } else {
                    registry.register(&entry.id, &entry.version, &entry.required_core_version)
                };
                result.err()
            })
            .inspect(|e| warn!("Skipping component: {}", e))
            .collect()
    }
}
