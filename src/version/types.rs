//! Data model for registered components and their update state

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A registered unit of software tracked for update checks
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRecord {
    pub id: String,
    /// Declared version, kept raw for display
    pub version: String,
    pub enabled: bool,
    pub registered_at: DateTime<Utc>,
}

impl ComponentRecord {
    pub fn new(id: &str, version: &str) -> Self {
        Self {
            id: id.to_string(),
            version: version.to_string(),
            enabled: true,
            registered_at: Utc::now(),
        }
    }
}

/// Update endpoints supplied at registration time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateSourceSpec {
    pub check_url: Option<String>,
    pub download_url: Option<String>,
    pub changelog: Option<String>,
}

impl UpdateSourceSpec {
    pub fn new(check_url: &str) -> Self {
        Self {
            check_url: Some(check_url.to_string()),
            ..Self::default()
        }
    }

    pub fn with_download_url(mut self, download_url: &str) -> Self {
        self.download_url = Some(download_url.to_string());
        self
    }

    pub fn with_changelog(mut self, changelog: &str) -> Self {
        self.changelog = Some(changelog.to_string());
        self
    }
}

/// Per-component check configuration and cached outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDescriptorSource {
    pub component_id: String,
    pub check_url: Option<String>,
    pub download_url: Option<String>,
    pub changelog: Option<String>,
    pub last_checked: Option<DateTime<Utc>>,
    pub verdict: Option<UpdateVerdict>,
    /// Bumped each time the source is replaced; a check only writes back
    /// onto the generation it started from
    #[serde(skip)]
    pub generation: u64,
}

impl UpdateDescriptorSource {
    pub fn new(component_id: &str, spec: UpdateSourceSpec) -> Self {
        Self {
            component_id: component_id.to_string(),
            check_url: spec.check_url,
            download_url: spec.download_url,
            changelog: spec.changelog,
            last_checked: None,
            verdict: None,
            generation: 0,
        }
    }

    /// Check URL, if one is configured and not blank
    pub fn check_url(&self) -> Option<&str> {
        self.check_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Whether the last verdict found a newer version
    pub fn has_update(&self) -> bool {
        self.verdict.as_ref().is_some_and(|v| v.is_newer)
    }
}

/// Resolved outcome of one update check for one component
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVerdict {
    pub component_id: String,
    /// Declared version as registered
    pub current_version: String,
    /// Normalized version found in the descriptor
    pub latest_version: Option<String>,
    pub is_newer: bool,
    pub download_url: Option<String>,
    pub changelog: String,
    pub checked_at: DateTime<Utc>,
}

impl UpdateVerdict {
    /// Verdict for a check that found nothing newer
    pub fn not_newer(component: &ComponentRecord, checked_at: DateTime<Utc>) -> Self {
        Self {
            component_id: component.id.clone(),
            current_version: component.version.clone(),
            latest_version: None,
            is_newer: false,
            download_url: None,
            changelog: String::new(),
            checked_at,
        }
    }
}

impl fmt::Display for UpdateVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} -> {}",
            self.component_id,
            self.current_version,
            self.latest_version.as_deref().unwrap_or("?")
        )
    }
}
