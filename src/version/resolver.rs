//! Update resolution: fetch, parse, normalize, compare
//!
//! Every failure on this path degrades to a not-newer verdict plus a log
//! line. Nothing here returns an error to the caller.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use crate::version::descriptor::DescriptorParser;
use crate::version::download_url::derive_download_url;
use crate::version::fetcher::Fetcher;
use crate::version::semver::{is_newer, normalize, strip_markup};
use crate::version::types::{ComponentRecord, UpdateDescriptorSource, UpdateVerdict};

pub struct UpdateResolver {
    fetcher: Arc<dyn Fetcher>,
    parser: DescriptorParser,
}

impl UpdateResolver {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            fetcher,
            parser: DescriptorParser::new(),
        }
    }

    /// Check one component and persist the verdict onto `source`.
    ///
    /// The verdict is stamped with the time of the attempt whatever the outcome.
    pub async fn check_for_update(
        &self,
        component: &ComponentRecord,
        source: &mut UpdateDescriptorSource,
    ) -> UpdateVerdict {
        let checked_at = Utc::now();
        let verdict = self.resolve(component, source, checked_at).await;

        source.last_checked = Some(checked_at);
        source.verdict = Some(verdict.clone());

        verdict
    }

    async fn resolve(
        &self,
        component: &ComponentRecord,
        source: &UpdateDescriptorSource,
        checked_at: DateTime<Utc>,
    ) -> UpdateVerdict {
        let not_newer = UpdateVerdict::not_newer(component, checked_at);

        let Some(check_url) = source.check_url() else {
            debug!("No update check URL for {}", component.id);
            return not_newer;
        };

        info!("Checking updates for {} from {}", component.id, check_url);

        let body = match self.fetcher.fetch_text(check_url).await {
            Ok(body) => body,
            Err(e) if e.is_timeout() => {
                warn!("Update check timeout for {}: {}", component.id, e);
                return not_newer;
            }
            Err(e) => {
                error!("Update check failed for {}: {}", component.id, e);
                return not_newer;
            }
        };

        let parsed = self.parser.parse(&body);
        let Some(raw_latest) = parsed.version.as_deref() else {
            warn!("Could not extract version for {}", component.id);
            return not_newer;
        };

        let latest = normalize(raw_latest);
        let current = normalize(strip_markup(&component.version));
        info!(
            "Version comparison for {}: current={}, latest={}",
            component.id, current, latest
        );

        let mut verdict = UpdateVerdict {
            latest_version: Some(latest.clone()),
            ..not_newer
        };

        if !is_newer(&latest, &current) {
            info!("{} is up to date (v{})", component.id, current);
            return verdict;
        }

        let configured_url = source
            .download_url
            .clone()
            .filter(|url| !url.trim().is_empty());
        verdict.is_newer = true;
        verdict.download_url = Some(
            parsed
                .download_url
                .or(configured_url)
                .unwrap_or_else(|| derive_download_url(check_url, &latest)),
        );
        verdict.changelog = parsed
            .changelog
            .or_else(|| source.changelog.clone())
            .unwrap_or_default();

        info!(
            "Update available for {}: v{} -> v{}",
            component.id, current, latest
        );
        verdict
    }
}
