//! In-memory registry of components and their cached update state
//!
//! The registry is an explicitly constructed service object. Clones share
//! state, so it can be handed to spawned check tasks and to the host.
//!
//! # Modules
//!
//! - [`error`]: Registration rejection reasons
//! - [`events`]: Observer list for registration and update events

pub mod error;
pub mod events;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use futures::future::join_all;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::RegistryConfig;
use crate::registry::error::RegistrationError;
use crate::registry::events::{Listeners, RegistryListener};
use crate::version::fetcher::Fetcher;
use crate::version::resolver::UpdateResolver;
use crate::version::semver::{is_major_compatible, is_newer, normalize, strip_markup};
use crate::version::types::{
    ComponentRecord, UpdateDescriptorSource, UpdateSourceSpec, UpdateVerdict,
};

#[derive(Default)]
struct State {
    components: HashMap<String, ComponentRecord>,
    sources: HashMap<String, UpdateDescriptorSource>,
    /// Source generation currently being checked, per component id
    in_flight: HashMap<String, u64>,
    /// Last generation handed out to a replaced update source
    generation: u64,
}

struct Inner {
    config: RegistryConfig,
    resolver: UpdateResolver,
    state: Mutex<State>,
    listeners: Listeners,
    pending: Mutex<Vec<JoinHandle<()>>>,
}

/// Clears the in-flight entry when the check ends, even on panic.
/// An entry taken over by a newer generation is left alone.
struct InFlightGuard<'a> {
    inner: &'a Inner,
    id: &'a str,
    generation: u64,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let mut state = self
            .inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if state.in_flight.get(self.id) == Some(&self.generation) {
            state.in_flight.remove(self.id);
        }
    }
}

#[derive(Clone)]
pub struct ComponentRegistry {
    inner: Arc<Inner>,
}

impl ComponentRegistry {
    pub fn new(config: RegistryConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                resolver: UpdateResolver::new(fetcher),
                state: Mutex::new(State::default()),
                listeners: Listeners::default(),
                pending: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.inner.config
    }

    /// Acquire the state lock. Writes replace whole fields, so a poisoned
    /// guard never holds a partially written verdict.
    fn state(&self) -> MutexGuard<'_, State> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn pending(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.inner
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn subscribe(&self, listener: Arc<dyn RegistryListener>) {
        self.inner.listeners.subscribe(listener);
    }

    /// Register a component.
    ///
    /// Fails if the id is taken or if the required core version's major
    /// component differs from the running core's. When auto checking is on
    /// and an update source with a check URL already exists for the id, a
    /// check is started in the background.
    pub fn register(
        &self,
        id: &str,
        version: &str,
        required_core_version: &str,
    ) -> Result<(), RegistrationError> {
        self.insert_record(id, version, required_core_version)?;

        let has_check_url = self.inner.config.auto_check_updates
            && self
                .state()
                .sources
                .get(id)
                .is_some_and(|source| source.check_url().is_some());
        if has_check_url {
            self.spawn_check(id);
        }

        Ok(())
    }

    /// Register a component and install its update source.
    ///
    /// The source is installed (overwriting any previous one) when the
    /// registration succeeds or the id already exists. A non-empty check URL
    /// starts a background check immediately.
    pub fn register_with_update_source(
        &self,
        id: &str,
        version: &str,
        spec: UpdateSourceSpec,
        required_core_version: &str,
    ) -> Result<(), RegistrationError> {
        let result = self.insert_record(id, version, required_core_version);

        if matches!(result, Ok(()) | Err(RegistrationError::AlreadyRegistered(_))) {
            let mut source = UpdateDescriptorSource::new(id, spec);
            let has_check_url = source.check_url().is_some();
            {
                let mut state = self.state();
                state.generation += 1;
                source.generation = state.generation;
                state.sources.insert(id.to_string(), source);
            }
            info!("Component {} registered with update checking enabled", id);

            if has_check_url {
                self.spawn_check(id);
            }
        }

        result
    }

    fn insert_record(
        &self,
        id: &str,
        version: &str,
        required_core_version: &str,
    ) -> Result<(), RegistrationError> {
        if !self.inner.config.enable_api {
            warn!("Registration is disabled. Component {} ignored", id);
            return Err(RegistrationError::ApiDisabled(id.to_string()));
        }

        {
            let mut state = self.state();
            if state.components.contains_key(id) {
                warn!("Component {} is already registered", id);
                return Err(RegistrationError::AlreadyRegistered(id.to_string()));
            }

            let core = &self.inner.config.core_version;
            if !is_major_compatible(required_core_version, core) {
                error!(
                    "Component {} requires core version {}, but current is {}",
                    id, required_core_version, core
                );
                return Err(RegistrationError::Incompatible {
                    id: id.to_string(),
                    required: required_core_version.to_string(),
                    core: core.clone(),
                });
            }

            state
                .components
                .insert(id.to_string(), ComponentRecord::new(id, version));
        }

        info!("Component registered: {} v{}", id, version);
        self.inner.listeners.registered(id, version);
        Ok(())
    }

    /// Remove a component record. Its cached update source is kept.
    pub fn unregister(&self, id: &str) -> bool {
        let removed = self.state().components.remove(id).is_some();
        if removed {
            info!("Component unregistered: {}", id);
        }
        removed
    }

    /// Toggle a component's enabled flag. Disabled components are skipped by
    /// [`check_all`](Self::check_all).
    pub fn set_enabled(&self, id: &str, enabled: bool) -> bool {
        match self.state().components.get_mut(id) {
            Some(record) => {
                record.enabled = enabled;
                true
            }
            None => false,
        }
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.state().components.contains_key(id)
    }

    pub fn component(&self, id: &str) -> Option<ComponentRecord> {
        self.state().components.get(id).cloned()
    }

    /// All registered components, sorted by id
    pub fn components(&self) -> Vec<ComponentRecord> {
        let mut components: Vec<_> = self.state().components.values().cloned().collect();
        components.sort_by(|a, b| a.id.cmp(&b.id));
        components
    }

    pub fn update_source(&self, id: &str) -> Option<UpdateDescriptorSource> {
        self.state().sources.get(id).cloned()
    }

    /// Every cached verdict, whatever its outcome
    pub fn verdicts(&self) -> Vec<UpdateVerdict> {
        self.state()
            .sources
            .values()
            .filter_map(|source| source.verdict.clone())
            .collect()
    }

    /// Cached verdicts that found a newer version
    pub fn available_updates(&self) -> Vec<UpdateVerdict> {
        self.verdicts()
            .into_iter()
            .filter(|verdict| verdict.is_newer)
            .collect()
    }

    /// Record update information by hand for components that cannot be polled.
    ///
    /// `is_newer` is still decided by comparing `latest` with the registered
    /// version. Returns false if the id is not registered.
    pub fn set_update_info(
        &self,
        id: &str,
        latest: &str,
        download_url: &str,
        changelog: &str,
    ) -> bool {
        let verdict = {
            let mut state = self.state();
            let Some(record) = state.components.get(id).cloned() else {
                warn!("Cannot set update info: component {} is not registered", id);
                return false;
            };

            let latest = normalize(latest);
            let current = normalize(strip_markup(&record.version));
            let checked_at = Utc::now();
            let verdict = UpdateVerdict {
                component_id: record.id.clone(),
                current_version: record.version.clone(),
                is_newer: is_newer(&latest, &current),
                latest_version: Some(latest),
                download_url: Some(download_url.trim().to_string()).filter(|url| !url.is_empty()),
                changelog: changelog.to_string(),
                checked_at,
            };

            let source = state.sources.entry(id.to_string()).or_insert_with(|| {
                UpdateDescriptorSource::new(id, UpdateSourceSpec::default())
            });
            source.last_checked = Some(checked_at);
            source.verdict = Some(verdict.clone());
            verdict
        };

        if verdict.is_newer {
            self.inner.listeners.update_available(&verdict);
        }
        true
    }

    /// Run one check now and wait for it.
    ///
    /// Returns `None` if the component or its update source is missing, if a
    /// check of the same source is already running, or if the source was
    /// replaced while this check ran. A stale result is discarded.
    pub async fn check(&self, id: &str) -> Option<UpdateVerdict> {
        let (component, mut source) = {
            let mut state = self.state();
            let component = state.components.get(id).cloned();
            let source = state.sources.get(id).cloned();
            let (Some(component), Some(source)) = (component, source) else {
                debug!("Nothing to check for {}", id);
                return None;
            };
            if state.in_flight.get(id) == Some(&source.generation) {
                info!("Skipping {}: check already in flight", id);
                return None;
            }
            state.in_flight.insert(id.to_string(), source.generation);
            (component, source)
        };
        let generation = source.generation;
        let _guard = InFlightGuard {
            inner: self.inner.as_ref(),
            id,
            generation,
        };

        let verdict = if self.inner.config.allow_remote_checks {
            self.inner
                .resolver
                .check_for_update(&component, &mut source)
                .await
        } else {
            debug!("Remote checks are disabled, skipping fetch for {}", id);
            let verdict = UpdateVerdict::not_newer(&component, Utc::now());
            source.last_checked = Some(verdict.checked_at);
            source.verdict = Some(verdict.clone());
            verdict
        };

        let current = match self.state().sources.get_mut(id) {
            Some(stored) if stored.generation == generation => {
                stored.last_checked = source.last_checked;
                stored.verdict = source.verdict;
                true
            }
            _ => false,
        };
        if !current {
            info!("Discarding verdict for {}: update source was replaced", id);
            return None;
        }

        if verdict.is_newer {
            self.inner.listeners.update_available(&verdict);
        }
        Some(verdict)
    }

    /// Start a check in the background. Join it with [`wait_all`](Self::wait_all).
    ///
    /// Returns false when called outside a tokio runtime.
    pub fn spawn_check(&self, id: &str) -> bool {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!("No async runtime available, not checking {}", id);
            return false;
        };

        let registry = self.clone();
        let id = id.to_string();
        let task = handle.spawn(async move {
            registry.check(&id).await;
        });
        self.pending().push(task);
        true
    }

    /// Wait for every background check started so far.
    pub async fn wait_all(&self) {
        loop {
            let tasks = std::mem::take(&mut *self.pending());
            if tasks.is_empty() {
                break;
            }
            for result in join_all(tasks).await {
                if let Err(e) = result {
                    error!("Update check task failed: {}", e);
                }
            }
        }
    }

    /// Check every enabled component that has a check URL, concurrently.
    ///
    /// A failing check yields a not-newer verdict and never affects the others.
    pub async fn check_all(&self) -> Vec<UpdateVerdict> {
        let ids: Vec<String> = {
            let state = self.state();
            state
                .components
                .values()
                .filter(|record| record.enabled)
                .filter(|record| {
                    state
                        .sources
                        .get(&record.id)
                        .is_some_and(|source| source.check_url().is_some())
                })
                .map(|record| record.id.clone())
                .collect()
        };

        info!("Checking {} components for updates", ids.len());

        join_all(ids.iter().map(|id| self.check(id)))
            .await
            .into_iter()
            .flatten()
            .collect()
    }
}
