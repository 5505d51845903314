//! modcheck: update discovery and version reconciliation for registered
//! components.
//!
//! Components register with a [`registry::ComponentRegistry`] and optionally
//! point at an update descriptor. The registry fetches each descriptor,
//! extracts the advertised version and records whether it is newer than the
//! installed one.

pub mod config;
pub mod logging;
pub mod manifest;
pub mod registry;
pub mod version;
