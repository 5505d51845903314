//! Update discovery and version reconciliation
//!
//! This module provides the core functionality for fetching a component's
//! update descriptor, extracting the advertised version from loosely
//! structured text, and deciding whether it is newer than what is installed.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌─────────────┐
//! │   Fetcher   │────▶│  Descriptor  │────▶│   Resolver  │
//! │   (fetch)   │     │   (parse)    │     │  (compare)  │
//! └─────────────┘     └──────────────┘     └─────────────┘
//!        │                   │                    │
//!        ▼                   ▼                    ▼
//! ┌─────────────┐     ┌──────────────┐     ┌─────────────┐
//! │  Fetchers   │     │  Strategies  │     │   Semver    │
//! │   (http)    │     │  (cascade)   │     │ (normalize) │
//! └─────────────┘     └──────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`fetcher`]: Fetcher trait for retrieving descriptor bodies
//! - [`fetchers`]: Concrete fetcher implementations (HTTP)
//! - [`strategy`]: Extraction strategy trait and provenance tags
//! - [`strategies`]: The five strategies of the parsing cascade
//! - [`descriptor`]: Descriptor parser folding the cascade
//! - [`download_url`]: Release URL derivation for known hosts
//! - [`resolver`]: Fetch, parse, compare, produce a verdict
//! - [`semver`]: Lenient version normalization and comparison
//! - [`types`]: Component records, update sources and verdicts
//! - [`error`]: Error types for version and fetch operations

pub mod descriptor;
pub mod download_url;
pub mod error;
pub mod fetcher;
pub mod fetchers;
pub mod resolver;
pub mod semver;
pub mod strategies;
pub mod strategy;
pub mod types;
