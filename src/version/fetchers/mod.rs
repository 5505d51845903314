//! Fetcher implementations for retrieving update descriptors

pub mod http;

pub use http::HttpFetcher;
