//! Sumo Logic API integration.
//!
//! The pipeline consumes the remote service through the [`IngestApi`]
//! trait; [`SumoClient`] is the production implementation performing
//! authenticated HTTP against the collector management API and plain posts
//! against source ingestion URLs.

mod api;
mod client;

pub use api::IngestApi;
#[cfg(test)]
pub use api::MockIngestApi;
pub use client::SumoClient;
