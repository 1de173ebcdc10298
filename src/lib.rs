//! # splunk_spelunker
//!
//! Streams the contents of a Splunk diag archive (or an unpacked Splunk
//! installation tree) into Sumo Logic for later querying.
//!
//! ## Overview
//!
//! The spelunker walks the resolved tree once per category of interest,
//! classifies files by path pattern, provisions one hosted collector per
//! category (reusing collectors that already exist), and posts each file's
//! contents as one or more records to a freshly created HTTP source.
//! Sectioned key/value files (Splunk `.conf` and `.meta` files) are split
//! into one record per section; everything else ships as a single raw
//! record. Application metadata is additionally aggregated into a
//! per-application manifest of component modification times, posted once
//! after the application walk completes.
//!
//! Execution is deliberately single-threaded and paced: every management
//! call and record post waits a fixed delay first, as a courtesy to the
//! remote service. A run is best-effort and non-resumable; an interrupted
//! run leaves whatever collectors, sources, and records were already
//! created.
//!
//! ## Module Organization
//!
//! - [`cli`]: Command-line argument definitions
//! - [`config`]: Credential resolution and collector payload overrides
//! - [`resolve`]: Diag archive extraction and datasource root resolution
//! - [`classify`]: Path classification rules
//! - [`registry`]: Idempotent hosted-collector provisioning
//! - [`upload`]: Per-file record decomposition and posting
//! - [`manifest`]: Per-application manifest aggregation
//! - [`pipeline`]: Stage orchestration
//! - [`sumo`]: Sumo Logic API client behind the [`sumo::IngestApi`] seam

pub mod classify;
pub mod cli;
pub mod config;
pub mod constants;
pub mod manifest;
pub mod models;
pub mod pipeline;
pub mod registry;
pub mod resolve;
pub mod sumo;
pub mod upload;
