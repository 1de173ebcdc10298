//! Global constants for the spelunker pipeline.
//!
//! This module centralizes pacing delays, fixed collector names, and the
//! record headers expected by the ingestion service.

use std::time::Duration;

/// Pause before management API calls and config/application record posts.
pub const WAIT_TIME: Duration = Duration::from_millis(200);

/// Shorter pause used before user-history record posts.
pub const POST_TIME: Duration = Duration::from_millis(10);

/// Scratch root that diag archives are unpacked into. Shared between runs;
/// concurrent runs against the same scratch path are not supported
/// (last-writer-wins on overlapping entries).
pub const EXTRACT_PATH: &str = "/var/tmp";

// Hosted collector names, one per category of discovered file.

/// Collector holding `etc/system` configuration files.
pub const CONFIGS_COLLECTOR: &str = "splunk_configs";

/// Collector holding per-application object permission metadata.
pub const APPLICATIONS_COLLECTOR: &str = "splunk_applications_object_rbac";

/// Collector holding the aggregated per-application manifests.
pub const MANIFEST_COLLECTOR: &str = "splunk_applications_manifest";

/// Collector holding per-user search history.
pub const HISTORY_COLLECTOR: &str = "splunk_history";

/// Content type attached to every uploaded record.
pub const RECORD_CONTENT_TYPE: &str = "txt/csv";

/// Header carrying a record's display name for routing in Sumo Logic.
pub const ROUTING_HEADER: &str = "X-Sumo-Name";

/// Timeout applied to every management API request.
pub const API_TIMEOUT_SECS: u64 = 30;
