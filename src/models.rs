use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The three categories of file the spelunker collects from a diag tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Config,
    ApplicationMeta,
    UserHistory,
}

/// A file that matched one classification rule, with the identifying name
/// extracted from its path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classified {
    /// An `etc/system` configuration file; `name` is the path below the
    /// anchor with slashes preserved (e.g. `local/indexes.conf`).
    Config { name: String },
    /// An `etc/apps/<app>/<dir>/<file>.meta` metadata file.
    AppMeta { app: String, component: String },
    /// A `users/<user>/history/*.csv` search-history file.
    History { user: String },
}

impl Classified {
    pub fn category(&self) -> Category {
        match self {
            Classified::Config { .. } => Category::Config,
            Classified::AppMeta { .. } => Category::ApplicationMeta,
            Classified::History { .. } => Category::UserHistory,
        }
    }

    /// The category-specific identifying name, before the host tag prefix
    /// is applied.
    pub fn source_name(&self) -> String {
        match self {
            Classified::Config { name } => name.clone(),
            Classified::AppMeta { app, component } => format!("{app}_{component}"),
            Classified::History { user } => user.clone(),
        }
    }
}

/// Summary row returned when listing existing hosted collectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorSummary {
    pub id: i64,
    pub name: String,
}

/// One unit of payload posted to a source URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RecordBody {
    /// Parsed key/value fields, sent as a JSON document.
    Fields(BTreeMap<String, Value>),
    /// Verbatim file contents.
    Raw(String),
}
