//! Credential resolution and collector payload overrides.
//!
//! Credentials come from command-line flags first and fall back to the
//! `SUMO_*` environment variables, so the tool works both interactively and
//! from wrapper scripts that export the environment.

use std::fs;

use anyhow::{Context, Result};
use serde_json::{json, Value};

use crate::cli::Args;

/// Resolved API credentials and deployment routing.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub access_id: String,
    pub access_key: String,
    /// Deployment region used to build the API base URL.
    pub endpoint: String,
}

impl Credentials {
    /// Resolve credentials from flags, falling back to the environment for
    /// anything not supplied. A missing credential is a startup error.
    pub fn resolve(args: &Args) -> Result<Self> {
        let (access_id, access_key) = match &args.secret {
            Some(secret) => parse_secret(secret)?,
            None => (require_env("SUMO_UID")?, require_env("SUMO_KEY")?),
        };
        let deployment = match &args.client {
            Some(client) => parse_client(client)?.0,
            None => require_env("SUMO_LOC")?,
        };
        let endpoint = match &args.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => std::env::var("SUMO_END").unwrap_or(deployment),
        };
        Ok(Credentials {
            access_id,
            access_key,
            endpoint,
        })
    }
}

/// Split an `-a <key>:<secret>` flag into its parts.
pub fn parse_secret(secret: &str) -> Result<(String, String)> {
    let (id, key) = secret
        .split_once(':')
        .with_context(|| "secret must be formatted as <key>:<secret>")?;
    Ok((id.to_string(), key.to_string()))
}

/// Split a `-k <site>_<orgid>` flag into its parts.
pub fn parse_client(client: &str) -> Result<(String, String)> {
    let (site, org) = client
        .split_once('_')
        .with_context(|| "client must be formatted as <site>_<orgid>")?;
    Ok((site.to_string(), org.to_string()))
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name).with_context(|| format!("environment variable not set: {name}"))
}

/// Optional collector-payload overrides supplied on the command line.
///
/// `-j <file>` replaces the default collector creation payload wholesale;
/// repeated `-o key=value` flags then patch fields inside the `collector`
/// object of whichever payload is in effect.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub payload: Option<Value>,
    pub fields: Vec<(String, String)>,
}

impl Overrides {
    pub fn from_args(args: &Args) -> Result<Self> {
        let payload = match &args.jsonfile {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                Some(
                    serde_json::from_str(&text)
                        .with_context(|| format!("invalid JSON payload in {}", path.display()))?,
                )
            }
            None => None,
        };
        let mut fields = Vec::new();
        for raw in &args.overrides {
            let (key, value) = raw
                .split_once('=')
                .with_context(|| format!("override must be formatted as key=value: {raw}"))?;
            fields.push((key.to_string(), value.to_string()));
        }
        Ok(Overrides { payload, fields })
    }

    /// Build the collector creation payload for the given name.
    pub fn collector_payload(&self, name: &str) -> Value {
        let mut payload = self.payload.clone().unwrap_or_else(|| {
            json!({
                "api.version": "v1",
                "collector": {
                    "name": name,
                    "timeZone": "Etc/UTC",
                    "fields": {},
                    "collectorType": "Hosted",
                    "collectorVersion": ""
                }
            })
        });
        for (key, value) in &self.fields {
            if let Some(collector) = payload.get_mut("collector").and_then(Value::as_object_mut) {
                collector.insert(key.clone(), Value::String(value.clone()));
            }
        }
        payload
    }
}
