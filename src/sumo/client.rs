use std::thread;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use log::trace;
use reqwest::blocking::Client;
use reqwest::header;
use serde_json::{json, Value};

use crate::config::{Credentials, Overrides};
use crate::constants::{API_TIMEOUT_SECS, RECORD_CONTENT_TYPE, ROUTING_HEADER, WAIT_TIME};
use crate::models::{CollectorSummary, RecordBody};
use crate::sumo::IngestApi;

/// Authenticated Sumo Logic API client.
///
/// Management calls (collector and source creation, listing) go to the
/// deployment's API base with basic auth; record posts go straight to the
/// unauthenticated source ingestion URLs. Creation calls pace themselves
/// with a fixed delay.
pub struct SumoClient {
    http: Client,
    base_url: String,
    access_id: String,
    access_key: String,
    overrides: Overrides,
}

impl SumoClient {
    pub fn new(credentials: &Credentials, overrides: Overrides) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(API_TIMEOUT_SECS))
            .build()
            .context("failed to build HTTP client")?;
        Ok(SumoClient {
            http,
            base_url: format!("https://api.{}.sumologic.com/api", credentials.endpoint),
            access_id: credentials.access_id.clone(),
            access_key: credentials.access_key.clone(),
            overrides,
        })
    }

    fn get(&self, path: &str) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .basic_auth(&self.access_id, Some(&self.access_key))
            .header(header::ACCEPT, "application/json")
            .send()
            .with_context(|| format!("GET {path} failed"))?;
        Self::json_body("GET", path, response)
    }

    fn post(&self, path: &str, payload: &Value) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .post(&url)
            .basic_auth(&self.access_id, Some(&self.access_key))
            .header(header::ACCEPT, "application/json")
            .json(payload)
            .send()
            .with_context(|| format!("POST {path} failed"))?;
        Self::json_body("POST", path, response)
    }

    fn json_body(verb: &str, path: &str, response: reqwest::blocking::Response) -> Result<Value> {
        let status = response.status();
        let body = response
            .text()
            .with_context(|| format!("{verb} {path}: failed to read response body"))?;
        if !status.is_success() {
            bail!("{verb} {path} returned {status}: {body}");
        }
        serde_json::from_str(&body).with_context(|| format!("{verb} {path}: malformed response"))
    }
}

impl IngestApi for SumoClient {
    fn list_collectors(&self) -> Result<Vec<CollectorSummary>> {
        let body = self.get("/v1/collectors")?;
        let collectors = body
            .get("collectors")
            .cloned()
            .unwrap_or_else(|| Value::Array(Vec::new()));
        serde_json::from_value(collectors).context("malformed collector listing")
    }

    fn create_collector(&self, name: &str) -> Result<i64> {
        let payload = self.overrides.collector_payload(name);
        trace!("JSONPAYLOAD: {payload}");
        thread::sleep(WAIT_TIME);
        let body = self.post("/v1/collectors", &payload)?;
        body.pointer("/collector/id")
            .and_then(Value::as_i64)
            .ok_or_else(|| anyhow!("create collector response missing id"))
    }

    fn create_source(&self, collector_id: i64, name: &str, category: &str) -> Result<String> {
        let payload = json!({
            "api.version": "v1",
            "source": {
                "name": name,
                "description": name,
                "category": category,
                "encoding": "UTF-8",
                "sourceType": "HTTP",
                "automaticDateParsing": true,
                "multilineProcessingEnabled": true,
                "useAutolineMatching": true,
                "forceTimeZone": false,
                "messagePerRequest": false
            }
        });
        trace!("JSONPAYLOAD: {payload}");
        thread::sleep(WAIT_TIME);
        let body = self.post(&format!("/v1/collectors/{collector_id}/sources"), &payload)?;
        body.pointer("/source/url")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| anyhow!("create source response missing url"))
    }

    fn post_record(&self, url: &str, body: &RecordBody, name: &str) -> Result<u16> {
        let request = self
            .http
            .post(url)
            .header(header::CONTENT_TYPE, RECORD_CONTENT_TYPE)
            .header(ROUTING_HEADER, name);
        let request = match body {
            RecordBody::Fields(fields) => {
                request.body(serde_json::to_string(fields).context("failed to encode record")?)
            }
            RecordBody::Raw(text) => request.body(text.clone()),
        };
        let response = request
            .send()
            .with_context(|| format!("failed to post record {name}"))?;
        Ok(response.status().as_u16())
    }
}
