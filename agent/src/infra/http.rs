//! HTTP infrastructure: implements `Transport` with a blocking `ureq` agent.

use std::io::Read;
use std::time::Duration;

use anyhow::{Context, Result};
use factory_common::endpoints::join_url;
use serde_json::Value;

use crate::application::ports::Transport;

/// Upper bound for downloaded model archives.
const MAX_DOWNLOAD_BYTES: u64 = 2 * 1024 * 1024 * 1024;

/// Production `Transport` talking to the management server.
pub struct UreqTransport {
    base_url: String,
    agent: ureq::Agent,
}

impl UreqTransport {
    #[must_use]
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(timeout)
            .timeout_read(timeout)
            .timeout_write(timeout)
            .user_agent(concat!("factory-agent/", env!("CARGO_PKG_VERSION")))
            .build();
        Self {
            base_url: base_url.to_string(),
            agent,
        }
    }

    fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else {
            join_url(&self.base_url, endpoint)
        }
    }
}

fn status_error(url: &str, err: ureq::Error) -> anyhow::Error {
    match err {
        ureq::Error::Status(code, _) => anyhow::anyhow!("{url}: HTTP {code}"),
        ureq::Error::Transport(t) => anyhow::anyhow!("{url}: {t}"),
    }
}

impl Transport for UreqTransport {
    fn post_json(&self, endpoint: &str, body: &Value) -> Result<Value> {
        let url = self.url(endpoint);
        tracing::debug!(%url, "POST");
        let response = self
            .agent
            .post(&url)
            .send_json(body)
            .map_err(|e| status_error(&url, e))?;
        let text = response
            .into_string()
            .with_context(|| format!("reading response from {url}"))?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).with_context(|| format!("parsing response from {url}"))
    }

    fn post_bytes(&self, endpoint: &str, body: &[u8]) -> Result<()> {
        let url = self.url(endpoint);
        tracing::debug!(%url, bytes = body.len(), "POST");
        self.agent
            .post(&url)
            .set("Content-Type", "application/octet-stream")
            .send_bytes(body)
            .map_err(|e| status_error(&url, e))?;
        Ok(())
    }

    fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let url = self.url(url);
        tracing::debug!(%url, "GET");
        let response = self.agent.get(&url).call().map_err(|e| status_error(&url, e))?;
        let mut data = Vec::new();
        response
            .into_reader()
            .take(MAX_DOWNLOAD_BYTES)
            .read_to_end(&mut data)
            .with_context(|| format!("downloading {url}"))?;
        Ok(data)
    }
}
