//! Elasticsearch HTTP adapter.

mod error;

pub use error::{Error, Result};

use std::{
	sync::atomic::{AtomicUsize, Ordering},
	time::Duration,
};

use reqwest::Client;
use serde_json::Value;

/// Search client that spreads calls over the configured nodes in turn.
#[derive(Debug)]
pub struct ElasticStore {
	client: Client,
	urls: Vec<String>,
	next: AtomicUsize,
}
impl ElasticStore {
	pub fn new(cfg: &hub_config::ElasticSearch) -> Result<Self> {
		if cfg.urls.is_empty() {
			return Err(Error::InvalidConfig {
				message: "At least one Elasticsearch URL is required.".to_string(),
			});
		}

		let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;

		Ok(Self { client, urls: cfg.urls.clone(), next: AtomicUsize::new(0) })
	}

	/// Runs `body` against `{url}/{index}/_search` and returns the raw response.
	pub async fn search(&self, index: &str, body: &Value) -> Result<Value> {
		let url = format!("{}/{index}/_search", self.node());
		let res = self.client.post(&url).json(body).send().await?;
		let status = res.status();

		if !status.is_success() {
			let body = res.text().await.unwrap_or_default();

			tracing::warn!(%url, status = status.as_u16(), "Search request rejected.");

			return Err(Error::Status { status: status.as_u16(), body });
		}

		let bytes = res.bytes().await?;

		Ok(serde_json::from_slice(&bytes)?)
	}

	fn node(&self) -> &str {
		let idx = self.next.fetch_add(1, Ordering::Relaxed) % self.urls.len();

		&self.urls[idx]
	}
}
