//! Shared fixtures for crate and HTTP tests.

use std::sync::Mutex;

use color_eyre::eyre;
use serde_json::{Value, json};

use hub_config::{Config, ElasticSearch, NameSpace, Organization, Service};
use hub_search::{BoxFuture, DocumentStore};

pub const TEST_ORG_ID: &str = "hub3";
pub const TEST_INDEX: &str = "hub3_v2";

pub fn test_config() -> Config {
	Config {
		service: Service { http_bind: "127.0.0.1:0".to_string(), log_level: "info".to_string() },
		organization: Organization { org_id: TEST_ORG_ID.to_string() },
		elasticsearch: ElasticSearch {
			urls: vec!["http://127.0.0.1:9200".to_string()],
			index_name: TEST_INDEX.to_string(),
			org_id_key: "meta.orgID".to_string(),
			spec_key: "meta.spec".to_string(),
			full_text_field: "full_text".to_string(),
			facet_size: 50,
			minimum_should_match: "70%".to_string(),
			timeout_ms: 1_000,
		},
		namespaces: vec![
			NameSpace {
				prefix: "rdf".to_string(),
				base: "http://www.w3.org/1999/02/22-rdf-syntax-ns#".to_string(),
			},
			NameSpace {
				prefix: "edm".to_string(),
				base: "http://www.europeana.eu/schemas/edm/".to_string(),
			},
			NameSpace {
				prefix: "nave".to_string(),
				base: "http://schemas.delving.eu/nave/terms".to_string(),
			},
		],
	}
}

/// Store that records every request body and answers with a canned response.
pub struct RecordingStore {
	response: Value,
	requests: Mutex<Vec<(String, Value)>>,
}
impl RecordingStore {
	pub fn new(response: Value) -> Self {
		Self { response, requests: Mutex::new(Vec::new()) }
	}

	pub fn requests(&self) -> Vec<(String, Value)> {
		self.requests.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}

	pub fn last_body(&self) -> Option<Value> {
		self.requests().pop().map(|(_, body)| body)
	}
}
impl DocumentStore for RecordingStore {
	fn search<'a>(
		&'a self,
		index: &'a str,
		body: &'a Value,
	) -> BoxFuture<'a, color_eyre::Result<Value>> {
		Box::pin(async move {
			self.requests
				.lock()
				.unwrap_or_else(|err| err.into_inner())
				.push((index.to_string(), body.clone()));

			Ok(self.response.clone())
		})
	}
}

/// Store whose every call fails, for upstream error propagation.
pub struct FailingStore {
	pub message: String,
}
impl DocumentStore for FailingStore {
	fn search<'a>(
		&'a self,
		_index: &'a str,
		_body: &'a Value,
	) -> BoxFuture<'a, color_eyre::Result<Value>> {
		Box::pin(async move { Err(eyre::eyre!("{}", self.message)) })
	}
}

/// A search response with the given total, hits and aggregations.
pub fn search_response(total: u64, hits: Vec<Value>, aggregations: Value) -> Value {
	json!({
		"took": 1,
		"timed_out": false,
		"hits": { "total": { "value": total, "relation": "eq" }, "hits": hits },
		"aggregations": aggregations,
	})
}

/// A hit with `_source` and sort values.
pub fn hit(id: &str, source: Value, sort: Value) -> Value {
	json!({ "_id": id, "_index": TEST_INDEX, "_source": source, "sort": sort })
}

/// Result of one facet aggregation in the nesting the compiler produces.
pub fn facet_result(doc_count: u64, other_docs: u64, buckets: &[(&str, u64)]) -> Value {
	let buckets = buckets
		.iter()
		.map(|(key, count)| json!({ "key": key, "doc_count": count }))
		.collect::<Vec<_>>();

	json!({
		"doc_count": doc_count,
		"filter": {
			"doc_count": doc_count,
			"inner": {
				"doc_count": doc_count,
				"value": {
					"doc_count_error_upper_bound": 0,
					"sum_other_doc_count": other_docs,
					"buckets": buckets,
				},
			},
		},
	})
}
