//! Store response parsing and the response views returned to callers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use hub_domain::ScrollPager;

use crate::{body::COLLAPSE_INNER_HITS, breadcrumb::UserQuery, facets::QueryFacet};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResponse {
	pub pager: ScrollPager,
	pub query: UserQuery,
	pub items: Vec<Value>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub facets: Vec<QueryFacet>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PeekResponse {
	pub peek: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SearchOutcome {
	Results(SearchResponse),
	Peek(PeekResponse),
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawSearchResponse {
	pub(crate) hits: RawHits,
	#[serde(default)]
	pub(crate) aggregations: Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawHits {
	total: RawTotal,
	#[serde(default)]
	pub(crate) hits: Vec<RawHit>,
}
impl RawHits {
	pub(crate) fn total(&self) -> u64 {
		match self.total {
			RawTotal::Count(count) => count,
			RawTotal::Object { value } => value,
		}
	}
}

/// Elasticsearch 7 reports `{ "value": n }`, older versions a bare number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTotal {
	Count(u64),
	Object { value: u64 },
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawHit {
	#[serde(rename = "_id", default)]
	id: String,
	#[serde(rename = "_source")]
	source: Option<Value>,
	#[serde(default)]
	pub(crate) sort: Vec<Value>,
	inner_hits: Option<Value>,
}
impl RawHit {
	/// The hit's source, or for collapsed hits the sources of its inner hits.
	pub(crate) fn into_item(self) -> Value {
		let collapsed = self
			.inner_hits
			.as_ref()
			.and_then(|inner| inner.get(COLLAPSE_INNER_HITS))
			.and_then(|group| group.pointer("/hits/hits"))
			.and_then(Value::as_array);

		if let Some(group) = collapsed {
			let items = group.iter().filter_map(|hit| hit.get("_source").cloned()).collect::<Vec<_>>();

			return json!({ "id": self.id, "items": items });
		}

		self.source.unwrap_or(Value::Null)
	}
}
