//! Assembly of the complete search request body.

use serde_json::{Map, Value, json};

use hub_domain::SearchRequest;

use crate::{
	Error, Result,
	aggregation,
	dsl::{self, BoolQuery, NamedAggregations, Query},
	facets::FacetUriBuilder,
	query::{ENTRIES_PATH, QueryCompiler},
};

pub const TIE_BREAK_SORT_KEY: &str = "meta.hubID";
pub const COLLAPSE_INNER_HITS: &str = "collapse";

const DEFAULT_COLLAPSE_SIZE: u32 = 5;
const MAX_CONCURRENT_GROUP_SEARCHES: u32 = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchBody {
	pub query: Query,
	pub post_filter: Option<BoolQuery>,
	pub aggregations: NamedAggregations,
	pub sort: Vec<Value>,
	pub size: u32,
	pub from: Option<u32>,
	pub search_after: Option<Vec<Value>>,
	pub collapse: Option<Value>,
	pub source: Option<Value>,
}
impl SearchBody {
	pub fn build(
		compiler: &QueryCompiler<'_>,
		sr: &mut SearchRequest,
		fub: &FacetUriBuilder,
	) -> Result<Self> {
		let query = compiler.compile(sr)?;
		let mut body = Self {
			query,
			post_filter: None,
			aggregations: Vec::new(),
			sort: vec![primary_sort(&sr.sort_by, sr.sort_asc, sr.is_random_sort()), tie_break()],
			size: sr.response_size,
			from: None,
			search_after: None,
			collapse: None,
			source: None,
		};

		if !sr.search_after.is_empty() && sr.collapse_on.is_empty() {
			let values = serde_json::from_slice::<Vec<Value>>(&sr.search_after).map_err(|err| {
				Error::InvalidRequest { message: format!("search_after marker is corrupt: {err}") }
			})?;

			body.search_after = Some(values);
		} else {
			body.from = Some(sr.start);
		}

		if !sr.collapse_on.is_empty() {
			body.collapse = Some(collapse(sr));
			body.source = Some(Value::Bool(false));
		}

		if !sr.peek.is_empty() {
			body.size = 0;
			body.aggregations =
				vec![(sr.peek.clone(), aggregation::peek_aggregation(compiler, sr, fub)?)];

			return Ok(body);
		}

		if sr.tree.is_some() {
			body.source = Some(json!({ "includes": ["tree"] }));
		}

		body.post_filter = Some(compiler.post_filter(&sr.query_filters)?);

		if !sr.paging {
			body.aggregations = aggregation::aggregations(compiler, sr, fub)?;
		}

		Ok(body)
	}

	pub fn to_value(&self) -> Value {
		let mut body = Map::new();

		body.insert("query".to_string(), self.query.to_value());
		body.insert("size".to_string(), json!(self.size));
		body.insert("sort".to_string(), Value::Array(self.sort.clone()));

		if let Some(from) = self.from {
			body.insert("from".to_string(), json!(from));
		}
		if let Some(search_after) = &self.search_after {
			body.insert("search_after".to_string(), Value::Array(search_after.clone()));
		}
		if let Some(post_filter) = self.post_filter.as_ref().filter(|filter| !filter.is_empty()) {
			body.insert("post_filter".to_string(), post_filter.to_value());
		}
		if !self.aggregations.is_empty() {
			body.insert("aggs".to_string(), dsl::aggregations_to_value(&self.aggregations));
		}
		if let Some(collapse) = &self.collapse {
			body.insert("collapse".to_string(), collapse.clone());
		}
		if let Some(source) = &self.source {
			body.insert("_source".to_string(), source.clone());
		}

		Value::Object(body)
	}
}

/// Relevance for empty or random sorts, the raw field for tree sorts, otherwise the entry
/// value carrying `sort_by` as its search label.
fn primary_sort(sort_by: &str, asc: bool, random: bool) -> Value {
	if sort_by.is_empty() || random {
		return json!({ "_score": { "order": "desc" } });
	}
	if sort_by.starts_with("tree.") {
		return json!({ sort_by: { "order": "asc" } });
	}

	let order = if asc { "asc" } else { "desc" };

	json!({
		"resources.entries.@value.keyword": {
			"order": order,
			"nested": {
				"path": ENTRIES_PATH,
				"filter": Query::term("resources.entries.searchLabel", sort_by).to_value(),
			},
		}
	})
}

fn tie_break() -> Value {
	json!({ TIE_BREAK_SORT_KEY: { "order": "asc" } })
}

fn collapse(sr: &SearchRequest) -> Value {
	let size = if sr.collapse_size == 0 { DEFAULT_COLLAPSE_SIZE } else { sr.collapse_size };
	let mut inner_hits = json!({ "name": COLLAPSE_INNER_HITS, "size": size });

	if !sr.collapse_sort.is_empty() {
		inner_hits["sort"] = json!([primary_sort(&sr.collapse_sort, sr.sort_asc, false)]);
	}

	json!({
		"field": sr.collapse_on,
		"inner_hits": inner_hits,
		"max_concurrent_group_searches": MAX_CONCURRENT_GROUP_SEARCHES,
	})
}
