//! Facet toggle links and the decoding of facet aggregation results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::form_urlencoded::Serializer;

use hub_domain::{FacetBoolType, QueryFilter, SearchRequest};

use crate::{Result, dsl::BoolQuery, query::QueryCompiler};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetLink {
	pub url: String,
	pub is_selected: bool,
	pub value: String,
	pub count: u64,
	pub display_string: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryFacet {
	pub name: String,
	pub field: String,
	pub is_selected: bool,
	pub total: u64,
	pub other_docs: u64,
	pub links: Vec<FacetLink>,
}

/// Applied filters indexed by field and value. Built per request.
#[derive(Debug, Clone, Default)]
pub struct FacetUriBuilder {
	query: String,
	filters: BTreeMap<String, BTreeMap<String, QueryFilter>>,
}
impl FacetUriBuilder {
	pub fn new(query: impl Into<String>, filters: &[QueryFilter]) -> Self {
		let mut builder = Self { query: query.into(), filters: BTreeMap::new() };

		for qf in filters {
			builder.add_filter(qf);
		}

		builder
	}

	pub fn from_request(sr: &SearchRequest) -> Self {
		Self::new(sr.query.as_str(), &sr.query_filters)
	}

	pub fn add_filter(&mut self, qf: &QueryFilter) {
		self.filters
			.entry(qf.search_label.clone())
			.or_default()
			.insert(qf.value.clone(), qf.clone());
	}

	pub fn has_query_filter(&self, field: &str, value: &str) -> bool {
		self.filters.get(field).is_some_and(|values| values.contains_key(value))
	}

	/// Query string that toggles `field:value`, and whether that pair is currently applied.
	pub fn create_facet_filter_uri(&self, field: &str, value: &str) -> (String, bool) {
		let mut params = Serializer::new(String::new());
		let mut selected = false;

		if !self.query.is_empty() {
			params.append_pair("q", &self.query);
		}

		for (label, values) in &self.filters {
			for (key, qf) in values {
				if label == field && key == value {
					selected = true;

					continue;
				}

				params.append_pair(filter_param_key(qf), &qf.as_param());
			}
		}

		if !selected {
			params.append_pair("qf", &format!("{field}:{value}"));
		}

		(params.finish(), selected)
	}

	/// Filter for the facet on `facet_field`.
	///
	/// In AND mode every other field's filters apply and only the facet's own exclusions do,
	/// so selecting a value never hides its siblings. OR mode applies nothing.
	pub fn create_facet_filter_query(
		&self,
		compiler: &QueryCompiler<'_>,
		facet_field: &str,
		mode: FacetBoolType,
	) -> Result<BoolQuery> {
		let mut query = BoolQuery::new();

		if mode == FacetBoolType::Or {
			return Ok(query);
		}

		for (field, values) in &self.filters {
			let own_field = field == facet_field;

			for qf in values.values() {
				if qf.exclude {
					query = query.must_not(compiler.restriction(qf)?);
				} else if !own_field {
					query = query.must(compiler.restriction(qf)?);
				}
			}
		}

		Ok(query)
	}
}

fn filter_param_key(qf: &QueryFilter) -> &'static str {
	if qf.exclude { "qf.exclude" } else { "qf" }
}

#[derive(Debug, Deserialize)]
struct FacetAggregationResult {
	filter: Option<NestedEntriesResult>,
}

#[derive(Debug, Deserialize)]
struct NestedEntriesResult {
	inner: Option<LabelFilterResult>,
}

#[derive(Debug, Deserialize)]
struct LabelFilterResult {
	#[serde(default)]
	doc_count: u64,
	value: Option<TermsResult>,
}

#[derive(Debug, Deserialize)]
struct TermsResult {
	#[serde(default)]
	sum_other_doc_count: u64,
	#[serde(default)]
	buckets: Vec<Bucket>,
}

#[derive(Debug, Deserialize)]
struct Bucket {
	key: Value,
	doc_count: u64,
}

/// Walks `filter -> inner -> value` of one facet aggregation.
fn terms_of(raw: &Value) -> Option<(u64, TermsResult)> {
	let result: FacetAggregationResult = serde_json::from_value(raw.clone()).ok()?;
	let inner = result.filter?.inner?;

	Some((inner.doc_count, inner.value?))
}

fn bucket_key(key: &Value) -> String {
	match key {
		Value::String(key) => key.clone(),
		other => other.to_string(),
	}
}

/// Decodes facet aggregations in request order. Facets missing from the result or missing
/// part of the expected nesting are skipped.
pub fn decode_facets(
	sr: &SearchRequest,
	aggregations: &Value,
	total_hits: u64,
	fub: &FacetUriBuilder,
) -> Vec<QueryFacet> {
	if total_hits == 0 {
		return Vec::new();
	}

	let mut facets = Vec::with_capacity(sr.facet_fields.len());

	for facet_field in &sr.facet_fields {
		let Some((total, terms)) = aggregations.get(&facet_field.field).and_then(terms_of) else {
			tracing::warn!(field = %facet_field.field, "Facet aggregation missing from result.");

			continue;
		};
		let mut facet = QueryFacet {
			name: facet_field.name.clone(),
			field: facet_field.field.clone(),
			total,
			other_docs: terms.sum_other_doc_count,
			..Default::default()
		};

		for bucket in terms.buckets {
			let value = bucket_key(&bucket.key);
			let (url, is_selected) = fub.create_facet_filter_uri(&facet.field, &value);

			facet.is_selected |= is_selected;
			facet.links.push(FacetLink {
				url,
				is_selected,
				display_string: format!("{value} ({})", bucket.doc_count),
				count: bucket.doc_count,
				value,
			});
		}

		facets.push(facet);
	}

	facets
}

/// Bucket counts of a single-facet probe, keyed by value.
pub fn decode_peek(aggregations: &Value, field: &str) -> BTreeMap<String, u64> {
	let Some((_, terms)) = aggregations.get(field).and_then(terms_of) else {
		tracing::warn!(field = %field, "Peek aggregation missing from result.");

		return BTreeMap::new();
	};

	terms.buckets.into_iter().map(|bucket| (bucket_key(&bucket.key), bucket.doc_count)).collect()
}
