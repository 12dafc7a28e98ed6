//! Multi-select facet aggregations over the nested resource entries.

use hub_domain::{FacetField, SearchRequest};

use crate::{
	Result,
	dsl::{Aggregation, NamedAggregations, Query, TermsOrder},
	facets::FacetUriBuilder,
	query::{ENTRIES_PATH, QueryCompiler},
};

/// Bucket count used for `peek` probes.
pub const PEEK_FACET_SIZE: u32 = 100;

/// One aggregation per requested facet field, keyed by field name.
pub fn aggregations(
	compiler: &QueryCompiler<'_>,
	sr: &SearchRequest,
	fub: &FacetUriBuilder,
) -> Result<NamedAggregations> {
	let mut aggs = Vec::with_capacity(sr.facet_fields.len());

	for facet in &sr.facet_fields {
		aggs.push((facet.field.clone(), facet_aggregation(compiler, facet, sr, fub)?));
	}

	Ok(aggs)
}

/// Builds `filter(facet filters)` > `filter: nested(entries)` > `inner: filter(label)` >
/// `value: terms`.
pub fn facet_aggregation(
	compiler: &QueryCompiler<'_>,
	facet: &FacetField,
	sr: &SearchRequest,
	fub: &FacetUriBuilder,
) -> Result<Aggregation> {
	let value_key = if facet.by_id { "@id" } else { "@value.keyword" };
	let order = if facet.by_name {
		TermsOrder::Term { asc: facet.asc }
	} else {
		TermsOrder::Count { asc: facet.asc }
	};
	let values = Aggregation::Terms {
		field: format!("{ENTRIES_PATH}.{value_key}"),
		size: facet.size,
		order,
	};
	let label_filter = Aggregation::Filter {
		filter: Query::term(format!("{ENTRIES_PATH}.searchLabel"), facet.field.as_str()),
		aggs: vec![("value".to_string(), values)],
	};
	let entries = Aggregation::Nested {
		path: ENTRIES_PATH.to_string(),
		aggs: vec![("inner".to_string(), label_filter)],
	};
	let facet_filter = fub.create_facet_filter_query(compiler, &facet.field, sr.facet_bool_type)?;

	Ok(Aggregation::Filter {
		filter: facet_filter.into(),
		aggs: vec![("filter".to_string(), entries)],
	})
}

/// The single aggregation computed for a `peek` request.
pub fn peek_aggregation(
	compiler: &QueryCompiler<'_>,
	sr: &SearchRequest,
	fub: &FacetUriBuilder,
) -> Result<Aggregation> {
	facet_aggregation(compiler, &FacetField::new(sr.peek.as_str(), PEEK_FACET_SIZE), sr, fub)
}
