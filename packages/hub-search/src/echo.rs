//! Introspection of the compiled request, selected with the `echo` URL parameter.

use serde_json::{Value, json};

use hub_domain::SearchRequest;

use crate::{
	Error, Result, SearchService, aggregation, body::SearchBody, dsl, facets::FacetUriBuilder,
};

/// Sorted list of supported echo types.
pub const ECHO_OPTIONS: [&str; 5] = ["aggs", "es", "options", "searchRequest", "searchService"];

impl SearchService {
	/// Renders the requested view of `sr` without calling the store.
	pub fn echo(&self, sr: &mut SearchRequest, echo_type: &str) -> Result<Value> {
		let compiler = self.compiler();
		let fub = FacetUriBuilder::from_request(sr);

		match echo_type {
			"es" => Ok(compiler.compile(sr)?.to_value()),
			"aggs" => {
				let aggs = aggregation::aggregations(&compiler, sr, &fub)?;

				Ok(dsl::aggregations_to_value(&aggs))
			},
			"searchRequest" => serde_json::to_value(&*sr)
				.map_err(|err| Error::Encoding { message: err.to_string() }),
			"searchService" => Ok(SearchBody::build(&compiler, sr, &fub)?.to_value()),
			"options" => Ok(json!(ECHO_OPTIONS)),
			other => Err(Error::InvalidRequest { message: format!("unknown echoType: {other}") }),
		}
	}
}
