use std::sync::Arc;

use hub_domain::SearchRequest;

use crate::{
	DocumentStore, Error, Result, SearchSettings,
	body::SearchBody,
	breadcrumb,
	facets::{self, FacetUriBuilder},
	query::QueryCompiler,
	response::{PeekResponse, RawSearchResponse, SearchOutcome, SearchResponse},
};

/// Compiles requests, runs them against the document store and decodes the results.
pub struct SearchService {
	pub settings: SearchSettings,
	pub store: Arc<dyn DocumentStore>,
}
impl SearchService {
	pub fn new(settings: SearchSettings, store: Arc<dyn DocumentStore>) -> Self {
		Self { settings, store }
	}

	pub fn compiler(&self) -> QueryCompiler<'_> {
		QueryCompiler::new(&self.settings)
	}

	/// Parses URL parameters using the configured default facet size.
	pub fn parse_request(&self, raw_query: &str) -> Result<SearchRequest> {
		Ok(SearchRequest::from_query_string(raw_query, self.settings.facet_size)?)
	}

	pub async fn search(&self, mut sr: SearchRequest) -> Result<SearchOutcome> {
		let fub = FacetUriBuilder::from_request(&sr);
		let body = SearchBody::build(&self.compiler(), &mut sr, &fub)?.to_value();

		tracing::debug!(
			index = %self.settings.index_name,
			paging = sr.paging,
			body = %body,
			"Executing search."
		);

		let raw = self
			.store
			.search(&self.settings.index_name, &body)
			.await
			.map_err(|err| Error::Upstream { message: err.to_string() })?;
		let response: RawSearchResponse = serde_json::from_value(raw)
			.map_err(|err| Error::InvalidResponse { message: err.to_string() })?;

		if !sr.peek.is_empty() {
			let peek = facets::decode_peek(&response.aggregations, &sr.peek);

			return Ok(SearchOutcome::Peek(PeekResponse { peek }));
		}

		let total = response.hits.total();

		if sr.collapse_on.is_empty()
			&& let Some(last) = response.hits.hits.last()
			&& !last.sort.is_empty()
		{
			sr.search_after = serde_json::to_vec(&last.sort)
				.map_err(|err| Error::Encoding { message: err.to_string() })?;
		}

		let facets = if sr.paging {
			Vec::new()
		} else {
			facets::decode_facets(&sr, &response.aggregations, total, &fub)
		};
		let query = breadcrumb::new_user_query(&sr);
		let pager = sr.next_scroll_id(total)?;
		let items = response.hits.hits.into_iter().map(|hit| hit.into_item()).collect();

		tracing::debug!(
			total,
			rows = pager.rows,
			has_next = !pager.scroll_id.is_empty(),
			"Search completed."
		);

		Ok(SearchOutcome::Results(SearchResponse { pager, query, items, facets }))
	}
}
