use serde::{Deserialize, Serialize};

use crate::{Error, QueryFilter, Result, cursor};

pub const DEFAULT_RESPONSE_SIZE: u32 = 16;
pub const MAX_RESPONSE_SIZE: u32 = 1_000;
pub const RANDOM_SORT_PREFIX: &str = "random";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResponseFormat {
	#[default]
	Json,
	Protobuf,
	LdJson,
	BulkAction,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemFormat {
	#[default]
	Summary,
	FragmentGraph,
	Grouped,
	JsonLd,
	Flat,
	Tree,
}
impl ItemFormat {
	fn from_param(raw: &str) -> Self {
		match raw {
			"fragmentGraph" => Self::FragmentGraph,
			"grouped" => Self::Grouped,
			"jsonld" => Self::JsonLd,
			"flat" => Self::Flat,
			"tree" => Self::Tree,
			_ => Self::Summary,
		}
	}
}

/// How facet counts react to the other applied filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FacetBoolType {
	/// Counts honor every applied filter except the facet's own field.
	#[default]
	And,
	/// Counts ignore all applied filters.
	Or,
}
impl FacetBoolType {
	/// Accepts `and`/`or` and the legacy boolean form (`false` selects `or`). Anything else
	/// keeps the current mode.
	fn from_param(raw: &str) -> Option<Self> {
		match raw.to_ascii_lowercase().as_str() {
			"and" | "true" => Some(Self::And),
			"or" | "false" => Some(Self::Or),
			_ => None,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetField {
	pub field: String,
	pub name: String,
	pub size: u32,
	/// Order buckets by term instead of by document count.
	pub by_name: bool,
	/// Aggregate on the entry identifier instead of its literal value.
	pub by_id: bool,
	pub asc: bool,
}
impl FacetField {
	pub fn new(field: impl Into<String>, size: u32) -> Self {
		let field = field.into();

		Self { name: field.clone(), field, size, by_name: false, by_id: false, asc: false }
	}

	/// Parses a `facet.field` value: either a bare field name or a JSON object with overrides.
	pub fn parse(raw: &str, default_size: u32) -> Result<Self> {
		if !raw.starts_with('{') {
			return Ok(Self::new(raw, default_size));
		}

		let spec: FacetFieldSpec = serde_json::from_str(raw).map_err(|err| Error::Parse {
			message: format!("Unable to unmarshal facet field {raw}: {err}"),
		})?;

		if spec.field.is_empty() {
			return Err(Error::Parse { message: format!("facet field without a field name: {raw}") });
		}

		Ok(Self {
			name: spec.name.unwrap_or_else(|| spec.field.clone()),
			field: spec.field,
			size: spec.size.unwrap_or(default_size),
			by_name: spec.by_name,
			by_id: spec.by_id,
			asc: spec.asc,
		})
	}
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FacetFieldSpec {
	#[serde(default)]
	field: String,
	name: Option<String>,
	size: Option<u32>,
	#[serde(default)]
	by_name: bool,
	#[serde(default)]
	by_id: bool,
	#[serde(default)]
	asc: bool,
}

/// Navigation by position inside an archival hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeQuery {
	pub leaf: String,
	pub parent: String,
	pub child_count: String,
	#[serde(rename = "type")]
	pub node_type: String,
	pub label: String,
	pub depth: Vec<String>,
	/// Expand the full ancestor path of `leaf` instead of exact matching.
	pub fill_tree: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
	pub query: String,
	pub query_filters: Vec<QueryFilter>,
	pub facet_fields: Vec<FacetField>,
	pub facet_bool_type: FacetBoolType,
	pub response_size: u32,
	pub start: u32,
	pub sort_by: String,
	pub sort_asc: bool,
	/// Seed of a `random` sort, replayed by every page of the same scroll.
	pub random_seed: Option<String>,
	pub collapse_on: String,
	pub collapse_sort: String,
	pub collapse_size: u32,
	pub peek: String,
	pub response_format: ResponseFormat,
	pub item_format: ItemFormat,
	pub tree: Option<TreeQuery>,
	/// Sort values of the last hit of the previous page.
	pub search_after: Vec<u8>,
	/// Set when the request was resumed from a cursor; aggregations are skipped.
	pub paging: bool,
}
impl Default for SearchRequest {
	fn default() -> Self {
		Self {
			query: String::new(),
			query_filters: Vec::new(),
			facet_fields: Vec::new(),
			facet_bool_type: FacetBoolType::default(),
			response_size: DEFAULT_RESPONSE_SIZE,
			start: 0,
			sort_by: String::new(),
			sort_asc: false,
			random_seed: None,
			collapse_on: String::new(),
			collapse_sort: String::new(),
			collapse_size: 0,
			peek: String::new(),
			response_format: ResponseFormat::default(),
			item_format: ItemFormat::default(),
			tree: None,
			search_after: Vec::new(),
			paging: false,
		}
	}
}
impl SearchRequest {
	/// Builds a request from a raw URL query string such as `q=river&qf=dc_subject:water`.
	pub fn from_query_string(raw: &str, facet_size: u32) -> Result<Self> {
		let pairs = url::form_urlencoded::parse(raw.trim_start_matches('?').as_bytes())
			.map(|(key, value)| (key.into_owned(), value.into_owned()))
			.collect::<Vec<_>>();

		Self::from_params(&pairs, facet_size)
	}

	/// Folds URL parameters into a request. A cursor token (`scrollID` or `qs`) short-circuits
	/// every other parameter.
	pub fn from_params(pairs: &[(String, String)], facet_size: u32) -> Result<Self> {
		let params = Params { pairs };
		let token = params.first_non_empty(&["scrollID", "qs"]);

		if let Some(token) = token {
			return cursor::decode(token);
		}

		let mut sr = Self::default();
		let mut tree: Option<TreeQuery> = None;

		for (key, value) in pairs {
			match key.as_str() {
				"q" | "query" => sr.query = value.clone(),
				"qf" | "qf[]" => sr.add_query_filter(value)?,
				"qf.exclude" | "qf.exclude[]" => {
					let mut qf = QueryFilter::parse(value)?;

					qf.exclude = true;
					sr.query_filters.push(qf);
				},
				"facet.field" => sr.facet_fields.push(FacetField::parse(value, facet_size)?),
				"facetBoolType" => {
					if let Some(facet_bool_type) = FacetBoolType::from_param(value) {
						sr.facet_bool_type = facet_bool_type;
					}
				},
				"format" => match value.as_str() {
					"protobuf" => sr.response_format = ResponseFormat::Protobuf,
					"jsonld" => sr.response_format = ResponseFormat::LdJson,
					"bulkaction" => sr.response_format = ResponseFormat::BulkAction,
					_ => {},
				},
				"rows" => sr.response_size = parse_u32(key, value)?.min(MAX_RESPONSE_SIZE),
				"itemFormat" => sr.item_format = ItemFormat::from_param(value),
				"sortBy" => sr.set_sort(value),
				"sortAsc" if value == "true" => sr.sort_asc = true,
				"sortOrder" if value == "asc" => sr.sort_asc = true,
				"collapseOn" => sr.collapse_on = value.clone(),
				"collapseSort" => sr.collapse_sort = value.clone(),
				"collapseSize" => sr.collapse_size = parse_u32(key, value)?,
				"peek" => sr.peek = value.clone(),
				"byLeaf" => {
					let tree = tree.get_or_insert_with(TreeQuery::default);

					tree.leaf = value.clone();
					tree.fill_tree =
						params.first("fillTree").is_some_and(|v| v.eq_ignore_ascii_case("true"));
				},
				"byDepth" => tree.get_or_insert_with(TreeQuery::default).depth.push(value.clone()),
				"byChildCount" => {
					tree.get_or_insert_with(TreeQuery::default).child_count = value.clone()
				},
				"byParent" => tree.get_or_insert_with(TreeQuery::default).parent = value.clone(),
				"byType" => tree.get_or_insert_with(TreeQuery::default).node_type = value.clone(),
				"byLabel" => tree.get_or_insert_with(TreeQuery::default).label = value.clone(),
				_ => {},
			}
		}

		if tree.is_some() && sr.response_size != 1 {
			sr.response_size = MAX_RESPONSE_SIZE;
		}

		sr.tree = tree;

		Ok(sr)
	}

	pub fn add_query_filter(&mut self, raw: &str) -> Result<()> {
		self.query_filters.push(QueryFilter::parse(raw)?);

		Ok(())
	}

	pub fn is_random_sort(&self) -> bool {
		self.sort_by.starts_with(RANDOM_SORT_PREFIX)
	}

	pub fn random_seed(&self) -> Option<&str> {
		if !self.is_random_sort() {
			return None;
		}

		self.random_seed.as_deref()
	}

	/// Records `seed` so later pages of the same scroll reuse it.
	pub fn set_random_seed(&mut self, seed: &str) {
		self.random_seed = Some(seed.to_string());
	}

	/// Applies a `sortBy` value. A `random_<seed>` value is split into the `random` sort and
	/// its seed; a seed is only taken when exactly one `_` is present.
	fn set_sort(&mut self, raw: &str) {
		if !raw.starts_with(RANDOM_SORT_PREFIX) {
			self.sort_by = raw.to_string();

			return;
		}

		let mut parts = raw.split('_');

		self.sort_by = RANDOM_SORT_PREFIX.to_string();
		self.random_seed = match (parts.next(), parts.next(), parts.next()) {
			(Some(_), Some(seed), None) if !seed.is_empty() => Some(seed.to_string()),
			_ => None,
		};
	}
}

struct Params<'a> {
	pairs: &'a [(String, String)],
}
impl<'a> Params<'a> {
	fn first(&self, key: &str) -> Option<&'a str> {
		self.pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
	}

	fn first_non_empty(&self, keys: &[&str]) -> Option<&'a str> {
		keys.iter().filter_map(|key| self.first(key)).find(|value| !value.is_empty())
	}
}

fn parse_u32(key: &str, raw: &str) -> Result<u32> {
	raw.trim().parse::<u32>().map_err(|err| Error::Parse {
		message: format!("unable to convert {raw} to a non-negative integer for {key}: {err}"),
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn random_seed_requires_exactly_one_separator() {
		let mut sr = SearchRequest::default();

		sr.set_sort("random_abc123");

		assert_eq!(sr.sort_by, RANDOM_SORT_PREFIX);
		assert_eq!(sr.random_seed(), Some("abc123"));

		sr.set_sort("random");

		assert_eq!(sr.random_seed(), None);

		sr.set_sort("random_a_b");

		assert_eq!(sr.random_seed(), None);

		sr.set_sort("dc_title");

		assert_eq!(sr.sort_by, "dc_title");
		assert_eq!(sr.random_seed(), None);
	}

	#[test]
	fn seed_is_ignored_once_the_sort_is_no_longer_random() {
		let sr = SearchRequest {
			sort_by: "dc_title".to_string(),
			random_seed: Some("abc123".to_string()),
			..Default::default()
		};

		assert_eq!(sr.random_seed(), None);
	}

	#[test]
	fn facet_field_json_overrides_defaults() {
		let ff = FacetField::parse(r#"{"field":"dc_subject","size":5,"byName":true,"asc":true}"#, 50)
			.expect("Failed to parse request.");

		assert_eq!(ff.field, "dc_subject");
		assert_eq!(ff.name, "dc_subject");
		assert_eq!(ff.size, 5);
		assert!(ff.by_name);
		assert!(ff.asc);
		assert!(!ff.by_id);
	}

	#[test]
	fn malformed_facet_field_json_is_a_parse_error() {
		let err = FacetField::parse("{not json", 50).expect_err("expected parse error");

		assert!(matches!(err, Error::Parse { .. }));
	}
}
