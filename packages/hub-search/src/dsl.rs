//! Typed subset of the Elasticsearch query and aggregation DSL.
//!
//! Compilers build these values; `to_value` renders the JSON sent to the store.

use serde_json::{Map, Value, json};

#[derive(Debug, Clone, PartialEq)]
pub enum Query {
	MatchAll,
	Term { field: String, value: Value },
	Match { field: String, value: Value, minimum_should_match: Option<String> },
	QueryString { query: String, default_field: String, minimum_should_match: Option<String> },
	Bool(BoolQuery),
	Nested { path: String, query: Box<Query> },
	/// Scores every match with a seeded random value.
	RandomScore { query: Box<Query>, seed: String },
}
impl Query {
	pub fn term(field: impl Into<String>, value: impl Into<Value>) -> Self {
		Self::Term { field: field.into(), value: value.into() }
	}

	pub fn match_value(field: impl Into<String>, value: impl Into<Value>) -> Self {
		Self::Match { field: field.into(), value: value.into(), minimum_should_match: None }
	}

	pub fn nested(path: impl Into<String>, query: impl Into<Query>) -> Self {
		Self::Nested { path: path.into(), query: Box::new(query.into()) }
	}

	pub fn to_value(&self) -> Value {
		match self {
			Self::MatchAll => json!({ "match_all": {} }),
			Self::Term { field, value } => json!({ "term": { field: value } }),
			Self::Match { field, value, minimum_should_match } => {
				let mut body = Map::new();

				body.insert("query".to_string(), value.clone());

				if let Some(msm) = minimum_should_match {
					body.insert("minimum_should_match".to_string(), Value::String(msm.clone()));
				}

				json!({ "match": { field: body } })
			},
			Self::QueryString { query, default_field, minimum_should_match } => {
				let mut body = Map::new();

				body.insert("query".to_string(), Value::String(query.clone()));
				body.insert("default_field".to_string(), Value::String(default_field.clone()));

				if let Some(msm) = minimum_should_match {
					body.insert("minimum_should_match".to_string(), Value::String(msm.clone()));
				}

				json!({ "query_string": body })
			},
			Self::Bool(bool_query) => bool_query.to_value(),
			Self::Nested { path, query } => {
				json!({ "nested": { "path": path, "query": query.to_value() } })
			},
			Self::RandomScore { query, seed } => json!({
				"function_score": {
					"query": query.to_value(),
					"functions": [{ "random_score": { "seed": seed, "field": "_seq_no" } }],
				}
			}),
		}
	}
}
impl From<BoolQuery> for Query {
	fn from(value: BoolQuery) -> Self {
		Self::Bool(value)
	}
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoolQuery {
	pub must: Vec<Query>,
	pub should: Vec<Query>,
	pub must_not: Vec<Query>,
}
impl BoolQuery {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn must(mut self, query: impl Into<Query>) -> Self {
		self.must.push(query.into());

		self
	}

	pub fn should(mut self, query: impl Into<Query>) -> Self {
		self.should.push(query.into());

		self
	}

	pub fn must_not(mut self, query: impl Into<Query>) -> Self {
		self.must_not.push(query.into());

		self
	}

	pub fn is_empty(&self) -> bool {
		self.must.is_empty() && self.should.is_empty() && self.must_not.is_empty()
	}

	pub fn to_value(&self) -> Value {
		let mut body = Map::new();

		for (key, clauses) in
			[("must", &self.must), ("should", &self.should), ("must_not", &self.must_not)]
		{
			if !clauses.is_empty() {
				let rendered = clauses.iter().map(Query::to_value).collect();

				body.insert(key.to_string(), Value::Array(rendered));
			}
		}

		json!({ "bool": body })
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermsOrder {
	Term { asc: bool },
	Count { asc: bool },
}
impl TermsOrder {
	fn to_value(self) -> Value {
		let (key, asc) = match self {
			Self::Term { asc } => ("_key", asc),
			Self::Count { asc } => ("_count", asc),
		};

		let direction = if asc { "asc" } else { "desc" };

		json!({ key: direction })
	}
}

pub type NamedAggregations = Vec<(String, Aggregation)>;

#[derive(Debug, Clone, PartialEq)]
pub enum Aggregation {
	Terms { field: String, size: u32, order: TermsOrder },
	Filter { filter: Query, aggs: NamedAggregations },
	Nested { path: String, aggs: NamedAggregations },
}
impl Aggregation {
	pub fn to_value(&self) -> Value {
		match self {
			Self::Terms { field, size, order } => json!({
				"terms": { "field": field, "size": size, "order": order.to_value() }
			}),
			Self::Filter { filter, aggs } => {
				json!({ "filter": filter.to_value(), "aggs": aggregations_to_value(aggs) })
			},
			Self::Nested { path, aggs } => {
				json!({ "nested": { "path": path }, "aggs": aggregations_to_value(aggs) })
			},
		}
	}

	/// Looks up a direct sub-aggregation by name.
	pub fn sub(&self, name: &str) -> Option<&Aggregation> {
		match self {
			Self::Terms { .. } => None,
			Self::Filter { aggs, .. } | Self::Nested { aggs, .. } => {
				aggs.iter().find(|(key, _)| key == name).map(|(_, agg)| agg)
			},
		}
	}
}

pub fn aggregations_to_value(aggs: &[(String, Aggregation)]) -> Value {
	Value::Object(aggs.iter().map(|(name, agg)| (name.clone(), agg.to_value())).collect())
}
