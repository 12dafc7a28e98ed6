use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub organization: Organization,
	pub elasticsearch: ElasticSearch,
	#[serde(default)]
	pub namespaces: Vec<NameSpace>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Organization {
	/// Tenant identifier every compiled query is scoped to.
	pub org_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ElasticSearch {
	pub urls: Vec<String>,
	pub index_name: String,
	#[serde(default = "default_org_id_key")]
	pub org_id_key: String,
	/// Canonical exact-match field for dataset (spec) identifiers.
	#[serde(default = "default_spec_key")]
	pub spec_key: String,
	#[serde(default = "default_full_text_field")]
	pub full_text_field: String,
	/// Bucket count for facets that do not override their size.
	#[serde(default = "default_facet_size")]
	pub facet_size: u32,
	/// Threshold applied to free-text and tree label matches, e.g. "70%".
	#[serde(default = "default_minimum_should_match")]
	pub minimum_should_match: String,
	/// Default upper bound for a single document-store call.
	#[serde(default = "default_timeout_ms")]
	pub timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NameSpace {
	pub prefix: String,
	pub base: String,
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_org_id_key() -> String {
	"meta.orgID".to_string()
}

fn default_spec_key() -> String {
	"meta.spec".to_string()
}

fn default_full_text_field() -> String {
	"full_text".to_string()
}

fn default_facet_size() -> u32 {
	50
}

fn default_minimum_should_match() -> String {
	"70%".to_string()
}

fn default_timeout_ms() -> u64 {
	5_000
}
