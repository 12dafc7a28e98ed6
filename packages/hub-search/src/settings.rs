use std::sync::Arc;

use hub_config::Config;
use hub_domain::{NamespaceRegistry, NamespaceResolver};

/// Per-process search configuration handed to every compiler instance.
#[derive(Clone)]
pub struct SearchSettings {
	pub org_id: String,
	pub org_id_key: String,
	pub spec_key: String,
	pub index_name: String,
	pub full_text_field: String,
	pub facet_size: u32,
	pub minimum_should_match: String,
	pub namespaces: Arc<dyn NamespaceResolver>,
}
impl SearchSettings {
	pub fn from_config(cfg: &Config) -> Self {
		let registry = NamespaceRegistry::from_config(&cfg.namespaces);

		Self::with_namespaces(cfg, Arc::new(registry))
	}

	pub fn with_namespaces(cfg: &Config, namespaces: Arc<dyn NamespaceResolver>) -> Self {
		let es = &cfg.elasticsearch;

		Self {
			org_id: cfg.organization.org_id.clone(),
			org_id_key: es.org_id_key.clone(),
			spec_key: es.spec_key.clone(),
			index_name: es.index_name.clone(),
			full_text_field: es.full_text_field.clone(),
			facet_size: es.facet_size,
			minimum_should_match: es.minimum_should_match.clone(),
			namespaces,
		}
	}
}
