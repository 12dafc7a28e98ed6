use std::sync::Arc;

use hub_search::{DocumentStore, SearchService, SearchSettings};
use hub_storage::ElasticStore;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<SearchService>,
}
impl AppState {
	pub fn new(config: hub_config::Config) -> color_eyre::Result<Self> {
		let store = ElasticStore::new(&config.elasticsearch)?;

		Ok(Self::with_store(&config, Arc::new(store)))
	}

	pub fn with_store(config: &hub_config::Config, store: Arc<dyn DocumentStore>) -> Self {
		let settings = SearchSettings::from_config(config);

		Self { service: Arc::new(SearchService::new(settings, store)) }
	}
}
