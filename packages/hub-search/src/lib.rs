pub mod aggregation;
pub mod body;
pub mod breadcrumb;
pub mod dsl;
pub mod echo;
pub mod facets;
pub mod query;
pub mod response;
pub mod search;
pub mod settings;

mod error;

use std::{future::Future, pin::Pin};

use serde_json::Value;

pub use body::SearchBody;
pub use breadcrumb::{BreadCrumb, BreadCrumbBuilder, UserQuery, new_user_query};
pub use error::{Error, Result};
pub use facets::{FacetLink, FacetUriBuilder, QueryFacet};
pub use query::QueryCompiler;
pub use response::{PeekResponse, SearchOutcome, SearchResponse};
pub use search::SearchService;
pub use settings::SearchSettings;

use hub_storage::ElasticStore;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The document-store capability searches are executed against.
pub trait DocumentStore
where
	Self: Send + Sync,
{
	fn search<'a>(
		&'a self,
		index: &'a str,
		body: &'a Value,
	) -> BoxFuture<'a, color_eyre::Result<Value>>;
}

impl DocumentStore for ElasticStore {
	fn search<'a>(
		&'a self,
		index: &'a str,
		body: &'a Value,
	) -> BoxFuture<'a, color_eyre::Result<Value>> {
		Box::pin(async move { Ok(ElasticStore::search(self, index, body).await?) })
	}
}
