pub mod cursor;
pub mod filter;
pub mod namespace;
pub mod request;

mod error;

pub use cursor::ScrollPager;
pub use error::{Error, Result};
pub use filter::{ContextQueryFilter, QueryFilter, WILDCARD_TYPE_CLASS};
pub use namespace::{NameSpace, NamespaceRegistry, NamespaceResolver, type_class_uri};
pub use request::{
	DEFAULT_RESPONSE_SIZE, FacetBoolType, FacetField, ItemFormat, MAX_RESPONSE_SIZE,
	ResponseFormat, SearchRequest, TreeQuery,
};
