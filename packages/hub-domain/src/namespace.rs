//! Namespace prefix registry used to expand `prefix_label` type classes.

use std::{
	collections::HashMap,
	sync::{PoisonError, RwLock},
};

use crate::{Error, Result};

/// The one capability the query compiler needs from the registry.
pub trait NamespaceResolver
where
	Self: Send + Sync,
{
	fn base_uri(&self, prefix: &str) -> Option<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameSpace {
	pub prefix: String,
	pub base: String,
}
impl NameSpace {
	pub fn new(prefix: impl Into<String>, base: impl Into<String>) -> Self {
		Self { prefix: prefix.into(), base: base.into() }
	}
}
impl From<&hub_config::NameSpace> for NameSpace {
	fn from(cfg: &hub_config::NameSpace) -> Self {
		Self::new(cfg.prefix.clone(), cfg.base.clone())
	}
}

#[derive(Debug, Default)]
struct Entries {
	by_prefix: HashMap<String, NameSpace>,
	prefix_by_base: HashMap<String, String>,
}

/// Read-mostly registry shared by all concurrent requests.
#[derive(Debug, Default)]
pub struct NamespaceRegistry {
	entries: RwLock<Entries>,
}
impl NamespaceRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn from_config(namespaces: &[hub_config::NameSpace]) -> Self {
		let registry = Self::new();

		for ns in namespaces {
			registry.set(ns.into());
		}

		registry
	}

	/// Inserts or replaces the namespace registered under `ns.prefix`.
	pub fn set(&self, ns: NameSpace) {
		let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

		if let Some(previous) = entries.by_prefix.remove(&ns.prefix) {
			entries.prefix_by_base.remove(&previous.base);
		}

		entries.prefix_by_base.insert(ns.base.clone(), ns.prefix.clone());
		entries.by_prefix.insert(ns.prefix.clone(), ns);
	}

	pub fn delete(&self, ns: &NameSpace) -> bool {
		let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
		let Some(removed) = entries.by_prefix.remove(&ns.prefix) else {
			return false;
		};

		entries.prefix_by_base.remove(&removed.base);

		true
	}

	pub fn len(&self) -> usize {
		self.entries.read().unwrap_or_else(PoisonError::into_inner).by_prefix.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn get_with_prefix(&self, prefix: &str) -> Result<NameSpace> {
		let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);

		entries.by_prefix.get(prefix).cloned().ok_or_else(|| not_found("prefix", prefix))
	}

	pub fn get_with_base(&self, base: &str) -> Result<NameSpace> {
		let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);

		entries
			.prefix_by_base
			.get(base)
			.and_then(|prefix| entries.by_prefix.get(prefix))
			.cloned()
			.ok_or_else(|| not_found("base", base))
	}
}
impl NamespaceResolver for NamespaceRegistry {
	fn base_uri(&self, prefix: &str) -> Option<String> {
		self.get_with_prefix(prefix).ok().map(|ns| ns.base)
	}
}

/// Expands a `prefix_label` shorthand into a fully qualified class URI.
pub fn type_class_uri(resolver: &dyn NamespaceResolver, shorthand: &str) -> Result<String> {
	let Some((prefix, label)) = shorthand.split_once('_') else {
		return Err(Error::Namespace {
			message: format!("TypeClass is defined in the wrong shorthand; got {shorthand}"),
		});
	};
	let Some(base) = resolver.base_uri(prefix) else {
		return Err(Error::Namespace { message: format!("namespace for prefix {prefix} is unknown") });
	};

	if base.ends_with('#') || base.ends_with('/') {
		Ok(format!("{base}{label}"))
	} else {
		Ok(format!("{base}/{label}"))
	}
}

fn not_found(kind: &str, key: &str) -> Error {
	Error::Namespace { message: format!("namespace not found for {kind} {key}") }
}
