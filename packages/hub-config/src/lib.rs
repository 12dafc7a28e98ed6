mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, ElasticSearch, NameSpace, Organization, Service};

use std::{collections::HashSet, fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.organization.org_id.is_empty() {
		return Err(Error::Validation {
			message: "organization.org_id must be non-empty.".to_string(),
		});
	}

	let es = &cfg.elasticsearch;

	if es.urls.is_empty() {
		return Err(Error::Validation {
			message: "elasticsearch.urls must be non-empty.".to_string(),
		});
	}

	for url in &es.urls {
		if !(url.starts_with("http://") || url.starts_with("https://")) {
			return Err(Error::Validation {
				message: format!("elasticsearch.urls entry '{url}' must be an http(s) URL."),
			});
		}
	}

	for (label, value) in [
		("elasticsearch.index_name", &es.index_name),
		("elasticsearch.org_id_key", &es.org_id_key),
		("elasticsearch.spec_key", &es.spec_key),
		("elasticsearch.full_text_field", &es.full_text_field),
		("elasticsearch.minimum_should_match", &es.minimum_should_match),
	] {
		if value.is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if es.facet_size == 0 {
		return Err(Error::Validation {
			message: "elasticsearch.facet_size must be greater than zero.".to_string(),
		});
	}
	if es.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "elasticsearch.timeout_ms must be greater than zero.".to_string(),
		});
	}

	let mut prefixes = HashSet::new();

	for ns in &cfg.namespaces {
		if ns.prefix.is_empty() || ns.base.is_empty() {
			return Err(Error::Validation {
				message: "namespaces entries must have a non-empty prefix and base.".to_string(),
			});
		}
		if ns.prefix.contains('_') {
			return Err(Error::Validation {
				message: format!("namespace prefix '{}' must not contain '_'.", ns.prefix),
			});
		}
		if !prefixes.insert(ns.prefix.as_str()) {
			return Err(Error::Validation {
				message: format!("namespace prefix '{}' is declared more than once.", ns.prefix),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	trim_in_place(&mut cfg.service.http_bind);
	trim_in_place(&mut cfg.service.log_level);
	trim_in_place(&mut cfg.organization.org_id);
	trim_in_place(&mut cfg.elasticsearch.index_name);
	trim_in_place(&mut cfg.elasticsearch.minimum_should_match);

	for url in &mut cfg.elasticsearch.urls {
		trim_in_place(url);

		while url.ends_with('/') {
			url.pop();
		}
	}
	for ns in &mut cfg.namespaces {
		trim_in_place(&mut ns.prefix);
		trim_in_place(&mut ns.base);
	}
}

fn trim_in_place(value: &mut String) {
	let trimmed = value.trim();

	if trimmed.len() != value.len() {
		*value = trimmed.to_string();
	}
}
