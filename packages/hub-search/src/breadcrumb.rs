use serde::Serialize;
use url::form_urlencoded::Serializer;

use hub_domain::{QueryFilter, SearchRequest};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreadCrumb {
	pub href: String,
	pub display: String,
	#[serde(skip_serializing_if = "String::is_empty")]
	pub field: String,
	#[serde(skip_serializing_if = "String::is_empty")]
	pub value: String,
	pub is_last: bool,
}

/// The user's free text plus the trail of applied steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
	pub terms: String,
	pub bread_crumbs: Vec<BreadCrumb>,
}

#[derive(Debug, Default)]
pub struct BreadCrumbBuilder {
	href_path: Vec<String>,
	crumbs: Vec<BreadCrumb>,
}
impl BreadCrumbBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn append_query(&mut self, text: &str) {
		if text.is_empty() {
			return;
		}

		let crumb = BreadCrumb {
			display: text.to_string(),
			value: text.to_string(),
			..Default::default()
		};

		self.push(pair("q", text), crumb);
	}

	pub fn append_filter(&mut self, qf: &QueryFilter) {
		let key = if qf.exclude { "qf.exclude" } else { "qf" };
		let param = qf.as_param();
		let crumb = BreadCrumb {
			display: param.clone(),
			field: qf.search_label.clone(),
			value: qf.value.clone(),
			..Default::default()
		};

		self.push(pair(key, &param), crumb);
	}

	/// Query string accumulated over every crumb so far.
	pub fn path(&self) -> String {
		self.href_path.join("&")
	}

	pub fn last(&self) -> Option<&BreadCrumb> {
		self.crumbs.last()
	}

	pub fn crumbs(&self) -> &[BreadCrumb] {
		&self.crumbs
	}

	pub fn into_crumbs(self) -> Vec<BreadCrumb> {
		self.crumbs
	}

	fn push(&mut self, href: String, mut crumb: BreadCrumb) {
		self.href_path.push(href);

		crumb.href = self.path();
		crumb.is_last = true;

		if let Some(previous) = self.crumbs.last_mut() {
			previous.is_last = false;
		}

		self.crumbs.push(crumb);
	}
}

fn pair(key: &str, value: &str) -> String {
	Serializer::new(String::new()).append_pair(key, value).finish()
}

/// Free text first, then filters in request order.
pub fn new_user_query(sr: &SearchRequest) -> UserQuery {
	let mut builder = BreadCrumbBuilder::new();

	builder.append_query(&sr.query);

	for qf in &sr.query_filters {
		builder.append_filter(qf);
	}

	UserQuery { terms: sr.query.clone(), bread_crumbs: builder.into_crumbs() }
}
