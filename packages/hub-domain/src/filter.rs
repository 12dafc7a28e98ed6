//! Compact textual filter grammar: `[T1]L1[T2]L2[T]Label:Value`.
//!
//! The `[]` wildcard shorthand is expanded only in the part before the first `:`; a value such
//! as `list[]` is kept verbatim.

use std::{
	fmt::{Display, Formatter},
	str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Type-class token that matches any class; `[]` is sugar for it.
pub const WILDCARD_TYPE_CLASS: &str = "a";

const MAX_FILTER_TOKENS: usize = 6;

/// Ancestor context a filter value must appear under.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextQueryFilter {
	pub search_label: String,
	pub type_class: String,
}
impl ContextQueryFilter {
	pub fn new(search_label: impl Into<String>, type_class: impl Into<String>) -> Self {
		Self { search_label: search_label.into(), type_class: type_class.into() }
	}
}

/// A single `qf` restriction on the nested resource entries of a record.
///
/// `level2` is the nearer ancestor context and `level1` the further one; `level1` is only
/// ever set together with `level2`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryFilter {
	pub search_label: String,
	pub type_class: String,
	pub value: String,
	pub exclude: bool,
	pub level1: Option<ContextQueryFilter>,
	pub level2: Option<ContextQueryFilter>,
}
impl QueryFilter {
	pub fn new(search_label: impl Into<String>, value: impl Into<String>) -> Self {
		Self { search_label: search_label.into(), value: value.into(), ..Default::default() }
	}

	pub fn parse(raw: &str) -> Result<Self> {
		let Some((head, value)) = raw.split_once(':') else {
			return Err(Error::Parse { message: format!("no query field specified in: {raw}") });
		};
		let head = head.replace("[]", "[a]");
		let tokens: Vec<&str> = head.split(['[', ']']).filter(|token| !token.is_empty()).collect();
		let mut qf = Self { value: value.to_string(), ..Default::default() };

		match tokens.as_slice() {
			[label] => {
				qf.search_label = label.to_string();
			},
			[class, label] => {
				qf.set_base(class, label);
			},
			[l2, class, label] => {
				qf.set_base(class, label);
				qf.level2 = Some(ContextQueryFilter::new(*l2, ""));
			},
			[l2_class, l2, class, label] => {
				qf.set_base(class, label);
				qf.level2 = Some(context(l2_class, l2));
			},
			[l1, l2_class, l2, class, label] => {
				qf.set_base(class, label);
				qf.level2 = Some(context(l2_class, l2));
				qf.level1 = Some(ContextQueryFilter::new(*l1, ""));
			},
			[l1_class, l1, l2_class, l2, class, label] => {
				qf.set_base(class, label);
				qf.level2 = Some(context(l2_class, l2));
				qf.level1 = Some(context(l1_class, l1));
			},
			_ => {
				return Err(Error::Parse {
					message: format!(
						"unsupported filter depth in: {raw}; expected 1 to {MAX_FILTER_TOKENS} tokens, got {}",
						tokens.len()
					),
				});
			},
		}

		Ok(qf)
	}

	/// Serialized grammar form; the inverse of [`QueryFilter::parse`].
	pub fn as_filter_string(&self) -> String {
		let mut out = String::new();

		if let Some(level1) = &self.level1 {
			out.push_str(&format!("[{}]{}", level1.type_class, level1.search_label));
		}
		if let Some(level2) = &self.level2 {
			out.push_str(&format!("[{}]{}", level2.type_class, level2.search_label));
		}

		out.push_str(&format!("[{}]{}:{}", self.type_class, self.search_label, self.value));

		out
	}

	/// Shortest form that parses back to the same filter, used in generated links.
	pub fn as_param(&self) -> String {
		if self.type_class.is_empty() && self.level1.is_none() && self.level2.is_none() {
			return format!("{}:{}", self.search_label, self.value);
		}

		self.as_filter_string()
	}

	fn set_base(&mut self, class: &str, label: &str) {
		self.type_class = normalize_type_class(class);
		self.search_label = label.to_string();
	}
}
impl Display for QueryFilter {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.as_filter_string())
	}
}
impl FromStr for QueryFilter {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		Self::parse(s)
	}
}

fn context(class: &str, label: &str) -> ContextQueryFilter {
	ContextQueryFilter::new(label, normalize_type_class(class))
}

fn normalize_type_class(class: &str) -> String {
	if class == WILDCARD_TYPE_CLASS { String::new() } else { class.to_string() }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_brackets_in_value_are_preserved() {
		let qf = QueryFilter::parse("title:list[]").expect("Failed to parse filter.");

		assert_eq!(qf.value, "list[]");
	}

	#[test]
	fn value_keeps_everything_after_the_first_colon() {
		let qf = QueryFilter::parse("dc_date:12:30").expect("Failed to parse filter.");

		assert_eq!(qf.search_label, "dc_date");
		assert_eq!(qf.value, "12:30");
	}

	#[test]
	fn wildcard_token_normalizes_at_every_level() {
		let qf = QueryFilter::parse("[a]outer[a]inner[a]title:x").expect("Failed to parse filter.");

		assert_eq!(qf.type_class, "");
		assert_eq!(qf.level2, Some(ContextQueryFilter::new("inner", "")));
		assert_eq!(qf.level1, Some(ContextQueryFilter::new("outer", "")));
	}

	#[test]
	fn compact_param_omits_empty_brackets() {
		assert_eq!(QueryFilter::new("tree.type", "series").as_param(), "tree.type:series");

		let typed = QueryFilter::parse("[edm_Place]title:x").expect("Failed to parse filter.");

		assert_eq!(typed.as_param(), "[edm_Place]title:x");
	}
}
