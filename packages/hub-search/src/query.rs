//! Compiles a [`SearchRequest`] into the boolean query sent to the document store.

use rand::{Rng, distr::Alphanumeric};

use hub_domain::{QueryFilter, SearchRequest, TreeQuery, type_class_uri};

use crate::{
	Result, SearchSettings,
	dsl::{BoolQuery, Query},
};

pub const DOC_TYPE_KEY: &str = "meta.docType";
pub const FRAGMENT_GRAPH_DOC_TYPE: &str = "FragmentGraph";
pub const ENTRIES_PATH: &str = "resources.entries";

/// Filter labels that address the dataset identifier instead of a resource entry.
const SPEC_LABELS: [&str; 4] = ["spec", "delving_spec", "delving_spec.raw", "meta.spec"];
const SPEC_TEXT_PREFIX: &str = "meta.spec:";
const LEGACY_SPEC_TEXT_PREFIX: &str = "delving_spec:";
const RANDOM_SEED_LEN: usize = 10;

pub struct QueryCompiler<'a> {
	settings: &'a SearchSettings,
}
impl<'a> QueryCompiler<'a> {
	pub fn new(settings: &'a SearchSettings) -> Self {
		Self { settings }
	}

	/// Builds the main query. May record a generated random seed or switch a multi-depth tree
	/// request into fill mode on `sr`.
	pub fn compile(&self, sr: &mut SearchRequest) -> Result<Query> {
		let mut query = BoolQuery::new()
			.must(Query::term(DOC_TYPE_KEY, FRAGMENT_GRAPH_DOC_TYPE))
			.must(Query::term(&self.settings.org_id_key, self.settings.org_id.as_str()));

		if !sr.query.is_empty() {
			query = self.free_text(query, &sr.query);
		}

		if sr.is_random_sort() {
			let seed = match sr.random_seed() {
				Some(seed) => seed.to_string(),
				None => {
					let seed = generate_seed();

					sr.set_random_seed(&seed);

					seed
				},
			};

			tracing::debug!(seed = %seed, "Applying seeded random ordering.");

			return Ok(Query::RandomScore { query: Box::new(query.into()), seed });
		}

		if let Some(tree) = sr.tree.as_mut() {
			query = if tree.fill_tree {
				query.must(fill_tree_query(&tree.leaf))
			} else {
				self.exact_tree(query, tree)
			};
		}

		Ok(query.into())
	}

	/// Translates one filter into a containment query over the nested resources.
	pub fn filter_query(&self, qf: &QueryFilter) -> Result<Query> {
		let entry = BoolQuery::new()
			.must(Query::term("resources.entries.searchLabel", qf.search_label.as_str()))
			.must(Query::term("resources.entries.@value.keyword", qf.value.as_str()));
		let mut resource = BoolQuery::new().must(Query::nested(ENTRIES_PATH, entry));

		if !qf.type_class.is_empty() {
			let uri = type_class_uri(self.settings.namespaces.as_ref(), &qf.type_class)?;

			resource = resource.must(Query::term("resources.types", uri));
		}

		// Only the nearer ancestor is matched; `level1` is carried but not translated.
		if let Some(level2) = &qf.level2 {
			let mut context = BoolQuery::new();

			if !level2.type_class.is_empty() {
				let uri = type_class_uri(self.settings.namespaces.as_ref(), &level2.type_class)?;

				context = context.must(Query::term("resources.context.SubjectClass", uri));
			}

			context = context
				.must(Query::term("resources.context.SearchLabel", level2.search_label.as_str()));
			resource = resource.must(Query::nested("resources.context", context));
		}

		Ok(Query::nested("resources", resource))
	}

	/// Filter query with dataset labels folded into a term on the spec field.
	pub fn restriction(&self, qf: &QueryFilter) -> Result<Query> {
		if SPEC_LABELS.contains(&qf.search_label.as_str()) {
			return Ok(Query::term(&self.settings.spec_key, qf.value.as_str()));
		}

		self.filter_query(qf)
	}

	/// Post-filter narrowing the hits without narrowing aggregation counts.
	pub fn post_filter(&self, filters: &[QueryFilter]) -> Result<BoolQuery> {
		let mut post_filter = BoolQuery::new();

		for qf in filters {
			let restriction = self.restriction(qf)?;

			post_filter = if qf.exclude {
				post_filter.must_not(restriction)
			} else {
				post_filter.must(restriction)
			};
		}

		Ok(post_filter)
	}

	fn free_text(&self, mut query: BoolQuery, raw: &str) -> BoolQuery {
		let rewritten = raw.replace(LEGACY_SPEC_TEXT_PREFIX, SPEC_TEXT_PREFIX);
		let mut remainder = Vec::new();

		for part in rewritten.split(' ') {
			match part.strip_prefix(SPEC_TEXT_PREFIX) {
				Some(spec) => query = query.must(Query::term(&self.settings.spec_key, spec)),
				None => remainder.push(part),
			}
		}

		let remainder = remainder.join(" ");

		if remainder.trim().is_empty() {
			return query;
		}

		query.must(Query::QueryString {
			query: remainder,
			default_field: self.settings.full_text_field.clone(),
			minimum_should_match: Some(self.settings.minimum_should_match.clone()),
		})
	}

	fn exact_tree(&self, mut query: BoolQuery, tree: &mut TreeQuery) -> BoolQuery {
		if !tree.leaf.is_empty() {
			query = query.must(Query::term("tree.leaf", tree.leaf.as_str()));
		}
		if !tree.parent.is_empty() {
			query = query.must(Query::term("tree.parent", tree.parent.as_str()));
		}
		if !tree.child_count.is_empty() {
			query = query.must(Query::match_value("tree.childCount", tree.child_count.as_str()));
		}
		if !tree.label.is_empty() {
			query = query.must(Query::Match {
				field: "tree.label".to_string(),
				value: tree.label.clone().into(),
				minimum_should_match: Some(self.settings.minimum_should_match.clone()),
			});
		}

		match tree.depth.as_slice() {
			[] => {},
			[depth] => query = query.must(Query::match_value("tree.depth", depth.as_str())),
			depths => {
				let any_depth = depths.iter().fold(BoolQuery::new(), |acc, depth| {
					acc.should(Query::match_value("tree.depth", depth.as_str()))
				});

				query = query.must(any_depth);
				tree.fill_tree = true;
			},
		}

		if !tree.node_type.is_empty() {
			query = query.must(Query::term("tree.type", tree.node_type.as_str()));
		}

		query
	}
}

/// Matches the root level plus every ancestor path of `leaf` (`a`, `a~b`, `a~b~c`).
fn fill_tree_query(leaf: &str) -> BoolQuery {
	let mut tree_query = BoolQuery::new().should(Query::match_value("tree.depth", 1));
	let mut path = String::new();

	for (idx, segment) in leaf.split('~').enumerate() {
		if idx > 0 {
			path.push('~');
		}

		path.push_str(segment);

		tree_query = tree_query.should(Query::term("tree.leaf", path.clone()));
	}

	tree_query
}

fn generate_seed() -> String {
	rand::rng().sample_iter(&Alphanumeric).take(RANDOM_SEED_LEN).map(char::from).collect()
}
