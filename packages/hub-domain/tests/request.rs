use hub_domain::{
	DEFAULT_RESPONSE_SIZE, Error, FacetBoolType, ItemFormat, MAX_RESPONSE_SIZE, ResponseFormat,
	SearchRequest, TreeQuery, cursor,
};

const FACET_SIZE: u32 = 50;

fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
	pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

fn from_pairs(pairs: &[(&str, &str)]) -> SearchRequest {
	SearchRequest::from_params(&params(pairs), FACET_SIZE).expect("Failed to build request.")
}

#[test]
fn defaults_apply_without_parameters() {
	let sr = from_pairs(&[]);

	assert_eq!(sr.response_size, DEFAULT_RESPONSE_SIZE);
	assert_eq!(sr.start, 0);
	assert_eq!(sr.item_format, ItemFormat::Summary);
	assert_eq!(sr.response_format, ResponseFormat::Json);
	assert_eq!(sr.facet_bool_type, FacetBoolType::And);
	assert!(!sr.paging);
	assert!(sr.tree.is_none());
}

#[test]
fn rows_above_the_cap_are_clamped() {
	assert_eq!(from_pairs(&[("rows", "5000")]).response_size, MAX_RESPONSE_SIZE);
	assert_eq!(from_pairs(&[("rows", "1000")]).response_size, 1_000);
	assert_eq!(from_pairs(&[("rows", "10")]).response_size, 10);
}

#[test]
fn non_numeric_rows_are_rejected() {
	let err = SearchRequest::from_params(&params(&[("rows", "ten")]), FACET_SIZE)
		.expect_err("Expected parse error.");

	assert!(matches!(err, Error::Parse { .. }), "Unexpected error: {err:?}");
}

#[test]
fn query_filters_are_parsed_in_order_and_abort_on_error() {
	let sr = from_pairs(&[("q", "river"), ("qf", "dc_subject:water"), ("qf[]", "[]spec:demo")]);

	assert_eq!(sr.query, "river");
	assert_eq!(sr.query_filters.len(), 2);
	assert_eq!(sr.query_filters[0].search_label, "dc_subject");
	assert_eq!(sr.query_filters[1].search_label, "spec");

	let err = SearchRequest::from_params(
		&params(&[("qf", "dc_subject:water"), ("qf", "broken")]),
		FACET_SIZE,
	)
	.expect_err("Expected parse error.");

	assert!(matches!(err, Error::Parse { .. }));
}

#[test]
fn exclusion_filters_are_flagged() {
	let sr = from_pairs(&[("qf.exclude", "dc_subject:fire")]);

	assert!(sr.query_filters[0].exclude);
	assert_eq!(sr.query_filters[0].value, "fire");
}

#[test]
fn facet_fields_accept_bare_names_and_json_overrides() {
	let sr = from_pairs(&[
		("facet.field", "dc_subject"),
		("facet.field", r#"{"field":"dc_creator","size":3,"byId":true}"#),
	]);

	assert_eq!(sr.facet_fields[0].field, "dc_subject");
	assert_eq!(sr.facet_fields[0].size, FACET_SIZE);
	assert_eq!(sr.facet_fields[1].size, 3);
	assert!(sr.facet_fields[1].by_id);
}

#[test]
fn formats_and_sorting_are_recognized() {
	let sr = from_pairs(&[
		("format", "jsonld"),
		("itemFormat", "grouped"),
		("sortBy", "dc_title"),
		("sortOrder", "asc"),
		("collapseOn", "meta.spec"),
		("collapseSize", "3"),
		("collapseSort", "dc_date"),
		("facetBoolType", "OR"),
		("peek", "dc_subject"),
	]);

	assert_eq!(sr.response_format, ResponseFormat::LdJson);
	assert_eq!(sr.item_format, ItemFormat::Grouped);
	assert_eq!(sr.sort_by, "dc_title");
	assert!(sr.sort_asc);
	assert_eq!(sr.collapse_on, "meta.spec");
	assert_eq!(sr.collapse_size, 3);
	assert_eq!(sr.collapse_sort, "dc_date");
	assert_eq!(sr.facet_bool_type, FacetBoolType::Or);
	assert_eq!(sr.peek, "dc_subject");
}

#[test]
fn legacy_boolean_facet_bool_type_is_accepted() {
	assert_eq!(from_pairs(&[("facetBoolType", "false")]).facet_bool_type, FacetBoolType::Or);
	assert_eq!(from_pairs(&[("facetBoolType", "TRUE")]).facet_bool_type, FacetBoolType::And);
}

#[test]
fn unknown_facet_bool_type_keeps_the_default() {
	assert_eq!(from_pairs(&[("facetBoolType", "xor")]).facet_bool_type, FacetBoolType::And);
	assert_eq!(
		from_pairs(&[("facetBoolType", "or"), ("facetBoolType", "maybe")]).facet_bool_type,
		FacetBoolType::Or
	);
}

#[test]
fn later_sort_flags_never_reset_ascending_order() {
	assert!(from_pairs(&[("sortOrder", "asc"), ("sortAsc", "false")]).sort_asc);
	assert!(from_pairs(&[("sortAsc", "true"), ("sortOrder", "desc")]).sort_asc);
	assert!(!from_pairs(&[("sortAsc", "false")]).sort_asc);
}

#[test]
fn random_sort_parameter_carries_its_seed_separately() {
	let sr = from_pairs(&[("sortBy", "random_Xy12Ab34Cd")]);

	assert_eq!(sr.sort_by, "random");
	assert_eq!(sr.random_seed(), Some("Xy12Ab34Cd"));
	assert!(sr.is_random_sort());

	let unseeded = from_pairs(&[("sortBy", "random")]);

	assert_eq!(unseeded.random_seed(), None);
}

#[test]
fn zero_rows_produce_a_finite_scroll() {
	let mut sr = from_pairs(&[("rows", "0")]);
	let pager = sr.next_scroll_id(25).expect("Failed to page.");

	assert_eq!(sr.response_size, 0);
	assert!(pager.scroll_id.is_empty());
}

#[test]
fn unknown_item_format_falls_back_to_summary() {
	assert_eq!(from_pairs(&[("itemFormat", "fancy")]).item_format, ItemFormat::Summary);
	assert_eq!(from_pairs(&[("itemFormat", "tree")]).item_format, ItemFormat::Tree);
}

#[test]
fn tree_parameters_attach_a_tree_query_and_widen_the_page() {
	let sr = from_pairs(&[
		("byLeaf", "a~b~c"),
		("fillTree", "TRUE"),
		("byDepth", "1"),
		("byDepth", "2"),
		("byType", "series"),
	]);

	assert_eq!(
		sr.tree,
		Some(TreeQuery {
			leaf: "a~b~c".to_string(),
			node_type: "series".to_string(),
			depth: vec!["1".to_string(), "2".to_string()],
			fill_tree: true,
			..Default::default()
		})
	);
	assert_eq!(sr.response_size, MAX_RESPONSE_SIZE);
}

#[test]
fn tree_request_keeps_an_explicit_single_row() {
	let sr = from_pairs(&[("rows", "1"), ("byParent", "a~b")]);

	assert_eq!(sr.response_size, 1);
	assert_eq!(sr.tree.as_ref().map(|tree| tree.parent.as_str()), Some("a~b"));
}

#[test]
fn query_string_is_url_decoded() {
	let sr = SearchRequest::from_query_string("?q=old+river&qf=dc_subject%3Awater", FACET_SIZE)
		.expect("Failed to build request.");

	assert_eq!(sr.query, "old river");
	assert_eq!(sr.query_filters[0].value, "water");
}

#[test]
fn cursor_token_short_circuits_other_parameters() {
	let original = SearchRequest {
		query: "cats".to_string(),
		response_size: 10,
		start: 20,
		..Default::default()
	};
	let token = cursor::encode(&original).expect("Failed to encode cursor.");

	for key in ["scrollID", "qs"] {
		let sr = from_pairs(&[("q", "dogs"), (key, token.as_str()), ("rows", "5")]);

		assert_eq!(sr.query, "cats");
		assert_eq!(sr.response_size, 10);
		assert_eq!(sr.start, 20);
		assert!(sr.paging);
	}
}

#[test]
fn corrupt_cursor_token_is_a_client_error() {
	let err = SearchRequest::from_params(&params(&[("scrollID", "zz-not-hex")]), FACET_SIZE)
		.expect_err("Expected cursor error.");

	assert!(matches!(err, Error::Cursor { .. }), "Unexpected error: {err:?}");
}
