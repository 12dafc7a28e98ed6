use std::sync::Arc;

use serde_json::{Value, json};

use hub_domain::cursor;
use hub_search::{Error, SearchOutcome, SearchResponse, SearchService, SearchSettings};
use hub_testkit::{FailingStore, RecordingStore, TEST_INDEX, facet_result, hit, search_response};

fn service(store: Arc<RecordingStore>) -> SearchService {
	SearchService::new(SearchSettings::from_config(&hub_testkit::test_config()), store)
}

fn results(outcome: SearchOutcome) -> SearchResponse {
	match outcome {
		SearchOutcome::Results(response) => response,
		SearchOutcome::Peek(peek) => panic!("Expected results, got {peek:?}"),
	}
}

fn two_hits() -> Vec<Value> {
	vec![
		hit("a", json!({ "title": "A" }), json!(["Amsterdam", "hub3_a"])),
		hit("b", json!({ "title": "B" }), json!(["Breda", "hub3_b"])),
	]
}

#[tokio::test]
async fn first_page_computes_facets_and_a_resumable_cursor() {
	let aggregations = json!({ "dc_subject": facet_result(25, 0, &[("water", 20), ("fire", 5)]) });
	let store = Arc::new(RecordingStore::new(search_response(25, two_hits(), aggregations)));
	let service = service(store.clone());
	let sr = service
		.parse_request("q=river&rows=10&facet.field=dc_subject&qf=dc_subject:water")
		.expect("Failed to parse request.");
	let response = results(service.search(sr).await.expect("Search failed."));

	assert_eq!(response.pager.cursor, 0);
	assert_eq!(response.pager.rows, 10);
	assert_eq!(response.pager.total, 25);
	assert_eq!(response.items, vec![json!({ "title": "A" }), json!({ "title": "B" })]);
	assert_eq!(response.facets.len(), 1);
	assert!(response.facets[0].links[0].is_selected);
	assert_eq!(response.query.bread_crumbs.len(), 2);

	let (index, body) = store.requests().pop().expect("Store was not called.");

	assert_eq!(index, TEST_INDEX);
	assert_eq!(body["from"], 0);
	assert_eq!(body["size"], 10);
	assert!(body["aggs"].get("dc_subject").is_some());
	assert!(body.get("post_filter").is_some());
	assert_eq!(body["sort"][1], json!({ "meta.hubID": { "order": "asc" } }));

	let next = cursor::decode(&response.pager.scroll_id).expect("Failed to decode cursor.");
	let marker: Vec<Value> =
		serde_json::from_slice(&next.search_after).expect("Failed to decode marker.");

	assert_eq!(next.start, 10);
	assert!(next.paging);
	assert_eq!(marker, vec![json!("Breda"), json!("hub3_b")]);
}

#[tokio::test]
async fn resumed_page_uses_search_after_and_skips_aggregations() {
	let store = Arc::new(RecordingStore::new(search_response(25, two_hits(), json!({}))));
	let service = service(store.clone());
	let first = service.parse_request("q=river&rows=10").expect("Failed to parse request.");
	let token = results(service.search(first).await.expect("Search failed.")).pager.scroll_id;
	let resumed =
		service.parse_request(&format!("scrollID={token}")).expect("Failed to parse request.");
	let response = results(service.search(resumed).await.expect("Search failed."));
	let body = store.last_body().expect("Store was not called.");

	assert_eq!(body["search_after"], json!(["Breda", "hub3_b"]));
	assert!(body.get("from").is_none());
	assert!(body.get("aggs").is_none());
	assert!(response.facets.is_empty());
	assert_eq!(response.pager.cursor, 10);
}

#[tokio::test]
async fn last_page_has_no_cursor() {
	let store = Arc::new(RecordingStore::new(search_response(2, two_hits(), json!({}))));
	let service = service(store);
	let sr = service.parse_request("rows=10").expect("Failed to parse request.");
	let response = results(service.search(sr).await.expect("Search failed."));

	assert_eq!(response.pager.total, 2);
	assert!(response.pager.scroll_id.is_empty());
}

#[tokio::test]
async fn peek_returns_counts_only() {
	let aggregations = json!({ "dc_subject": facet_result(5, 0, &[("water", 3), ("fire", 2)]) });
	let store = Arc::new(RecordingStore::new(search_response(5, Vec::new(), aggregations)));
	let service = service(store.clone());
	let sr = service
		.parse_request("peek=dc_subject&qf=dc_creator:Rembrandt")
		.expect("Failed to parse request.");
	let outcome = service.search(sr).await.expect("Search failed.");
	let body = store.last_body().expect("Store was not called.");

	match outcome {
		SearchOutcome::Peek(peek) => assert_eq!(peek.peek.get("water"), Some(&3)),
		SearchOutcome::Results(_) => panic!("Expected a peek response."),
	}

	assert_eq!(body["size"], 0);
	assert!(body.get("post_filter").is_none());
	assert_eq!(
		body.pointer("/aggs/dc_subject/aggs/filter/aggs/inner/aggs/value/terms/size"),
		Some(&json!(100))
	);
}

#[tokio::test]
async fn collapse_groups_inner_hits_and_keeps_offset_paging() {
	let collapsed = json!({
		"_id": "group",
		"fields": { "meta.spec": ["demo"] },
		"inner_hits": {
			"collapse": {
				"hits": { "total": { "value": 1 }, "hits": [{ "_source": { "title": "A" } }] }
			}
		},
		"sort": ["x", "y"],
	});
	let store = Arc::new(RecordingStore::new(search_response(1, vec![collapsed], json!({}))));
	let service = service(store.clone());
	let sr = service
		.parse_request("collapseOn=meta.spec&collapseSize=3&collapseSort=dc_date")
		.expect("Failed to parse request.");
	let response = results(service.search(sr).await.expect("Search failed."));
	let body = store.last_body().expect("Store was not called.");

	assert_eq!(response.items, vec![json!({ "id": "group", "items": [{ "title": "A" }] })]);
	assert_eq!(body["_source"], false);
	assert_eq!(body["collapse"]["inner_hits"]["size"], 3);
	assert_eq!(body["collapse"]["max_concurrent_group_searches"], 4);
	assert!(body["collapse"]["inner_hits"].get("sort").is_some());
}

#[tokio::test]
async fn tree_requests_fetch_only_the_tree_source() {
	let store = Arc::new(RecordingStore::new(search_response(0, Vec::new(), json!({}))));
	let service = service(store.clone());
	let sr = service.parse_request("byParent=a~b&sortBy=tree.sortKey").expect("Failed to parse.");
	let response = results(service.search(sr).await.expect("Search failed."));
	let body = store.last_body().expect("Store was not called.");

	assert_eq!(body["_source"], json!({ "includes": ["tree"] }));
	assert_eq!(body["size"], 1_000);
	assert_eq!(body["sort"][0], json!({ "tree.sortKey": { "order": "asc" } }));
	assert_eq!(response.pager, Default::default());
}

#[tokio::test]
async fn store_failures_surface_as_upstream_errors() {
	let service = SearchService::new(
		SearchSettings::from_config(&hub_testkit::test_config()),
		Arc::new(FailingStore { message: "connection refused".to_string() }),
	);
	let err = service.search(Default::default()).await.expect_err("Expected upstream error.");

	match err {
		Error::Upstream { message } => assert!(message.contains("connection refused")),
		other => panic!("Unexpected error: {other:?}"),
	}
}

#[tokio::test]
async fn malformed_store_response_is_rejected() {
	let store = Arc::new(RecordingStore::new(json!({ "acknowledged": true })));
	let err = service(store).search(Default::default()).await.expect_err("Expected an error.");

	assert!(matches!(err, Error::InvalidResponse { .. }), "Unexpected error: {err:?}");
}

#[test]
fn echo_renders_compiled_views() {
	let service = service(Arc::new(RecordingStore::new(json!({}))));
	let mut sr =
		service.parse_request("q=river&facet.field=dc_subject").expect("Failed to parse request.");

	assert_eq!(
		service.echo(&mut sr, "options").expect("Echo failed."),
		json!(["aggs", "es", "options", "searchRequest", "searchService"])
	);
	assert!(service.echo(&mut sr, "es").expect("Echo failed.").get("bool").is_some());
	assert!(service.echo(&mut sr, "aggs").expect("Echo failed.").get("dc_subject").is_some());
	assert_eq!(service.echo(&mut sr, "searchRequest").expect("Echo failed.")["query"], "river");
	assert!(service.echo(&mut sr, "searchService").expect("Echo failed.").get("sort").is_some());

	let err = service.echo(&mut sr, "everything").expect_err("Expected invalid request.");

	assert!(matches!(err, Error::InvalidRequest { .. }));
}
