//! Integration tests exercising the full client loop against a mock server.

use futures::{StreamExt, TryStreamExt};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use square_rs::SquareClient;
use square_rs::endpoints::{CreateCustomer, ListCustomers};
use square_rs::error::{ApiError, ErrorKind};
use square_rs::query::{Match, SearchQuery};

async fn client_for(server: &MockServer) -> SquareClient {
    SquareClient::with_base_url(
        "test-access-token",
        &format!("{}/v2/", server.uri()),
        Some("2023-10-18"),
    )
    .expect("client should build against the mock server")
}

fn customer(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "given_name": "Customer",
        "family_name": id,
        "created_at": "2021-03-31T18:27:54Z"
    })
}

#[tokio::test]
async fn sends_standard_headers_on_every_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/customers/C1"))
        .and(header("Authorization", "Bearer test-access-token"))
        .and(header("Accept", "application/json"))
        .and(header("Cache-Control", "no-cache"))
        .and(header("Content-Type", "application/json"))
        .and(header("Square-Version", "2023-10-18"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"customer": customer("C1")})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let fetched = client.customers().get("C1").await.unwrap();
    assert_eq!(fetched.id.as_deref(), Some("C1"));
}

#[tokio::test]
async fn list_walks_cursors_lazily_and_in_order() {
    let server = MockServer::start().await;

    // Page 3: cursor "b" -> 1 customer, no further cursor
    Mock::given(method("GET"))
        .and(path("/v2/customers"))
        .and(query_param("cursor", "b"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"customers": [customer("C5")]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    // Page 2: cursor "a" -> 2 customers, cursor "b"
    Mock::given(method("GET"))
        .and(path("/v2/customers"))
        .and(query_param("cursor", "a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "customers": [customer("C3"), customer("C4")],
            "cursor": "b"
        })))
        .expect(1)
        .mount(&server)
        .await;

    // Page 1: no cursor -> 2 customers, cursor "a"
    Mock::given(method("GET"))
        .and(path("/v2/customers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "customers": [customer("C1"), customer("C2")],
            "cursor": "a"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let stream = client.customers().list(ListCustomers::new());
    let ids: Vec<_> = stream
        .map(|item| item.unwrap().id.unwrap())
        .collect()
        .await;

    assert_eq!(ids, vec!["C1", "C2", "C3", "C4", "C5"]);
}

#[tokio::test]
async fn eager_listing_collects_the_same_five_customers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/customers"))
        .and(query_param("cursor", "b"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"customers": [customer("C5")]})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/customers"))
        .and(query_param("cursor", "a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "customers": [customer("C3"), customer("C4")],
            "cursor": "b"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/customers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "customers": [customer("C1"), customer("C2")],
            "cursor": "a"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let customers = client
        .customers()
        .list_all(ListCustomers::new())
        .await
        .unwrap();

    let ids: Vec<_> = customers
        .into_iter()
        .map(|c| c.id.unwrap())
        .collect();
    assert_eq!(ids, vec!["C1", "C2", "C3", "C4", "C5"]);
}

#[tokio::test]
async fn search_resends_the_cursor_verbatim() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/customers/search"))
        .and(body_partial_json(json!({"cursor": "opaque-token-!!"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"customers": [customer("C2")]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v2/customers/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "customers": [customer("C1")],
            "cursor": "opaque-token-!!"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let customers = client
        .customers()
        .search_all(SearchQuery::new().limit(1))
        .await
        .unwrap();

    assert_eq!(customers.len(), 2);
}

#[tokio::test]
async fn search_sends_the_nested_filter_document() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/customers/search"))
        .and(body_partial_json(json!({
            "limit": 10,
            "query": {
                "filter": {
                    "email_address": {"fuzzy": "example"},
                    "group_ids": {"all": ["G1"]}
                },
                "sort": {"order": "DESC"}
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"customers": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let query = SearchQuery::new()
        .limit(10)
        .order("desc")
        .email_address(Match::fuzzy("example"))
        .groups(vec!["G1"]);

    let customers = client.customers().search_all(query).await.unwrap();
    assert!(customers.is_empty());
}

#[tokio::test]
async fn invalid_query_fails_before_any_request() {
    let server = MockServer::start().await;
    // No mocks mounted: any request would come back as an unexpected 404

    let client = client_for(&server).await;
    let result = client
        .customers()
        .search_all(SearchQuery::new().limit(101))
        .await;

    assert!(matches!(result, Err(ApiError::InvalidArgument(_))));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_customer_maps_to_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/customers/MISSING"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "errors": [{
                "category": "INVALID_REQUEST_ERROR",
                "code": "NOT_FOUND",
                "detail": "Customer with ID `MISSING` not found."
            }]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let result = client.customers().get("MISSING").await;
    assert!(matches!(result, Err(ApiError::NotFound { .. })));
}

#[tokio::test]
async fn single_error_response_raises_the_mapped_kind_directly() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/customers"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errors": [{
                "category": "INVALID_REQUEST_ERROR",
                "code": "MISSING_REQUIRED_PARAMETER",
                "detail": "Missing required parameter.",
                "field": "idempotency_key"
            }]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let result = client
        .customers()
        .create(CreateCustomer {
            given_name: Some("Amelia".to_string()),
            ..CreateCustomer::default()
        })
        .await;

    match result {
        Err(ApiError::Square(error)) => {
            assert_eq!(error.kind, ErrorKind::InvalidRequest);
            assert_eq!(error.field.as_deref(), Some("idempotency_key"));
        }
        other => panic!("expected a single classified error, got {other:?}"),
    }
}

#[tokio::test]
async fn two_error_response_raises_an_ordered_aggregate() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/customers"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errors": [
                {
                    "category": "INVALID_REQUEST_ERROR",
                    "code": "VALUE_EMPTY",
                    "detail": "first"
                },
                {
                    "category": "API_ERROR",
                    "code": "INTERNAL_SERVER_ERROR",
                    "detail": "second"
                }
            ]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let result = client
        .customers()
        .create(CreateCustomer {
            given_name: Some("Amelia".to_string()),
            ..CreateCustomer::default()
        })
        .await;

    match result {
        Err(ApiError::Multiple(aggregate)) => {
            let details: Vec<_> = aggregate
                .iter()
                .map(|e| e.detail.as_deref().unwrap())
                .collect();
            assert_eq!(details, vec!["first", "second"]);

            let kinds: Vec<_> = aggregate.into_iter().map(|e| e.kind).collect();
            assert_eq!(kinds, vec![ErrorKind::InvalidRequest, ErrorKind::Api]);
        }
        other => panic!("expected an aggregate error, got {other:?}"),
    }
}

#[tokio::test]
async fn unrecognized_category_falls_back_without_losing_the_known_one() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/customers/C1"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errors": [
                {
                    "category": "FUTURE_CATEGORY",
                    "code": "BAD_REQUEST",
                    "detail": "from the future"
                },
                {
                    "category": "AUTHENTICATION_ERROR",
                    "code": "UNAUTHORIZED",
                    "detail": "token expired"
                }
            ]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let result = client.customers().get("C1").await;

    // The unknown entry is dropped from classification; the single remaining
    // classified error surfaces directly.
    match result {
        Err(ApiError::Square(error)) => {
            assert_eq!(error.kind, ErrorKind::Authentication);
        }
        other => panic!("expected the classified authentication error, got {other:?}"),
    }
}

#[tokio::test]
async fn response_with_no_classifiable_errors_keeps_the_raw_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/customers/C1"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let result = client.customers().get("C1").await;

    match result {
        Err(ApiError::Http {
            status, message, ..
        }) => {
            assert_eq!(status, 503);
            assert_eq!(message, "upstream exploded");
        }
        other => panic!("expected a generic HTTP error, got {other:?}"),
    }
}

#[tokio::test]
async fn group_lifecycle_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/customers/groups"))
        .and(body_partial_json(json!({
            "idempotency_key": "key-1",
            "group": {"name": "Regulars"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "group": {"id": "G1", "name": "Regulars"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/v2/customers/groups/G1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "group": {"id": "G1", "name": "VIPs"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/v2/customers/groups/G1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;

    let group = client.groups().create("Regulars", Some("key-1")).await.unwrap();
    assert_eq!(group.id.as_deref(), Some("G1"));

    let renamed = client.groups().rename("G1", "VIPs").await.unwrap();
    assert_eq!(renamed.name.as_deref(), Some("VIPs"));

    client.groups().delete("G1").await.unwrap();
}

#[tokio::test]
async fn group_membership_assignment_uses_the_fixed_routes() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v2/customers/C1/groups/G1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/v2/customers/C1/groups/G1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    client.customers().assign_group("C1", "G1").await.unwrap();
    client.customers().unassign_group("C1", "G1").await.unwrap();
}

#[tokio::test]
async fn segments_list_follows_cursors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/customers/segments"))
        .and(query_param("cursor", "s1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "segments": [{"id": "S2", "name": "Lapsed"}]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/customers/segments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "segments": [{"id": "S1", "name": "Regulars"}],
            "cursor": "s1"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let segments = client.segments().list_all(None).await.unwrap();

    let ids: Vec<_> = segments.into_iter().map(|s| s.id.unwrap()).collect();
    assert_eq!(ids, vec!["S1", "S2"]);
}

#[tokio::test]
async fn lazy_stream_stops_fetching_when_dropped_early() {
    let server = MockServer::start().await;

    // Only the first page may ever be requested
    Mock::given(method("GET"))
        .and(path("/v2/customers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "customers": [customer("C1"), customer("C2")],
            "cursor": "a"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let stream = client.customers().list(ListCustomers::new());
    let first_two: Vec<_> = stream.take(2).try_collect().await.unwrap();

    assert_eq!(first_two.len(), 2);
    // `expect(1)` on the mock verifies no second page was fetched
}
