//! HTTP behaviour of the Azure DevOps work item store.

use std::time::Duration;

use postman_ado::project::CustomField;
use postman_ado::workitems::{FieldPatch, FieldPredicate, QueryFilter};
use postman_ado::{
    AccessToken, AdoWorkItemStore, ProjectConfiguration, ReconciliationResult, TestIdentifier,
    WorkItemError, WorkItemReconciler, WorkItemStore,
};
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

/// Basic credentials for an empty user name and the token `pat`.
const BASIC_AUTH: &str = "Basic OnBhdA==";

fn store_for(server: &MockServer) -> AdoWorkItemStore {
    let base = Url::parse(&format!("{}/contoso", server.uri())).expect("server URL should parse");
    AdoWorkItemStore::new(
        base,
        AccessToken::new("pat").expect("token should be valid"),
        Duration::from_secs(5),
    )
    .expect("store should build")
}

fn test_case_filter() -> QueryFilter {
    QueryFilter {
        team_project: "Payments".to_owned(),
        work_item_type: "Test Case".to_owned(),
        predicates: vec![FieldPredicate::new("System.Title", "LoginTests - ValidLogin")],
    }
}

fn title_patch() -> FieldPatch {
    let mut patch = FieldPatch::default();
    patch.push("System.Title", "LoginTests - ValidLogin");
    patch
}

#[tokio::test]
async fn query_posts_wiql_with_basic_auth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/contoso/Payments/_apis/wit/wiql"))
        .and(query_param("api-version", "7.1"))
        .and(header("authorization", BASIC_AUTH))
        .and(|request: &Request| {
            serde_json::from_slice::<Value>(&request.body)
                .ok()
                .and_then(|body| body.get("query").and_then(Value::as_str).map(str::to_owned))
                .is_some_and(|query| {
                    query.contains("[System.TeamProject] = 'Payments'")
                        && query.contains("[System.Title] = 'LoginTests - ValidLogin'")
                })
        })
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "queryType": "flat",
            "workItems": [
                {"id": 5, "url": "https://example.invalid/5"},
                {"id": 9, "url": "https://example.invalid/9"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let references = store_for(&server)
        .query_by_filter(&test_case_filter())
        .await
        .expect("query should succeed");

    let ids: Vec<u32> = references.iter().map(|reference| reference.id).collect();
    assert_eq!(ids, [5, 9]);
}

#[tokio::test]
async fn get_renders_non_string_fields_as_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/contoso/_apis/wit/workitems/7"))
        .and(query_param("api-version", "7.1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "rev": 3,
            "fields": {
                "System.Title": "LoginTests - ValidLogin",
                "Custom.Priority": 2,
                "Custom.Owner": null
            }
        })))
        .mount(&server)
        .await;

    let item = store_for(&server)
        .get_by_id(7)
        .await
        .expect("get should succeed");

    assert_eq!(item.id, 7);
    assert_eq!(item.field("System.Title"), Some("LoginTests - ValidLogin"));
    assert_eq!(item.field("Custom.Priority"), Some("2"));
    assert_eq!(item.field("Custom.Owner"), Some(""));
}

#[tokio::test]
async fn create_sends_json_patch_to_type_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/contoso/Payments/_apis/wit/workitems/$Test%20Case"))
        .and(header("content-type", "application/json-patch+json"))
        .and(body_json(json!([
            {"op": "add", "path": "/fields/System.Title", "value": "LoginTests - ValidLogin"}
        ])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 501, "fields": {}})))
        .expect(1)
        .mount(&server)
        .await;

    let item = store_for(&server)
        .create("Payments", "Test Case", &title_patch())
        .await
        .expect("create should succeed");

    assert_eq!(item.id, 501);
}

#[tokio::test]
async fn update_patches_the_work_item() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/contoso/Payments/_apis/wit/workitems/501"))
        .and(header("content-type", "application/json-patch+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 501,
            "fields": {"System.Title": "LoginTests - ValidLogin"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let item = store_for(&server)
        .update("Payments", 501, &title_patch())
        .await
        .expect("update should succeed");

    assert_eq!(item.field("System.Title"), Some("LoginTests - ValidLogin"));
}

#[tokio::test]
async fn unauthorised_responses_map_to_authentication_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/contoso/_apis/wit/workitems/7"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let error = store_for(&server)
        .get_by_id(7)
        .await
        .expect_err("401 should fail");

    assert!(matches!(error, WorkItemError::Authentication { .. }));
}

#[tokio::test]
async fn api_errors_carry_the_ado_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/contoso/_apis/wit/workitems/101"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "TF401232: Work item 101 does not exist."
        })))
        .mount(&server)
        .await;

    let error = store_for(&server)
        .get_by_id(101)
        .await
        .expect_err("404 should fail");

    match error {
        WorkItemError::Api { message } => assert!(message.contains("TF401232")),
        other => panic!("expected API error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_bodies_map_to_decode_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/contoso/_apis/wit/workitems/7"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let error = store_for(&server)
        .get_by_id(7)
        .await
        .expect_err("bad body should fail");

    assert!(matches!(error, WorkItemError::Decode { .. }));
}

#[tokio::test]
async fn reconciler_creates_missing_test_case_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/contoso/Payments/_apis/wit/wiql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"workItems": []})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/contoso/Payments/_apis/wit/workitems/$Test%20Case"))
        .and(|request: &Request| {
            serde_json::from_slice::<Vec<Value>>(&request.body)
                .is_ok_and(|operations| operations.len() == 8)
        })
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 501, "fields": {}})))
        .expect(1)
        .mount(&server)
        .await;

    let mut configuration = ProjectConfiguration::default();
    configuration.connection.url = format!("{}/contoso", server.uri());
    configuration.connection.project = "Payments".to_owned();
    configuration.test_case.area_path = "Payments\\Api".to_owned();
    configuration.test_case.custom_fields = vec![CustomField::new("Custom.Team", "Checkout")];
    let store = store_for(&server);
    let identifier = TestIdentifier::from_method("LoginTests", "ValidLogin", "Postman.Wrapper");

    let outcomes = WorkItemReconciler::new(&configuration, &store)
        .reconcile(&[identifier])
        .await;

    let results: Vec<&ReconciliationResult> =
        outcomes.iter().map(|outcome| &outcome.result).collect();
    assert_eq!(results, [&ReconciliationResult::Created(501)]);
}
