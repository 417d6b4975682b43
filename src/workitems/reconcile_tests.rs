//! Unit tests for the work item reconciler.

use std::collections::BTreeMap;
use std::num::NonZeroU32;
use std::sync::{Arc, Mutex};

use rstest::{fixture, rstest};

use super::*;
use crate::project::CustomField;
use crate::workitems::models::{ItemReference, RemoteWorkItem};
use crate::workitems::patch::{
    AREA_PATH_FIELD, AUTOMATED_TEST_ID_FIELD, AUTOMATED_TEST_NAME_FIELD,
    AUTOMATED_TEST_STORAGE_FIELD, DESCRIPTION_FIELD, TEST_CASE_DESCRIPTION,
};
use crate::workitems::store::MockWorkItemStore;

fn fixed_token() -> String {
    "refresh-token".to_owned()
}

#[fixture]
fn configuration() -> ProjectConfiguration {
    let mut configuration = ProjectConfiguration::default();
    configuration.connection.url = "https://dev.azure.com/contoso".to_owned();
    configuration.connection.project = "Payments".to_owned();
    configuration.test_case.area_path = "Payments\\Api".to_owned();
    configuration.test_case.custom_fields = vec![CustomField::new("Custom.Team", "Checkout")];
    configuration
}

fn login_test() -> TestIdentifier {
    TestIdentifier::from_method("LoginTests", "ValidLogin", "Postman.Wrapper.dll")
}

fn linked_test(id: u32) -> TestIdentifier {
    let linked = NonZeroU32::new(id).expect("test ids are positive");
    login_test().with_linked_id(linked)
}

fn item(id: WorkItemId, fields: &[(&str, &str)]) -> RemoteWorkItem {
    RemoteWorkItem {
        id,
        fields: fields
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect::<BTreeMap<_, _>>(),
    }
}

fn up_to_date_item(id: WorkItemId) -> RemoteWorkItem {
    item(
        id,
        &[
            (AUTOMATED_TEST_NAME_FIELD, "LoginTests.ValidLogin"),
            (AUTOMATED_TEST_STORAGE_FIELD, "Postman.Wrapper.dll"),
            (AUTOMATED_TEST_TYPE_FIELD, AUTOMATED_TEST_TYPE),
            (AUTOMATED_TEST_ID_FIELD, "earlier-token"),
            (TITLE_FIELD, "LoginTests - ValidLogin"),
            (DESCRIPTION_FIELD, TEST_CASE_DESCRIPTION),
            (AREA_PATH_FIELD, "Payments\\Api"),
            ("Custom.Team", "Checkout"),
        ],
    )
}

fn is_title_query(filter: &QueryFilter) -> bool {
    filter.team_project == "Payments"
        && filter.work_item_type == "Test Case"
        && filter.predicates
            == vec![
                FieldPredicate::new(TITLE_FIELD, "LoginTests - ValidLogin"),
                FieldPredicate::new(AUTOMATED_TEST_TYPE_FIELD, "Postman Test Case"),
            ]
}

fn expect_title_query(store: &mut MockWorkItemStore, ids: Vec<WorkItemId>) {
    store
        .expect_query_by_filter()
        .withf(is_title_query)
        .times(1)
        .returning(move |_| Ok(ids.iter().map(|id| ItemReference { id: *id }).collect()));
}

async fn reconcile_single(
    configuration: &ProjectConfiguration,
    store: &MockWorkItemStore,
    identifier: TestIdentifier,
) -> ReconciliationResult {
    let outcomes = WorkItemReconciler::new(configuration, store)
        .with_refresh_token(fixed_token)
        .reconcile(&[identifier])
        .await;
    assert_eq!(outcomes.len(), 1, "one outcome per identifier");
    outcomes
        .into_iter()
        .next()
        .map(|outcome| outcome.result)
        .expect("outcome should exist")
}

#[rstest]
#[tokio::test]
async fn creates_missing_test_case_with_full_patch(configuration: ProjectConfiguration) {
    let mut store = MockWorkItemStore::new();
    expect_title_query(&mut store, Vec::new());
    store
        .expect_create()
        .withf(|project, work_item_type, patch| {
            project == "Payments"
                && work_item_type == "Test Case"
                && patch.len() == 8
                && patch.value(TITLE_FIELD) == Some("LoginTests - ValidLogin")
                && patch.value(AUTOMATED_TEST_ID_FIELD) == Some("refresh-token")
        })
        .times(1)
        .returning(|_, _, _| Ok(item(501, &[])));

    let result = reconcile_single(&configuration, &store, login_test()).await;

    assert_eq!(result, ReconciliationResult::Created(501));
}

#[rstest]
#[tokio::test]
async fn updates_single_match_with_changed_fields(configuration: ProjectConfiguration) {
    let mut store = MockWorkItemStore::new();
    expect_title_query(&mut store, vec![77]);
    store.expect_get_by_id().times(1).returning(|id| {
        let mut current = up_to_date_item(id);
        current
            .fields
            .insert(AREA_PATH_FIELD.to_owned(), "Legacy".to_owned());
        Ok(current)
    });
    store
        .expect_update()
        .withf(|project, id, patch| {
            project == "Payments"
                && *id == 77
                && patch.len() == 2
                && patch.value(AREA_PATH_FIELD) == Some("Payments\\Api")
        })
        .times(1)
        .returning(|_, id, _| Ok(up_to_date_item(id)));

    let result = reconcile_single(&configuration, &store, login_test()).await;

    assert_eq!(result, ReconciliationResult::Updated(77));
}

#[rstest]
#[tokio::test]
async fn second_run_reports_already_up_to_date(configuration: ProjectConfiguration) {
    let mut stale = up_to_date_item(77);
    stale
        .fields
        .insert(AREA_PATH_FIELD.to_owned(), "Legacy".to_owned());
    let remote = Arc::new(Mutex::new(stale));

    let mut store = MockWorkItemStore::new();
    store
        .expect_query_by_filter()
        .withf(is_title_query)
        .times(2)
        .returning(|_| Ok(vec![ItemReference { id: 77 }]));
    let fetched = Arc::clone(&remote);
    store.expect_get_by_id().times(2).returning(move |_| {
        Ok(fetched.lock().expect("remote item lock").clone())
    });
    let patched = Arc::clone(&remote);
    store
        .expect_update()
        .withf(|_, id, patch| *id == 77 && patch.value(AUTOMATED_TEST_ID_FIELD).is_some())
        .times(2)
        .returning(move |_, _, patch| {
            let mut current = patched.lock().expect("remote item lock");
            for operation in patch.operations() {
                current
                    .fields
                    .insert(operation.field.clone(), operation.value.clone());
            }
            Ok(current.clone())
        });

    let first = reconcile_single(&configuration, &store, login_test()).await;
    let second = reconcile_single(&configuration, &store, login_test()).await;

    assert_eq!(first, ReconciliationResult::Updated(77));
    assert_eq!(second, ReconciliationResult::AlreadyUpToDate(77));
}

#[rstest]
#[tokio::test]
async fn up_to_date_match_still_refreshes_token(configuration: ProjectConfiguration) {
    let mut store = MockWorkItemStore::new();
    expect_title_query(&mut store, vec![77]);
    store
        .expect_get_by_id()
        .times(1)
        .returning(|id| Ok(up_to_date_item(id)));
    store
        .expect_update()
        .withf(|_, _, patch| {
            patch.len() == 1 && patch.value(AUTOMATED_TEST_ID_FIELD) == Some("refresh-token")
        })
        .times(1)
        .returning(|_, id, _| Ok(up_to_date_item(id)));

    let result = reconcile_single(&configuration, &store, login_test()).await;

    assert_eq!(result, ReconciliationResult::AlreadyUpToDate(77));
}

#[rstest]
#[tokio::test]
async fn linked_item_already_matching_is_up_to_date(configuration: ProjectConfiguration) {
    let mut store = MockWorkItemStore::new();
    store
        .expect_query_by_filter()
        .times(1)
        .returning(|_| Ok(vec![ItemReference { id: 42 }]));
    store
        .expect_get_by_id()
        .times(1)
        .returning(|id| Ok(up_to_date_item(id)));
    store
        .expect_update()
        .withf(|_, id, patch| *id == 42 && patch.len() == 1)
        .times(1)
        .returning(|_, id, _| Ok(up_to_date_item(id)));

    let result = reconcile_single(&configuration, &store, linked_test(42)).await;

    assert_eq!(result, ReconciliationResult::AlreadyUpToDate(42));
}

#[rstest]
#[tokio::test]
async fn ambiguous_matches_are_skipped_without_writes(configuration: ProjectConfiguration) {
    let mut store = MockWorkItemStore::new();
    expect_title_query(&mut store, vec![10, 11]);
    store.expect_get_by_id().never();
    store.expect_create().never();
    store.expect_update().never();

    let result = reconcile_single(&configuration, &store, login_test()).await;

    assert_eq!(
        result,
        ReconciliationResult::Skipped(SkipReason::AmbiguousMatch { matches: 2 })
    );
}

#[rstest]
#[tokio::test]
async fn linked_test_updates_pinned_item_with_automation_patch(
    configuration: ProjectConfiguration,
) {
    let mut store = MockWorkItemStore::new();
    store
        .expect_query_by_filter()
        .withf(|filter| {
            filter.predicates == vec![FieldPredicate::new("System.Id", "42")]
                && filter.team_project == "Payments"
        })
        .times(1)
        .returning(|_| Ok(vec![ItemReference { id: 42 }]));
    store.expect_get_by_id().times(1).returning(|id| {
        Ok(item(
            id,
            &[(TITLE_FIELD, "Hand written title"), ("Custom.Team", "Other")],
        ))
    });
    store
        .expect_update()
        .withf(|_, id, patch| {
            *id == 42
                && patch.len() == 4
                && patch.value(TITLE_FIELD).is_none()
                && patch.value("Custom.Team").is_none()
        })
        .times(1)
        .returning(|_, id, _| Ok(item(id, &[])));

    let result = reconcile_single(&configuration, &store, linked_test(42)).await;

    assert_eq!(result, ReconciliationResult::Updated(42));
}

#[rstest]
#[tokio::test]
async fn missing_linked_item_fails_without_title_lookup(configuration: ProjectConfiguration) {
    let mut store = MockWorkItemStore::new();
    store
        .expect_query_by_filter()
        .withf(|filter| !is_title_query(filter))
        .times(1)
        .returning(|_| Ok(Vec::new()));
    store.expect_create().never();
    store.expect_update().never();

    let result = reconcile_single(&configuration, &store, linked_test(101)).await;

    assert_eq!(
        result,
        ReconciliationResult::Failed(ReconcileFailure::LinkedItemNotFound { id: 101 })
    );
}

#[rstest]
#[tokio::test]
async fn failures_do_not_abort_the_batch(configuration: ProjectConfiguration) {
    let mut store = MockWorkItemStore::new();
    let mut calls = 0_u32;
    store
        .expect_query_by_filter()
        .times(2)
        .returning(move |_| {
            calls += 1;
            if calls == 1 {
                Err(WorkItemError::Network {
                    message: "connection reset".to_owned(),
                })
            } else {
                Ok(Vec::new())
            }
        });
    store
        .expect_create()
        .times(1)
        .returning(|_, _, _| Ok(item(900, &[])));

    let identifiers = vec![
        login_test(),
        TestIdentifier::from_method("CartTests", "AddItem", "Postman.Wrapper.dll"),
    ];
    let outcomes = WorkItemReconciler::new(&configuration, &store)
        .with_refresh_token(fixed_token)
        .reconcile(&identifiers)
        .await;

    let results: Vec<&ReconciliationResult> =
        outcomes.iter().map(|outcome| &outcome.result).collect();
    assert_eq!(
        results,
        vec![
            &ReconciliationResult::Failed(ReconcileFailure::Remote(WorkItemError::Network {
                message: "connection reset".to_owned(),
            })),
            &ReconciliationResult::Created(900),
        ]
    );
    assert_eq!(
        outcomes.get(1).map(|outcome| outcome.qualified_name.as_str()),
        Some("CartTests.AddItem")
    );
}

#[rstest]
#[tokio::test]
async fn remote_errors_during_update_are_reported(configuration: ProjectConfiguration) {
    let mut store = MockWorkItemStore::new();
    expect_title_query(&mut store, vec![5]);
    store
        .expect_get_by_id()
        .times(1)
        .returning(|id| Ok(item(id, &[])));
    store.expect_update().times(1).returning(|_, _, _| {
        Err(WorkItemError::Authentication {
            message: "401".to_owned(),
        })
    });

    let result = reconcile_single(&configuration, &store, login_test()).await;

    assert!(
        matches!(
            result,
            ReconciliationResult::Failed(ReconcileFailure::Remote(
                WorkItemError::Authentication { .. }
            ))
        ),
        "expected authentication failure, got {result:?}"
    );
}

#[rstest]
fn default_refresh_tokens_are_unique() {
    assert_ne!(random_refresh_token(), random_refresh_token());
}
