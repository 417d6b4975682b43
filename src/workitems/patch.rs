//! Field patch computation for Test Case work items.
//!
//! Patches are diffed against a baseline: either nothing (a work item about
//! to be created) or the fetched remote record. A field is proposed only when
//! the baseline lacks it or holds a different string value. The automated
//! test id is the exception: it is regenerated on every run and always
//! proposed, marking when the item was last reconciled.

use crate::project::ProjectConfiguration;

use super::models::{FieldPatch, RemoteWorkItem, TestIdentifier};

/// Work item type reconciled by this crate.
pub const TEST_CASE_WORK_ITEM_TYPE: &str = "Test Case";
/// Automated test type stamped on every reconciled test case.
pub const AUTOMATED_TEST_TYPE: &str = "Postman Test Case";
/// Description written to reconciled test cases.
pub const TEST_CASE_DESCRIPTION: &str = "Autogenerated wrapper for postman test case.";

/// `System.Title` field.
pub const TITLE_FIELD: &str = "System.Title";
/// `System.Description` field.
pub const DESCRIPTION_FIELD: &str = "System.Description";
/// `System.AreaPath` field.
pub const AREA_PATH_FIELD: &str = "System.AreaPath";
/// Automated test name field.
pub const AUTOMATED_TEST_NAME_FIELD: &str = "Microsoft.VSTS.TCM.AutomatedTestName";
/// Automated test storage field.
pub const AUTOMATED_TEST_STORAGE_FIELD: &str = "Microsoft.VSTS.TCM.AutomatedTestStorage";
/// Automated test type field.
pub const AUTOMATED_TEST_TYPE_FIELD: &str = "Microsoft.VSTS.TCM.AutomatedTestType";
/// Automated test id field, refreshed on every run.
pub const AUTOMATED_TEST_ID_FIELD: &str = "Microsoft.VSTS.TCM.AutomatedTestId";

/// Computes the automation patch: the fields linking the work item to the
/// automated test, plus the refresh token.
#[must_use]
pub fn automation_patch(
    identifier: &TestIdentifier,
    baseline: Option<&RemoteWorkItem>,
    refresh_token: &str,
) -> FieldPatch {
    let mut patch = FieldPatch::default();
    add_if_changed(
        &mut patch,
        baseline,
        AUTOMATED_TEST_NAME_FIELD,
        identifier.qualified_name(),
    );
    add_if_changed(
        &mut patch,
        baseline,
        AUTOMATED_TEST_STORAGE_FIELD,
        identifier.storage(),
    );
    add_if_changed(
        &mut patch,
        baseline,
        AUTOMATED_TEST_TYPE_FIELD,
        AUTOMATED_TEST_TYPE,
    );
    patch.push(AUTOMATED_TEST_ID_FIELD, refresh_token);
    patch
}

/// Computes the full patch: the automation patch plus title, description,
/// area path, and the configured custom fields.
#[must_use]
pub fn full_patch(
    identifier: &TestIdentifier,
    configuration: &ProjectConfiguration,
    baseline: Option<&RemoteWorkItem>,
    refresh_token: &str,
) -> FieldPatch {
    let mut patch = automation_patch(identifier, baseline, refresh_token);
    add_if_changed(
        &mut patch,
        baseline,
        TITLE_FIELD,
        identifier.display_title(),
    );
    add_if_changed(
        &mut patch,
        baseline,
        DESCRIPTION_FIELD,
        TEST_CASE_DESCRIPTION,
    );
    add_if_changed(
        &mut patch,
        baseline,
        AREA_PATH_FIELD,
        &configuration.test_case.area_path,
    );
    for custom_field in &configuration.test_case.custom_fields {
        add_if_changed(
            &mut patch,
            baseline,
            &custom_field.id,
            &custom_field.default_value,
        );
    }
    patch
}

/// Whether the patch carries nothing but the refresh token, meaning the
/// work item already matched the test.
#[must_use]
pub fn refreshes_only(patch: &FieldPatch) -> bool {
    patch
        .operations()
        .iter()
        .all(|operation| operation.field == AUTOMATED_TEST_ID_FIELD)
}

fn add_if_changed(
    patch: &mut FieldPatch,
    baseline: Option<&RemoteWorkItem>,
    field: &str,
    value: &str,
) {
    let unchanged = baseline
        .and_then(|item| item.field(field))
        .is_some_and(|current| current == value);
    if !unchanged {
        patch.push(field, value);
    }
}
