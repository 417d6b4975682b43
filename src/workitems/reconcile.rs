//! Reconciliation of automated tests with Test Case work items.
//!
//! Each test identifier is processed on its own, in input order. A test
//! pinned to a work item id only has its automation fields refreshed; any
//! other test is matched by title and automated test type and either
//! created, updated, or skipped when the match is ambiguous. Failures are
//! recorded per identifier and never abort the batch.

use std::num::NonZeroU32;

use thiserror::Error;
use uuid::Uuid;

use crate::project::ProjectConfiguration;

use super::error::WorkItemError;
use super::models::{FieldPredicate, QueryFilter, TestIdentifier, WorkItemId};
use super::patch::{
    AUTOMATED_TEST_TYPE, AUTOMATED_TEST_TYPE_FIELD, TEST_CASE_WORK_ITEM_TYPE, TITLE_FIELD,
    automation_patch, full_patch, refreshes_only,
};
use super::store::WorkItemStore;

const ID_FIELD: &str = "System.Id";

/// Why an identifier was left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// More than one work item matched the title and automated test type.
    AmbiguousMatch {
        /// Number of matching work items.
        matches: usize,
    },
}

/// Failure scoped to a single identifier.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReconcileFailure {
    /// The pinned work item does not exist in the configured project.
    #[error("linked Test Case with prescribed id {id} could not be found")]
    LinkedItemNotFound {
        /// Pinned work item id.
        id: WorkItemId,
    },

    /// The store reported an error.
    #[error(transparent)]
    Remote(#[from] WorkItemError),
}

/// Result of reconciling one identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconciliationResult {
    /// A new work item was created.
    Created(WorkItemId),
    /// An existing work item was patched.
    Updated(WorkItemId),
    /// The work item already matched; only the refresh token was written.
    AlreadyUpToDate(WorkItemId),
    /// The identifier was deliberately left alone.
    Skipped(SkipReason),
    /// Reconciliation failed for this identifier.
    Failed(ReconcileFailure),
}

/// Result paired with the identifier it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationOutcome {
    /// Qualified name of the test.
    pub qualified_name: String,
    /// What happened.
    pub result: ReconciliationResult,
}

/// Generates the automated test id written on every run.
pub type RefreshTokenSource = fn() -> String;

fn random_refresh_token() -> String {
    Uuid::new_v4().to_string()
}

/// Creates and updates Test Case work items for automated tests.
pub struct WorkItemReconciler<'a, Store>
where
    Store: WorkItemStore,
{
    configuration: &'a ProjectConfiguration,
    store: &'a Store,
    refresh_token: RefreshTokenSource,
}

impl<'a, Store> WorkItemReconciler<'a, Store>
where
    Store: WorkItemStore,
{
    /// Creates a reconciler for the configured project.
    #[must_use]
    pub fn new(configuration: &'a ProjectConfiguration, store: &'a Store) -> Self {
        Self {
            configuration,
            store,
            refresh_token: random_refresh_token,
        }
    }

    /// Replaces the refresh token generator.
    #[must_use]
    pub const fn with_refresh_token(mut self, source: RefreshTokenSource) -> Self {
        self.refresh_token = source;
        self
    }

    /// Reconciles every identifier in order.
    pub async fn reconcile(&self, identifiers: &[TestIdentifier]) -> Vec<ReconciliationOutcome> {
        let mut outcomes = Vec::with_capacity(identifiers.len());
        for identifier in identifiers {
            let result = match self.reconcile_one(identifier).await {
                Ok(result) => result,
                Err(failure) => {
                    tracing::error!(
                        test = identifier.qualified_name(),
                        error = %failure,
                        "failed to reconcile test"
                    );
                    ReconciliationResult::Failed(failure)
                }
            };
            outcomes.push(ReconciliationOutcome {
                qualified_name: identifier.qualified_name().to_owned(),
                result,
            });
        }
        outcomes
    }

    async fn reconcile_one(
        &self,
        identifier: &TestIdentifier,
    ) -> Result<ReconciliationResult, ReconcileFailure> {
        match identifier.explicit_linked_id() {
            Some(linked_id) => self.reconcile_linked(identifier, linked_id).await,
            None => self.reconcile_by_title(identifier).await,
        }
    }

    async fn reconcile_linked(
        &self,
        identifier: &TestIdentifier,
        linked_id: NonZeroU32,
    ) -> Result<ReconciliationResult, ReconcileFailure> {
        let id = linked_id.get();
        let filter = self.filter(vec![FieldPredicate::new(ID_FIELD, id.to_string())]);
        let matches = self.store.query_by_filter(&filter).await?;
        let Some(reference) = matches.first() else {
            return Err(ReconcileFailure::LinkedItemNotFound { id });
        };

        let baseline = self.store.get_by_id(reference.id).await?;
        let patch = automation_patch(identifier, Some(&baseline), &(self.refresh_token)());
        self.store
            .update(self.project(), reference.id, &patch)
            .await?;
        if refreshes_only(&patch) {
            tracing::info!(work_item = id, "manually linked Test Case already up to date");
            return Ok(ReconciliationResult::AlreadyUpToDate(id));
        }
        tracing::info!(work_item = id, "updated manually linked Test Case");
        Ok(ReconciliationResult::Updated(id))
    }

    async fn reconcile_by_title(
        &self,
        identifier: &TestIdentifier,
    ) -> Result<ReconciliationResult, ReconcileFailure> {
        let filter = self.filter(vec![
            FieldPredicate::new(TITLE_FIELD, identifier.display_title()),
            FieldPredicate::new(AUTOMATED_TEST_TYPE_FIELD, AUTOMATED_TEST_TYPE),
        ]);
        let matches = self.store.query_by_filter(&filter).await?;

        match matches.as_slice() {
            [] => {
                let patch = full_patch(identifier, self.configuration, None, &(self.refresh_token)());
                let created = self
                    .store
                    .create(self.project(), TEST_CASE_WORK_ITEM_TYPE, &patch)
                    .await?;
                tracing::info!(work_item = created.id, "created automatically linked Test Case");
                Ok(ReconciliationResult::Created(created.id))
            }
            [reference] => {
                let baseline = self.store.get_by_id(reference.id).await?;
                let patch = full_patch(
                    identifier,
                    self.configuration,
                    Some(&baseline),
                    &(self.refresh_token)(),
                );
                self.store
                    .update(self.project(), reference.id, &patch)
                    .await?;
                if refreshes_only(&patch) {
                    tracing::info!(
                        work_item = reference.id,
                        "automatically linked Test Case already up to date"
                    );
                    return Ok(ReconciliationResult::AlreadyUpToDate(reference.id));
                }
                tracing::info!(
                    work_item = reference.id,
                    "updated automatically linked Test Case"
                );
                Ok(ReconciliationResult::Updated(reference.id))
            }
            several => {
                // Duplicates usually come from a copied test case; leave all of them alone.
                tracing::warn!(
                    test = identifier.qualified_name(),
                    title = identifier.display_title(),
                    matches = several.len(),
                    "skipping test: several Test Cases share its title"
                );
                Ok(ReconciliationResult::Skipped(SkipReason::AmbiguousMatch {
                    matches: several.len(),
                }))
            }
        }
    }

    fn filter(&self, predicates: Vec<FieldPredicate>) -> QueryFilter {
        QueryFilter {
            team_project: self.project().to_owned(),
            work_item_type: TEST_CASE_WORK_ITEM_TYPE.to_owned(),
            predicates,
        }
    }

    const fn project(&self) -> &str {
        self.configuration.connection.project.as_str()
    }
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
