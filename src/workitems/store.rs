//! Abstract work item store.
//!
//! The reconciler talks to Azure DevOps only through this trait so that the
//! decision logic can be exercised against a mock.

use async_trait::async_trait;

use super::error::WorkItemError;
use super::models::{FieldPatch, ItemReference, QueryFilter, RemoteWorkItem, WorkItemId};

/// Store that can query, read, create, and update work items.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkItemStore: Send + Sync {
    /// Finds work items matching the filter.
    async fn query_by_filter(
        &self,
        filter: &QueryFilter,
    ) -> Result<Vec<ItemReference>, WorkItemError>;

    /// Fetches a work item with all of its fields.
    async fn get_by_id(&self, id: WorkItemId) -> Result<RemoteWorkItem, WorkItemError>;

    /// Creates a work item of the given type.
    async fn create(
        &self,
        team_project: &str,
        work_item_type: &str,
        patch: &FieldPatch,
    ) -> Result<RemoteWorkItem, WorkItemError>;

    /// Applies a patch to an existing work item.
    async fn update(
        &self,
        team_project: &str,
        id: WorkItemId,
        patch: &FieldPatch,
    ) -> Result<RemoteWorkItem, WorkItemError>;
}
