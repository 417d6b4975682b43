//! Azure DevOps Test Case work items.
//!
//! This module computes field patches for automated tests, reconciles them
//! against the work items already present in the team project, and provides
//! the REST-backed store used in production.

pub mod ado;
pub mod error;
pub mod models;
pub mod patch;
pub mod reconcile;
pub mod store;
pub mod wiql;

pub use ado::{AccessToken, AdoWorkItemStore};
pub use error::WorkItemError;
pub use models::{
    FieldPatch, FieldPredicate, ItemReference, PatchOperation, QueryFilter, RemoteWorkItem,
    TestIdentifier, WorkItemId,
};
pub use reconcile::{
    ReconcileFailure, ReconciliationOutcome, ReconciliationResult, SkipReason,
    WorkItemReconciler,
};
pub use store::WorkItemStore;

#[cfg(test)]
pub use store::MockWorkItemStore;
