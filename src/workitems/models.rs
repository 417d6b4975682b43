//! Domain models shared by the reconciler and the work item store.

use std::collections::BTreeMap;
use std::num::NonZeroU32;

use serde::Serialize;

/// Numeric Azure DevOps work item id.
pub type WorkItemId = u32;

/// One automated test discovered in a test binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestIdentifier {
    qualified_name: String,
    display_title: String,
    storage: String,
    explicit_linked_id: Option<NonZeroU32>,
}

impl TestIdentifier {
    /// Builds an identifier from a declaring type and a method name.
    ///
    /// The qualified name joins both with `.`; the display title uses the
    /// short type name (the last `.` segment) as `Type - Method`.
    #[must_use]
    pub fn from_method(declaring_type: &str, method: &str, storage: impl Into<String>) -> Self {
        let short_type = declaring_type.rsplit('.').next().unwrap_or(declaring_type);
        Self {
            qualified_name: format!("{declaring_type}.{method}"),
            display_title: format!("{short_type} - {method}"),
            storage: storage.into(),
            explicit_linked_id: None,
        }
    }

    /// Pins the identifier to an existing work item.
    #[must_use]
    pub const fn with_linked_id(mut self, id: NonZeroU32) -> Self {
        self.explicit_linked_id = Some(id);
        self
    }

    /// Declaring type and member name, e.g. `Postman.Wrapper.LoginTests.ValidLogin`.
    #[must_use]
    pub const fn qualified_name(&self) -> &str {
        self.qualified_name.as_str()
    }

    /// Work item title, e.g. `LoginTests - ValidLogin`.
    #[must_use]
    pub const fn display_title(&self) -> &str {
        self.display_title.as_str()
    }

    /// Module or binary containing the test.
    #[must_use]
    pub const fn storage(&self) -> &str {
        self.storage.as_str()
    }

    /// Manually pinned work item id, if any.
    #[must_use]
    pub const fn explicit_linked_id(&self) -> Option<NonZeroU32> {
        self.explicit_linked_id
    }
}

/// Reference returned by a work item query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemReference {
    /// Matching work item id.
    pub id: WorkItemId,
}

/// A work item as read from the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteWorkItem {
    /// Work item id.
    pub id: WorkItemId,
    /// Field values keyed by reference name, in their string form.
    pub fields: BTreeMap<String, String>,
}

impl RemoteWorkItem {
    /// Returns the current value of a field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Equality predicate on a work item field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPredicate {
    /// Field reference name.
    pub field: String,
    /// Expected value.
    pub value: String,
}

impl FieldPredicate {
    /// Creates a predicate.
    #[must_use]
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Work item query scoped to a team project and work item type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFilter {
    /// Team project name.
    pub team_project: String,
    /// Work item type, e.g. `Test Case`.
    pub work_item_type: String,
    /// Additional field equality predicates, combined with `AND`.
    pub predicates: Vec<FieldPredicate>,
}

/// A single field assignment within a patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOperation {
    /// Field reference name.
    pub field: String,
    /// Proposed value.
    pub value: String,
}

impl PatchOperation {
    /// JSON Patch path of the field, e.g. `/fields/System.Title`.
    #[must_use]
    pub fn path(&self) -> String {
        format!("/fields/{}", self.field)
    }
}

/// Ordered field assignments proposed for a work item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPatch {
    operations: Vec<PatchOperation>,
}

impl FieldPatch {
    /// Appends an assignment.
    pub fn push(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.operations.push(PatchOperation {
            field: field.into(),
            value: value.into(),
        });
    }

    /// Number of operations.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.operations.len()
    }

    /// Whether the patch proposes no change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Operations in application order.
    #[must_use]
    pub fn operations(&self) -> &[PatchOperation] {
        &self.operations
    }

    /// Proposed value for a field, if the patch touches it.
    #[must_use]
    pub fn value(&self, field: &str) -> Option<&str> {
        self.operations
            .iter()
            .find(|operation| operation.field == field)
            .map(|operation| operation.value.as_str())
    }

    /// Renders the patch as a JSON Patch document of `add` operations.
    #[must_use]
    pub fn to_json_patch(&self) -> Vec<JsonPatchOperation<'_>> {
        self.operations
            .iter()
            .map(|operation| JsonPatchOperation {
                op: "add",
                path: operation.path(),
                value: operation.value.as_str(),
            })
            .collect()
    }
}

/// Wire form of one JSON Patch operation.
#[derive(Debug, Serialize)]
pub struct JsonPatchOperation<'a> {
    /// Operation kind; always `add`.
    pub op: &'static str,
    /// Target path.
    pub path: String,
    /// Assigned value.
    pub value: &'a str,
}
