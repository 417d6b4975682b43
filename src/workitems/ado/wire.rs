//! Wire types for the Azure DevOps work item tracking REST API.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::workitems::models::{ItemReference, RemoteWorkItem, WorkItemId};

#[derive(Debug, Serialize)]
pub(super) struct WiqlRequest<'a> {
    pub(super) query: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WiqlResponse {
    #[serde(default)]
    pub(super) work_items: Vec<ApiWorkItemReference>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ApiWorkItemReference {
    pub(super) id: WorkItemId,
}

impl From<ApiWorkItemReference> for ItemReference {
    fn from(reference: ApiWorkItemReference) -> Self {
        Self { id: reference.id }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ApiWorkItem {
    pub(super) id: WorkItemId,
    #[serde(default)]
    pub(super) fields: BTreeMap<String, Value>,
}

impl From<ApiWorkItem> for RemoteWorkItem {
    fn from(item: ApiWorkItem) -> Self {
        let fields = item
            .fields
            .into_iter()
            .map(|(name, value)| (name, field_text(value)))
            .collect();
        Self {
            id: item.id,
            fields,
        }
    }
}

/// String form of a field value used for equality checks.
fn field_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
