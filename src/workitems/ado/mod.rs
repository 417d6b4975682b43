//! Azure DevOps REST implementation of [`WorkItemStore`].
//!
//! Uses the work item tracking API (`api-version=7.1`) with basic
//! authentication: an empty user name and a personal access token.

mod error_mapping;
mod wire;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

use super::error::WorkItemError;
use super::models::{FieldPatch, ItemReference, QueryFilter, RemoteWorkItem, WorkItemId};
use super::store::WorkItemStore;
use super::wiql::render_query;

use error_mapping::{extract_ado_message, map_http_error, map_transport_error};
use wire::{ApiWorkItem, WiqlRequest, WiqlResponse};

const API_VERSION: &str = "7.1";
const JSON_PATCH_CONTENT_TYPE: &str = "application/json-patch+json";

/// Personal access token used for Azure DevOps authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`WorkItemError::MissingToken`] when the supplied string is
    /// blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, WorkItemError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(WorkItemError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("AccessToken(..)")
    }
}

/// Work item store backed by the Azure DevOps REST API.
#[derive(Debug, Clone)]
pub struct AdoWorkItemStore {
    client: Client,
    organization_url: Url,
    token: AccessToken,
}

impl AdoWorkItemStore {
    /// Builds a store for an organisation URL such as
    /// `https://dev.azure.com/contoso`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkItemError::InvalidUrl`] when the URL cannot carry path
    /// segments and [`WorkItemError::Network`] when the HTTP client cannot be
    /// configured.
    pub fn new(
        organization_url: Url,
        token: AccessToken,
        timeout: Duration,
    ) -> Result<Self, WorkItemError> {
        if organization_url.cannot_be_a_base() {
            return Err(WorkItemError::InvalidUrl(organization_url.to_string()));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| WorkItemError::Network {
                message: format!("failed to configure HTTP client: {error}"),
            })?;
        Ok(Self {
            client,
            organization_url,
            token,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, WorkItemError> {
        let mut url = self.organization_url.clone();
        url.path_segments_mut()
            .map_err(|()| WorkItemError::InvalidUrl(self.organization_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        url.query_pairs_mut().append_pair("api-version", API_VERSION);
        Ok(url)
    }

    fn authorised(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth("", Some(self.token.value()))
    }

    async fn send_patch(
        &self,
        operation: &str,
        request: RequestBuilder,
        patch: &FieldPatch,
    ) -> Result<RemoteWorkItem, WorkItemError> {
        let body = serde_json::to_vec(&patch.to_json_patch()).map_err(|error| {
            WorkItemError::Decode {
                message: format!("{operation}: failed to encode patch: {error}"),
            }
        })?;
        let response = self
            .authorised(request)
            .header(CONTENT_TYPE, JSON_PATCH_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(|error| map_transport_error(operation, &error))?;
        read_json::<ApiWorkItem>(operation, response)
            .await
            .map(RemoteWorkItem::from)
    }
}

async fn read_json<T: DeserializeOwned>(
    operation: &str,
    response: Response,
) -> Result<T, WorkItemError> {
    let status = response.status();
    if !status.is_success() {
        let message = response
            .text()
            .await
            .ok()
            .and_then(|body| extract_ado_message(&body));
        return Err(map_http_error(operation, status, message));
    }
    response
        .json::<T>()
        .await
        .map_err(|error| map_transport_error(operation, &error))
}

#[async_trait]
impl WorkItemStore for AdoWorkItemStore {
    async fn query_by_filter(
        &self,
        filter: &QueryFilter,
    ) -> Result<Vec<ItemReference>, WorkItemError> {
        let url = self.endpoint(&[filter.team_project.as_str(), "_apis", "wit", "wiql"])?;
        let query = render_query(filter);
        tracing::debug!(%query, "WIQL query");
        let response = self
            .authorised(self.client.post(url))
            .json(&WiqlRequest {
                query: query.as_str(),
            })
            .send()
            .await
            .map_err(|error| map_transport_error("work item query", &error))?;
        let result: WiqlResponse = read_json("work item query", response).await?;
        Ok(result.work_items.into_iter().map(ItemReference::from).collect())
    }

    async fn get_by_id(&self, id: WorkItemId) -> Result<RemoteWorkItem, WorkItemError> {
        let id_segment = id.to_string();
        let url = self.endpoint(&["_apis", "wit", "workitems", id_segment.as_str()])?;
        let response = self
            .authorised(self.client.get(url))
            .send()
            .await
            .map_err(|error| map_transport_error("get work item", &error))?;
        read_json::<ApiWorkItem>("get work item", response)
            .await
            .map(RemoteWorkItem::from)
    }

    async fn create(
        &self,
        team_project: &str,
        work_item_type: &str,
        patch: &FieldPatch,
    ) -> Result<RemoteWorkItem, WorkItemError> {
        let type_segment = format!("${work_item_type}");
        let url = self.endpoint(&[
            team_project,
            "_apis",
            "wit",
            "workitems",
            type_segment.as_str(),
        ])?;
        self.send_patch("create work item", self.client.post(url), patch)
            .await
    }

    async fn update(
        &self,
        team_project: &str,
        id: WorkItemId,
        patch: &FieldPatch,
    ) -> Result<RemoteWorkItem, WorkItemError> {
        let id_segment = id.to_string();
        let url = self.endpoint(&[
            team_project,
            "_apis",
            "wit",
            "workitems",
            id_segment.as_str(),
        ])?;
        self.send_patch("update work item", self.client.patch(url), patch)
            .await
    }
}
