//! Typed HTTP client for the access-catalog service.

use std::time::Duration;

use http::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::models::{
    Access, AccessGroupsResponse, ConflictsResponse, Group, GroupAccessesResponse, Resource,
};

/// Default outbound request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum CatalogClientError {
    /// The catalog responded with a non-success status.
    #[error("catalog responded {status}: {detail}")]
    Status { status: StatusCode, detail: String },
    /// Network failure or timeout before a response arrived.
    #[error("catalog unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid catalog base url: {0}")]
    BaseUrl(String),
}

impl CatalogClientError {
    /// Status of the downstream response, when one arrived.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(_) | Self::BaseUrl(_) => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AccessCatalogClient {
    http: reqwest::Client,
    base: String,
}

impl AccessCatalogClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CatalogClientError> {
        let base =
            Url::parse(base_url).map_err(|error| CatalogClientError::BaseUrl(error.to_string()))?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(CatalogClientError::Transport)?;
        Ok(Self {
            http,
            base: base.as_str().trim_end_matches('/').to_owned(),
        })
    }

    /// All conflict edges, both directions.
    pub async fn get_conflicts(&self) -> Result<ConflictsResponse, CatalogClientError> {
        self.get_json("/conflicts").await
    }

    /// Accesses granted by a group, resources expanded.
    pub async fn get_group_accesses(
        &self,
        group_id: i32,
    ) -> Result<GroupAccessesResponse, CatalogClientError> {
        self.get_json(&format!("/groups/{group_id}/accesses")).await
    }

    /// Groups containing an access.
    pub async fn get_access_groups(
        &self,
        access_id: i32,
    ) -> Result<AccessGroupsResponse, CatalogClientError> {
        self.get_json(&format!("/accesses/{access_id}/groups")).await
    }

    pub async fn list_resources(&self) -> Result<Vec<Resource>, CatalogClientError> {
        self.get_json("/resources").await
    }

    pub async fn list_accesses(&self) -> Result<Vec<Access>, CatalogClientError> {
        self.get_json("/accesses").await
    }

    pub async fn list_groups(&self) -> Result<Vec<Group>, CatalogClientError> {
        self.get_json("/groups").await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CatalogClientError> {
        let url = format!("{}{path}", self.base);
        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(CatalogClientError::Status { status, detail });
        }

        Ok(response.json().await?)
    }
}
