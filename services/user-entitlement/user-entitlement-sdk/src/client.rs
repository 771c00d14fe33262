//! Typed HTTP client for the user-entitlement service.

use std::time::Duration;

use http::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::models::{
    ActiveGroupsResponse, CreateRequestRequest, CreateRequestResponse, RevokePermissionRequest,
    RevokePermissionResponse, UserPermissionsResponse,
};

/// Default outbound request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum EntitlementClientError {
    /// The entitlement service responded with a non-success status.
    #[error("entitlement service responded {status}: {detail}")]
    Status { status: StatusCode, detail: String },
    /// Network failure or timeout before a response arrived.
    #[error("entitlement service unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid entitlement service base url: {0}")]
    BaseUrl(String),
}

impl EntitlementClientError {
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(_) | Self::BaseUrl(_) => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct UserEntitlementClient {
    http: reqwest::Client,
    base: String,
}

impl UserEntitlementClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, EntitlementClientError> {
        let base = Url::parse(base_url)
            .map_err(|error| EntitlementClientError::BaseUrl(error.to_string()))?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(EntitlementClientError::Transport)?;
        Ok(Self {
            http,
            base: base.as_str().trim_end_matches('/').to_owned(),
        })
    }

    /// Groups the user currently holds as active; the validation worker's
    /// source for the held-group set.
    pub async fn get_current_active_groups(
        &self,
        user_id: i32,
    ) -> Result<ActiveGroupsResponse, EntitlementClientError> {
        self.get_json(&format!("/users/{user_id}/current_active_groups"))
            .await
    }

    pub async fn get_permissions(
        &self,
        user_id: i32,
    ) -> Result<UserPermissionsResponse, EntitlementClientError> {
        self.get_json(&format!("/users/{user_id}/permissions")).await
    }

    pub async fn create_request(
        &self,
        request: &CreateRequestRequest,
    ) -> Result<CreateRequestResponse, EntitlementClientError> {
        let url = format!("{}/request", self.base);
        let response = self.http.post(&url).json(request).send().await?;
        Self::decode(response).await
    }

    pub async fn revoke_permission(
        &self,
        user_id: i32,
        request: &RevokePermissionRequest,
    ) -> Result<RevokePermissionResponse, EntitlementClientError> {
        let url = format!("{}/users/{user_id}/permissions", self.base);
        let response = self.http.delete(&url).json(request).send().await?;
        Self::decode(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, EntitlementClientError> {
        let url = format!("{}{path}", self.base);
        let response = self.http.get(&url).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, EntitlementClientError> {
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(EntitlementClientError::Status { status, detail });
        }
        Ok(response.json().await?)
    }
}
