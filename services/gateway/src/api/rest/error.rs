//! Downstream error mapping.
//!
//! 4xx/5xx responses pass through with the downstream status; network
//! failures and timeouts surface as 503.

use access_catalog_sdk::CatalogClientError;
use entitle_runtime::Problem;
use tracing::warn;
use user_entitlement_sdk::EntitlementClientError;

pub fn from_catalog(error: CatalogClientError) -> Problem {
    match error {
        CatalogClientError::Status { status, detail } => {
            Problem::new(status, "Downstream error", detail)
        }
        CatalogClientError::Transport(inner) => {
            warn!(error = %inner, "access-catalog unreachable");
            Problem::service_unavailable("access-catalog service is unavailable")
        }
        CatalogClientError::BaseUrl(detail) => Problem::internal(detail),
    }
}

pub fn from_entitlement(error: EntitlementClientError) -> Problem {
    match error {
        EntitlementClientError::Status { status, detail } => {
            Problem::new(status, "Downstream error", detail)
        }
        EntitlementClientError::Transport(inner) => {
            warn!(error = %inner, "user-entitlement unreachable");
            Problem::service_unavailable("user-entitlement service is unavailable")
        }
        EntitlementClientError::BaseUrl(detail) => Problem::internal(detail),
    }
}
