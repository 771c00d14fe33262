use std::time::Duration;

use access_catalog_sdk::AccessCatalogClient;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use user_entitlement_sdk::UserEntitlementClient;

use super::handlers;
use crate::config::GatewayConfig;

#[derive(Clone)]
pub struct AppState {
    pub catalog: AccessCatalogClient,
    pub entitlements: UserEntitlementClient,
}

impl AppState {
    pub fn build(config: &GatewayConfig) -> anyhow::Result<Self> {
        let timeout = Duration::from_secs(config.http_timeout_secs);
        Ok(Self {
            catalog: AccessCatalogClient::new(&config.access_catalog_url, timeout)?,
            entitlements: UserEntitlementClient::new(&config.user_service_url, timeout)?,
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/request", post(handlers::create_request))
        .route(
            "/users/{uid}/permissions",
            get(handlers::get_permissions).delete(handlers::revoke_permission),
        )
        .route(
            "/users/{uid}/current_active_groups",
            get(handlers::get_current_active_groups),
        )
        .route("/resources", get(handlers::list_resources))
        .route("/accesses", get(handlers::list_accesses))
        .route("/accesses/{id}/groups", get(handlers::get_access_groups))
        .route("/groups", get(handlers::list_groups))
        .route("/groups/{id}/accesses", get(handlers::get_group_accesses))
        .route("/conflicts", get(handlers::get_conflicts))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
