use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use entitle_broker::Broker;
use entitle_cache::CacheClient;
use sea_orm::DatabaseConnection;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::config::UserEntitlementConfig;
use crate::domain::ports::ValidationJobPort;
use crate::domain::service::{PermissionService, UserService};
use crate::infra::cache::RedisActiveGroupsCache;
use crate::infra::storage::{SeaOrmEntitlementRepository, SeaOrmUserRepository};

pub type ConcretePermissionService =
    PermissionService<SeaOrmEntitlementRepository, SeaOrmUserRepository>;
pub type ConcreteUserService = UserService<SeaOrmUserRepository>;

#[derive(Clone)]
pub struct AppState {
    pub permissions: Arc<ConcretePermissionService>,
    pub users: Arc<ConcreteUserService>,
    pub db: DatabaseConnection,
    pub cache: CacheClient,
    pub broker: Arc<Broker>,
}

impl AppState {
    pub fn build(
        db: DatabaseConnection,
        cache: CacheClient,
        broker: Arc<Broker>,
        jobs: Arc<dyn ValidationJobPort>,
        config: &UserEntitlementConfig,
    ) -> Self {
        let entitlement_repo = Arc::new(SeaOrmEntitlementRepository::new(db.clone()));
        let user_repo = Arc::new(SeaOrmUserRepository::new(db.clone()));
        let groups_cache = Arc::new(RedisActiveGroupsCache::new(
            cache.clone(),
            &config.cache_ttl,
        ));

        Self {
            permissions: Arc::new(PermissionService::new(
                entitlement_repo,
                user_repo.clone(),
                jobs,
                groups_cache,
            )),
            users: Arc::new(UserService::new(user_repo)),
            db,
            cache,
            broker,
        }
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
        .route("/users/{uid}", get(handlers::get_user))
        .route("/admin/users", post(handlers::create_user))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
