use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;
use entitle_cache::CacheClient;
use sea_orm::DatabaseConnection;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::config::AccessCatalogConfig;
use crate::domain::service::{AccessService, ConflictService, GroupService, ResourceService};
use crate::infra::cache::{
    RedisAccessGroupsCache, RedisConflictMatrixCache, RedisGroupAccessesCache,
};
use crate::infra::storage::{
    SeaOrmAccessRepository, SeaOrmConflictRepository, SeaOrmGroupRepository,
    SeaOrmResourceRepository,
};

pub type ConcreteResourceService = ResourceService<SeaOrmResourceRepository>;
pub type ConcreteAccessService = AccessService<SeaOrmAccessRepository, SeaOrmResourceRepository>;
pub type ConcreteGroupService =
    GroupService<SeaOrmGroupRepository, SeaOrmAccessRepository, SeaOrmConflictRepository>;
pub type ConcreteConflictService = ConflictService<SeaOrmConflictRepository, SeaOrmGroupRepository>;

#[derive(Clone)]
pub struct AppState {
    pub resources: Arc<ConcreteResourceService>,
    pub accesses: Arc<ConcreteAccessService>,
    pub groups: Arc<ConcreteGroupService>,
    pub conflicts: Arc<ConcreteConflictService>,
    pub db: DatabaseConnection,
    pub cache: CacheClient,
}

impl AppState {
    pub fn build(
        db: DatabaseConnection,
        cache: CacheClient,
        config: &AccessCatalogConfig,
    ) -> Self {
        let resource_repo = Arc::new(SeaOrmResourceRepository::new(db.clone()));
        let access_repo = Arc::new(SeaOrmAccessRepository::new(db.clone()));
        let group_repo = Arc::new(SeaOrmGroupRepository::new(db.clone()));
        let conflict_repo = Arc::new(SeaOrmConflictRepository::new(db.clone()));

        let matrix_cache = Arc::new(RedisConflictMatrixCache::new(
            cache.clone(),
            &config.cache_ttl,
        ));
        let group_accesses_cache = Arc::new(RedisGroupAccessesCache::new(
            cache.clone(),
            &config.cache_ttl,
        ));
        let access_groups_cache = Arc::new(RedisAccessGroupsCache::new(
            cache.clone(),
            &config.cache_ttl,
        ));

        Self {
            resources: Arc::new(ResourceService::new(resource_repo.clone())),
            accesses: Arc::new(AccessService::new(
                access_repo.clone(),
                resource_repo,
                access_groups_cache.clone(),
            )),
            groups: Arc::new(GroupService::new(
                group_repo.clone(),
                access_repo,
                conflict_repo.clone(),
                group_accesses_cache,
                access_groups_cache,
            )),
            conflicts: Arc::new(ConflictService::new(conflict_repo, group_repo, matrix_cache)),
            db,
            cache,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/resources", get(handlers::list_resources))
        .route("/resources/{id}", get(handlers::get_resource))
        .route("/accesses", get(handlers::list_accesses))
        .route("/accesses/{id}", get(handlers::get_access))
        .route("/accesses/{id}/groups", get(handlers::get_access_groups))
        .route("/groups", get(handlers::list_groups))
        .route("/groups/{id}", get(handlers::get_group))
        .route("/groups/{id}/accesses", get(handlers::get_group_accesses))
        .route("/conflicts", get(handlers::get_conflicts))
        .route("/admin/resources", post(handlers::create_resource))
        .route("/admin/resources/{id}", delete(handlers::delete_resource))
        .route("/admin/accesses", post(handlers::create_access))
        .route("/admin/accesses/{id}", delete(handlers::delete_access))
        .route(
            "/admin/accesses/{id}/resources",
            post(handlers::add_resource_to_access),
        )
        .route(
            "/admin/accesses/{id}/resources/{rid}",
            delete(handlers::remove_resource_from_access),
        )
        .route("/admin/groups", post(handlers::create_group))
        .route("/admin/groups/{id}", delete(handlers::delete_group))
        .route(
            "/admin/groups/{gid}/accesses/{aid}",
            post(handlers::add_access_to_group).delete(handlers::remove_access_from_group),
        )
        .route(
            "/admin/conflicts",
            post(handlers::create_conflict).delete(handlers::delete_conflict),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
