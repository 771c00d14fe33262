use access_catalog_sdk::{
    Access, AccessGroupsResponse, ConflictsResponse, Group, GroupAccessesResponse, Resource,
};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use entitle_runtime::Problem;
use serde_json::json;
use user_entitlement_sdk::{
    ActiveGroupsResponse, CreateRequestRequest, RevokePermissionRequest, RevokePermissionResponse,
    UserPermissionsResponse,
};

use super::error::{from_catalog, from_entitlement};
use super::routes::AppState;

type ApiResult<T> = Result<T, Problem>;

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

pub async fn create_request(
    State(state): State<AppState>,
    Json(req): Json<CreateRequestRequest>,
) -> ApiResult<impl IntoResponse> {
    let response = state
        .entitlements
        .create_request(&req)
        .await
        .map_err(from_entitlement)?;
    Ok((StatusCode::ACCEPTED, Json(response)))
}

pub async fn revoke_permission(
    State(state): State<AppState>,
    Path(uid): Path<i32>,
    Json(req): Json<RevokePermissionRequest>,
) -> ApiResult<Json<RevokePermissionResponse>> {
    let response = state
        .entitlements
        .revoke_permission(uid, &req)
        .await
        .map_err(from_entitlement)?;
    Ok(Json(response))
}

pub async fn get_permissions(
    State(state): State<AppState>,
    Path(uid): Path<i32>,
) -> ApiResult<Json<UserPermissionsResponse>> {
    let response = state
        .entitlements
        .get_permissions(uid)
        .await
        .map_err(from_entitlement)?;
    Ok(Json(response))
}

pub async fn get_current_active_groups(
    State(state): State<AppState>,
    Path(uid): Path<i32>,
) -> ApiResult<Json<ActiveGroupsResponse>> {
    let response = state
        .entitlements
        .get_current_active_groups(uid)
        .await
        .map_err(from_entitlement)?;
    Ok(Json(response))
}

pub async fn list_resources(State(state): State<AppState>) -> ApiResult<Json<Vec<Resource>>> {
    Ok(Json(state.catalog.list_resources().await.map_err(from_catalog)?))
}

pub async fn list_accesses(State(state): State<AppState>) -> ApiResult<Json<Vec<Access>>> {
    Ok(Json(state.catalog.list_accesses().await.map_err(from_catalog)?))
}

pub async fn get_access_groups(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<AccessGroupsResponse>> {
    let response = state
        .catalog
        .get_access_groups(id)
        .await
        .map_err(from_catalog)?;
    Ok(Json(response))
}

pub async fn list_groups(State(state): State<AppState>) -> ApiResult<Json<Vec<Group>>> {
    Ok(Json(state.catalog.list_groups().await.map_err(from_catalog)?))
}

pub async fn get_group_accesses(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<GroupAccessesResponse>> {
    let response = state
        .catalog
        .get_group_accesses(id)
        .await
        .map_err(from_catalog)?;
    Ok(Json(response))
}

pub async fn get_conflicts(State(state): State<AppState>) -> ApiResult<Json<ConflictsResponse>> {
    Ok(Json(state.catalog.get_conflicts().await.map_err(from_catalog)?))
}
