use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use entitle_runtime::Problem;
use serde_json::json;
use user_entitlement_sdk::{
    ActiveGroupsResponse, CreateRequestRequest, CreateUserRequest, RevokePermissionRequest,
    RevokePermissionResponse, UserDto, UserPermissionsResponse,
};

use super::routes::AppState;

type ApiResult<T> = Result<T, Problem>;

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let db_ok = state.db.ping().await.is_ok();
    let cache_ok = state.cache.ping().await;
    let broker_ok = state.broker.is_connected();
    let status = if db_ok && cache_ok && broker_ok {
        "ok"
    } else {
        "degraded"
    };
    Json(json!({
        "status": status,
        "database": db_ok,
        "cache": cache_ok,
        "broker": broker_ok,
    }))
}

/// 202: the request is durably pending; validation happens asynchronously.
pub async fn create_request(
    State(state): State<AppState>,
    Json(req): Json<CreateRequestRequest>,
) -> ApiResult<impl IntoResponse> {
    let response = state
        .permissions
        .create_request(
            req.user_id,
            req.permission_type,
            req.item_id,
            req.item_name.as_deref(),
        )
        .await?;
    Ok((StatusCode::ACCEPTED, Json(response)))
}

pub async fn revoke_permission(
    State(state): State<AppState>,
    Path(uid): Path<i32>,
    Json(req): Json<RevokePermissionRequest>,
) -> ApiResult<Json<RevokePermissionResponse>> {
    state
        .permissions
        .revoke_permission(uid, req.permission_type, req.item_id)
        .await?;
    Ok(Json(RevokePermissionResponse {
        status: "revoked".to_owned(),
    }))
}

pub async fn get_permissions(
    State(state): State<AppState>,
    Path(uid): Path<i32>,
) -> ApiResult<Json<UserPermissionsResponse>> {
    Ok(Json(state.permissions.get_permissions(uid).await?))
}

pub async fn get_current_active_groups(
    State(state): State<AppState>,
    Path(uid): Path<i32>,
) -> ApiResult<Json<ActiveGroupsResponse>> {
    Ok(Json(state.permissions.get_active_groups(uid).await?))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(uid): Path<i32>,
) -> ApiResult<Json<UserDto>> {
    Ok(Json(state.users.get_user(uid).await?))
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = state.users.create_user(&req.username).await?;
    Ok((StatusCode::CREATED, Json(user)))
}
