use access_catalog_sdk::{
    Access, AccessGroupsResponse, AddAccessToGroupResponse, AddResourceToAccessRequest,
    ConflictsResponse, CreateAccessRequest, CreateConflictRequest, CreateGroupRequest,
    CreateResourceRequest, DeleteConflictRequest, Group, GroupAccessesResponse, Resource,
};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use entitle_runtime::Problem;
use serde_json::json;

use super::routes::AppState;

type ApiResult<T> = Result<T, Problem>;

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let db_ok = state.db.ping().await.is_ok();
    let cache_ok = state.cache.ping().await;
    let status = if db_ok && cache_ok { "ok" } else { "degraded" };
    Json(json!({ "status": status, "database": db_ok, "cache": cache_ok }))
}

pub async fn list_resources(State(state): State<AppState>) -> ApiResult<Json<Vec<Resource>>> {
    Ok(Json(state.resources.list_resources().await?))
}

pub async fn get_resource(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<Resource>> {
    Ok(Json(state.resources.get_resource(id).await?))
}

pub async fn list_accesses(State(state): State<AppState>) -> ApiResult<Json<Vec<Access>>> {
    Ok(Json(state.accesses.list_accesses().await?))
}

pub async fn get_access(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<Access>> {
    Ok(Json(state.accesses.get_access(id).await?))
}

pub async fn get_access_groups(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<AccessGroupsResponse>> {
    let groups = state.accesses.get_access_groups(id).await?;
    Ok(Json(AccessGroupsResponse {
        access_id: id,
        groups,
    }))
}

pub async fn list_groups(State(state): State<AppState>) -> ApiResult<Json<Vec<Group>>> {
    Ok(Json(state.groups.list_groups().await?))
}

pub async fn get_group(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<Group>> {
    Ok(Json(state.groups.get_group(id).await?))
}

pub async fn get_group_accesses(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<GroupAccessesResponse>> {
    let accesses = state.groups.get_group_accesses(id).await?;
    Ok(Json(GroupAccessesResponse {
        group_id: id,
        accesses,
    }))
}

pub async fn get_conflicts(State(state): State<AppState>) -> ApiResult<Json<ConflictsResponse>> {
    let conflicts = state.conflicts.get_conflict_matrix().await?;
    Ok(Json(ConflictsResponse { conflicts }))
}

pub async fn create_resource(
    State(state): State<AppState>,
    Json(req): Json<CreateResourceRequest>,
) -> ApiResult<impl IntoResponse> {
    let resource = state
        .resources
        .create_resource(&req.name, req.resource_type, req.description.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(resource)))
}

pub async fn delete_resource(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    state.resources.delete_resource(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_access(
    State(state): State<AppState>,
    Json(req): Json<CreateAccessRequest>,
) -> ApiResult<impl IntoResponse> {
    let access = state
        .accesses
        .create_access(&req.name, &req.resource_ids)
        .await?;
    Ok((StatusCode::CREATED, Json(access)))
}

pub async fn delete_access(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    state.accesses.delete_access(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_resource_to_access(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<AddResourceToAccessRequest>,
) -> ApiResult<impl IntoResponse> {
    state.accesses.add_resource(id, req.resource_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "access_id": id, "resource_id": req.resource_id })),
    ))
}

pub async fn remove_resource_from_access(
    State(state): State<AppState>,
    Path((id, rid)): Path<(i32, i32)>,
) -> ApiResult<StatusCode> {
    state.accesses.remove_resource(id, rid).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_group(
    State(state): State<AppState>,
    Json(req): Json<CreateGroupRequest>,
) -> ApiResult<impl IntoResponse> {
    let group = state.groups.create_group(&req.name, &req.access_ids).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

pub async fn delete_group(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    state.groups.delete_group(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_access_to_group(
    State(state): State<AppState>,
    Path((gid, aid)): Path<(i32, i32)>,
) -> ApiResult<impl IntoResponse> {
    state.groups.add_access(gid, aid).await?;
    Ok((
        StatusCode::CREATED,
        Json(AddAccessToGroupResponse {
            group_id: gid,
            access_id: aid,
        }),
    ))
}

pub async fn remove_access_from_group(
    State(state): State<AppState>,
    Path((gid, aid)): Path<(i32, i32)>,
) -> ApiResult<StatusCode> {
    state.groups.remove_access(gid, aid).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_conflict(
    State(state): State<AppState>,
    Json(req): Json<CreateConflictRequest>,
) -> ApiResult<impl IntoResponse> {
    let pair = state
        .conflicts
        .create_conflict(req.group_id1, req.group_id2)
        .await?;
    Ok((StatusCode::CREATED, Json(pair)))
}

pub async fn delete_conflict(
    State(state): State<AppState>,
    Json(req): Json<DeleteConflictRequest>,
) -> ApiResult<StatusCode> {
    state
        .conflicts
        .delete_conflict(req.group_id1, req.group_id2)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
