/*
 * Responsibility
 * - Catalog reads for the admin surface: roles, views, permissions,
 *   and the views assigned to one role
 * - Authenticated-only; listing the catalog grants nothing by itself
 */
use axum::{Json, extract::State};

use crate::{
    api::v1::dto::catalog::{
        PermissionResponse, PermissionsListResponse, RoleResponse, RolesListResponse,
        ViewResponse, ViewsListResponse,
    },
    api::v1::extractors::PublicRoleId,
    error::AppError,
    repos::{permission_repo, role_repo, view_repo},
    state::AppState,
};

pub async fn list_roles(
    State(state): State<AppState>,
) -> Result<Json<RolesListResponse>, AppError> {
    let rows = role_repo::list(&state.db).await?;
    let total = rows.len();

    let roles = rows
        .into_iter()
        .map(|row| RoleResponse::from_row(&state.id_codec, row))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(RolesListResponse { roles, total }))
}

pub async fn list_views(
    State(state): State<AppState>,
) -> Result<Json<ViewsListResponse>, AppError> {
    let rows = view_repo::list(&state.db).await?;
    let total = rows.len();

    let views = rows
        .into_iter()
        .map(|row| ViewResponse::from_row(&state.id_codec, row))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(ViewsListResponse { views, total }))
}

pub async fn list_permissions(
    State(state): State<AppState>,
) -> Result<Json<PermissionsListResponse>, AppError> {
    let rows = permission_repo::list(&state.db).await?;
    let total = rows.len();

    let permissions = rows
        .into_iter()
        .map(|row| PermissionResponse::from_row(&state.id_codec, row))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(PermissionsListResponse { permissions, total }))
}

pub async fn list_role_views(
    State(state): State<AppState>,
    role_id: PublicRoleId,
) -> Result<Json<Vec<ViewResponse>>, AppError> {
    let role = role_repo::get(&state.db, role_id.id)
        .await?
        .ok_or(AppError::not_found("role"))?;

    let rows = view_repo::list_for_role(&state.db, role.role_id).await?;

    let views = rows
        .into_iter()
        .map(|row| ViewResponse::from_row(&state.id_codec, row))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(views))
}
