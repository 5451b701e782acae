/*
 * Responsibility
 * - Assignment mutations: role<->view and role<->view<->permission grants
 * - The only write path of this service; unlike verification, failures here
 *   surface as explicit errors to the administrator
 * - Every successful mutation invalidates the affected role's snapshot
 */
use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    api::v1::dto::catalog::MessageResponse,
    api::v1::extractors::CallerIdentity,
    error::AppError,
    repos::{grant_repo, permission_repo, role_repo, view_repo},
    services::authz::Identity,
    state::AppState,
};

// Mutations require the "update" action on the "roles" admin view.
async fn require_admin(state: &AppState, identity: &Identity) -> Result<(), AppError> {
    if state.authz.has_permission(identity, "roles", "update").await {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

async fn decode_role_view(
    state: &AppState,
    role_public: &str,
    view_public: &str,
) -> Result<(role_repo::RoleRow, view_repo::ViewRow), AppError> {
    let role_id = state.id_codec.decode(role_public)?;
    let view_id = state.id_codec.decode(view_public)?;

    let role = role_repo::get(&state.db, role_id)
        .await?
        .ok_or(AppError::not_found("role"))?;
    let view = view_repo::get(&state.db, view_id)
        .await?
        .ok_or(AppError::not_found("view"))?;

    Ok((role, view))
}

pub async fn assign_view(
    State(state): State<AppState>,
    CallerIdentity(identity): CallerIdentity,
    Path((role_public, view_public)): Path<(String, String)>,
) -> Result<Json<MessageResponse>, AppError> {
    require_admin(&state, &identity).await?;
    let (role, view) = decode_role_view(&state, &role_public, &view_public).await?;

    let inserted = grant_repo::assign_view(&state.db, role.role_id, view.view_id).await?;
    state.authz.invalidate_role(&role.name).await;

    let message = if inserted {
        "view assigned to role"
    } else {
        "view was already assigned"
    };
    Ok(Json(MessageResponse { message }))
}

pub async fn unassign_view(
    State(state): State<AppState>,
    CallerIdentity(identity): CallerIdentity,
    Path((role_public, view_public)): Path<(String, String)>,
) -> Result<Json<MessageResponse>, AppError> {
    require_admin(&state, &identity).await?;
    let (role, view) = decode_role_view(&state, &role_public, &view_public).await?;

    let removed = grant_repo::unassign_view(&state.db, role.role_id, view.view_id).await?;
    if !removed {
        return Err(AppError::not_found("assignment"));
    }
    state.authz.invalidate_role(&role.name).await;

    Ok(Json(MessageResponse {
        message: "view unassigned from role",
    }))
}

pub async fn assign_permission(
    State(state): State<AppState>,
    CallerIdentity(identity): CallerIdentity,
    Path((role_public, view_public, permission_public)): Path<(String, String, String)>,
) -> Result<Json<MessageResponse>, AppError> {
    require_admin(&state, &identity).await?;
    let (role, view) = decode_role_view(&state, &role_public, &view_public).await?;

    let permission_id = state.id_codec.decode(&permission_public)?;
    let permission = permission_repo::get(&state.db, permission_id)
        .await?
        .ok_or(AppError::not_found("permission"))?;

    let inserted = grant_repo::assign_permission(
        &state.db,
        role.role_id,
        view.view_id,
        permission.permission_id,
    )
    .await?;
    state.authz.invalidate_role(&role.name).await;

    let message = if inserted {
        "permission assigned to role"
    } else {
        "permission was already assigned"
    };
    Ok(Json(MessageResponse { message }))
}

pub async fn unassign_permission(
    State(state): State<AppState>,
    CallerIdentity(identity): CallerIdentity,
    Path((role_public, view_public, permission_public)): Path<(String, String, String)>,
) -> Result<Json<MessageResponse>, AppError> {
    require_admin(&state, &identity).await?;
    let (role, view) = decode_role_view(&state, &role_public, &view_public).await?;

    let permission_id = state.id_codec.decode(&permission_public)?;
    let permission = permission_repo::get(&state.db, permission_id)
        .await?
        .ok_or(AppError::not_found("permission"))?;

    let removed = grant_repo::unassign_permission(
        &state.db,
        role.role_id,
        view.view_id,
        permission.permission_id,
    )
    .await?;
    if !removed {
        return Err(AppError::not_found("assignment"));
    }
    state.authz.invalidate_role(&role.name).await;

    Ok(Json(MessageResponse {
        message: "permission unassigned from role",
    }))
}
