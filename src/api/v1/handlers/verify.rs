/*
 * Responsibility
 * - The verification read path: view / permission / route / batch checks
 * - Always answers with a decision; backend trouble is a denial, not a 500
 * - The body's userId must match the token subject; the role always comes
 *   from the token, never from the body
 */
use axum::{Json, extract::State};

use crate::{
    api::v1::dto::verify::{
        BatchEntry, VerifyBatchRequest, VerifyBatchResponse, VerifyPermissionRequest,
        VerifyResponse, VerifyRouteRequest, VerifyViewRequest,
    },
    api::v1::extractors::CallerIdentity,
    services::authz::PermissionQuery,
    state::AppState,
};

pub async fn verify_permission(
    State(state): State<AppState>,
    CallerIdentity(identity): CallerIdentity,
    Json(req): Json<VerifyPermissionRequest>,
) -> Json<VerifyResponse> {
    let granted = req.user_id == identity.user_id
        && state
            .authz
            .has_permission(&identity, &req.view, &req.permission)
            .await;

    Json(VerifyResponse::decision(granted))
}

pub async fn verify_view(
    State(state): State<AppState>,
    CallerIdentity(identity): CallerIdentity,
    Json(req): Json<VerifyViewRequest>,
) -> Json<VerifyResponse> {
    let granted =
        req.user_id == identity.user_id && state.authz.has_view_access(&identity, &req.view).await;

    Json(VerifyResponse::decision(granted))
}

pub async fn verify_route(
    State(state): State<AppState>,
    CallerIdentity(identity): CallerIdentity,
    Json(req): Json<VerifyRouteRequest>,
) -> Json<VerifyResponse> {
    let granted = req.user_id == identity.user_id
        && state.authz.check_route_access(&identity, &req.route).await;

    Json(VerifyResponse::decision(granted))
}

pub async fn verify_permission_batch(
    State(state): State<AppState>,
    CallerIdentity(identity): CallerIdentity,
    Json(req): Json<VerifyBatchRequest>,
) -> Json<VerifyBatchResponse> {
    let queries: Vec<PermissionQuery> = req
        .queries
        .into_iter()
        .map(|q| PermissionQuery {
            user_id: q.user_id,
            view: q.view,
            permission: q.permission,
        })
        .collect();

    let results = state
        .authz
        .evaluate_many(&identity, &queries)
        .await
        .into_iter()
        .map(|granted| BatchEntry { granted })
        .collect();

    Json(VerifyBatchResponse { results })
}
