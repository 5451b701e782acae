/*
 * Responsibility
 * - Filtered navigation tree for the caller's role
 * - Computed once per request from a single grant snapshot; a caller
 *   without a resolvable role sees an empty tree, not an error
 */
use axum::{Json, extract::State};

use crate::{
    api::v1::dto::navigation::NavigationResponse,
    api::v1::extractors::CallerIdentity,
    services::authz::KnownRole,
    state::AppState,
};

pub async fn navigation(
    State(state): State<AppState>,
    CallerIdentity(identity): CallerIdentity,
) -> Json<NavigationResponse> {
    let groups = match state.authz.role_snapshot(&identity).await {
        Some(grants) => state.nav_tree.filter(&grants).groups,
        None => Vec::new(),
    };

    let default_route = identity
        .role_name()
        .map(KnownRole::from_name)
        .and_then(KnownRole::default_route);

    Json(NavigationResponse {
        groups,
        default_route,
    })
}
