/*
 * Responsibility
 * - v1 URL structure
 * - verification read path under /authz, catalog + assignments for admin
 * - every route here sits behind the bearer-auth middleware (applied in app.rs)
 */
use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

use crate::api::v1::handlers::{
    assignments::{assign_permission, assign_view, unassign_permission, unassign_view},
    catalog::{list_permissions, list_role_views, list_roles, list_views},
    navigation::navigation,
    verify::{verify_permission, verify_permission_batch, verify_route, verify_view},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/authz/verify-permission", post(verify_permission))
        .route("/authz/verify-view", post(verify_view))
        .route("/authz/verify-route", post(verify_route))
        .route(
            "/authz/verify-permission-batch",
            post(verify_permission_batch),
        )
        .route("/authz/navigation", get(navigation))
        .route("/roles", get(list_roles))
        .route("/views", get(list_views))
        .route("/permissions", get(list_permissions))
        .route("/roles/{role_id}/views", get(list_role_views))
        .route("/roles/{role_id}/views/{view_id}/assign", post(assign_view))
        .route(
            "/roles/{role_id}/views/{view_id}/unassign",
            delete(unassign_view),
        )
        .route(
            "/roles/{role_id}/views/{view_id}/permissions/{permission_id}/assign",
            post(assign_permission),
        )
        .route(
            "/roles/{role_id}/views/{view_id}/permissions/{permission_id}/unassign",
            delete(unassign_permission),
        )
}
