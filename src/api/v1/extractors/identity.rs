/*
 * Responsibility
 * - Hand the verified `Identity` from request extensions to handlers
 * - The access middleware must have run; a missing identity is a 401
 *   (no authentication configured on the route, or middleware not applied)
 */
use axum::extract::FromRequestParts;
use axum::http::{StatusCode, request::Parts};

use crate::services::authz::Identity;
use crate::state::AppState;

pub struct CallerIdentity(pub Identity);

impl FromRequestParts<AppState> for CallerIdentity
where
    AppState: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(CallerIdentity)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}
