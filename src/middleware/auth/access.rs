//! Access-token verification -> Identity into request extensions.
//!
//! The token is the only place identity comes from: handlers never read
//! user or role information out of request bodies for authentication.
//! Identity resolution failures are "no identity", which the verification
//! handlers turn into denials, not 500s; here they are a plain 401.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::state::AppState;

/// Apply bearer authentication to every route of the given router.
///
/// Example:
/// ```ignore
/// let v1 = api::v1::routes();
/// let v1 = middleware::auth::access::apply(v1, state.clone());
/// app = app.nest("/api/v1", v1);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8's from_fn cannot take a State extractor; use from_fn_with_state
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth.strip_prefix("Bearer ").ok_or(AppError::Unauthorized)?;

    // Signature + iss/aud/exp/leeway checks happen in AuthService.
    let identity = match state.auth.verify_identity(token) {
        Ok(identity) => identity,
        Err(err) => {
            tracing::warn!(
                error = ?err,
                "access token verification failed"
            );
            return Err(AppError::Unauthorized);
        }
    };

    // middleware -> extractor hand-off
    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}
