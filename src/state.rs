/*
 * Responsibility
 * - Shared context bound to the Router (AppState)
 * - Clone is cheap (Arc / pool handles inside)
 */
use std::sync::Arc;

use crate::services::{
    auth::AuthService,
    authz::{AuthzEvaluator, NavigationTree},
    id_codec::IdCodec,
};

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub id_codec: IdCodec,
    pub auth: Arc<AuthService>,
    pub authz: AuthzEvaluator,
    pub nav_tree: Arc<NavigationTree>,
}

impl AppState {
    pub fn new(
        db: sqlx::PgPool,
        id_codec: IdCodec,
        auth: Arc<AuthService>,
        authz: AuthzEvaluator,
        nav_tree: Arc<NavigationTree>,
    ) -> Self {
        Self {
            db,
            id_codec,
            auth,
            authz,
            nav_tree,
        }
    }
}
