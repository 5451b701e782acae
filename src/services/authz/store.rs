/*
 * Responsibility
 * - RoleGrants: the immutable per-role grant snapshot the evaluator decides against
 * - GrantSource: where snapshots come from (Postgres in production, in-memory in tests)
 * - Inactive roles/views/permissions never make it into a snapshot
 */
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::repos::error::RepoError;
use crate::repos::grant_repo;
use crate::services::authz::route_pattern::RoutePattern;

/// An active view assigned to a role.
///
/// `route` is `None` when the stored pattern failed to compile; the view is
/// still navigable by name, but no request path can ever match it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewGrant {
    pub name: String,
    pub route: Option<RoutePattern>,
}

/// A (view, permission) action grant for a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionGrant {
    pub view: String,
    pub permission: String,
}

/// Everything a role is allowed to do, loaded in one aggregated query.
///
/// Snapshots are immutable once built: repeated decisions against the same
/// snapshot are idempotent by construction. View-level and action-level
/// grants are independent sets; neither implies the other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleGrants {
    pub role_name: String,
    pub views: Vec<ViewGrant>,
    pub actions: Vec<ActionGrant>,
}

impl RoleGrants {
    pub fn has_view(&self, view: &str) -> bool {
        self.views.iter().any(|v| v.name == view)
    }

    pub fn has_action(&self, view: &str, permission: &str) -> bool {
        self.actions
            .iter()
            .any(|a| a.view == view && a.permission == permission)
    }

    pub fn allows_route(&self, request_path: &str) -> bool {
        self.views
            .iter()
            .filter_map(|v| v.route.as_ref())
            .any(|p| p.matches(request_path))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GrantSourceError {
    #[error("db error")]
    Db(#[from] RepoError),

    #[error("grant backend error: {0}")]
    Backend(String),
}

/// Source of grant snapshots.
///
/// Returns:
/// - `Ok(Some(_))` for an active role (possibly with empty grant sets)
/// - `Ok(None)` for an unknown or inactive role
/// - `Err(_)` on backend failure (the evaluator treats this as denied)
#[async_trait]
pub trait GrantSource: Send + Sync {
    async fn load(&self, role_name: &str) -> Result<Option<RoleGrants>, GrantSourceError>;
}

/// Postgres-backed grant source over the canonical authorization tables.
#[derive(Clone, Debug)]
pub struct PgGrantSource {
    db: sqlx::PgPool,
}

impl PgGrantSource {
    pub fn new(db: sqlx::PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GrantSource for PgGrantSource {
    async fn load(&self, role_name: &str) -> Result<Option<RoleGrants>, GrantSourceError> {
        let Some(role) = grant_repo::active_role_by_name(&self.db, role_name).await? else {
            return Ok(None);
        };

        let view_rows = grant_repo::active_view_grants(&self.db, role.role_id).await?;
        let action_rows = grant_repo::active_action_grants(&self.db, role.role_id).await?;

        let views = view_rows
            .into_iter()
            .map(|row| ViewGrant {
                route: RoutePattern::compile(&row.route_pattern),
                name: row.name,
            })
            .collect();

        let actions = action_rows
            .into_iter()
            .map(|row| ActionGrant {
                view: row.view_name,
                permission: row.permission_name,
            })
            .collect();

        Ok(Some(RoleGrants {
            role_name: role.name,
            views,
            actions,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> RoleGrants {
        RoleGrants {
            role_name: "vendedor".into(),
            views: vec![
                ViewGrant {
                    name: "leads".into(),
                    route: RoutePattern::compile("/leads"),
                },
                ViewGrant {
                    name: "companias-editar".into(),
                    route: RoutePattern::compile("/companias/*/editar"),
                },
                ViewGrant {
                    name: "rota".into(),
                    route: None,
                },
            ],
            actions: vec![ActionGrant {
                view: "leads".into(),
                permission: "read".into(),
            }],
        }
    }

    #[test]
    fn view_and_action_grants_are_independent() {
        let grants = snapshot();
        assert!(grants.has_view("leads"));
        assert!(grants.has_action("leads", "read"));
        assert!(!grants.has_action("leads", "delete"));
        // an action grant never implies view membership and vice versa
        assert!(!grants.has_view("polizas"));
        assert!(!grants.has_action("companias-editar", "read"));
    }

    #[test]
    fn route_check_uses_compiled_patterns() {
        let grants = snapshot();
        assert!(grants.allows_route("/leads"));
        assert!(grants.allows_route("/companias/42/editar"));
        assert!(!grants.allows_route("/companias/42/borrar"));
    }

    #[test]
    fn view_with_broken_pattern_is_navigable_by_name_only() {
        let grants = snapshot();
        assert!(grants.has_view("rota"));
        assert!(!grants.allows_route("/rota"));
    }

    #[test]
    fn snapshot_survives_cache_serialization() {
        let grants = snapshot();
        let json = serde_json::to_string(&grants).unwrap();
        let back: RoleGrants = serde_json::from_str(&json).unwrap();
        assert!(back.allows_route("/companias/9/editar"));
        assert!(back.has_action("leads", "read"));
    }
}
