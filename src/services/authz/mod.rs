/*!
 * Role-based access control engine.
 *
 * Responsibility:
 * - route_pattern: compiled wildcard route patterns
 * - identity: (userId, roleName) identity + closed role enum
 * - store: per-role grant snapshots + their source (Postgres / in-memory)
 * - evaluator: fail-closed view/permission/route decisions, batch included
 * - navigation: static menu tree filtered by a snapshot
 */
pub mod evaluator;
pub mod identity;
pub mod navigation;
pub mod route_pattern;
pub mod store;

pub use evaluator::{AuthzEvaluator, PermissionQuery};
pub use identity::{Identity, KnownRole};
pub use navigation::NavigationTree;
pub use route_pattern::RoutePattern;
pub use store::{GrantSource, PgGrantSource, RoleGrants};
