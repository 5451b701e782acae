/*
 * Responsibility
 * - The decision engine: view / permission / route checks for an identity
 * - Read-through grant-snapshot cache (Valkey) with explicit invalidation
 * - Every read-path failure (backend error, timeout, unknown role, missing
 *   identity) resolves to denied; this path never returns an error
 */
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::services::authz::identity::Identity;
use crate::services::authz::store::{GrantSource, RoleGrants};
use crate::services::cache::CacheClient;

/// One entry of a batch verification request.
#[derive(Debug, Clone)]
pub struct PermissionQuery {
    pub user_id: Uuid,
    pub view: String,
    pub permission: String,
}

/// The permission evaluator.
///
/// Cheap to clone; shared via `AppState`. All decisions for one role are made
/// against a single `RoleGrants` snapshot, so a batch is one backend lookup
/// no matter how many queries it carries.
#[derive(Clone)]
pub struct AuthzEvaluator {
    source: Arc<dyn GrantSource>,
    cache: Option<Arc<dyn CacheClient>>,
    snapshot_ttl: Duration,
    lookup_timeout: Duration,
}

impl AuthzEvaluator {
    pub fn new(
        source: Arc<dyn GrantSource>,
        cache: Option<Arc<dyn CacheClient>>,
        snapshot_ttl: Duration,
        lookup_timeout: Duration,
    ) -> Self {
        Self {
            source,
            cache,
            snapshot_ttl,
            lookup_timeout,
        }
    }

    fn cache_key(role_name: &str) -> String {
        format!("authz:grants:{role_name}")
    }

    /// Load the grant snapshot for the identity's role.
    ///
    /// `None` means "decide denied": no role claim, unknown/inactive role,
    /// backend failure, or lookup timeout. Cache failures are not denials;
    /// they degrade to a direct source load.
    pub async fn role_snapshot(&self, identity: &Identity) -> Option<RoleGrants> {
        let role_name = identity.role_name()?;

        if let Some(cache) = &self.cache {
            match cache.get_string(&Self::cache_key(role_name)).await {
                Ok(Some(json)) => match serde_json::from_str::<RoleGrants>(&json) {
                    Ok(grants) => return Some(grants),
                    Err(err) => {
                        tracing::warn!(error = %err, role = %role_name, "discarding undecodable cached snapshot");
                    }
                },
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(error = %err, role = %role_name, "snapshot cache read failed");
                }
            }
        }

        let loaded = match tokio::time::timeout(self.lookup_timeout, self.source.load(role_name))
            .await
        {
            Ok(Ok(loaded)) => loaded,
            Ok(Err(err)) => {
                tracing::warn!(error = %err, role = %role_name, "grant lookup failed, denying");
                return None;
            }
            Err(_) => {
                tracing::warn!(role = %role_name, "grant lookup timed out, denying");
                return None;
            }
        };

        let grants = loaded?;

        if let Some(cache) = &self.cache {
            match serde_json::to_string(&grants) {
                Ok(json) => {
                    if let Err(err) = cache
                        .set_with_ttl(&Self::cache_key(role_name), &json, self.snapshot_ttl)
                        .await
                    {
                        tracing::debug!(error = %err, role = %role_name, "snapshot cache write failed");
                    }
                }
                Err(err) => {
                    tracing::warn!(error = %err, role = %role_name, "snapshot not serializable");
                }
            }
        }

        Some(grants)
    }

    /// Drop the cached snapshot for a role. Called after assign/unassign so
    /// the next decision sees the new grant set.
    pub async fn invalidate_role(&self, role_name: &str) {
        if let Some(cache) = &self.cache
            && let Err(err) = cache.del(&Self::cache_key(role_name)).await
        {
            tracing::warn!(error = %err, role = %role_name, "snapshot invalidation failed");
        }
    }

    /// May this identity navigate to the named view at all?
    pub async fn has_view_access(&self, identity: &Identity, view: &str) -> bool {
        match self.role_snapshot(identity).await {
            Some(grants) => grants.has_view(view),
            None => false,
        }
    }

    /// May this identity perform `permission` within `view`?
    pub async fn has_permission(&self, identity: &Identity, view: &str, permission: &str) -> bool {
        match self.role_snapshot(identity).await {
            Some(grants) => grants.has_action(view, permission),
            None => false,
        }
    }

    /// Does any view assigned to this identity's role match the request path?
    pub async fn check_route_access(&self, identity: &Identity, request_path: &str) -> bool {
        match self.role_snapshot(identity).await {
            Some(grants) => grants.allows_route(request_path),
            None => false,
        }
    }

    /// Evaluate many (view, permission) queries with one snapshot load.
    ///
    /// The result has the same length and order as `queries`. Each entry is
    /// what `has_permission` would return for it; entries whose `user_id`
    /// does not match the identity are denied. A failed snapshot load denies
    /// every entry.
    pub async fn evaluate_many(
        &self,
        identity: &Identity,
        queries: &[PermissionQuery],
    ) -> Vec<bool> {
        let Some(grants) = self.role_snapshot(identity).await else {
            return vec![false; queries.len()];
        };

        queries
            .iter()
            .map(|q| {
                q.user_id == identity.user_id && grants.has_action(&q.view, &q.permission)
            })
            .collect()
    }
}

impl std::fmt::Debug for AuthzEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthzEvaluator")
            .field("snapshot_ttl", &self.snapshot_ttl)
            .field("lookup_timeout", &self.lookup_timeout)
            .field("cached", &self.cache.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::services::authz::route_pattern::RoutePattern;
    use crate::services::authz::store::{ActionGrant, GrantSourceError, ViewGrant};
    use crate::services::cache::CacheResult;

    struct MemSource {
        roles: Mutex<HashMap<String, RoleGrants>>,
        fail: std::sync::atomic::AtomicBool,
        loads: AtomicUsize,
        delay: Option<Duration>,
    }

    impl MemSource {
        fn new(roles: Vec<RoleGrants>) -> Self {
            Self {
                roles: Mutex::new(
                    roles
                        .into_iter()
                        .map(|g| (g.role_name.clone(), g))
                        .collect(),
                ),
                fail: false.into(),
                loads: AtomicUsize::new(0),
                delay: None,
            }
        }
    }

    #[async_trait]
    impl GrantSource for MemSource {
        async fn load(&self, role_name: &str) -> Result<Option<RoleGrants>, GrantSourceError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail.load(Ordering::SeqCst) {
                return Err(GrantSourceError::Backend("store unavailable".into()));
            }
            Ok(self.roles.lock().unwrap().get(role_name).cloned())
        }
    }

    struct MemCache {
        entries: Mutex<HashMap<String, String>>,
    }

    impl MemCache {
        fn new() -> Self {
            Self {
                entries: Mutex::new(HashMap::new()),
            }
        }
    }

    #[async_trait]
    impl CacheClient for MemCache {
        fn backend_name(&self) -> &'static str {
            "mem"
        }

        async fn get_string(&self, key: &str) -> CacheResult<Option<String>> {
            Ok(self.entries.lock().unwrap().get(key).cloned())
        }

        async fn set_with_ttl(
            &self,
            key: &str,
            value: &str,
            _ttl: Duration,
        ) -> CacheResult<()> {
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn del(&self, key: &str) -> CacheResult<u64> {
            Ok(self.entries.lock().unwrap().remove(key).map_or(0, |_| 1))
        }
    }

    fn vendedor_grants() -> RoleGrants {
        RoleGrants {
            role_name: "vendedor".into(),
            views: vec![ViewGrant {
                name: "leads".into(),
                route: RoutePattern::compile("/leads"),
            }],
            actions: vec![
                ActionGrant {
                    view: "leads".into(),
                    permission: "read".into(),
                },
                ActionGrant {
                    view: "leads".into(),
                    permission: "update".into(),
                },
            ],
        }
    }

    fn evaluator(source: Arc<MemSource>, cache: Option<Arc<dyn CacheClient>>) -> AuthzEvaluator {
        AuthzEvaluator::new(
            source,
            cache,
            Duration::from_secs(30),
            Duration::from_millis(200),
        )
    }

    fn vendedor_identity() -> Identity {
        Identity::new(Uuid::new_v4(), Some("vendedor".into()))
    }

    #[tokio::test]
    async fn view_granted_but_action_missing() {
        let source = Arc::new(MemSource::new(vec![vendedor_grants()]));
        let eval = evaluator(source, None);
        let identity = vendedor_identity();

        assert!(eval.has_view_access(&identity, "leads").await);
        assert!(eval.has_permission(&identity, "leads", "read").await);
        assert!(!eval.has_permission(&identity, "leads", "delete").await);
    }

    #[tokio::test]
    async fn missing_role_claim_denies_everything() {
        let source = Arc::new(MemSource::new(vec![vendedor_grants()]));
        let eval = evaluator(source, None);
        let identity = Identity::new(Uuid::new_v4(), None);

        assert!(!eval.has_view_access(&identity, "leads").await);
        assert!(!eval.has_permission(&identity, "leads", "read").await);
        assert!(!eval.check_route_access(&identity, "/leads").await);
    }

    #[tokio::test]
    async fn unknown_role_denies_everything() {
        let source = Arc::new(MemSource::new(vec![vendedor_grants()]));
        let eval = evaluator(source, None);
        let identity = Identity::new(Uuid::new_v4(), Some("contador".into()));

        assert!(!eval.has_view_access(&identity, "leads").await);
        assert!(!eval.check_route_access(&identity, "/leads").await);
    }

    #[tokio::test]
    async fn backend_failure_denies_instead_of_erroring() {
        let source = Arc::new(MemSource::new(vec![vendedor_grants()]));
        source.fail.store(true, Ordering::SeqCst);
        let eval = evaluator(source, None);
        let identity = vendedor_identity();

        assert!(!eval.has_view_access(&identity, "leads").await);
        assert!(!eval.has_permission(&identity, "leads", "read").await);
    }

    #[tokio::test]
    async fn slow_backend_is_a_denial() {
        let mut source = MemSource::new(vec![vendedor_grants()]);
        source.delay = Some(Duration::from_millis(50));
        let eval = AuthzEvaluator::new(
            Arc::new(source),
            None,
            Duration::from_secs(30),
            Duration::from_millis(5),
        );

        assert!(!eval.has_view_access(&vendedor_identity(), "leads").await);
    }

    #[tokio::test]
    async fn route_access_follows_assigned_views() {
        let mut grants = vendedor_grants();
        grants.views.push(ViewGrant {
            name: "companias-editar".into(),
            route: RoutePattern::compile("/companias/*/editar"),
        });
        let source = Arc::new(MemSource::new(vec![grants]));
        let eval = evaluator(source, None);
        let identity = vendedor_identity();

        assert!(eval.check_route_access(&identity, "/leads").await);
        assert!(eval.check_route_access(&identity, "/companias/7/editar").await);
        assert!(!eval.check_route_access(&identity, "/polizas").await);
    }

    #[tokio::test]
    async fn batch_matches_individual_decisions_in_order() {
        let source = Arc::new(MemSource::new(vec![vendedor_grants()]));
        let eval = evaluator(Arc::clone(&source), None);
        let identity = vendedor_identity();

        let queries: Vec<PermissionQuery> = [
            ("leads", "read"),
            ("leads", "delete"),
            ("leads", "update"),
            ("polizas", "read"),
        ]
        .iter()
        .map(|(v, p)| PermissionQuery {
            user_id: identity.user_id,
            view: (*v).into(),
            permission: (*p).into(),
        })
        .collect();

        let results = eval.evaluate_many(&identity, &queries).await;
        assert_eq!(results, vec![true, false, true, false]);

        // single aggregated lookup for the whole batch
        assert_eq!(source.loads.load(Ordering::SeqCst), 1);

        for (q, batch) in queries.iter().zip(&results) {
            let single = eval.has_permission(&identity, &q.view, &q.permission).await;
            assert_eq!(single, *batch);
        }
    }

    #[tokio::test]
    async fn batch_user_mismatch_denies_that_entry() {
        let source = Arc::new(MemSource::new(vec![vendedor_grants()]));
        let eval = evaluator(source, None);
        let identity = vendedor_identity();

        let queries = vec![
            PermissionQuery {
                user_id: identity.user_id,
                view: "leads".into(),
                permission: "read".into(),
            },
            PermissionQuery {
                user_id: Uuid::new_v4(),
                view: "leads".into(),
                permission: "read".into(),
            },
        ];

        let results = eval.evaluate_many(&identity, &queries).await;
        assert_eq!(results, vec![true, false]);
    }

    #[tokio::test]
    async fn batch_backend_failure_yields_all_false_of_input_length() {
        let source = Arc::new(MemSource::new(vec![vendedor_grants()]));
        source.fail.store(true, Ordering::SeqCst);
        let eval = evaluator(source, None);
        let identity = vendedor_identity();

        let queries: Vec<PermissionQuery> = (0..5)
            .map(|i| PermissionQuery {
                user_id: identity.user_id,
                view: "leads".into(),
                permission: format!("p{i}"),
            })
            .collect();

        let results = eval.evaluate_many(&identity, &queries).await;
        assert_eq!(results, vec![false; 5]);
    }

    #[tokio::test]
    async fn cached_snapshot_is_reused_until_invalidated() {
        let source = Arc::new(MemSource::new(vec![vendedor_grants()]));
        let cache: Arc<dyn CacheClient> = Arc::new(MemCache::new());
        let eval = evaluator(Arc::clone(&source), Some(cache));
        let identity = vendedor_identity();

        assert!(eval.has_permission(&identity, "leads", "read").await);
        assert_eq!(source.loads.load(Ordering::SeqCst), 1);

        // admin removes the grant behind our back
        source
            .roles
            .lock()
            .unwrap()
            .get_mut("vendedor")
            .unwrap()
            .actions
            .clear();

        // still served from the cached snapshot
        assert!(eval.has_permission(&identity, "leads", "read").await);
        assert_eq!(source.loads.load(Ordering::SeqCst), 1);

        eval.invalidate_role("vendedor").await;

        assert!(!eval.has_permission(&identity, "leads", "read").await);
        assert_eq!(source.loads.load(Ordering::SeqCst), 2);
    }
}
