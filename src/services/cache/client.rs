/*
 * Responsibility
 * - Minimal cache interface used by the authz evaluator (grant snapshots)
 * - Object-safe so state can hold `Arc<dyn CacheClient>`
 * - Kept independent from AppError: callers decide how to fail
 */
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

pub type CacheResult<T> = Result<T, CacheError>;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache connection error: {0}")]
    BackendConnection(String),
    #[error("cache command error: {0}")]
    BackendCommand(String),
}

/// A minimal, string-based cache interface.
///
/// Grant snapshots are small JSON blobs; `set_with_ttl` overwrites
/// unconditionally because a fresh snapshot always supersedes a stale one.
/// `del` is the invalidation hook the assignment mutations call.
#[async_trait]
pub trait CacheClient: Send + Sync + 'static {
    // Backend name for logging.
    fn backend_name(&self) -> &'static str;

    async fn get_string(&self, key: &str) -> CacheResult<Option<String>>;

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()>;

    // Delete a key. Returns number of deleted keys.
    async fn del(&self, key: &str) -> CacheResult<u64>;
}

/// Convenience helper to build a TTL from seconds.
pub fn ttl_seconds(seconds: u64) -> Duration {
    Duration::from_secs(seconds)
}
