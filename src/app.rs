/*
 * Responsibility
 * - Config loading -> dependency construction -> Router assembly
 * - Middleware application (HTTP infra, CORS, bearer auth on /api/v1)
 * - axum::serve() startup
 */
use anyhow::{Context, Result};
use axum::{Router, routing::get};
use sqlx::postgres::PgPoolOptions;
use std::{panic, process, sync::Arc, time::Duration};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::api::v1::handlers::health::health;
use crate::config::Config;
use crate::middleware;
use crate::services::auth::AuthService;
use crate::services::authz::{AuthzEvaluator, NavigationTree, PgGrantSource};
use crate::services::cache::{CacheClient, ValkeyClient, ttl_seconds};
use crate::services::id_codec::IdCodec;
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,corredora_authz=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Always surface panics via tracing so they don't get "lost"
        // (stderr can be hidden depending on how the process is launched.)
        tracing::error!(?info, "panic");

        // In development, fail fast: crash the whole process so we notice immediately.
        // In production, prefer the default behavior (stderr) and let the server keep running.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    let abort_on_panic = !config.app_env.is_production();
    init_panic_hook(abort_on_panic);

    tracing::info!(
        "starting authz API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    let db = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("connecting to postgres")?;

    let id_codec = IdCodec::new(config.sqids_min_length, &config.sqids_alphabet)?;

    let auth = Arc::new(
        AuthService::new(
            &config.access_jwt_public_key_pem,
            &config.auth_issuer,
            &config.auth_audience,
            config.access_token_leeway_seconds,
        )
        .map_err(anyhow::Error::msg)?,
    );

    let cache: Option<Arc<dyn CacheClient>> = match &config.valkey_url {
        Some(url) => {
            let client = ValkeyClient::new(url)
                .await
                .context("connecting to valkey")?;
            Some(Arc::new(client))
        }
        None => {
            tracing::warn!("VALKEY_URL not set; grant snapshots are not cached");
            None
        }
    };

    let authz = AuthzEvaluator::new(
        Arc::new(PgGrantSource::new(db.clone())),
        cache,
        ttl_seconds(config.grant_cache_ttl_seconds),
        Duration::from_millis(config.grant_lookup_timeout_ms),
    );

    let nav_tree = match &config.nav_tree_path {
        Some(path) => {
            NavigationTree::from_json_file(path).context("loading navigation tree")?
        }
        None => NavigationTree::default_brokerage(),
    };

    Ok(AppState::new(
        db,
        id_codec,
        auth,
        authz,
        Arc::new(nav_tree),
    ))
}

fn build_router(state: AppState, config: &Config) -> Router {
    let v1 = middleware::auth::access::apply(api::v1::routes(), state.clone());

    let router = Router::new()
        .route("/health", get(health))
        .nest("/api/v1", v1)
        .with_state(state);

    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router)
}
