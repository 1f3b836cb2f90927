/*
 * Responsibility
 * - tracing / panic hook の初期化
 * - Config読み込み → DB 接続 + migration → 依存生成 → Router 組み立て
 * - Middleware の適用 (rescue → bootstrap → format_suffix → http → cors の順に外側へ)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api,
    config::{Config, HttpLimits},
    middleware,
    repos::{PgSessionStore, PgSettingsStore, PgUserStore},
    services::{archive::ArchiveConfigSource, mail::LogMailer},
    state::{AppState, Stores},
};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,sensor_portal=debug,tower_http=debug cargo run
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
        tracing::error!(?info, "panic");

        // Development: fail fast. Production: default behavior, keep serving.
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
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting portal in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config.http);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("connecting to DATABASE_URL")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("running migrations")?;

    let stores = Stores {
        settings: Arc::new(PgSettingsStore::new(pool.clone())),
        users: Arc::new(PgUserStore::new(pool.clone())),
        sessions: Arc::new(PgSessionStore::new(pool)),
    };

    let archive = ArchiveConfigSource::new(config.archive_config_path.clone());
    tracing::info!(path = %archive.path().display(), "archive configuration is reloaded per request");

    Ok(AppState::new(
        stores,
        Arc::new(LogMailer),
        archive,
        &config.session_cookie_name,
        config.app_env,
    ))
}

/// The served stack: application routes, HTTP limits, then the CORS header
/// outermost so it also covers limit and timeout responses.
pub fn build_router(state: AppState, limits: &HttpLimits) -> Router {
    let app = middleware::http::apply(router(state), limits);
    middleware::cors::apply(app)
}

/// Application routes with the request bootstrap and boundary responders.
pub fn router(state: AppState) -> Router {
    let app = Router::new()
        .route("/about", get(api::about::about))
        .nest("/api/v1", api::v1::routes());

    let app = middleware::rescue::apply(app, state.clone());
    let app = middleware::bootstrap::apply(app, state.clone());

    middleware::format_suffix::apply(app.with_state(state))
}
