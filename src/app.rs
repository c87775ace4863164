/*
 * Responsibility
 * - Config読み込み → 依存生成 → Router 組み立て
 * - Middleware の適用 (HTTP 共通 / JWT 認証フィルタ)
 * - axum::serve() で起動 (ConnectInfo 付き)
 */
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api,
    config::{AppEnv, Config, HttpConfig},
    middleware,
    services::{auth::JwtTokenService, directory::PgUserDirectory},
    state::AppState,
};

fn init_tracing(app_env: AppEnv) {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,jwt_auth_filter=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        // production logs go to collectors: no ANSI colors
        .with(tracing_subscriber::fmt::layer().with_ansi(!app_env.is_production()))
        .init();
}

pub async fn run() -> Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.app_env);

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config.http);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    // ConnectInfo を有効にして、認証 details に remote address を載せる
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    let db = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!().run(&db).await?;

    let tokens = JwtTokenService::new(&config.jwt_secret, config.jwt_leeway_seconds);
    let users = PgUserDirectory::new(db);

    Ok(AppState::new(Arc::new(tokens), Arc::new(users)))
}

/// Assemble the full application router.
///
/// The JWT filter wraps every `/api/v1` route; the HTTP layers wrap everything.
pub fn build_router(state: AppState, http: &HttpConfig) -> Router {
    let v1 = middleware::auth::jwt_filter::apply(api::v1::routes(), state.clone());

    let router = Router::new().nest("/api/v1", v1).with_state(state);

    middleware::http::apply(router, http)
}
