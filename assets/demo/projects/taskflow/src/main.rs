use anyhow::Result;
use axum::{middleware, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

mod auth;
mod cache;
mod db;
mod tasks;
mod api {
    pub mod middleware;
    pub mod routes;
}

use crate::api::middleware::{rate_limit_layer, require_auth};

#[derive(Clone)]
pub struct AppState {
    pub db: db::Pool,
    pub config: Arc<Config>,
    pub cache: cache::Cache,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("taskflow=debug,tower_http=info")
        .init();

    let config = Arc::new(Config::load("config/default.toml")?);
    let db = db::connect(&config.database.path).await?;
    db::migrate(&db).await?;

    let cache = cache::Cache::new(config.cache.max_entries, config.cache.ttl_secs);
    let state = AppState { db, config: config.clone(), cache };

    let app = Router::new()
        .merge(api::routes::router())
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .layer(rate_limit_layer(config.rate_limit.requests_per_minute))
        .with_state(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("taskflow listening on {addr}");
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
