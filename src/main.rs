mod api;
mod client;
mod config;
mod db;
mod entities;
mod error;
mod input;
mod models;
mod routes;
mod store;
mod templates;
mod watchlist;

#[cfg(test)]
mod test_support;

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{client::WatchlistApi, config::Config, store::MovieStore};

pub struct AppState {
    pub config: Arc<Config>,
    pub store: MovieStore,
    pub api: WatchlistApi,
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/movies", post(routes::create_movie))
        .route("/movies/{id}", post(routes::update_movie))
        .route("/movies/{id}/delete", post(routes::delete_movie))
        .route("/movie/{id}", get(routes::movie_detail))
        .route("/movie/{id}/reviews", post(routes::add_review))
        .route("/movie/{id}/reviews/{index}/delete", post(routes::delete_review))
        .merge(api::routes())
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,watchlist=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Arc::new(Config::from_env()?);

    let http = reqwest::Client::builder()
        .user_agent("watchlist/0.1")
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()?;

    let db = db::connect_and_migrate(&config).await?;
    let store = MovieStore::new(db);
    let api = WatchlistApi::new(http, config.api_url.clone());

    let state = Arc::new(AppState { config: config.clone(), store, api });

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, api_url = %config.api_url, "listening");
    axum::serve(listener, app(state)).await?;

    Ok(())
}
