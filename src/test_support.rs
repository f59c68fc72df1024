use std::{net::SocketAddr, sync::Arc};

use tempfile::TempDir;

use crate::{AppState, client::WatchlistApi, config::Config, db, store::MovieStore};

pub fn config(dir: &TempDir, addr: SocketAddr) -> Config {
    Config {
        addr,
        database_url: format!("sqlite://{}?mode=rwc", dir.path().join("watchlist.db").display()),
        db_max_connections: 2,
        api_url: format!("http://{addr}/api/movies"),
        http_timeout_secs: 5,
    }
}

pub async fn store() -> (TempDir, MovieStore) {
    let dir = TempDir::new().unwrap();
    let config = config(&dir, "127.0.0.1:0".parse().unwrap());
    let db = db::connect_and_migrate(&config).await.unwrap();
    (dir, MovieStore::new(db))
}

pub async fn state_with(config: Config) -> Arc<AppState> {
    let db = db::connect_and_migrate(&config).await.unwrap();
    let api = WatchlistApi::new(reqwest::Client::new(), config.api_url.clone());
    Arc::new(AppState { config: Arc::new(config), store: MovieStore::new(db), api })
}

/// Serves the whole app on an ephemeral port. Returns the base URL.
pub async fn spawn_app() -> (TempDir, String, Arc<AppState>) {
    let dir = TempDir::new().unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let state = state_with(config(&dir, addr)).await;
    let app = crate::app(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (dir, format!("http://{addr}"), state)
}
