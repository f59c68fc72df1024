use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{RawQuery, State},
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use tracing::{info, warn};

use crate::{
    AppState,
    error::ApiError,
    input::{self, MovieInput},
};

pub const MOVIES_PATH: &str = "/api/movies";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route(
        MOVIES_PATH,
        get(list_or_get).post(create).put(update).delete(delete).fallback(method_not_allowed),
    )
}

/// The last `id` in a query string. Repeated keys never reject the request.
fn query_id(query: Option<&str>) -> Option<String> {
    query?
        .split('&')
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(key) == "id").then(|| decode_component(value))
        })
        .last()
}

fn decode_component(raw: &str) -> String {
    let raw = raw.replace('+', " ");
    urlencoding::decode(&raw).map(|s| s.into_owned()).unwrap_or(raw)
}

async fn list_or_get(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Result<Response, ApiError> {
    let Some(raw_id) = query_id(query.as_deref()) else {
        let movies = state.store.list().await?;
        return Ok(Json(movies).into_response());
    };

    let id = i32::try_from(input::coerce_int(&raw_id)).unwrap_or(0);
    match state.store.get(id).await? {
        Some(movie) => Ok(Json(movie).into_response()),
        None => Err(ApiError::NotFound),
    }
}

async fn create(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Response, ApiError> {
    let movie = MovieInput::from_json(&input::parse_body(&body));
    let id = state.store.create(&movie).await.map_err(ApiError::write("add"))?;

    info!(id = id, title = %movie.title, "movie created");
    Ok(Json(json!({ "success": true, "id": id })).into_response())
}

async fn update(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Response, ApiError> {
    let body = input::parse_body(&body);
    let id = input::id_from_json(&body);
    let movie = MovieInput::from_json(&body);

    let rows_affected = state.store.update(id, &movie).await.map_err(ApiError::write("update"))?;
    if rows_affected == 0 {
        warn!(id = id, "update matched no movie");
    } else {
        info!(id = id, reviews = movie.reviews.len(), "movie updated");
    }

    Ok(Json(json!({ "success": true })).into_response())
}

async fn delete(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Response, ApiError> {
    let id = input::id_from_json(&input::parse_body(&body));

    let rows_affected = state.store.delete(id).await.map_err(ApiError::write("delete"))?;
    if rows_affected == 0 {
        warn!(id = id, "delete matched no movie");
    } else {
        info!(id = id, "movie deleted");
    }

    Ok(Json(json!({ "success": true })).into_response())
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
