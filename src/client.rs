use anyhow::Context;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{error::AppResult, input::MovieInput, models::Movie};

/// HTTP client for the movie API; the watchlist pages never touch the store
/// directly.
#[derive(Clone)]
pub struct WatchlistApi {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct Created {
    id: i32,
}

#[derive(Serialize)]
struct UpdateBody<'a> {
    id: i32,
    #[serde(flatten)]
    movie: &'a MovieInput,
}

impl WatchlistApi {
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    pub async fn list(&self) -> AppResult<Vec<Movie>> {
        let movies = self
            .client
            .get(&self.base_url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(movies)
    }

    /// `None` when the API answers 404.
    pub async fn get(&self, id: i32) -> AppResult<Option<Movie>> {
        let resp = self.client.get(&self.base_url).query(&[("id", id)]).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let movie = resp.error_for_status()?.json().await?;
        Ok(Some(movie))
    }

    pub async fn create(&self, movie: &MovieInput) -> AppResult<i32> {
        let created: Created = self
            .client
            .post(&self.base_url)
            .json(movie)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .context("create response")?;
        Ok(created.id)
    }

    pub async fn update(&self, id: i32, movie: &MovieInput) -> AppResult<()> {
        self.client
            .put(&self.base_url)
            .json(&UpdateBody { id, movie })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.client
            .delete(&self.base_url)
            .json(&json!({ "id": id }))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
