use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    entities::movie,
    input::{self, MovieInput},
};

/// A single free-text review embedded in a movie's `reviews` column.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub date: String,
}

impl Review {
    /// Builds a review from one element of a stored or submitted array.
    /// Non-object elements are not reviews.
    pub fn from_json(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        Some(Self {
            text: obj.get("text").map(input::text_value).unwrap_or_default(),
            date: obj.get("date").map(input::text_value).unwrap_or_default(),
        })
    }

    /// Timestamp of the review, if `date` parses as one.
    pub fn timestamp(&self) -> Option<Timestamp> {
        self.date.parse().ok()
    }
}

/// A movie as the API returns it and the watchlist pages consume it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub plot: String,
    #[serde(default)]
    pub actors: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub poster_url: String,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

impl From<movie::Model> for Movie {
    fn from(row: movie::Model) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description.unwrap_or_default(),
            plot: row.plot.unwrap_or_default(),
            actors: row.actors.unwrap_or_default(),
            rating: row.rating,
            reviews: decode_reviews(row.reviews.as_deref()),
            poster_url: row.poster_url.unwrap_or_default(),
            created_at: Timestamp::from_second(row.created_at).ok(),
            updated_at: Timestamp::from_second(row.updated_at).ok(),
        }
    }
}

/// Fields of the shared add/edit form as the browser submits them.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct MovieForm {
    pub title: String,
    pub description: String,
    pub plot: String,
    pub actors: String,
    pub rating: String,
    pub poster_url: String,
    /// Local path to return to after a successful save.
    pub redirect: String,
}

impl MovieForm {
    pub fn from_movie(movie: &Movie, redirect: &str) -> Self {
        Self {
            title: movie.title.clone(),
            description: movie.description.clone(),
            plot: movie.plot.clone(),
            actors: movie.actors.clone(),
            rating: movie.rating.to_string(),
            poster_url: movie.poster_url.clone(),
            redirect: redirect.to_string(),
        }
    }

    /// Only coerces: a non-numeric rating becomes 0.
    pub fn to_input(&self, reviews: Vec<Review>) -> MovieInput {
        let rating = input::leading_float(&self.rating);
        MovieInput {
            title: self.title.clone(),
            description: self.description.clone(),
            plot: self.plot.clone(),
            actors: self.actors.clone(),
            rating: if rating.is_finite() { rating } else { 0.0 },
            reviews,
            poster_url: self.poster_url.clone(),
        }
    }

    /// The redirect target, restricted to same-site paths.
    pub fn redirect_path(&self) -> &str {
        let path = self.redirect.as_str();
        if path.starts_with('/') && !path.starts_with("//") { path } else { "/" }
    }
}

/// Decodes the stored `reviews` column.
///
/// NULL, unparseable JSON and non-array documents all read as an empty list;
/// garbage in the column is discarded rather than surfaced as an error.
pub fn decode_reviews(raw: Option<&str>) -> Vec<Review> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items.iter().filter_map(Review::from_json).collect(),
        Ok(_) => Vec::new(),
        Err(err) => {
            tracing::debug!(error = %err, "discarding unparseable reviews column");
            Vec::new()
        },
    }
}

pub fn encode_reviews(reviews: &[Review]) -> String {
    serde_json::to_string(reviews).unwrap_or_else(|_| "[]".to_string())
}
