//! Normalization of request bodies into movie records.
//!
//! Input is never rejected. Each recognized field is coerced to its column
//! type and missing or unusable values fall back to a fixed default:
//!
//! | field         | default |
//! |---------------|---------|
//! | `title`       | `""`    |
//! | `description` | `""`    |
//! | `plot`        | `""`    |
//! | `actors`      | `""`    |
//! | `rating`      | `0`     |
//! | `poster_url`  | `""`    |
//! | `reviews`     | `[]`    |
//!
//! Anything else in the body is ignored. Keeping this separate from the store
//! lets validation be tightened without touching persistence.

use serde::Serialize;
use serde_json::Value;

use crate::models::{Movie, Review};

/// The mutable fields of a movie after normalization.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MovieInput {
    pub title: String,
    pub description: String,
    pub plot: String,
    pub actors: String,
    pub rating: f64,
    pub reviews: Vec<Review>,
    pub poster_url: String,
}

impl MovieInput {
    pub const FIELDS: [&'static str; 7] =
        ["title", "description", "plot", "actors", "rating", "poster_url", "reviews"];

    pub fn from_json(body: &Value) -> Self {
        if let Some(obj) = body.as_object() {
            for key in obj.keys().filter(|k| *k != "id" && !Self::FIELDS.contains(&k.as_str())) {
                tracing::debug!(field = %key, "ignoring unrecognized movie field");
            }
        }

        let text = |key: &str| body.get(key).map(text_value).unwrap_or_default();

        let reviews = match body.get("reviews") {
            Some(Value::Array(items)) => items.iter().filter_map(Review::from_json).collect(),
            _ => Vec::new(),
        };

        Self {
            title: text("title"),
            description: text("description"),
            plot: text("plot"),
            actors: text("actors"),
            rating: fixed_point(body.get("rating").map(float_value).unwrap_or(0.0)),
            reviews,
            poster_url: text("poster_url"),
        }
    }
}

impl From<&Movie> for MovieInput {
    fn from(movie: &Movie) -> Self {
        Self {
            title: movie.title.clone(),
            description: movie.description.clone(),
            plot: movie.plot.clone(),
            actors: movie.actors.clone(),
            rating: movie.rating,
            reviews: movie.reviews.clone(),
            poster_url: movie.poster_url.clone(),
        }
    }
}

/// Parses a request body; anything that is not JSON reads as `null`.
pub fn parse_body(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap_or(Value::Null)
}

/// The `id` member of a body, or 0 when absent or unusable.
pub fn id_from_json(body: &Value) -> i32 {
    let id = body.get("id").map(int_value).unwrap_or(0);
    i32::try_from(id).unwrap_or(0)
}

pub fn text_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "1".to_string(),
        _ => String::new(),
    }
}

pub fn float_value(value: &Value) -> f64 {
    let n = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => leading_float(s),
        Value::Bool(b) => f64::from(u8::from(*b)),
        _ => 0.0,
    };
    if n.is_finite() { n } else { 0.0 }
}

pub fn int_value(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => coerce_int(s),
        Value::Bool(b) => i64::from(*b),
        _ => 0,
    }
}

/// Integer prefix of `s` ("12abc" is 12, "abc" is 0). Saturates on overflow.
pub fn coerce_int(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut out: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        let d = i64::from(b - b'0');
        out = out.saturating_mul(10).saturating_add(d);
    }
    if negative { -out } else { out }
}

/// Numeric prefix of `s` as a float, the way `parseFloat` reads form input.
pub fn leading_float(s: &str) -> f64 {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }

    if digits == 0 {
        return 0.0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().unwrap_or(0.0)
}

/// Rounds to the one decimal place the rating column keeps. Values too large
/// to scale are already whole and are kept as given.
fn fixed_point(rating: f64) -> f64 {
    let rounded = (rating * 10.0).round() / 10.0;
    if rounded.is_finite() { rounded } else { rating }
}
