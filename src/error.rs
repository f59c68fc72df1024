use axum::{
    Json,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde_json::json;

/// Errors of the JSON movie resource. The `Display` text is the `error`
/// member of the response body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Movie not found")]
    NotFound,

    #[error("Failed to {action} movie")]
    Write {
        action: &'static str,
        #[source]
        source: sea_orm::DbErr,
    },

    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl ApiError {
    pub fn write(action: &'static str) -> impl FnOnce(sea_orm::DbErr) -> Self {
        move |source| Self::Write { action, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Write { .. } | ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Write { source, .. } | ApiError::Database(source) => {
                tracing::error!(error = %source, "{}", self);
            },
            _ => {},
        }
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Error of the watchlist pages, rendered as an HTML error page.
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for AppError {}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self(err)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        Self(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self.0, "watchlist page failed");
        let body = crate::templates::error_page(&self.to_string());
        (StatusCode::BAD_GATEWAY, Html(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
