use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Why a catalog search produced no list to show.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("both catalog requests failed")]
    FetchFailure,

    #[error("no results")]
    EmptyResult,

    #[error("transport error: {0}")]
    Transport(String),
}

impl SearchError {
    pub fn user_message(&self) -> &'static str {
        match self {
            SearchError::FetchFailure => "Failed to fetch movies and series",
            SearchError::EmptyResult => "No movies or series found!",
            SearchError::Transport(_) => {
                "Error fetching movies and series. Please try again later."
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SearchError::FetchFailure => "fetch_failure",
            SearchError::EmptyResult => "empty_result",
            SearchError::Transport(_) => "transport_error",
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalWithMessage(String),
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithMessage(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message): (StatusCode, String) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::InternalWithMessage(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Internal error: {}", msg),
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
