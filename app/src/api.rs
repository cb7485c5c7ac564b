use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{error::AppError, models::TrendingEntry, session::UiState, AppState};

const MAX_QUERY_LEN: usize = 200;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/input", post(input))
        .route("/catalog", get(catalog))
        .route("/trending", get(trending))
        .route("/state", get(snapshot))
        .with_state(state)
}

#[derive(Deserialize)]
struct InputRequest {
    #[serde(default)]
    q: String,
    /// Client-side keystroke counter; requests can arrive out of order.
    #[serde(default)]
    seq: Option<u64>,
}

#[derive(Deserialize)]
struct CatalogQuery {
    #[serde(default)]
    q: String,
}

pub(crate) fn check_query(q: &str) -> Result<(), AppError> {
    if q.chars().count() > MAX_QUERY_LEN {
        return Err(AppError::BadRequest(format!(
            "Search text is limited to {} characters",
            MAX_QUERY_LEN
        )));
    }
    Ok(())
}

async fn input(
    State(state): State<AppState>,
    Json(body): Json<InputRequest>,
) -> Result<StatusCode, AppError> {
    check_query(&body.q)?;
    if !state.search.input(&body.q, body.seq).await? {
        return Ok(StatusCode::OK);
    }
    Ok(StatusCode::ACCEPTED)
}

/// Runs a search outside the page state. A non-empty query counts as a
/// search and bumps its counter like one typed into the page.
///
/// Search errors are an expected outcome here, not an HTTP failure.
async fn catalog(
    State(state): State<AppState>,
    Query(params): Query<CatalogQuery>,
) -> Result<Json<Value>, AppError> {
    check_query(&params.q)?;
    let body = match state.search.service().fetch_catalog(&params.q).await {
        Ok(items) => json!({ "items": items }),
        Err(e) => json!({ "items": [], "error": e.user_message(), "kind": e.kind() }),
    };
    Ok(Json(body))
}

async fn trending(State(state): State<AppState>) -> Json<Vec<TrendingEntry>> {
    Json(state.search.snapshot().await.trending)
}

async fn snapshot(State(state): State<AppState>) -> Json<UiState> {
    Json(state.search.snapshot().await)
}
