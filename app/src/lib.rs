use axum::{
    extract::{Query, State},
    response::Html,
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

pub mod api;
pub mod appwrite;
pub mod config;
pub mod debounce;
pub mod error;
pub mod models;
pub mod onboarding;
pub mod orchestrator;
pub mod session;
pub mod templates;
pub mod tmdb;
pub mod trending;

use crate::error::AppError;
use crate::session::SearchController;

#[derive(Clone)]
pub struct AppState {
    pub search: Arc<SearchController>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home_page))
        .route("/search", get(search_page))
        .route("/fragment/results", get(results_fragment))
        .route("/fragment/trending", get(trending_fragment))
        .route("/health", get(health))
        .nest("/api", api::routes(state.clone()))
        .nest_service("/static", ServeDir::new("app/static"))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn home_page(State(state): State<AppState>) -> Html<String> {
    let snapshot = state.search.snapshot().await;
    Html(templates::render_index(&snapshot))
}

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
}

/// Script-free fallback: runs the search immediately instead of debouncing.
async fn search_page(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Html<String>, AppError> {
    api::check_query(&params.q)?;
    state.search.input_now(&params.q).await;

    let snapshot = state.search.snapshot().await;
    Ok(Html(templates::render_index(&snapshot)))
}

async fn results_fragment(State(state): State<AppState>) -> Html<String> {
    let snapshot = state.search.snapshot().await;
    Html(templates::render_results(&snapshot))
}

async fn trending_fragment(State(state): State<AppState>) -> Html<String> {
    let snapshot = state.search.snapshot().await;
    Html(templates::render_trending(&snapshot.trending))
}
