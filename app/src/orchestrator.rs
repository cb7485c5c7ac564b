use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::appwrite::CounterStore;
use crate::error::SearchError;
use crate::models::{MediaItem, Movie, Series};
use crate::tmdb::{CatalogApi, Listing};

/// Runs one catalog search across movies and series.
///
/// Holds no per-search state; callers decide which result is current.
#[derive(Clone)]
pub struct CatalogService {
    catalog: Arc<dyn CatalogApi>,
    counter: Arc<dyn CounterStore>,
}

impl CatalogService {
    pub fn new(catalog: Arc<dyn CatalogApi>, counter: Arc<dyn CounterStore>) -> Self {
        Self { catalog, counter }
    }

    pub fn counter(&self) -> &Arc<dyn CounterStore> {
        &self.counter
    }

    /// Browse current listings for an empty query, search both catalogs otherwise.
    pub async fn fetch_catalog(&self, query: &str) -> Result<Vec<MediaItem>, SearchError> {
        debug!("Fetching catalog for query '{}'", query);

        let (movies, series) = tokio::join!(self.catalog.movies(query), self.catalog.series(query));

        let (movies, series) = match (movies, series) {
            (Ok(movies), Ok(series)) => (movies, series),
            (Err(e), _) | (_, Err(e)) => {
                error!("Error fetching movies and series: {:#}", e);
                return Err(SearchError::Transport(e.to_string()));
            }
        };

        if !movies.is_ok() && !series.is_ok() {
            warn!("Both catalog requests failed for query '{}'", query);
            return Err(SearchError::FetchFailure);
        }

        let combined = merge(movies, series);
        if combined.is_empty() {
            return Err(SearchError::EmptyResult);
        }

        if !query.is_empty() {
            self.spawn_record_search(query, &combined[0]);
        }

        Ok(combined)
    }

    fn spawn_record_search(&self, query: &str, top: &MediaItem) {
        let counter = Arc::clone(&self.counter);
        let term = query.to_string();
        let top = top.clone();

        tokio::spawn(async move {
            match counter.record_search(&term, &top).await {
                Ok(()) => info!("Recorded search '{}' -> {} {}", term, top.kind(), top.id()),
                Err(e) => error!("Failed to record search '{}': {:#}", term, e),
            }
        });
    }
}

/// Movies first, then series, each tagged with its media type.
pub fn merge(movies: Listing<Movie>, series: Listing<Series>) -> Vec<MediaItem> {
    movies
        .into_results()
        .into_iter()
        .map(MediaItem::Movie)
        .chain(series.into_results().into_iter().map(MediaItem::Tv))
        .collect()
}
