use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::debounce::Debouncer;
use crate::error::SearchError;
use crate::models::{MediaItem, TrendingEntry};
use crate::orchestrator::CatalogService;
use crate::trending::load_trending;

/// Everything the page renders from.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UiState {
    pub search_term: String,
    pub debounced_term: String,
    pub items: Vec<MediaItem>,
    pub loading: bool,
    #[serde(serialize_with = "serialize_error")]
    pub error: Option<SearchError>,
    pub trending: Vec<TrendingEntry>,
    /// Set once the startup trending load has finished, even if it came back empty.
    pub trending_ready: bool,
    /// Highest client input sequence accepted so far.
    pub input_seq: u64,
}

impl UiState {
    /// No search is running or waiting on the debouncer.
    pub fn is_settled(&self) -> bool {
        !self.loading && self.debounced_term == self.search_term
    }
}

fn serialize_error<S: serde::Serializer>(
    error: &Option<SearchError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match error {
        Some(e) => serializer.serialize_some(e.user_message()),
        None => serializer.serialize_none(),
    }
}

/// Owns the UI state and decides which search result is current.
pub struct SearchController {
    service: CatalogService,
    state: RwLock<UiState>,
    latest: AtomicU64,
    debouncer: Debouncer<String>,
}

impl SearchController {
    /// Spawns the task that turns settled input into searches.
    pub fn start(service: CatalogService, debounce: Duration) -> Arc<Self> {
        let (debouncer, mut settled) = Debouncer::new(debounce);
        let controller = Arc::new(Self {
            service,
            state: RwLock::new(UiState::default()),
            latest: AtomicU64::new(0),
            debouncer,
        });

        let weak = Arc::downgrade(&controller);
        tokio::spawn(async move {
            while let Some(term) = settled.recv().await {
                let Some(controller) = weak.upgrade() else {
                    break;
                };
                if controller.state.read().await.debounced_term == term {
                    debug!("Settled input '{}' unchanged, not searching", term);
                    continue;
                }
                // Searches overlap; each one checks its own sequence number.
                tokio::spawn(async move {
                    controller.search(&term).await;
                });
            }
            debug!("Search input loop stopped");
        });

        controller
    }

    /// Records a keystroke; the search runs once input settles.
    ///
    /// Sequenced input older than the last accepted one is dropped and
    /// `Ok(false)` is returned. Unsequenced input is always accepted.
    pub async fn input(&self, text: &str, seq: Option<u64>) -> anyhow::Result<bool> {
        let mut state = self.state.write().await;
        if let Some(seq) = seq {
            if seq <= state.input_seq {
                debug!("Dropping out-of-order input #{} '{}'", seq, text);
                return Ok(false);
            }
            state.input_seq = seq;
        }
        state.search_term = text.to_string();
        // Pushed under the lock so the debouncer sees inputs in acceptance order.
        self.debouncer.push(text.to_string())?;
        Ok(true)
    }

    /// Sets the search text and searches without waiting for input to settle.
    pub async fn input_now(&self, text: &str) {
        self.state.write().await.search_term = text.to_string();
        self.search(text).await;
    }

    /// Runs a search now and applies it unless a newer search has started since.
    pub async fn search(&self, query: &str) {
        // Numbered under the lock so `debounced_term` always names the newest search.
        let seq = {
            let mut state = self.state.write().await;
            let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
            state.debounced_term = query.to_string();
            state.loading = true;
            state.error = None;
            seq
        };

        let outcome = self.service.fetch_catalog(query).await;

        let mut state = self.state.write().await;
        if self.latest.load(Ordering::SeqCst) != seq {
            debug!("Discarding stale results for '{}' (search #{})", query, seq);
            return;
        }

        match outcome {
            Ok(items) => {
                info!("Search '{}' returned {} items", query, items.len());
                state.items = items;
            }
            Err(SearchError::EmptyResult) => {
                state.items.clear();
                state.error = Some(SearchError::EmptyResult);
            }
            Err(e) => {
                state.error = Some(e);
            }
        }
        state.loading = false;
    }

    pub async fn refresh_trending(&self, limit: usize) {
        let trending = load_trending(self.service.counter().as_ref(), limit).await;
        let mut state = self.state.write().await;
        state.trending = trending;
        state.trending_ready = true;
    }

    pub async fn snapshot(&self) -> UiState {
        self.state.read().await.clone()
    }

    pub fn service(&self) -> &CatalogService {
        &self.service
    }
}
