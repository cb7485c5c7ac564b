#![allow(dead_code)]

use reelfinder::appwrite::CounterStore;
use reelfinder::models::{MediaItem, Movie, SearchRecord, Series};
use reelfinder::tmdb::{CatalogApi, Listing};
use reqwest::StatusCode;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Clone)]
pub struct Canned {
    pub movies: Result<Listing<Movie>, String>,
    pub series: Result<Listing<Series>, String>,
    pub delay: Duration,
}

impl Canned {
    pub fn ok(movies: Vec<Movie>, series: Vec<Series>) -> Self {
        Self {
            movies: Ok(Listing::Ok(movies)),
            series: Ok(Listing::Ok(series)),
            delay: Duration::ZERO,
        }
    }

    pub fn failed() -> Self {
        Self {
            movies: Ok(Listing::Failed(StatusCode::UNAUTHORIZED)),
            series: Ok(Listing::Failed(StatusCode::UNAUTHORIZED)),
            delay: Duration::ZERO,
        }
    }

    pub fn transport_error() -> Self {
        Self {
            movies: Err("connection refused".to_string()),
            series: Ok(Listing::Ok(Vec::new())),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Catalog answering from canned responses keyed by query.
#[derive(Default)]
pub struct FakeCatalog {
    pub responses: Mutex<HashMap<String, Canned>>,
    pub queries: Mutex<Vec<String>>,
}

impl FakeCatalog {
    pub fn with(query: &str, canned: Canned) -> Self {
        let catalog = Self::default();
        catalog.set(query, canned);
        catalog
    }

    pub fn set(&self, query: &str, canned: Canned) {
        self.responses
            .lock()
            .unwrap()
            .insert(query.to_string(), canned);
    }

    fn canned(&self, query: &str) -> Canned {
        self.responses
            .lock()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or_else(|| Canned::ok(Vec::new(), Vec::new()))
    }
}

#[async_trait::async_trait]
impl CatalogApi for FakeCatalog {
    async fn movies(&self, query: &str) -> anyhow::Result<Listing<Movie>> {
        self.queries.lock().unwrap().push(format!("movie:{}", query));
        let canned = self.canned(query);
        tokio::time::sleep(canned.delay).await;
        canned.movies.map_err(|e| anyhow::anyhow!(e))
    }

    async fn series(&self, query: &str) -> anyhow::Result<Listing<Series>> {
        self.queries.lock().unwrap().push(format!("tv:{}", query));
        let canned = self.canned(query);
        tokio::time::sleep(canned.delay).await;
        canned.series.map_err(|e| anyhow::anyhow!(e))
    }
}

/// Counter store that reports every write on a channel.
pub struct FakeCounter {
    pub fail_writes: bool,
    pub trending: Result<Vec<SearchRecord>, String>,
    writes: mpsc::UnboundedSender<(String, MediaItem)>,
}

impl FakeCounter {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(String, MediaItem)>) {
        let (writes, rx) = mpsc::unbounded_channel();
        (
            Self {
                fail_writes: false,
                trending: Ok(Vec::new()),
                writes,
            },
            rx,
        )
    }
}

#[async_trait::async_trait]
impl CounterStore for FakeCounter {
    async fn record_search(&self, term: &str, item: &MediaItem) -> anyhow::Result<()> {
        let _ = self.writes.send((term.to_string(), item.clone()));
        if self.fail_writes {
            return Err(anyhow::anyhow!("appwrite unavailable"));
        }
        Ok(())
    }

    async fn top_searches(&self, limit: usize) -> anyhow::Result<Vec<SearchRecord>> {
        match &self.trending {
            Ok(records) => Ok(records.iter().take(limit).cloned().collect()),
            Err(e) => Err(anyhow::anyhow!(e.clone())),
        }
    }
}

pub fn movie(id: i64, title: &str) -> Movie {
    Movie {
        id,
        title: title.to_string(),
        poster_path: Some(format!("/{}.jpg", id)),
        release_date: Some("2024-01-01".to_string()),
        original_language: "en".to_string(),
        vote_average: 7.0,
        popularity: 10.0,
    }
}

pub fn series(id: i64, name: &str) -> Series {
    Series {
        id,
        name: name.to_string(),
        poster_path: Some(format!("/{}.jpg", id)),
        first_air_date: Some("2023-05-05".to_string()),
        original_language: "en".to_string(),
        vote_average: 8.0,
        popularity: 5.0,
        origin_country: vec!["US".to_string()],
    }
}

pub fn record(term: &str, count: i64) -> SearchRecord {
    SearchRecord {
        id: format!("doc-{}", term),
        search_term: term.to_string(),
        count,
        movie_id: Some(1),
        poster_url: Some(format!("https://image.tmdb.org/t/p/w500/{}.jpg", term)),
        title: Some(term.to_uppercase()),
        updated_at: None,
    }
}
