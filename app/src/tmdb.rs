use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::models::{MediaKind, Movie, Series};

pub const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";

/// Outcome of one catalog listing request.
///
/// A non-2xx answer is not an error for the caller: the orchestrator decides
/// what a one-sided failure means. Transport and decoding problems surface as
/// `Err` from the [`CatalogApi`] methods instead.
#[derive(Debug, Clone, PartialEq)]
pub enum Listing<T> {
    Ok(Vec<T>),
    Failed(StatusCode),
}

impl<T> Listing<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Listing::Ok(_))
    }

    pub fn into_results(self) -> Vec<T> {
        match self {
            Listing::Ok(results) => results,
            Listing::Failed(_) => Vec::new(),
        }
    }
}

#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Now-playing movies for an empty query, a title search otherwise.
    async fn movies(&self, query: &str) -> anyhow::Result<Listing<Movie>>;
    /// On-the-air series for an empty query, a title search otherwise.
    async fn series(&self, query: &str) -> anyhow::Result<Listing<Series>>;
}

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl TmdbClient {
    pub fn new(api_key: &str) -> anyhow::Result<Self> {
        Self::with_base_url(api_key, TMDB_BASE_URL)
    }

    pub fn with_base_url(api_key: &str, base_url: &str) -> anyhow::Result<Self> {
        if api_key.trim().is_empty() {
            return Err(anyhow::anyhow!("TMDB API key is empty"));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.trim().to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn auth_header(&self) -> String {
        if self.api_key.starts_with("Bearer ") {
            self.api_key.clone()
        } else {
            format!("Bearer {}", self.api_key)
        }
    }

    /// Path and query parameters for a listing of `kind`.
    pub fn endpoint(kind: MediaKind, query: &str) -> (String, Vec<(&'static str, String)>) {
        if query.is_empty() {
            let path = match kind {
                MediaKind::Movie => "/movie/now_playing",
                MediaKind::Tv => "/tv/on_the_air",
            };
            (path.to_string(), Vec::new())
        } else {
            (
                format!("/search/{}", kind.as_str()),
                vec![("query", query.to_string())],
            )
        }
    }

    async fn fetch_listing<T: DeserializeOwned>(
        &self,
        kind: MediaKind,
        query: &str,
    ) -> anyhow::Result<Listing<T>> {
        let (path, params) = Self::endpoint(kind, query);
        let url = format!("{}{}", self.base_url, path);

        debug!("Fetching TMDB {} listing: {} {:?}", kind, url, params);

        let response = self
            .client
            .get(&url)
            .header("accept", "application/json")
            .header("Authorization", self.auth_header())
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!("TMDB {} listing failed with {}: {}", kind, status, error_text);
            return Ok(Listing::Failed(status));
        }

        let page: ResultsPage<T> = response.json().await?;
        Ok(Listing::Ok(page.results))
    }
}

#[async_trait]
impl CatalogApi for TmdbClient {
    async fn movies(&self, query: &str) -> anyhow::Result<Listing<Movie>> {
        self.fetch_listing(MediaKind::Movie, query).await
    }

    async fn series(&self, query: &str) -> anyhow::Result<Listing<Series>> {
        self.fetch_listing(MediaKind::Tv, query).await
    }
}

/// Full poster URL for a TMDB poster path such as `/abc.jpg`.
pub fn poster_url(path: &str) -> String {
    format!("{}/{}", TMDB_IMAGE_BASE, path.trim_start_matches('/'))
}

#[derive(Debug, Clone, Deserialize)]
struct ResultsPage<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}
