use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};

use crate::config::AppwriteConfig;
use crate::models::{MediaItem, SearchRecord};
use crate::tmdb::poster_url;

/// Leaderboard of search terms kept in an external document store.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Increment the counter for `term`, creating it against `item` on first use.
    async fn record_search(&self, term: &str, item: &MediaItem) -> anyhow::Result<()>;
    /// Most searched terms, highest count first.
    async fn top_searches(&self, limit: usize) -> anyhow::Result<Vec<SearchRecord>>;
}

/// Used when no counter store is configured.
#[derive(Debug, Clone, Default)]
pub struct DisabledCounterStore;

#[async_trait]
impl CounterStore for DisabledCounterStore {
    async fn record_search(&self, term: &str, _item: &MediaItem) -> anyhow::Result<()> {
        debug!("Counter store disabled, not recording search '{}'", term);
        Ok(())
    }

    async fn top_searches(&self, _limit: usize) -> anyhow::Result<Vec<SearchRecord>> {
        Ok(Vec::new())
    }
}

#[derive(Debug, Clone)]
pub struct AppwriteClient {
    client: Client,
    config: AppwriteConfig,
}

#[derive(Debug, Deserialize)]
struct DocumentList {
    #[serde(default)]
    documents: Vec<SearchRecord>,
}

impl AppwriteClient {
    pub fn new(config: AppwriteConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self { client, config })
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.config.endpoint.trim_end_matches('/'),
            self.config.database_id,
            self.config.collection_id
        )
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header("X-Appwrite-Project", &self.config.project_id)
            .header("X-Appwrite-Key", &self.config.api_key)
            .header("Content-Type", "application/json")
    }

    async fn list_documents(&self, queries: &[Value]) -> anyhow::Result<Vec<SearchRecord>> {
        let params: Vec<(&str, String)> = queries
            .iter()
            .map(|q| ("queries[]", q.to_string()))
            .collect();

        let response = self
            .request(reqwest::Method::GET, &self.documents_url())
            .query(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "Appwrite list failed with {}: {}",
                status,
                error_text
            ));
        }

        let list: DocumentList = response.json().await?;
        Ok(list.documents)
    }

    async fn update_count(&self, record: &SearchRecord) -> anyhow::Result<()> {
        let url = format!("{}/{}", self.documents_url(), record.id);
        let response = self
            .request(reqwest::Method::PATCH, &url)
            .json(&json!({ "data": { "count": record.count + 1 } }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "Appwrite update failed with {}: {}",
                status,
                error_text
            ));
        }

        Ok(())
    }

    async fn create_record(&self, term: &str, item: &MediaItem) -> anyhow::Result<()> {
        let document_id = uuid::Uuid::new_v4().simple().to_string();
        let body = json!({
            "documentId": document_id,
            "data": {
                "searchTerm": term,
                "count": 1,
                "movie_id": item.id(),
                "poster_url": item.poster_path().map(poster_url),
                "title": item.title(),
            }
        });

        let response = self
            .request(reqwest::Method::POST, &self.documents_url())
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "Appwrite create failed with {}: {}",
                status,
                error_text
            ));
        }

        Ok(())
    }
}

fn equal_query(attribute: &str, value: &str) -> Value {
    json!({ "method": "equal", "attribute": attribute, "values": [value] })
}

fn order_desc_query(attribute: &str) -> Value {
    json!({ "method": "orderDesc", "attribute": attribute })
}

fn limit_query(limit: usize) -> Value {
    json!({ "method": "limit", "values": [limit] })
}

#[async_trait]
impl CounterStore for AppwriteClient {
    async fn record_search(&self, term: &str, item: &MediaItem) -> anyhow::Result<()> {
        let existing = self
            .list_documents(&[equal_query("searchTerm", term)])
            .await?;

        match existing.first() {
            Some(record) => {
                self.update_count(record).await?;
                debug!("Incremented search count for '{}' to {}", term, record.count + 1);
            }
            None => {
                self.create_record(term, item).await?;
                info!("Started tracking search term '{}'", term);
            }
        }

        Ok(())
    }

    async fn top_searches(&self, limit: usize) -> anyhow::Result<Vec<SearchRecord>> {
        self.list_documents(&[limit_query(limit), order_desc_query("count")])
            .await
    }
}
