use tracing::{debug, error};

use crate::appwrite::CounterStore;
use crate::models::{SearchRecord, TrendingEntry};

/// Ranked view of the most searched terms. Failures degrade to an empty list.
pub async fn load_trending(store: &dyn CounterStore, limit: usize) -> Vec<TrendingEntry> {
    match store.top_searches(limit).await {
        Ok(records) => {
            debug!("Loaded {} trending searches", records.len());
            rank(records)
        }
        Err(e) => {
            error!("Error fetching trending movies: {:#}", e);
            Vec::new()
        }
    }
}

/// Keeps the store's order; rank is the 1-based position.
pub fn rank(records: Vec<SearchRecord>) -> Vec<TrendingEntry> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| TrendingEntry {
            rank: index + 1,
            title: record.title.unwrap_or_else(|| record.search_term.clone()),
            poster_url: record.poster_url,
            search_term: record.search_term,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaItem;
    use async_trait::async_trait;

    struct BrokenStore;

    #[async_trait]
    impl CounterStore for BrokenStore {
        async fn record_search(&self, _term: &str, _item: &MediaItem) -> anyhow::Result<()> {
            Ok(())
        }

        async fn top_searches(&self, _limit: usize) -> anyhow::Result<Vec<SearchRecord>> {
            Err(anyhow::anyhow!("401 unauthorized"))
        }
    }

    fn record(term: &str, count: i64, title: Option<&str>) -> SearchRecord {
        SearchRecord {
            id: format!("id-{}", term),
            search_term: term.to_string(),
            count,
            movie_id: Some(1),
            poster_url: Some(format!("https://image.tmdb.org/t/p/w500/{}.jpg", term)),
            title: title.map(str::to_string),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn failure_yields_empty_list() {
        assert!(load_trending(&BrokenStore, 5).await.is_empty());
    }

    #[test]
    fn rank_follows_store_order() {
        let entries = rank(vec![
            record("dune", 9, Some("Dune: Part Two")),
            record("alien", 4, None),
        ]);

        assert_eq!(entries[0].rank, 1);
        assert_eq!(entries[0].title, "Dune: Part Two");
        assert_eq!(entries[1].rank, 2);
        assert_eq!(entries[1].title, "alien");
        assert_eq!(entries[1].search_term, "alien");
    }
}
