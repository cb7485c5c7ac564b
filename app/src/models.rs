use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Tv,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Tv => "tv",
        }
    }

    /// Public TMDB page for an item of this kind.
    pub fn detail_url(&self, id: i64) -> String {
        format!("https://www.themoviedb.org/{}/{}", self.as_str(), id)
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub original_language: String,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub popularity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub original_language: String,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub origin_country: Vec<String>,
}

/// A catalog entry after merging, tagged with its media type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "media_type", rename_all = "lowercase")]
pub enum MediaItem {
    Movie(Movie),
    Tv(Series),
}

impl MediaItem {
    pub fn kind(&self) -> MediaKind {
        match self {
            MediaItem::Movie(_) => MediaKind::Movie,
            MediaItem::Tv(_) => MediaKind::Tv,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            MediaItem::Movie(m) => m.id,
            MediaItem::Tv(s) => s.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            MediaItem::Movie(m) => &m.title,
            MediaItem::Tv(s) => &s.name,
        }
    }

    /// Empty strings from the API count as "no poster".
    pub fn poster_path(&self) -> Option<&str> {
        let path = match self {
            MediaItem::Movie(m) => m.poster_path.as_deref(),
            MediaItem::Tv(s) => s.poster_path.as_deref(),
        };
        path.filter(|p| !p.trim().is_empty())
    }

    pub fn release_date(&self) -> Option<&str> {
        let date = match self {
            MediaItem::Movie(m) => m.release_date.as_deref(),
            MediaItem::Tv(s) => s.first_air_date.as_deref(),
        };
        date.filter(|d| !d.is_empty())
    }

    pub fn year(&self) -> Option<&str> {
        self.release_date()
            .and_then(|d| d.split('-').next())
            .filter(|y| !y.is_empty())
    }

    pub fn original_language(&self) -> &str {
        match self {
            MediaItem::Movie(m) => &m.original_language,
            MediaItem::Tv(s) => &s.original_language,
        }
    }

    pub fn vote_average(&self) -> f64 {
        match self {
            MediaItem::Movie(m) => m.vote_average,
            MediaItem::Tv(s) => s.vote_average,
        }
    }

    pub fn popularity(&self) -> f64 {
        match self {
            MediaItem::Movie(m) => m.popularity,
            MediaItem::Tv(s) => s.popularity,
        }
    }

    pub fn detail_url(&self) -> String {
        self.kind().detail_url(self.id())
    }
}

/// A counter-store document tracking how often a term was searched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRecord {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "searchTerm")]
    pub search_term: String,
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub movie_id: Option<i64>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "$updatedAt", default)]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingEntry {
    pub rank: usize,
    pub title: String,
    pub poster_url: Option<String>,
    pub search_term: String,
}
