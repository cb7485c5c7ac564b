use config::{Config as ConfigBuilder, File};
use serde::Deserialize;

use crate::tmdb::TMDB_BASE_URL;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DEBOUNCE_MS: u64 = 800;
const DEFAULT_TRENDING_LIMIT: usize = 5;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub tmdb_api_key: String,
    pub tmdb_base_url: String,
    pub port: u16,
    pub debounce_ms: u64,
    pub trending_limit: usize,
    pub appwrite: Option<AppwriteConfig>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppwriteConfig {
    pub endpoint: String,
    pub project_id: String,
    pub database_id: String,
    pub collection_id: String,
    pub api_key: String,
}

impl Config {
    pub fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let settings = ConfigBuilder::builder()
            .add_source(File::with_name("config").required(false))
            .build()?;

        Self::resolve(&settings, |key| std::env::var(key).ok())
    }

    /// Environment values win over the optional `config` file, which wins over defaults.
    pub fn resolve(
        settings: &ConfigBuilder,
        env: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        let lookup = |env_key: &str, file_key: &str| -> Option<String> {
            env(env_key)
                .or_else(|| settings.get_string(file_key).ok())
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let tmdb_api_key = lookup("TMDB_API_KEY", "tmdb_api_key").ok_or_else(|| {
            anyhow::anyhow!(
                "TMDB_API_KEY is not set; export a TMDB v4 read access token or add it to .env"
            )
        })?;

        let port = match lookup("PORT", "port") {
            Some(p) => p
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid PORT value: {}", p))?,
            None => DEFAULT_PORT,
        };

        let debounce_ms = match lookup("DEBOUNCE_MS", "debounce_ms") {
            Some(d) => d
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid DEBOUNCE_MS value: {}", d))?,
            None => DEFAULT_DEBOUNCE_MS,
        };

        let trending_limit = match lookup("TRENDING_LIMIT", "trending_limit") {
            Some(l) => l
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid TRENDING_LIMIT value: {}", l))?,
            None => DEFAULT_TRENDING_LIMIT,
        };

        let appwrite = match (
            lookup("APPWRITE_ENDPOINT", "appwrite.endpoint"),
            lookup("APPWRITE_PROJECT_ID", "appwrite.project_id"),
            lookup("APPWRITE_DATABASE_ID", "appwrite.database_id"),
            lookup("APPWRITE_COLLECTION_ID", "appwrite.collection_id"),
            lookup("APPWRITE_API_KEY", "appwrite.api_key"),
        ) {
            (Some(endpoint), Some(project_id), Some(database_id), Some(collection_id), Some(api_key)) => {
                Some(AppwriteConfig {
                    endpoint,
                    project_id,
                    database_id,
                    collection_id,
                    api_key,
                })
            }
            (None, None, None, None, None) => None,
            _ => {
                return Err(anyhow::anyhow!(
                    "Incomplete Appwrite configuration; set APPWRITE_ENDPOINT, APPWRITE_PROJECT_ID, \
                     APPWRITE_DATABASE_ID, APPWRITE_COLLECTION_ID and APPWRITE_API_KEY together"
                ))
            }
        };

        Ok(Config {
            tmdb_api_key,
            tmdb_base_url: lookup("TMDB_BASE_URL", "tmdb_base_url")
                .unwrap_or_else(|| TMDB_BASE_URL.to_string()),
            port,
            debounce_ms,
            trending_limit,
            appwrite,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn resolve(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let env: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let settings = ConfigBuilder::builder().build().unwrap();
        Config::resolve(&settings, |key| env.get(key).cloned())
    }

    #[test]
    fn missing_token_fails_fast() {
        let err = resolve(&[]).unwrap_err();
        assert!(err.to_string().contains("TMDB_API_KEY"));
    }

    #[test]
    fn blank_token_counts_as_missing() {
        assert!(resolve(&[("TMDB_API_KEY", "  ")]).is_err());
    }

    #[test]
    fn defaults_apply() {
        let config = resolve(&[("TMDB_API_KEY", "token")]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.debounce_ms, 800);
        assert_eq!(config.trending_limit, 5);
        assert_eq!(config.tmdb_base_url, TMDB_BASE_URL);
        assert!(config.appwrite.is_none());
    }

    #[test]
    fn file_values_are_overridden_by_env() {
        let settings = ConfigBuilder::builder()
            .set_override("port", 4000)
            .unwrap()
            .set_override("debounce_ms", 500)
            .unwrap()
            .build()
            .unwrap();
        let config = Config::resolve(&settings, |key| match key {
            "TMDB_API_KEY" => Some("token".to_string()),
            "PORT" => Some("8080".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.debounce_ms, 500);
    }

    #[test]
    fn appwrite_settings_come_as_a_set() {
        let config = resolve(&[
            ("TMDB_API_KEY", "token"),
            ("APPWRITE_ENDPOINT", "https://cloud.appwrite.io/v1"),
            ("APPWRITE_PROJECT_ID", "project"),
            ("APPWRITE_DATABASE_ID", "db"),
            ("APPWRITE_COLLECTION_ID", "metrics"),
            ("APPWRITE_API_KEY", "secret"),
        ])
        .unwrap();
        assert_eq!(config.appwrite.unwrap().collection_id, "metrics");

        let err = resolve(&[("TMDB_API_KEY", "token"), ("APPWRITE_PROJECT_ID", "project")])
            .unwrap_err();
        assert!(err.to_string().contains("Incomplete Appwrite"));
    }

    #[test]
    fn invalid_port_is_reported() {
        let err = resolve(&[("TMDB_API_KEY", "token"), ("PORT", "http")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
