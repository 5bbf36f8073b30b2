use std::path::PathBuf;

use serde::Deserialize;

use crate::models::{CatalogFilter, RecommendationDefaults};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Path to the movie catalog CSV
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Similarity weight used when a request does not set one
    #[serde(default = "default_sim_weight")]
    pub default_sim_weight: f64,

    /// Number of recommendations returned when a request does not set one
    #[serde(default = "default_top_k")]
    pub default_top_k: usize,

    /// Oldest release year kept at load time
    #[serde(default = "default_min_year")]
    pub min_year: i32,

    /// Minimum vote count kept at load time
    #[serde(default = "default_min_votes")]
    pub min_votes: u64,
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("movies.csv")
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_sim_weight() -> f64 {
    RecommendationDefaults::default().sim_weight
}

fn default_top_k() -> usize {
    RecommendationDefaults::default().top_k
}

fn default_min_year() -> i32 {
    CatalogFilter::default().min_year
}

fn default_min_votes() -> u64 {
    CatalogFilter::default().min_votes
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config
            .defaults()
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid recommendation defaults: {}", e))?;
        Ok(config)
    }

    /// Load-time filter thresholds
    pub fn catalog_filter(&self) -> CatalogFilter {
        CatalogFilter {
            min_year: self.min_year,
            min_votes: self.min_votes,
        }
    }

    /// Per-request fallbacks for omitted parameters
    pub fn defaults(&self) -> RecommendationDefaults {
        RecommendationDefaults {
            sim_weight: self.default_sim_weight,
            top_k: self.default_top_k,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_from(vars: Vec<(&str, &str)>) -> Result<Config, envy::Error> {
        envy::from_iter(
            vars.into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        )
    }

    #[test]
    fn test_defaults_applied() {
        let config = config_from(vec![]).unwrap();
        assert_eq!(config.catalog_path, PathBuf::from("movies.csv"));
        assert_eq!(config.port, 3000);
        assert_eq!(config.default_sim_weight, 0.7);
        assert_eq!(config.default_top_k, 10);
        assert_eq!(config.min_year, 1950);
        assert_eq!(config.min_votes, 1000);
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_overrides() {
        let config = config_from(vec![
            ("CATALOG_PATH", "/data/imdb.csv"),
            ("PORT", "8080"),
            ("DEFAULT_SIM_WEIGHT", "0.5"),
            ("MIN_VOTES", "50"),
        ])
        .unwrap();
        assert_eq!(config.catalog_path, PathBuf::from("/data/imdb.csv"));
        assert_eq!(config.port, 8080);
        assert_eq!(config.defaults().sim_weight, 0.5);
        assert_eq!(config.catalog_filter().min_votes, 50);
    }

    #[test]
    fn test_out_of_range_default_rejected() {
        let config = config_from(vec![("DEFAULT_TOP_K", "50")]).unwrap();
        assert!(config.defaults().validate().is_err());
    }
}
