//! Runtime settings.
//!
//! Values come from an optional TOML file and are then overridden by
//! environment variables. Every field has a default so an empty file (or
//! no file at all) is a valid configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{RevgraphError, RevgraphResult};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "revgraph.toml";

/// Top-level settings for one run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Path to the SQLite database holding `reviewer`, `product` and `review`.
    pub database: PathBuf,
    /// Directory for similarity cache artifacts.
    pub cache_dir: PathBuf,
    pub graph: GraphSettings,
    pub similarity: SimilaritySettings,
    pub multi_type: MultiTypeSettings,
    pub popular: PopularSettings,
}

/// Connection settings for the Neo4j graph store.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GraphSettings {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub db: String,
}

/// Exercise 1: similarity graph over the most active reviewers.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimilaritySettings {
    pub top_reviewers: u32,
}

/// Exercise 3: reviewers of more than one product type.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MultiTypeSettings {
    /// Size of the alphabetical reviewer window inspected.
    pub reviewer_window: u32,
}

/// Exercise 4: popular-but-niche products and their co-reviewers.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PopularSettings {
    /// Products must have strictly fewer reviews than this.
    pub max_reviews: u32,
    pub top_products: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: PathBuf::from("reviews.db"),
            cache_dir: PathBuf::from(".revgraph/cache"),
            graph: GraphSettings::default(),
            similarity: SimilaritySettings::default(),
            multi_type: MultiTypeSettings::default(),
            popular: PopularSettings::default(),
        }
    }
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: String::new(),
            db: "neo4j".to_string(),
        }
    }
}

impl Default for SimilaritySettings {
    fn default() -> Self {
        Self { top_reviewers: 30 }
    }
}

impl Default for MultiTypeSettings {
    fn default() -> Self {
        Self { reviewer_window: 400 }
    }
}

impl Default for PopularSettings {
    fn default() -> Self {
        Self { max_reviews: 40, top_products: 5 }
    }
}

impl Settings {
    /// Load settings from `path`, or from `revgraph.toml` if it exists, then
    /// apply environment overrides.
    pub fn load(path: Option<&Path>) -> RevgraphResult<Self> {
        let mut settings = match path {
            Some(p) => Self::from_file(p)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        settings.apply_env(|key| std::env::var(key).ok());
        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from a TOML file without environment overrides.
    pub fn from_file(path: &Path) -> RevgraphResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| RevgraphError::ConfigFile {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Loaded config file");
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> RevgraphResult<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Override fields from environment-style lookups.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("REVGRAPH_DATABASE") {
            self.database = PathBuf::from(v);
        }
        if let Some(v) = lookup("REVGRAPH_CACHE_DIR") {
            self.cache_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("NEO4J_URI") {
            self.graph.uri = v;
        }
        if let Some(v) = lookup("NEO4J_USER") {
            self.graph.user = v;
        }
        if let Some(v) = lookup("NEO4J_PASSWORD") {
            self.graph.password = v;
        }
    }

    fn validate(&self) -> RevgraphResult<()> {
        if self.similarity.top_reviewers == 0 {
            return Err(RevgraphError::config("similarity.top_reviewers must be positive"));
        }
        if self.multi_type.reviewer_window == 0 {
            return Err(RevgraphError::config("multi_type.reviewer_window must be positive"));
        }
        if self.popular.top_products == 0 {
            return Err(RevgraphError::config("popular.top_products must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_file() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings.similarity.top_reviewers, 30);
        assert_eq!(settings.multi_type.reviewer_window, 400);
        assert_eq!(settings.popular.max_reviews, 40);
        assert_eq!(settings.popular.top_products, 5);
        assert_eq!(settings.graph.uri, "bolt://localhost:7687");
    }

    #[test]
    fn test_partial_file() {
        let raw = "database = \"data/reviews.db\"\n\n[graph]\nuser = \"alice\"\n\n[popular]\nmax_reviews = 10\n";
        let settings = Settings::from_toml(raw).unwrap();
        assert_eq!(settings.database, PathBuf::from("data/reviews.db"));
        assert_eq!(settings.graph.user, "alice");
        assert_eq!(settings.graph.db, "neo4j");
        assert_eq!(settings.popular.max_reviews, 10);
        assert_eq!(settings.popular.top_products, 5);
    }

    #[test]
    fn test_env_overrides() {
        let mut settings = Settings::default();
        settings.apply_env(|key| match key {
            "NEO4J_URI" => Some("bolt://graph:7687".to_string()),
            "NEO4J_PASSWORD" => Some("secret".to_string()),
            _ => None,
        });
        assert_eq!(settings.graph.uri, "bolt://graph:7687");
        assert_eq!(settings.graph.password, "secret");
        assert_eq!(settings.graph.user, "neo4j");
    }

    #[test]
    fn test_rejects_zero_window() {
        let settings = Settings::from_toml("[multi_type]\nreviewer_window = 0\n").unwrap();
        assert!(matches!(settings.validate(), Err(RevgraphError::Config(_))));
    }

    #[test]
    fn test_bad_toml() {
        assert!(matches!(
            Settings::from_toml("similarity = 3"),
            Err(RevgraphError::ConfigParse(_))
        ));
    }
}
