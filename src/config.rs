//! TOML configuration for the retrieval pipeline.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::chunk::SplitStrategy;
use crate::models::RetrieveConfig;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChunkingConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_overlap")]
    pub overlap: usize,
    #[serde(default = "default_strategy")]
    pub strategy: SplitStrategy,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            overlap: default_overlap(),
            strategy: default_strategy(),
        }
    }
}

fn default_chunk_size() -> usize {
    crate::chunk::DEFAULT_CHUNK_SIZE
}

fn default_overlap() -> usize {
    crate::chunk::DEFAULT_OVERLAP
}

fn default_strategy() -> SplitStrategy {
    SplitStrategy::Paragraph
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub score_threshold: f64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            score_threshold: 0.0,
        }
    }
}

fn default_limit() -> usize {
    5
}

impl RetrievalConfig {
    /// Validate into the pipeline's [`RetrieveConfig`].
    pub fn to_retrieve_config(&self) -> crate::error::Result<RetrieveConfig> {
        RetrieveConfig::new(self.limit, self.score_threshold)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingConfig {
    /// Model identifier, if the deployment pins one.
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: None,
            dimensions: default_dimensions(),
        }
    }
}

fn default_dimensions() -> usize {
    crate::store::memory::DEFAULT_DIMENSIONS
}

impl Config {
    pub fn load(path: &Path) -> Result<Config> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_sections() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.chunking.chunk_size, 512);
        assert_eq!(config.chunking.overlap, 50);
        assert_eq!(config.chunking.strategy, SplitStrategy::Paragraph);
        assert_eq!(config.retrieval.limit, 5);
        assert_eq!(config.retrieval.score_threshold, 0.0);
        assert_eq!(config.embedding.dimensions, 1024);
        assert!(config.embedding.model.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(
            r#"
[chunking]
chunk_size = 300
overlap = 50
strategy = "fixed"

[retrieval]
limit = 8
score_threshold = 0.35

[embedding]
model = "text-embedding-3-small"
dimensions = 1536
"#,
        )
        .unwrap();
        assert_eq!(config.chunking.chunk_size, 300);
        assert_eq!(config.chunking.strategy, SplitStrategy::Fixed);
        assert_eq!(config.retrieval.limit, 8);
        assert_eq!(config.retrieval.score_threshold, 0.35);
        assert_eq!(config.embedding.model.as_deref(), Some("text-embedding-3-small"));
        assert_eq!(config.embedding.dimensions, 1536);

        let retrieve = config.retrieval.to_retrieve_config().unwrap();
        assert_eq!(retrieve.limit(), 8);
        assert_eq!(retrieve.score_threshold(), 0.35);
    }

    #[test]
    fn test_out_of_range_retrieval_rejected_on_conversion() {
        let config: Config = toml::from_str(
            r#"
[retrieval]
limit = 0
"#,
        )
        .unwrap();
        assert!(config.retrieval.to_retrieve_config().is_err());
    }
}
