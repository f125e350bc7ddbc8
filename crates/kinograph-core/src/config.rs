//! Configuration management with file persistence

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Kinograph configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub wikidata: WikidataConfig,
    pub dataset: DatasetConfig,
    pub graph: GraphConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WikidataConfig {
    /// MediaWiki action API endpoint (entity search and descriptions)
    pub api_endpoint: String,
    /// SPARQL query service endpoint (one-hop link expansion)
    pub sparql_endpoint: String,
    /// User-Agent sent with every request, per Wikimedia API policy
    pub user_agent: String,
    /// Per-call timeout; a timed-out call is treated as a per-item failure
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Directory containing the MovieLens 100k files (u.data, u.item)
    pub data_dir: PathBuf,
    /// Number of distinct movies fed into the pipeline
    pub sample_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Number of nodes retained when extracting the viewable subgraph
    pub node_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wikidata: WikidataConfig {
                api_endpoint: "https://www.wikidata.org/w/api.php".to_string(),
                sparql_endpoint: "https://query.wikidata.org/sparql".to_string(),
                user_agent: format!("kinograph/{}", env!("CARGO_PKG_VERSION")),
                timeout_secs: 30,
            },
            dataset: DatasetConfig {
                data_dir: PathBuf::from("ml-100k"),
                sample_size: 50,
            },
            graph: GraphConfig { node_limit: 50 },
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        let dir = if let Ok(custom_dir) = env::var("KINOGRAPH_CONFIG_DIR") {
            PathBuf::from(custom_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| anyhow!("Could not determine config directory"))?
                .join("kinograph")
        };
        Ok(dir)
    }

    /// Get the config file path
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file, or create default if it doesn't exist
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            config.validate()?;
            Ok(config)
        } else {
            // Return default config without creating file
            Ok(Config::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> anyhow::Result<()> {
        self.validate()?;

        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;

        let path = Self::config_path()?;
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Render the configuration as pretty TOML
    pub fn to_toml(&self) -> anyhow::Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.wikidata.api_endpoint.is_empty() {
            return Err(anyhow!("wikidata.api_endpoint must not be empty"));
        }
        if self.wikidata.sparql_endpoint.is_empty() {
            return Err(anyhow!("wikidata.sparql_endpoint must not be empty"));
        }
        if self.wikidata.timeout_secs == 0 {
            return Err(anyhow!("wikidata.timeout_secs must be greater than zero"));
        }
        if self.dataset.sample_size == 0 {
            return Err(anyhow!("dataset.sample_size must be greater than zero"));
        }
        if self.graph.node_limit == 0 {
            return Err(anyhow!("graph.node_limit must be greater than zero"));
        }
        Ok(())
    }
}
