//! Configuration module for the whisky embedding pipeline.
//!
//! This module provides a layered configuration system that supports:
//! - Default values
//! - TOML configuration file
//! - Environment variable overrides
//! - CLI argument overrides
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `WV_` and use double underscores
//! to separate nested levels:
//! - `WV_BUILD__PARALLEL_THREADS=8` sets `build.parallel_threads`
//! - `WV_QUERY__MIN_COUNT=5` sets `query.min_count`
//! - `WV_DATA__VECTORS=/data/w2v.txt` sets `data.vectors`

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::review::filter::DEFAULT_MIN_TOKENS;
use crate::search::{
    DEFAULT_DESCRIBE_N, DEFAULT_FUZZY_CANDIDATES, DEFAULT_FUZZY_CUTOFF, DEFAULT_MIN_COUNT,
    DEFAULT_TOP_N,
};

/// Directory holding the settings file, searched for from the current directory upwards.
pub const CONFIG_DIR: &str = ".whiskyvec";

const CONFIG_FILE: &str = "settings.toml";
const ENV_PREFIX: &str = "WV_";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Global debug mode
    #[serde(default = "default_false")]
    pub debug: bool,

    /// Input files
    #[serde(default)]
    pub data: DataConfig,

    /// Table build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Query defaults
    #[serde(default)]
    pub query: QueryConfig,

    /// Name resolution settings
    #[serde(default)]
    pub resolver: ResolverSettings,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DataConfig {
    /// Tokenized reviews, one JSON object per line
    #[serde(default = "default_reviews_path")]
    pub reviews: PathBuf,

    /// Word vectors in word2vec text format
    #[serde(default = "default_vectors_path")]
    pub vectors: PathBuf,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BuildConfig {
    /// Number of parallel threads for embedding
    #[serde(default = "default_parallel_threads")]
    pub parallel_threads: usize,

    /// Attributes need strictly more tokens than this
    #[serde(default = "default_min_tokens")]
    pub min_tokens: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct QueryConfig {
    /// Neighbours requested by `similar`, including the skipped top rank
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Minimum review count for a neighbour to be listed
    #[serde(default = "default_min_count")]
    pub min_count: usize,

    /// Terms requested per attribute by `describe`
    #[serde(default = "default_describe_n")]
    pub describe_n: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ResolverSettings {
    /// Minimum normalized similarity for a fuzzy match (0.0 to 1.0)
    #[serde(default = "default_cutoff")]
    pub cutoff: f64,

    /// Fuzzy candidates considered before picking the most reviewed one
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
}

// Default value functions
fn default_version() -> u32 {
    1
}
fn default_false() -> bool {
    false
}
fn default_reviews_path() -> PathBuf {
    PathBuf::from("data/reviews.jsonl")
}
fn default_vectors_path() -> PathBuf {
    PathBuf::from("data/vectors.txt")
}
fn default_parallel_threads() -> usize {
    num_cpus::get()
}
fn default_min_tokens() -> usize {
    DEFAULT_MIN_TOKENS
}
fn default_top_n() -> usize {
    DEFAULT_TOP_N
}
fn default_min_count() -> usize {
    DEFAULT_MIN_COUNT
}
fn default_describe_n() -> usize {
    DEFAULT_DESCRIBE_N
}
fn default_cutoff() -> f64 {
    DEFAULT_FUZZY_CUTOFF
}
fn default_max_candidates() -> usize {
    DEFAULT_FUZZY_CANDIDATES
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            debug: false,
            data: DataConfig::default(),
            build: BuildConfig::default(),
            query: QueryConfig::default(),
            resolver: ResolverSettings::default(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            reviews: default_reviews_path(),
            vectors: default_vectors_path(),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            parallel_threads: default_parallel_threads(),
            min_tokens: default_min_tokens(),
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            min_count: default_min_count(),
            describe_n: default_describe_n(),
        }
    }
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            cutoff: default_cutoff(),
            max_candidates: default_max_candidates(),
        }
    }
}

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, Box<figment::Error>> {
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| Path::new(CONFIG_DIR).join(CONFIG_FILE));
        Self::layered(&config_path)
    }

    /// Load configuration from a specific file, still honouring env overrides
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        Self::layered(path.as_ref())
    }

    fn layered(config_path: &Path) -> Result<Self, Box<figment::Error>> {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(config_path))
            // Double underscore separates nested levels, single underscores
            // stay inside field names
            .merge(Env::prefixed(ENV_PREFIX).map(|key| {
                key.as_str().to_lowercase().replace("__", ".").into()
            }))
            .extract()
            .map_err(Box::new)
    }

    /// Find the settings file by looking for the config directory
    /// from the current directory up to root
    fn find_workspace_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        current
            .ancestors()
            .map(|ancestor| ancestor.join(CONFIG_DIR))
            .find(|dir| dir.is_dir())
            .map(|dir| dir.join(CONFIG_FILE))
    }

    /// Check if configuration is properly initialized
    pub fn check_init() -> Result<(), String> {
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| Path::new(CONFIG_DIR).join(CONFIG_FILE));

        if !config_path.exists() {
            return Err("No configuration file found".to_string());
        }

        match std::fs::read_to_string(&config_path) {
            Ok(content) => {
                if let Err(e) = toml::from_str::<Settings>(&content) {
                    return Err(format!(
                        "Configuration file is corrupted: {e}\nRun 'whiskyvec init --force' to regenerate."
                    ));
                }
            }
            Err(e) => {
                return Err(format!("Cannot read configuration file: {e}"));
            }
        }

        Ok(())
    }

    /// Save current configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        let parent = path.as_ref().parent().ok_or("Invalid path")?;
        std::fs::create_dir_all(parent)?;

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }

    /// Create a default settings file with helpful comments under `root`
    pub fn init_config_file(
        root: impl AsRef<Path>,
        force: bool,
    ) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let config_path = root.as_ref().join(CONFIG_DIR).join(CONFIG_FILE);

        if !force && config_path.exists() {
            return Err("Configuration file already exists. Use --force to overwrite".into());
        }

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let template = format!(
            r#"# whiskyvec configuration

# Version of the configuration schema
version = 1

# Global debug mode (debug-level logging on stderr)
debug = false

[data]
# Tokenized reviews, one {{"name", "url", "attributes"}} object per line
reviews = "data/reviews.jsonl"

# Word vectors in word2vec text format
vectors = "data/vectors.txt"

[build]
# Number of parallel threads for embedding (defaults to CPU count)
# parallel_threads = {threads}

# A review is kept only if nose, palate and finish each have more tokens than this
min_tokens = {min_tokens}

[query]
# Neighbours requested by `similar`; the top rank is always skipped
top_n = {top_n}

# Minimum number of reviews for a neighbour to be listed
min_count = {min_count}

# Terms per attribute requested by `describe`
describe_n = {describe_n}

[resolver]
# Minimum similarity (0.0 to 1.0) for a fuzzy name match
cutoff = {cutoff}

# Fuzzy candidates considered before picking the most reviewed one
max_candidates = {max_candidates}
"#,
            threads = num_cpus::get(),
            min_tokens = DEFAULT_MIN_TOKENS,
            top_n = DEFAULT_TOP_N,
            min_count = DEFAULT_MIN_COUNT,
            describe_n = DEFAULT_DESCRIBE_N,
            cutoff = DEFAULT_FUZZY_CUTOFF,
            max_candidates = DEFAULT_FUZZY_CANDIDATES,
        );

        std::fs::write(&config_path, template)?;
        tracing::debug!("wrote configuration template to {}", config_path.display());

        Ok(config_path)
    }
}
