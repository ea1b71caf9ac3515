//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Values are resolved in this order (later overrides earlier):
//! 1. Built-in defaults
//! 2. Config file
//! 3. Environment variables (`LANDFALL_*`)
//!
//! # Config File Locations
//!
//! Searched in order:
//! 1. `$LANDFALL_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/landfall/config.toml`
//! 3. `~/.landfall/config.toml`
//!
//! # Environment Variables
//!
//! - `LANDFALL_CATALOG_URL`, `LANDFALL_API_KEY`, `LANDFALL_USER`
//! - `LANDFALL_STORAGE_ENDPOINT`, `LANDFALL_BUCKET`
//! - `LANDFALL_PIPELINE_URL`
//!
//! # Example
//!
//! ```no_run
//! use landfall::core::config::Config;
//!
//! let config = Config::load(None).unwrap();
//! println!("catalog: {}", config.catalog_url);
//! println!("trunk:   {}", config.trunk);
//! ```

pub mod schema;

pub use schema::FileConfig;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::types::{Namespace, TableName, TypeError};

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(#[from] TypeError),

    #[error("missing required config value: {0}")]
    Missing(&'static str),
}

/// Resolved configuration with defaults and overrides applied.
///
/// Unlike [`FileConfig`], every field here is concrete; anything not
/// required for a given command is still populated with its default so
/// orchestrators never re-check for presence.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the catalog API.
    pub catalog_url: String,
    /// Catalog API key.
    pub api_key: String,
    /// Catalog user owning orchestrator branches.
    pub user: String,
    /// Trunk ref that merges land on.
    pub trunk: String,

    /// Endpoint of the S3-compatible object store.
    pub storage_endpoint: String,
    /// Bucket for staged data.
    pub bucket: String,
    /// Key prefix for staged data files.
    pub data_folder: String,

    /// Base URL of the pipeline execution service.
    pub pipeline_url: String,
    /// Client-side timeout for a pipeline run.
    pub client_timeout: std::time::Duration,

    /// Input-port table name.
    pub input_port_table: TableName,
    /// Input-port namespace.
    pub input_port_namespace: Namespace,
    /// Git URL of the transformation project.
    pub code_repo_url: String,
    /// Path of the pipeline project inside the checked-out repo.
    pub pipeline_subdir: PathBuf,
    /// Generated payload size per cycle, in GiB.
    pub gib_per_iteration: f64,
    /// Numerical columns to generate in the mock batch.
    pub numerical_columns: Vec<String>,
}

/// Default client-side pipeline timeout, in seconds.
const DEFAULT_CLIENT_TIMEOUT_SECS: u64 = 500;

/// Default payload size per cycle, in GiB.
const DEFAULT_GIB_PER_ITERATION: f64 = 0.2;

impl Config {
    /// Load configuration, applying precedence rules.
    ///
    /// `path` overrides the default search locations (used by the CLI's
    /// `--config` flag). A missing file is not an error; defaults plus
    /// environment variables apply.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an existing file cannot be read or
    /// parsed, or if a resolved value fails domain validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path.map(PathBuf::from).or_else(default_config_path) {
            Some(p) if p.exists() => Self::read_file(&p)?,
            _ => FileConfig::default(),
        };
        Self::resolve(file)
    }

    fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Apply defaults and environment overrides to file values.
    fn resolve(file: FileConfig) -> Result<Self, ConfigError> {
        let catalog_url = env_or("LANDFALL_CATALOG_URL", file.catalog.base_url)
            .ok_or(ConfigError::Missing("catalog.base_url"))?;
        let api_key = env_or("LANDFALL_API_KEY", file.catalog.api_key)
            .ok_or(ConfigError::Missing("catalog.api_key"))?;
        let user = env_or("LANDFALL_USER", file.catalog.user)
            .ok_or(ConfigError::Missing("catalog.user"))?;
        let trunk = file.catalog.trunk.unwrap_or_else(|| "main".to_string());

        let storage_endpoint = env_or("LANDFALL_STORAGE_ENDPOINT", file.storage.endpoint)
            .ok_or(ConfigError::Missing("storage.endpoint"))?;
        let bucket = env_or("LANDFALL_BUCKET", file.storage.bucket)
            .unwrap_or_else(|| "hello-data-products".to_string());
        let data_folder = file.storage.data_folder.unwrap_or_else(|| "raw".to_string());

        let pipeline_url = env_or("LANDFALL_PIPELINE_URL", file.pipeline.base_url)
            .ok_or(ConfigError::Missing("pipeline.base_url"))?;
        let client_timeout = std::time::Duration::from_secs(
            file.pipeline
                .client_timeout_secs
                .unwrap_or(DEFAULT_CLIENT_TIMEOUT_SECS),
        );

        let input_port_table = TableName::new(
            file.product
                .input_port_table
                .unwrap_or_else(|| "trips".to_string()),
        )?;
        let input_port_namespace = Namespace::new(
            file.product
                .input_port_namespace
                .unwrap_or_else(|| "tlc_trip_record".to_string()),
        )?;
        let code_repo_url = file
            .product
            .code_repo_url
            .ok_or(ConfigError::Missing("product.code_repo_url"))?;
        let pipeline_subdir = file
            .product
            .pipeline_subdir
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("src/pipeline"));
        let gib_per_iteration = file
            .product
            .gib_per_iteration
            .unwrap_or(DEFAULT_GIB_PER_ITERATION);
        let numerical_columns = file.product.numerical_columns.unwrap_or_else(|| {
            vec!["Tip_amount".to_string(), "Tolls_amount".to_string()]
        });

        Ok(Self {
            catalog_url,
            api_key,
            user,
            trunk,
            storage_endpoint,
            bucket,
            data_folder,
            pipeline_url,
            client_timeout,
            input_port_table,
            input_port_namespace,
            code_repo_url,
            pipeline_subdir,
            gib_per_iteration,
            numerical_columns,
        })
    }

    /// Fixture configuration pointing at loopback endpoints. Used by
    /// this crate's tests; not part of the public contract.
    #[doc(hidden)]
    pub fn for_tests() -> Self {
        Self {
            catalog_url: "http://127.0.0.1:0".to_string(),
            api_key: "test-key".to_string(),
            user: "jamie".to_string(),
            trunk: "main".to_string(),
            storage_endpoint: "http://127.0.0.1:0".to_string(),
            bucket: "hello-data-products".to_string(),
            data_folder: "raw".to_string(),
            pipeline_url: "http://127.0.0.1:0".to_string(),
            client_timeout: std::time::Duration::from_secs(500),
            input_port_table: TableName::new("trips").expect("valid fixture table"),
            input_port_namespace: Namespace::new("tlc_trip_record")
                .expect("valid fixture namespace"),
            code_repo_url: "https://example.com/data-product.git".to_string(),
            pipeline_subdir: PathBuf::from("src/pipeline"),
            gib_per_iteration: 0.2,
            numerical_columns: vec!["Tip_amount".to_string(), "Tolls_amount".to_string()],
        }
    }
}

/// Environment override, falling back to the file value.
fn env_or(var: &str, file_value: Option<String>) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.is_empty()).or(file_value)
}

/// Default config file path: `$LANDFALL_CONFIG`, then the XDG config
/// dir, then `~/.landfall/config.toml`.
fn default_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("LANDFALL_CONFIG") {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }
    if let Some(dir) = dirs::config_dir() {
        let candidate = dir.join("landfall").join("config.toml");
        if candidate.exists() {
            return Some(candidate);
        }
    }
    dirs::home_dir().map(|h| h.join(".landfall").join("config.toml"))
}
