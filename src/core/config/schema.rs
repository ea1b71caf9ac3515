//! core::config::schema
//!
//! Serde schema for the configuration file.
//!
//! All fields are optional in the file; defaults and environment
//! overrides are applied by [`crate::core::config::Config`].

use serde::{Deserialize, Serialize};

/// Top-level configuration file schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Catalog connection settings.
    #[serde(default)]
    pub catalog: CatalogSection,

    /// Object storage settings for staging raw data.
    #[serde(default)]
    pub storage: StorageSection,

    /// Pipeline execution service settings.
    #[serde(default)]
    pub pipeline: PipelineSection,

    /// Data product settings (ports, code source, batch sizing).
    #[serde(default)]
    pub product: ProductSection,
}

/// `[catalog]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogSection {
    /// Base URL of the catalog API.
    pub base_url: Option<String>,
    /// API key. Prefer the `LANDFALL_API_KEY` environment variable;
    /// a key in the file is accepted but discouraged.
    pub api_key: Option<String>,
    /// Catalog user owning orchestrator branches.
    pub user: Option<String>,
    /// Trunk ref that merges land on.
    pub trunk: Option<String>,
}

/// `[storage]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageSection {
    /// Endpoint of the S3-compatible object store.
    pub endpoint: Option<String>,
    /// Bucket for staged data.
    pub bucket: Option<String>,
    /// Key prefix ("folder") for staged data files.
    pub data_folder: Option<String>,
}

/// `[pipeline]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineSection {
    /// Base URL of the pipeline execution service.
    pub base_url: Option<String>,
    /// Client-side timeout for a pipeline run, in seconds.
    pub client_timeout_secs: Option<u64>,
}

/// `[product]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductSection {
    /// Input-port table name.
    pub input_port_table: Option<String>,
    /// Input-port namespace.
    pub input_port_namespace: Option<String>,
    /// Git URL of the transformation project.
    pub code_repo_url: Option<String>,
    /// Path of the pipeline project inside the checked-out repo.
    pub pipeline_subdir: Option<String>,
    /// Generated payload size per cycle, in GiB.
    pub gib_per_iteration: Option<f64>,
    /// Numerical columns to generate in the mock batch.
    pub numerical_columns: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_parses() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert!(config.catalog.base_url.is_none());
        assert!(config.product.input_port_table.is_none());
    }

    #[test]
    fn full_file_parses() {
        let text = r#"
            [catalog]
            base_url = "https://catalog.example.com"
            user = "jamie"
            trunk = "main"

            [storage]
            endpoint = "https://s3.example.com"
            bucket = "hello-data-products"
            data_folder = "raw"

            [pipeline]
            base_url = "https://runner.example.com"
            client_timeout_secs = 500

            [product]
            input_port_table = "trips"
            input_port_namespace = "tlc_trip_record"
            code_repo_url = "https://example.com/product.git"
            gib_per_iteration = 0.2
            numerical_columns = ["Tip_amount", "Tolls_amount"]
        "#;
        let config: FileConfig = toml::from_str(text).unwrap();
        assert_eq!(config.catalog.user.as_deref(), Some("jamie"));
        assert_eq!(config.pipeline.client_timeout_secs, Some(500));
        assert_eq!(
            config.product.numerical_columns.as_deref(),
            Some(&["Tip_amount".to_string(), "Tolls_amount".to_string()][..])
        );
    }

    #[test]
    fn unknown_fields_rejected() {
        let result: Result<FileConfig, _> = toml::from_str("[catalog]\nbsae_url = \"typo\"\n");
        assert!(result.is_err());
    }
}
