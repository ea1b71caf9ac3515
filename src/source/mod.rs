//! source
//!
//! Checkout of the transformation project from its code repository.
//!
//! # Architecture
//!
//! This module is the only doorway to `git2`. The transformation
//! pipeline's definition lives in a remote repository; each cycle
//! checks out the latest revision into an ephemeral directory so the
//! run always executes the current logic. The checkout is validated by
//! the presence of the product descriptor at the repository root — a
//! missing descriptor is a setup error, caught before any branch is
//! created.
//!
//! # Example
//!
//! ```ignore
//! use landfall::source::CodeSource;
//! use std::path::Path;
//!
//! let source = CodeSource::new(
//!     "https://example.com/data-product.git",
//!     Path::new("src/pipeline"),
//! );
//! let project = source.checkout()?;
//! println!("pipeline at {}", project.pipeline_dir().display());
//! // The checkout directory is removed when `project` is dropped.
//! ```

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use thiserror::Error;

/// File that must exist at the repository root for the checkout to be
/// considered a valid data product.
pub const DESCRIPTOR_FILE: &str = "data-product-descriptor.json";

/// Errors from project checkout.
#[derive(Debug, Error)]
pub enum SetupError {
    /// Cloning the repository failed.
    #[error("failed to clone '{url}': {message}")]
    CloneFailed {
        /// Repository URL
        url: String,
        /// Error message from git
        message: String,
    },

    /// The descriptor file was not found at the repository root.
    #[error("descriptor '{DESCRIPTOR_FILE}' not found in repository")]
    MissingDescriptor,

    /// The configured pipeline directory does not exist in the checkout.
    #[error("pipeline directory '{0}' not found in repository")]
    MissingPipelineDir(PathBuf),

    /// Filesystem error while preparing the checkout directory.
    #[error("checkout directory error: {0}")]
    Io(#[from] std::io::Error),
}

/// A validated, ephemeral checkout of the transformation project.
///
/// Holds the temporary directory open; dropping the value removes the
/// checkout.
#[derive(Debug)]
pub struct CheckedOutProject {
    // Field order matters for Drop: paths point into `dir`.
    pipeline_dir: PathBuf,
    repo_dir: PathBuf,
    _dir: TempDir,
}

impl CheckedOutProject {
    /// Path of the pipeline project inside the checkout.
    pub fn pipeline_dir(&self) -> &Path {
        &self.pipeline_dir
    }

    /// Path of the repository root.
    pub fn repo_dir(&self) -> &Path {
        &self.repo_dir
    }
}

/// Fetches the transformation project from its repository.
#[derive(Debug, Clone)]
pub struct CodeSource {
    url: String,
    pipeline_subdir: PathBuf,
}

impl CodeSource {
    /// Create a code source for `url`, with the pipeline project at
    /// `pipeline_subdir` inside the repository.
    pub fn new(url: impl Into<String>, pipeline_subdir: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            pipeline_subdir: pipeline_subdir.into(),
        }
    }

    /// Clone the repository and validate the checkout.
    ///
    /// # Errors
    ///
    /// - `CloneFailed` if git cannot clone the repository
    /// - `MissingDescriptor` if the descriptor file is absent
    /// - `MissingPipelineDir` if the pipeline directory is absent
    pub fn checkout(&self) -> Result<CheckedOutProject, SetupError> {
        let dir = TempDir::new()?;
        let repo_dir = dir.path().join("repo");

        git2::Repository::clone(&self.url, &repo_dir).map_err(|e| SetupError::CloneFailed {
            url: self.url.clone(),
            message: e.message().to_string(),
        })?;
        tracing::debug!(url = %self.url, path = %repo_dir.display(), "Repository cloned");

        if !repo_dir.join(DESCRIPTOR_FILE).exists() {
            return Err(SetupError::MissingDescriptor);
        }

        let pipeline_dir = repo_dir.join(&self.pipeline_subdir);
        if !pipeline_dir.is_dir() {
            return Err(SetupError::MissingPipelineDir(self.pipeline_subdir.clone()));
        }

        Ok(CheckedOutProject {
            pipeline_dir,
            repo_dir,
            _dir: dir,
        })
    }
}
