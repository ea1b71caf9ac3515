//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`BranchName`] - Validated catalog branch name
//! - [`Namespace`] - Validated table namespace
//! - [`TableName`] - Validated table name
//! - [`JobId`] - Opaque pipeline job identifier
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, preventing entire classes of bugs (the classic
//! example being a stray quote character smuggled into a table name by a
//! copy-pasted constant).
//!
//! # Examples
//!
//! ```
//! use landfall::core::types::{BranchName, Namespace, TableName};
//!
//! // Valid constructions
//! let branch = BranchName::new("jamie.ingestion_42caf91e").unwrap();
//! let ns = Namespace::new("tlc_trip_record").unwrap();
//! let table = TableName::new("trips").unwrap();
//!
//! // Invalid constructions fail at creation time
//! assert!(BranchName::new("has space").is_err());
//! assert!(TableName::new("trips'").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("invalid namespace: {0}")]
    InvalidNamespace(String),

    #[error("invalid table name: {0}")]
    InvalidTableName(String),
}

/// A validated catalog branch name.
///
/// Branch names in the catalog follow Git-like refname rules:
/// - Cannot be empty
/// - Cannot start with `.` or `-`
/// - Cannot end with `/`
/// - Cannot contain `..`, whitespace, or ASCII control characters
/// - Cannot contain `~`, `^`, `:`, `\`, `?`, `*`, `[`
///
/// Orchestrator-owned branches additionally embed the owning user and a
/// random suffix (see [`crate::core::naming::derive_branch_name`]), but
/// that convention is not enforced here: the catalog also holds
/// user-created branches with arbitrary valid names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BranchName(String);

impl BranchName {
    /// Create a new validated branch name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidBranchName` if the name violates the
    /// refname rules above.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    fn validate(name: &str) -> Result<(), TypeError> {
        if name.is_empty() {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot be empty".into(),
            ));
        }
        if name.starts_with('.') || name.starts_with('-') {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot start with '.' or '-'".into(),
            ));
        }
        if name.ends_with('/') {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot end with '/'".into(),
            ));
        }
        if name.contains("..") {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot contain '..'".into(),
            ));
        }
        for c in name.chars() {
            if c.is_whitespace() || c.is_control() {
                return Err(TypeError::InvalidBranchName(
                    "branch name cannot contain whitespace or control characters".into(),
                ));
            }
            if matches!(c, '~' | '^' | ':' | '\\' | '?' | '*' | '[') {
                return Err(TypeError::InvalidBranchName(format!(
                    "branch name cannot contain '{}'",
                    c
                )));
            }
        }
        Ok(())
    }

    /// Get the branch name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for BranchName {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BranchName> for String {
    fn from(value: BranchName) -> Self {
        value.0
    }
}

/// Validate an identifier used for namespaces and table names.
///
/// Identifiers must be non-empty and contain only ASCII alphanumerics,
/// `_`, and `-`. This is stricter than most catalogs require, but it
/// keeps quoting out of the wire protocol entirely.
fn validate_identifier(value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err("cannot be empty".into());
    }
    if let Some(c) = value
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
    {
        return Err(format!("cannot contain '{}'", c));
    }
    Ok(())
}

/// A validated table namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Namespace(String);

impl Namespace {
    /// Create a new validated namespace.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidNamespace` for empty values or values
    /// containing characters outside `[A-Za-z0-9_-]`.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        validate_identifier(&name).map_err(TypeError::InvalidNamespace)?;
        Ok(Self(name))
    }

    /// Get the namespace as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Namespace {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Namespace> for String {
    fn from(value: Namespace) -> Self {
        value.0
    }
}

/// A validated table name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TableName(String);

impl TableName {
    /// Create a new validated table name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidTableName` for empty values or values
    /// containing characters outside `[A-Za-z0-9_-]`.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        validate_identifier(&name).map_err(TypeError::InvalidTableName)?;
        Ok(Self(name))
    }

    /// Get the table name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TableName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for TableName {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TableName> for String {
    fn from(value: TableName) -> Self {
        value.0
    }
}

/// An opaque pipeline job identifier, recorded for traceability.
///
/// No structure is assumed; whatever the pipeline service returns is
/// carried through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(String);

impl JobId {
    /// Wrap a job identifier returned by the pipeline service.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the job id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod branch_name {
        use super::*;

        #[test]
        fn valid_names() {
            assert!(BranchName::new("main").is_ok());
            assert!(BranchName::new("jamie.ingestion_42caf91e").is_ok());
            assert!(BranchName::new("jamie.sandbox_trips_0af3").is_ok());
        }

        #[test]
        fn rejects_empty() {
            assert!(BranchName::new("").is_err());
        }

        #[test]
        fn rejects_whitespace_and_control() {
            assert!(BranchName::new("has space").is_err());
            assert!(BranchName::new("tab\there").is_err());
            assert!(BranchName::new("ctrl\u{7}here").is_err());
        }

        #[test]
        fn rejects_bad_edges() {
            assert!(BranchName::new(".hidden").is_err());
            assert!(BranchName::new("-flag").is_err());
            assert!(BranchName::new("trailing/").is_err());
            assert!(BranchName::new("a..b").is_err());
        }

        #[test]
        fn rejects_special_characters() {
            for name in ["a~b", "a^b", "a:b", "a\\b", "a?b", "a*b", "a[b"] {
                assert!(BranchName::new(name).is_err(), "{name} should be invalid");
            }
        }

        #[test]
        fn serde_round_trip() {
            let branch = BranchName::new("jamie.ingestion_abc").unwrap();
            let json = serde_json::to_string(&branch).unwrap();
            let back: BranchName = serde_json::from_str(&json).unwrap();
            assert_eq!(branch, back);
        }

        #[test]
        fn serde_rejects_invalid() {
            let result: Result<BranchName, _> = serde_json::from_str("\"has space\"");
            assert!(result.is_err());
        }
    }

    mod identifiers {
        use super::*;

        #[test]
        fn valid_namespace_and_table() {
            assert!(Namespace::new("tlc_trip_record").is_ok());
            assert!(TableName::new("trips").is_ok());
            assert!(TableName::new("trips-v2").is_ok());
        }

        #[test]
        fn rejects_quote_characters() {
            // The bug class that motivated validation: quoting characters
            // inside a table constant.
            assert!(TableName::new("trips'").is_err());
            assert!(TableName::new("\"trips\"").is_err());
        }

        #[test]
        fn rejects_empty_and_dots() {
            assert!(Namespace::new("").is_err());
            assert!(TableName::new("").is_err());
            assert!(Namespace::new("a.b").is_err());
        }
    }

    mod job_id {
        use super::*;

        #[test]
        fn opaque_round_trip() {
            let id = JobId::new("job-8f2");
            assert_eq!(id.as_str(), "job-8f2");
            assert_eq!(id.to_string(), "job-8f2");
        }
    }
}
