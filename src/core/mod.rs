//! core
//!
//! Domain types, branch naming, and configuration.
//!
//! # Modules
//!
//! - [`types`]: Validated newtypes for branches, namespaces, and tables
//! - [`naming`]: Orchestrator branch-name derivation
//! - [`config`]: Configuration schema and loading

pub mod config;
pub mod naming;
pub mod types;
