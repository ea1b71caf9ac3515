//! catalog
//!
//! Abstraction for the Git-like versioned table store.
//!
//! # Architecture
//!
//! The `Catalog` trait defines branch and table operations against the
//! table store. Orchestrators depend on the trait, never on a concrete
//! client, and the catalog client is constructed once at process start
//! and injected (no module-level globals).
//!
//! Import and merge report *structured outcomes* distinct from
//! transport errors: a rejected merge is a normal, handleable result,
//! because the catalog's merge is the only synchronization primitive in
//! the system.
//!
//! # Modules
//!
//! - `traits`: Core `Catalog` trait, outcome types, and error type
//! - [`rest`]: REST API implementation
//! - [`mock`]: Mock implementation for deterministic testing

pub mod mock;
pub mod rest;
mod traits;

pub use traits::*;
