//! pipeline
//!
//! Abstraction for the transformation pipeline execution service.
//!
//! # Modules
//!
//! - `traits`: Core `PipelineService` trait, request/outcome types
//! - [`rest`]: REST API implementation
//! - [`mock`]: Mock implementation for deterministic testing

pub mod mock;
pub mod rest;
mod traits;

pub use traits::*;
