//! storage
//!
//! Object storage abstraction for staging raw data before import.
//!
//! # Modules
//!
//! - `traits`: Core `ObjectStore` trait and error type
//! - [`http`]: S3-compatible HTTP gateway implementation
//! - [`mock`]: Mock implementation for deterministic testing

pub mod http;
pub mod mock;
mod traits;

pub use traits::*;
