//! Landfall - Write-Audit-Publish orchestration for versioned tables
//!
//! Landfall lands new data into a shared, versioned table store without
//! ever exposing partially-validated or failed writes to downstream
//! consumers. Every write happens on an isolated branch; only branches
//! whose work succeeded are merged into the trunk.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to run)
//! - [`run`] - The ingestion and transformation orchestrators, report,
//!   and trigger
//! - [`wap`] - The branch-scoped transaction primitive
//! - [`core`] - Domain types, branch naming, and configuration
//! - [`catalog`] - Abstraction for the versioned table catalog
//! - [`storage`] - Abstraction for staging object storage
//! - [`pipeline`] - Abstraction for the pipeline execution service
//! - [`source`] - Checkout of the transformation project via git
//! - [`generate`] - Swappable upstream data producer
//!
//! # Correctness Invariants
//!
//! Landfall maintains the following invariants:
//!
//! 1. The trunk only ever changes through a successful merge of an
//!    isolated branch
//! 2. A branch is merged at most once, and never after a failed import
//!    or pipeline run
//! 3. The orchestrator that creates a branch exclusively owns its
//!    merge/delete decision
//! 4. A failed transformation retains its sandbox branch; a fresh name
//!    per cycle means retention never blocks re-runs

pub mod catalog;
pub mod cli;
pub mod core;
pub mod generate;
pub mod pipeline;
pub mod run;
pub mod source;
pub mod storage;
pub mod wap;
