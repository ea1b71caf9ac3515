//! run
//!
//! The two orchestrators and the trigger surface.
//!
//! # Modules
//!
//! - [`ingest`]: lands generated input-port batches (auto-publish)
//! - [`transform`]: runs the pipeline on a sandbox branch
//!   (retain-on-failure)
//! - [`report`]: end-of-cycle report emission
//! - [`trigger`]: one scheduled cycle, wiring the above together

pub mod ingest;
pub mod report;
pub mod transform;
pub mod trigger;

pub use ingest::{IngestError, IngestionOrchestrator};
pub use report::{LogReportSink, ReportSink, RunReport};
pub use transform::{TransformError, TransformOrchestrator};
pub use trigger::{CycleEvent, Trigger};
