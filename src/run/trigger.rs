//! run::trigger
//!
//! One scheduled cycle: ingest, transform, report.
//!
//! # Design
//!
//! The trigger is the outermost seam. Ingestion failure aborts the
//! cycle and propagates: without fresh input-port data there is nothing
//! worth transforming. Transformation failure does NOT abort — the
//! sandbox branch is already retained with the evidence, the failure is
//! logged, and the cycle still completes and reports. The next cycle
//! runs on a fresh branch either way.

use std::collections::BTreeMap;
use std::time::Instant;

use uuid::Uuid;

use super::ingest::{IngestError, IngestionOrchestrator};
use super::report::{ReportSink, RunReport};
use super::transform::TransformOrchestrator;
use crate::catalog::Catalog;
use crate::core::config::Config;
use crate::generate::DataGenerator;
use crate::pipeline::PipelineService;
use crate::source::CodeSource;
use crate::storage::ObjectStore;

/// A triggering event, carrying the correlation id and the trip date
/// stamped into the generated batch.
#[derive(Debug, Clone)]
pub struct CycleEvent {
    pub event_id: String,
    /// DD/MM/YYYY, the upstream's date format.
    pub trip_date: String,
}

impl CycleEvent {
    /// Synthesize an event for the current instant, as the scheduled
    /// entry point does.
    pub fn now() -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            trip_date: chrono::Utc::now().format("%d/%m/%Y").to_string(),
        }
    }
}

/// The trigger surface, wiring the collaborators to the orchestrators.
pub struct Trigger<'a> {
    catalog: &'a dyn Catalog,
    store: &'a dyn ObjectStore,
    pipeline: &'a dyn PipelineService,
    generator: &'a dyn DataGenerator,
    source: &'a CodeSource,
    sink: &'a dyn ReportSink,
    config: &'a Config,
}

impl<'a> Trigger<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        catalog: &'a dyn Catalog,
        store: &'a dyn ObjectStore,
        pipeline: &'a dyn PipelineService,
        generator: &'a dyn DataGenerator,
        source: &'a CodeSource,
        sink: &'a dyn ReportSink,
        config: &'a Config,
    ) -> Self {
        Self {
            catalog,
            store,
            pipeline,
            generator,
            source,
            sink,
            config,
        }
    }

    /// Run one full cycle for `event`. Returns `true` when the cycle
    /// completed, including cycles whose transformation failed.
    ///
    /// # Errors
    ///
    /// Only ingestion failures propagate; they abort the cycle before
    /// any transformation work and before a report is emitted.
    pub async fn handle(&self, event: &CycleEvent) -> Result<bool, IngestError> {
        let started = Instant::now();
        tracing::info!(event_id = %event.event_id, trip_date = %event.trip_date, "Cycle started");

        let ingest = IngestionOrchestrator::new(
            self.catalog,
            self.store,
            self.generator,
            self.config,
        );
        let total_new_rows = ingest.run(&event.trip_date).await?;

        let transform = TransformOrchestrator::new(
            self.catalog,
            self.pipeline,
            self.source,
            self.config,
        );
        match transform.run(BTreeMap::new()).await {
            Ok(job_id) => {
                tracing::info!(job_id = %job_id, "Transformation published");
            }
            Err(e) => {
                // Non-fatal: the sandbox branch holds the failed state.
                tracing::error!(error = %e, "Transformation failed; cycle continues");
            }
        }

        let report = RunReport {
            duration_ms: started.elapsed().as_millis() as u64,
            epoch_ms: chrono::Utc::now().timestamp_millis(),
            event_id: event.event_id.clone(),
            total_new_rows,
        };
        self.sink.emit(&report);
        tracing::info!(event_id = %event.event_id, rows = total_new_rows, "Cycle completed");

        Ok(true)
    }
}
