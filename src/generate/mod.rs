//! generate
//!
//! Swappable upstream data producer.
//!
//! # Design
//!
//! In production the input port is fed by an upstream data product;
//! in a demo deployment this module simulates it. The generator sits
//! behind a trait so the ingestion orchestrator never knows which one
//! it is talking to — it receives bytes and a row count, stages them in
//! object storage, and imports the URI.
//!
//! The batch shape mirrors the upstream contract: a set of numerical
//! columns with small random values, a `Total_amount` column holding
//! their row-wise sum, and a `tpep_pickup_datetime` column carrying the
//! cycle's trip date. Payloads are NDJSON, one record per line.

use rand::Rng;

/// A generated batch, ready for staging.
#[derive(Debug, Clone)]
pub struct GeneratedBatch {
    /// NDJSON payload, one record per line.
    pub bytes: Vec<u8>,
    /// Number of records in the payload.
    pub rows: u64,
}

/// Produces one input-port batch per cycle.
pub trait DataGenerator: Send + Sync {
    /// Generate a batch stamped with `trip_date` (DD/MM/YYYY).
    fn generate(&self, trip_date: &str) -> GeneratedBatch;
}

/// Batch generator for the trips input port.
#[derive(Debug, Clone)]
pub struct TripBatchGenerator {
    columns: Vec<String>,
    rows: u64,
}

impl TripBatchGenerator {
    /// Create a generator sized from a payload budget in GiB, assuming
    /// 8 bytes per numerical value (the upstream's columnar sizing).
    pub fn new(columns: Vec<String>, gib_per_iteration: f64) -> Self {
        let n_columns = columns.len().max(1) as f64;
        let rows = ((gib_per_iteration * (1u64 << 30) as f64) / n_columns / 8.0).max(1.0) as u64;
        Self { columns, rows }
    }

    /// Create a generator producing exactly `rows` records per batch.
    pub fn with_rows(columns: Vec<String>, rows: u64) -> Self {
        Self { columns, rows }
    }

    /// Number of records each batch will contain.
    pub fn rows_per_batch(&self) -> u64 {
        self.rows
    }
}

impl DataGenerator for TripBatchGenerator {
    fn generate(&self, trip_date: &str) -> GeneratedBatch {
        let mut rng = rand::rng();
        // Rough per-record size keeps reallocation down for big batches.
        let mut bytes = Vec::with_capacity(self.rows as usize * 96);

        for _ in 0..self.rows {
            let mut record = serde_json::Map::with_capacity(self.columns.len() + 2);
            let mut total: i64 = 0;
            for column in &self.columns {
                let value: i64 = rng.random_range(1..10);
                total += value;
                record.insert(column.clone(), serde_json::Value::from(value));
            }
            record.insert("Total_amount".to_string(), serde_json::Value::from(total));
            record.insert(
                "tpep_pickup_datetime".to_string(),
                serde_json::Value::from(trip_date),
            );

            // Writing a Map through to_vec cannot fail.
            let line = serde_json::to_vec(&serde_json::Value::Object(record))
                .expect("serializing a JSON map is infallible");
            bytes.extend_from_slice(&line);
            bytes.push(b'\n');
        }

        GeneratedBatch {
            bytes,
            rows: self.rows,
        }
    }
}
