//! Landfall binary entry point.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    landfall::cli::run().await
}
