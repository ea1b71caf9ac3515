//! wap
//!
//! Write-Audit-Publish branch transactions.
//!
//! # Modules
//!
//! - [`txn`]: The `BranchTxn` primitive and `WapError`

pub mod txn;

pub use txn::{BranchTxn, WapError};
