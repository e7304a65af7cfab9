//! Lotfolio Core - Domain entities, services, and traits.
//!
//! This crate contains the FIFO cost-basis ledger, the corporate-action
//! adjustment engine, and the position aggregator. It is database-agnostic
//! and defines traits that are implemented by the `storage-sqlite` crate.

pub mod adjustments;
pub mod constants;
pub mod errors;
pub mod ledger;
pub mod lots;
pub mod positions;
pub mod settings;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
