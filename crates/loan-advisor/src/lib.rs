//! Conversational loan eligibility engine: free-text classification, a slot-filling
//! eligibility interview, per-lender evaluation and the HTTP surface over them.

pub mod advisor;
pub mod config;
pub mod error;
pub mod telemetry;

pub use error::AppError;
