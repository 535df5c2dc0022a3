//! Outcome aggregation and latency histogram utilities.
mod aggregator;
mod histogram;
mod types;


pub use aggregator::{Aggregator, ERROR_DETAILS_CAP, spawn_aggregator};
pub use histogram::LatencyHistogram;
pub use types::{Outcome, Summary};
