//! Dispatcher, worker pool and the orchestrator that joins them to the
//! aggregator.
mod dispatcher;
mod pool;
mod runner;


pub use runner::{Engine, run_load_test};
