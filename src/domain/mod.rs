//! Run configuration and per-request descriptors shared by the engine.
mod run;

#[cfg(test)]
mod tests;

pub use run::{RequestSpec, RunConfig};
