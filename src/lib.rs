//! Core library for the `volley` CLI.
//!
//! A fixed-size pool of workers drains a bounded queue of request tokens,
//! hands every call to a [`http::Transport`] and streams the outcomes to a
//! single aggregator, which folds them into a [`metrics::Summary`]. The
//! binary wires this to reqwest, the command line and signal handling.
pub mod args;
pub mod config;
pub mod domain;
pub mod engine;
pub mod entry;
pub mod error;
pub mod http;
pub mod metrics;
pub mod report;
pub mod shutdown;
pub mod shutdown_handlers;
mod system;
