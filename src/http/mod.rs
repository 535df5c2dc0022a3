//! Transport boundary and the reqwest-backed implementation.
mod client;
mod transport;


pub use client::build_client;
pub use transport::{HttpTransport, Transport};
