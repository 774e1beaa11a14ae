//! Core traits for the Pi-hole client
//!
//! This module defines the abstract seams of the dispatch layer.
//!
//! - [`Transport`]: Perform HTTP exchanges
//! - [`WireAdapter`]: Shape requests for one API generation

pub mod transport;
pub mod wire_adapter;

pub use transport::{HttpRequest, HttpResponse, Method, Transport};
pub use wire_adapter::{Target, WireAdapter, redact_path};
