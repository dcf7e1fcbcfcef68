//! Minimal HTTP/1.1 server for Beaker applications.
//!
//! Bridges `hyper` onto the framework's [`Handler`](beaker_http::Handler)
//! trait: one root handler answers every request, and framework errors are
//! mapped to HTTP status codes at the edge.

pub mod http;

pub use http::{serve, HttpServer};
