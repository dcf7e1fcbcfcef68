//! HTTP primitives for the Beaker framework.
//!
//! This crate defines the request/response types every other Beaker crate
//! speaks: [`Request`], [`Response`], the async [`Handler`] trait, the
//! framework [`Error`] enum, and the typed [`PathParams`] a router injects
//! into a matched request.

pub mod exception;
pub mod handler;
pub mod params;
pub mod request;
pub mod response;

pub use exception::{Error, Result};
pub use handler::{FunctionHandler, Handler};
pub use params::{PathParams, SegmentValue};
pub use request::{Request, RequestBuilder};
pub use response::Response;
