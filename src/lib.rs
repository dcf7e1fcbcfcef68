//! # Beaker
//!
//! A Django-flavoured micro web framework for Rust, centred on a routing
//! layer with pluggable URL path converters.
//!
//! Route paths carry angle-bracket placeholders (`<username>`,
//! `<int:quote_id>`, `<list:usernames>`, `<regex("a.*"):name>`); each
//! placeholder is backed by a converter that contributes its regex to the
//! compiled pattern, decodes matched segments into typed values, and
//! encodes values back into URLs during reversal. Applications can
//! register their own converters alongside the built-ins.
//!
//! The facade re-exports the member crates:
//!
//! - [`http`] — request/response types, the `Handler` trait, framework errors
//! - [`urls`] — converters, path patterns, routers, and URL reversal
//! - [`server`] — a minimal hyper-based HTTP server
//!
//! # Examples
//!
//! ```
//! use beaker::urls::{path, DefaultRouter, Router};
//! use beaker::http::{FunctionHandler, Request, Response};
//! use std::sync::Arc;
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
//! let handler = Arc::new(FunctionHandler::new(|req: Request| async move {
//!     let id = req.path_params.get_int("quote_id").unwrap_or(0);
//!     Ok(Response::text(format!("quote {id}")))
//! }));
//!
//! let mut router = DefaultRouter::new();
//! router.add_route(path("/quote/<int:quote_id>/", handler)).unwrap();
//!
//! let request = Request::builder().uri("/quote/7/").build().unwrap();
//! let response = router.route(request).await.unwrap();
//! assert_eq!(response.body_text(), "quote 7");
//! # });
//! ```

pub use beaker_http as http;
pub use beaker_server as server;
pub use beaker_urls as urls;

pub use beaker_http::{Error, Handler, Request, Response, Result};
pub use beaker_urls::{path, DefaultRouter, Router};
