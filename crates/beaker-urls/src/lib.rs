//! URL routing for the Beaker framework.
//!
//! Route paths use angle-bracket placeholders resolved against a
//! [`ConverterRegistry`](converters::ConverterRegistry):
//!
//! - `<name>` — default string converter, one non-slash segment
//! - `<int:quote_id>` — digits, decoded to an integer
//! - `<path:filename>` — may span slashes
//! - `<list:usernames>` — `+`-separated tokens (application-registered)
//! - `<regex("a.*"):name>` — segment constrained by an arbitrary regex
//!   (application-registered)
//!
//! Routes are matched in registration order, first match wins, and named
//! routes can be reversed back into URLs with typed parameter values.
//!
//! # Examples
//!
//! ```
//! use beaker_urls::{path, DefaultRouter, Router};
//! use beaker_http::{FunctionHandler, Request, Response};
//! use std::sync::Arc;
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
//! let handler = Arc::new(FunctionHandler::new(|req: Request| async move {
//!     let username = req.path_params.get_str("username").unwrap_or("").to_string();
//!     Ok(Response::html(format!("<h1>{username}</h1>")))
//! }));
//!
//! let mut router = DefaultRouter::new();
//! router
//!     .add_route(path("/user/<username>/", handler).with_name("profile"))
//!     .unwrap();
//!
//! let request = Request::builder().uri("/user/alice/").build().unwrap();
//! let response = router.route(request).await.unwrap();
//! assert_eq!(response.body_text(), "<h1>alice</h1>");
//! # });
//! ```

pub mod converters;
pub mod helpers;
pub mod pattern;
pub mod reverse;
pub mod route;
pub mod router;

pub use converters::{
	Converter, ConverterError, ConverterRegistry, ConverterResult, IntegerConverter,
	ListConverter, PathConverter, RegexConverter, SlugConverter, StringConverter,
};
pub use helpers::path;
pub use pattern::{PathMatcher, PathPattern};
pub use reverse::UrlReverser;
pub use route::Route;
pub use router::{DefaultRouter, Router};
