use crate::route::Route;
use beaker_http::Handler;
use std::sync::Arc;

/// Shorthand for [`Route::new`], Django `urls.path` style
///
/// # Examples
///
/// ```
/// use beaker_urls::path;
/// use beaker_http::{FunctionHandler, Request, Response};
/// use std::sync::Arc;
///
/// let handler = Arc::new(FunctionHandler::new(|_req: Request| async {
///     Ok(Response::ok())
/// }));
/// let route = path("/user/<username>/", handler).with_name("profile");
/// assert_eq!(route.path, "/user/<username>/");
/// ```
pub fn path(route_path: impl Into<String>, handler: Arc<dyn Handler>) -> Route {
	Route::new(route_path, handler)
}
