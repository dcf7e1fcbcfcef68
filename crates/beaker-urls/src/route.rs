use beaker_http::Handler;
use std::sync::Arc;

/// One entry in a route table
///
/// Routes are built with the constructor plus `with_*` builder methods and
/// handed to a router, which compiles the path into a pattern.
///
/// # Examples
///
/// ```
/// use beaker_urls::Route;
/// use beaker_http::{FunctionHandler, Request, Response};
/// use std::sync::Arc;
///
/// let handler = Arc::new(FunctionHandler::new(|_req: Request| async {
///     Ok(Response::ok())
/// }));
/// let route = Route::new("/user/<list:usernames>/", handler)
///     .with_name("profile")
///     .with_namespace("users");
///
/// assert_eq!(route.full_name(), Some("users:profile".to_string()));
/// ```
#[derive(Clone)]
pub struct Route {
	pub path: String,
	handler: Arc<dyn Handler>,
	pub name: Option<String>,
	pub namespace: Option<String>,
}

impl Route {
	pub fn new(path: impl Into<String>, handler: Arc<dyn Handler>) -> Self {
		Self {
			path: path.into(),
			handler,
			name: None,
			namespace: None,
		}
	}

	/// Name used for URL reversal
	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	/// Namespace prefix, combined with the name as `namespace:name`
	pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
		self.namespace = Some(namespace.into());
		self
	}

	/// `namespace:name` when both are set, bare name otherwise
	pub fn full_name(&self) -> Option<String> {
		match (&self.namespace, &self.name) {
			(Some(ns), Some(name)) => Some(format!("{ns}:{name}")),
			(None, Some(name)) => Some(name.clone()),
			_ => None,
		}
	}

	pub fn handler(&self) -> &Arc<dyn Handler> {
		&self.handler
	}
}

impl std::fmt::Debug for Route {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Route")
			.field("path", &self.path)
			.field("name", &self.name)
			.field("namespace", &self.namespace)
			.finish()
	}
}
