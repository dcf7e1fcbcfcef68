use crate::converters::ConverterRegistry;
use crate::pattern::{PathMatcher, PathPattern};
use crate::reverse::UrlReverser;
use crate::route::Route;
use async_trait::async_trait;
use beaker_http::{Error, Handler, Request, Response, Result, SegmentValue};
use std::collections::HashMap;
use std::sync::Arc;

/// Router trait - composes routes together
pub trait Router: Send + Sync {
	/// Register a route, compiling its path against the converter registry
	fn add_route(&mut self, route: Route) -> Result<()>;

	/// Mount routes from another source with a prefix
	fn mount(&mut self, prefix: &str, routes: Vec<Route>, namespace: Option<String>)
	-> Result<()>;

	/// Handle a request (similar to Handler::handle)
	fn route(&self, request: Request)
	-> impl std::future::Future<Output = Result<Response>> + Send;
}

/// Default router implementation
///
/// Routes are tried in registration order and the first pattern that both
/// matches the path and survives converter decoding wins, so two routes can
/// share a literal prefix and differ only in their placeholder regexes.
///
/// # Examples
///
/// ```
/// use beaker_urls::{path, DefaultRouter, Router};
/// use beaker_http::{FunctionHandler, Request, Response};
/// use std::sync::Arc;
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
/// let handler = Arc::new(FunctionHandler::new(|req: Request| async move {
///     let id = req.path_params.get_int("quote_id").unwrap_or(0);
///     Ok(Response::text(format!("quote {id}")))
/// }));
///
/// let mut router = DefaultRouter::new();
/// router.add_route(path("/quote/<int:quote_id>/", handler)).unwrap();
///
/// let request = Request::builder().uri("/quote/7/").build().unwrap();
/// let response = router.route(request).await.unwrap();
/// assert_eq!(response.body_text(), "quote 7");
/// # });
/// ```
pub struct DefaultRouter {
	routes: Vec<Route>,
	matcher: PathMatcher,
	reverser: UrlReverser,
	converters: Arc<ConverterRegistry>,
}

impl DefaultRouter {
	/// Router with the built-in converters (`str`, `int`, `path`, `slug`)
	pub fn new() -> Self {
		Self::with_converters(ConverterRegistry::with_defaults())
	}

	/// Router with a caller-supplied converter registry
	///
	/// Register custom converters before adding routes; patterns are
	/// compiled at registration time.
	pub fn with_converters(registry: ConverterRegistry) -> Self {
		Self {
			routes: Vec::new(),
			matcher: PathMatcher::new(),
			reverser: UrlReverser::new(),
			converters: Arc::new(registry),
		}
	}

	/// The registry routes are compiled against
	pub fn converters(&self) -> &Arc<ConverterRegistry> {
		&self.converters
	}

	/// URL reverser covering every named route added so far
	pub fn reverser(&self) -> &UrlReverser {
		&self.reverser
	}

	/// Reverse a route name to a path, Django-style
	pub fn reverse(&self, name: &str, params: &HashMap<String, SegmentValue>) -> Result<String> {
		self.reverser.reverse(name, params)
	}

	/// [`reverse`](Self::reverse) with inline parameter pairs
	pub fn reverse_with(&self, name: &str, params: &[(&str, SegmentValue)]) -> Result<String> {
		self.reverser.reverse_with(name, params)
	}

	/// Get all registered routes
	pub fn get_routes(&self) -> &[Route] {
		&self.routes
	}
}

impl Default for DefaultRouter {
	fn default() -> Self {
		Self::new()
	}
}

impl Router for DefaultRouter {
	fn add_route(&mut self, route: Route) -> Result<()> {
		let pattern = PathPattern::new(&route.path, &self.converters)?;

		if let Some(name) = route.full_name() {
			// Reversal needs its own compiled copy of the pattern
			let reverse_pattern = PathPattern::new(&route.path, &self.converters)?;
			self.reverser.register(name, reverse_pattern);
		}

		self.matcher.add_pattern(pattern, self.routes.len());
		self.routes.push(route);
		Ok(())
	}

	fn mount(
		&mut self,
		prefix: &str,
		routes: Vec<Route>,
		namespace: Option<String>,
	) -> Result<()> {
		let prefix = prefix.trim_end_matches('/');

		for mut route in routes {
			route.path = if route.path.starts_with('/') {
				format!("{prefix}{}", route.path)
			} else {
				format!("{prefix}/{}", route.path)
			};
			if let Some(ref ns) = namespace {
				route.namespace = Some(ns.clone());
			}
			self.add_route(route)?;
		}
		Ok(())
	}

	async fn route(&self, mut request: Request) -> Result<Response> {
		let path = request.path().to_string();

		let Some((route_id, params)) = self.matcher.match_path(&path) else {
			tracing::debug!(%path, "no route matched");
			return Err(Error::NotFound(format!("no route found for {path}")));
		};

		let route = &self.routes[route_id];
		tracing::debug!(%path, pattern = %route.path, "dispatching");
		request.path_params = params;
		route.handler().handle(request).await
	}
}

#[async_trait]
impl Handler for DefaultRouter {
	async fn handle(&self, request: Request) -> Result<Response> {
		self.route(request).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::converters::{
		Converter, ConverterError, ListConverter, RegexConverter,
	};
	use crate::helpers::path;
	use beaker_http::FunctionHandler;

	fn demo_registry() -> ConverterRegistry {
		let mut registry = ConverterRegistry::with_defaults();
		registry.register("regex", |args: &[String]| {
			let pattern = args.first().ok_or_else(|| {
				ConverterError::Arguments("regex converter needs a pattern".to_string())
			})?;
			Ok(Arc::new(RegexConverter::new(pattern.as_str())?) as Arc<dyn Converter>)
		});
		registry.register("list", |_args: &[String]| {
			Ok(Arc::new(ListConverter) as Arc<dyn Converter>)
		});
		registry
	}

	fn echo(label: &'static str) -> Arc<dyn Handler> {
		Arc::new(FunctionHandler::new(move |req: Request| async move {
			let name = req.path_params.get_str("name").unwrap_or("").to_string();
			Ok(Response::text(format!("{label}:{name}")))
		}))
	}

	#[tokio::test]
	async fn same_prefix_routes_fall_through_on_regex() {
		let mut router = DefaultRouter::with_converters(demo_registry());
		router
			.add_route(path("/reg/<regex(\"a.*\"):name>/", echo("a")))
			.unwrap();
		router
			.add_route(path("/reg/<regex(\"b.*\"):name>/", echo("b")))
			.unwrap();

		let req = |uri: &str| Request::builder().uri(uri).build().unwrap();

		let response = router.route(req("/reg/abc/")).await.unwrap();
		assert_eq!(response.body_text(), "a:abc");

		let response = router.route(req("/reg/bcd/")).await.unwrap();
		assert_eq!(response.body_text(), "b:bcd");

		let err = router.route(req("/reg/xyz/")).await.unwrap_err();
		assert!(matches!(err, Error::NotFound(_)));
	}

	#[tokio::test]
	async fn list_params_reach_the_handler() {
		let handler = Arc::new(FunctionHandler::new(|req: Request| async move {
			let names = req
				.path_params
				.get_list("usernames")
				.unwrap_or_default()
				.join(",");
			Ok(Response::text(names))
		}));

		let mut router = DefaultRouter::with_converters(demo_registry());
		router
			.add_route(path("/user/<list:usernames>/", handler))
			.unwrap();

		let request = Request::builder()
			.uri("/user/alice+bruno+alice/")
			.build()
			.unwrap();
		let response = router.route(request).await.unwrap();
		assert_eq!(response.body_text(), "alice,bruno,alice");
	}

	#[tokio::test]
	async fn named_routes_reverse_through_the_router() {
		let mut router = DefaultRouter::with_converters(demo_registry());
		router
			.add_route(
				path("/user/<list:usernames>/", echo("profile")).with_name("profile"),
			)
			.unwrap();

		let url = router
			.reverse_with(
				"profile",
				&[("usernames", SegmentValue::from(vec!["alice", "bruno"]))],
			)
			.unwrap();
		assert_eq!(url, "/user/alice+bruno/");
	}

	#[tokio::test]
	async fn mount_prefixes_and_namespaces() {
		let mut router = DefaultRouter::new();
		router
			.mount(
				"/api",
				vec![
					path("/users/", echo("list")).with_name("list"),
					path("/users/<name>/", echo("detail")).with_name("detail"),
				],
				Some("api".to_string()),
			)
			.unwrap();

		assert_eq!(router.get_routes().len(), 2);
		assert_eq!(router.get_routes()[0].path, "/api/users/");
		assert!(router.reverser().contains("api:list"));

		let url = router
			.reverse_with("api:detail", &[("name", SegmentValue::from("alice"))])
			.unwrap();
		assert_eq!(url, "/api/users/alice/");
	}

	#[tokio::test]
	async fn invalid_pattern_is_reported_at_registration() {
		let mut router = DefaultRouter::new();
		let err = router.add_route(path("/x/<list:names>/", echo("x"))).unwrap_err();
		// `list` is not a builtin; applications opt in
		assert!(matches!(err, Error::Validation(_)));
	}
}
