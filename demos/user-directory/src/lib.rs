//! Demo application for custom path converters.
//!
//! Registers two application-level converters with the router:
//!
//! - `regex` — `<regex("a.*"):name>` constrains a segment with an arbitrary
//!   pattern, so two routes can share a prefix and differ only in what they
//!   accept.
//! - `list` — `<list:usernames>` captures `+`-separated tokens as a list,
//!   e.g. `/user/alice+bruno/`.
//!
//! The rest is a small user directory rendered as inline HTML.

pub mod db;
pub mod handlers;

use beaker_http::Result;
use beaker_urls::converters::{Converter, ConverterError, ConverterRegistry};
use beaker_urls::{path, DefaultRouter, ListConverter, RegexConverter, Router, UrlReverser};
use db::UserDirectory;
use handlers::{FilePathHandler, IndexHandler, PrefixedNameHandler, ProfileHandler, QuoteHandler};
use std::sync::Arc;

const INDEX: &str = "/";
const PROFILE: &str = "/user/<list:usernames>/";
const QUOTE: &str = "/user/<username>/<int:quote_id>/";
const FILE: &str = "/file/<path:filename>/";
const REG_A: &str = "/reg/<regex(\"a.*\"):name>/";
const REG_B: &str = "/reg/<regex(\"b.*\"):name>/";

/// Built-in converters plus the demo's `regex` and `list` converters
pub fn converter_registry() -> ConverterRegistry {
	let mut registry = ConverterRegistry::with_defaults();
	registry.register("regex", |args: &[String]| match args {
		[pattern] => Ok(Arc::new(RegexConverter::new(pattern.as_str())?) as Arc<dyn Converter>),
		_ => Err(ConverterError::Arguments(
			"regex converter takes exactly one pattern argument".to_string(),
		)),
	});
	registry.register("list", |args: &[String]| {
		if args.is_empty() {
			Ok(Arc::new(ListConverter) as Arc<dyn Converter>)
		} else {
			Err(ConverterError::Arguments(
				"list converter takes no arguments".to_string(),
			))
		}
	});
	registry
}

/// Build the demo router over the sample data set
pub fn create_app() -> Result<DefaultRouter> {
	create_app_with(Arc::new(UserDirectory::sample()))
}

/// Build the demo router over a caller-supplied directory
pub fn create_app_with(directory: Arc<UserDirectory>) -> Result<DefaultRouter> {
	let registry = converter_registry();

	// Handlers link between pages, so they get their own reverser built
	// from the same route table before the router takes ownership.
	let mut urls = UrlReverser::new();
	urls.register_path("index", INDEX, &registry)?;
	urls.register_path("profile", PROFILE, &registry)?;
	urls.register_path("quote", QUOTE, &registry)?;
	let urls = Arc::new(urls);

	let mut router = DefaultRouter::with_converters(registry);
	router.add_route(
		path(
			INDEX,
			Arc::new(IndexHandler {
				directory: directory.clone(),
				urls: urls.clone(),
			}),
		)
		.with_name("index"),
	)?;
	router.add_route(
		path(
			PROFILE,
			Arc::new(ProfileHandler {
				directory: directory.clone(),
				urls: urls.clone(),
			}),
		)
		.with_name("profile"),
	)?;
	router.add_route(
		path(
			QUOTE,
			Arc::new(QuoteHandler {
				directory: directory.clone(),
			}),
		)
		.with_name("quote"),
	)?;
	router.add_route(path(FILE, Arc::new(FilePathHandler)).with_name("filepath"))?;
	router.add_route(
		path(REG_A, Arc::new(PrefixedNameHandler { letter: 'a' })).with_name("reg_a"),
	)?;
	router.add_route(
		path(REG_B, Arc::new(PrefixedNameHandler { letter: 'b' })).with_name("reg_b"),
	)?;

	Ok(router)
}

#[cfg(test)]
mod tests {
	use super::*;
	use beaker_http::{Error, Request, Response};

	async fn dispatch(uri: &str) -> Result<Response> {
		let router = create_app()?;
		let request = Request::builder().uri(uri).build()?;
		router.route(request).await
	}

	#[tokio::test]
	async fn index_links_every_profile() {
		let body = dispatch("/").await.unwrap().body_text();
		assert!(body.contains("<a href=\"/user/alice/\">alice</a>"));
		assert!(body.contains("<a href=\"/user/bruno/\">bruno</a>"));
		assert!(body.contains("<a href=\"/user/clara/\">clara</a>"));
		// The "everyone" link reverses a list value
		assert!(body.contains("/user/alice+bruno+clara/"));
	}

	#[tokio::test]
	async fn profile_renders_each_requested_user() {
		let body = dispatch("/user/alice+bruno/").await.unwrap().body_text();
		assert!(body.contains("Alice Martin"));
		assert!(body.contains("Bruno Costa"));
		assert!(!body.contains("Clara Reyes"));
	}

	#[tokio::test]
	async fn profile_collapses_duplicate_usernames() {
		let body = dispatch("/user/alice+alice+alice/").await.unwrap().body_text();
		assert_eq!(body.matches("Alice Martin").count(), 1);
	}

	#[tokio::test]
	async fn profile_with_unknown_user_is_404() {
		let err = dispatch("/user/alice+nobody/").await.unwrap_err();
		assert!(matches!(err, Error::NotFound(_)));
	}

	#[tokio::test]
	async fn quote_route_decodes_typed_params() {
		let body = dispatch("/user/clara/3/").await.unwrap().body_text();
		assert!(body.contains("Then, write the code."));

		let err = dispatch("/user/clara/9/").await.unwrap_err();
		assert!(matches!(err, Error::NotFound(_)));
	}

	#[tokio::test]
	async fn file_route_spans_slashes() {
		let body = dispatch("/file/docs/readme.txt/").await.unwrap().body_text();
		assert_eq!(body, "Received path argument: docs/readme.txt");
	}

	#[tokio::test]
	async fn regex_routes_scope_by_prefix() {
		let body = dispatch("/reg/abc/").await.unwrap().body_text();
		assert_eq!(body, "Argument starting with 'a': abc");

		let body = dispatch("/reg/bcd/").await.unwrap().body_text();
		assert_eq!(body, "Argument starting with 'b': bcd");

		let err = dispatch("/reg/xyz/").await.unwrap_err();
		assert!(matches!(err, Error::NotFound(_)));
	}

	#[tokio::test]
	async fn router_reverser_matches_handler_reverser() {
		let router = create_app().unwrap();
		let url = router
			.reverse_with(
				"profile",
				&[(
					"usernames",
					beaker_http::SegmentValue::from(vec!["alice", "bruno"]),
				)],
			)
			.unwrap();
		assert_eq!(url, "/user/alice+bruno/");
	}
}
