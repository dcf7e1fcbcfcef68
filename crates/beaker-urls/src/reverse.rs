//! URL reversal: route name to concrete path.
//!
//! The reverser keeps compiled patterns keyed by route name (or
//! `namespace:name`) and rebuilds a path by encoding each supplied
//! [`SegmentValue`] through the placeholder's converter. This is the
//! framework's equivalent of Django's `reverse()`.

use crate::converters::ConverterRegistry;
use crate::pattern::PathPattern;
use beaker_http::{Error, Result, SegmentValue};
use std::collections::HashMap;

/// Name → pattern table for URL reversal
///
/// # Examples
///
/// ```
/// use beaker_urls::converters::ConverterRegistry;
/// use beaker_urls::UrlReverser;
/// use beaker_http::SegmentValue;
///
/// let registry = ConverterRegistry::with_defaults();
/// let mut reverser = UrlReverser::new();
/// reverser
///     .register_path("quote", "/user/<username>/<int:quote_id>/", &registry)
///     .unwrap();
///
/// let url = reverser
///     .reverse_with("quote", &[
///         ("username", SegmentValue::from("alice")),
///         ("quote_id", SegmentValue::Int(2)),
///     ])
///     .unwrap();
/// assert_eq!(url, "/user/alice/2/");
/// ```
#[derive(Debug, Default)]
pub struct UrlReverser {
	routes: HashMap<String, PathPattern>,
}

impl UrlReverser {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register an already compiled pattern under a name
	pub fn register(&mut self, name: impl Into<String>, pattern: PathPattern) {
		self.routes.insert(name.into(), pattern);
	}

	/// Compile and register a raw path, for use outside a router
	pub fn register_path(
		&mut self,
		name: impl Into<String>,
		path: &str,
		registry: &ConverterRegistry,
	) -> Result<()> {
		let pattern = PathPattern::new(path, registry)?;
		self.register(name, pattern);
		Ok(())
	}

	/// Build the URL for a named route
	pub fn reverse(&self, name: &str, params: &HashMap<String, SegmentValue>) -> Result<String> {
		let pattern = self
			.routes
			.get(name)
			.ok_or_else(|| Error::NotFound(format!("no route named {name:?}")))?;
		Ok(pattern.reverse(params)?)
	}

	/// [`reverse`](Self::reverse) with inline parameter pairs
	pub fn reverse_with(&self, name: &str, params: &[(&str, SegmentValue)]) -> Result<String> {
		let params: HashMap<String, SegmentValue> = params
			.iter()
			.map(|(k, v)| (k.to_string(), v.clone()))
			.collect();
		self.reverse(name, &params)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.routes.contains_key(name)
	}

	pub fn route_names(&self) -> impl Iterator<Item = &str> {
		self.routes.keys().map(String::as_str)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::converters::{
		Converter, ConverterError, ConverterRegistry, ListConverter, RegexConverter,
	};
	use rstest::{fixture, rstest};
	use std::sync::Arc;

	#[fixture]
	fn reverser() -> UrlReverser {
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

		let mut reverser = UrlReverser::new();
		reverser.register_path("index", "/", &registry).unwrap();
		reverser
			.register_path("profile", "/user/<list:usernames>/", &registry)
			.unwrap();
		reverser
			.register_path("reg_a", "/reg/<regex(\"a.*\"):name>/", &registry)
			.unwrap();
		reverser
	}

	#[rstest]
	fn reverses_static_route(reverser: UrlReverser) {
		assert_eq!(reverser.reverse("index", &HashMap::new()).unwrap(), "/");
	}

	#[rstest]
	fn reverses_list_value_to_joined_segment(reverser: UrlReverser) {
		let url = reverser
			.reverse_with(
				"profile",
				&[("usernames", SegmentValue::from(vec!["alice", "bruno"]))],
			)
			.unwrap();
		assert_eq!(url, "/user/alice+bruno/");
	}

	#[rstest]
	fn reverses_solo_string_without_splitting(reverser: UrlReverser) {
		let url = reverser
			.reverse_with("profile", &[("usernames", SegmentValue::from("alice"))])
			.unwrap();
		assert_eq!(url, "/user/alice/");
	}

	#[rstest]
	fn regex_route_reverses_by_identity(reverser: UrlReverser) {
		let url = reverser
			.reverse_with("reg_a", &[("name", SegmentValue::from("abc"))])
			.unwrap();
		assert_eq!(url, "/reg/abc/");
	}

	#[rstest]
	fn unknown_name_is_not_found(reverser: UrlReverser) {
		let err = reverser.reverse("missing", &HashMap::new()).unwrap_err();
		assert!(matches!(err, Error::NotFound(_)));
	}

	#[rstest]
	fn missing_parameter_is_validation_error(reverser: UrlReverser) {
		let err = reverser.reverse("profile", &HashMap::new()).unwrap_err();
		assert!(matches!(err, Error::Validation(_)));
	}
}
