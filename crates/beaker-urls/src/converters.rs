//! Path segment converters.
//!
//! A converter owns one placeholder in a route pattern. It contributes the
//! regex fragment the placeholder matches ([`Converter::segment_regex`]),
//! decodes the captured text into a typed [`SegmentValue`]
//! ([`Converter::to_value`]), and encodes a value back into a path segment
//! during URL reversal ([`Converter::to_segment`]).
//!
//! Converters are looked up by name in a [`ConverterRegistry`], so route
//! patterns can say `<int:quote_id>`, `<list:usernames>`, or
//! `<regex("a.*"):name>` and applications can register their own names.

use beaker_http::SegmentValue;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Everything except RFC 3986 unreserved characters gets percent-encoded.
const TOKEN_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
	.remove(b'-')
	.remove(b'.')
	.remove(b'_')
	.remove(b'~');

/// Percent-encode one token for use inside a path segment
///
/// `+` is encoded too, so tokens survive embedding in a `+`-joined list
/// segment.
///
/// # Examples
///
/// ```
/// use beaker_urls::converters::encode_token;
///
/// assert_eq!(encode_token("alice"), "alice");
/// assert_eq!(encode_token("a b"), "a%20b");
/// assert_eq!(encode_token("a+b"), "a%2Bb");
/// ```
pub fn encode_token(token: &str) -> String {
	utf8_percent_encode(token, TOKEN_ENCODE_SET).to_string()
}

/// Percent-decode one token, lossily for invalid UTF-8
pub fn decode_token(segment: &str) -> String {
	percent_decode_str(segment).decode_utf8_lossy().into_owned()
}

/// Errors raised while resolving or applying converters
#[derive(Debug, Error)]
pub enum ConverterError {
	#[error("unknown converter: {0}")]
	UnknownConverter(String),

	#[error("invalid converter arguments: {0}")]
	Arguments(String),

	#[error("invalid path pattern: {0}")]
	Pattern(String),

	#[error("cannot encode value: {0}")]
	Value(String),

	#[error("cannot decode segment: {0}")]
	Segment(String),
}

pub type ConverterResult<T> = Result<T, ConverterError>;

impl From<ConverterError> for beaker_http::Error {
	fn from(err: ConverterError) -> Self {
		beaker_http::Error::Validation(err.to_string())
	}
}

/// One placeholder's match/decode/encode behaviour
pub trait Converter: Send + Sync {
	/// Regex fragment the pattern compiler embeds for this placeholder
	fn segment_regex(&self) -> &str {
		"[^/]+"
	}

	/// Decode a captured segment into a typed value
	fn to_value(&self, segment: &str) -> ConverterResult<SegmentValue> {
		Ok(SegmentValue::Str(segment.to_string()))
	}

	/// Encode a typed value back into a path segment
	///
	/// The default applies the base per-token percent-encoding to strings
	/// and renders integers in decimal. Lists need a converter that knows
	/// how to join them.
	fn to_segment(&self, value: &SegmentValue) -> ConverterResult<String> {
		match value {
			SegmentValue::Str(s) => Ok(encode_token(s)),
			SegmentValue::Int(i) => Ok(i.to_string()),
			SegmentValue::List(_) => Err(ConverterError::Value(
				"list value needs a list-aware converter".to_string(),
			)),
		}
	}
}

/// Default converter for bare `<name>` placeholders
///
/// Matches any run of non-slash characters and percent-encodes on the way
/// back out.
#[derive(Debug, Clone, Default)]
pub struct StringConverter;

impl Converter for StringConverter {}

/// `<int:name>` — digits only, decoded to [`SegmentValue::Int`]
#[derive(Debug, Clone, Default)]
pub struct IntegerConverter;

impl Converter for IntegerConverter {
	fn segment_regex(&self) -> &str {
		"[0-9]+"
	}

	fn to_value(&self, segment: &str) -> ConverterResult<SegmentValue> {
		segment
			.parse::<i64>()
			.map(SegmentValue::Int)
			.map_err(|e| ConverterError::Segment(format!("not an integer: {segment} ({e})")))
	}

	fn to_segment(&self, value: &SegmentValue) -> ConverterResult<String> {
		match value {
			SegmentValue::Int(i) => Ok(i.to_string()),
			SegmentValue::Str(s) if s.bytes().all(|b| b.is_ascii_digit()) && !s.is_empty() => {
				Ok(s.clone())
			}
			other => Err(ConverterError::Value(format!(
				"integer placeholder cannot encode {other:?}"
			))),
		}
	}
}

/// `<path:name>` — like the default but slashes are allowed
#[derive(Debug, Clone, Default)]
pub struct PathConverter;

impl Converter for PathConverter {
	fn segment_regex(&self) -> &str {
		"[^/].*?"
	}

	fn to_segment(&self, value: &SegmentValue) -> ConverterResult<String> {
		match value {
			// Encode each piece but keep the separators
			SegmentValue::Str(s) => Ok(s
				.split('/')
				.map(encode_token)
				.collect::<Vec<_>>()
				.join("/")),
			other => Err(ConverterError::Value(format!(
				"path placeholder cannot encode {other:?}"
			))),
		}
	}
}

/// `<slug:name>` — letters, digits, hyphens, and underscores
#[derive(Debug, Clone, Default)]
pub struct SlugConverter;

impl Converter for SlugConverter {
	fn segment_regex(&self) -> &str {
		"[-a-zA-Z0-9_]+"
	}
}

/// Converter that matches an arbitrary caller-supplied regex
///
/// Decode and encode are both the identity: the pattern only constrains
/// which paths reach the route, it never transforms the captured text.
/// Registered by applications as `regex`, used as `<regex("a.*"):name>`.
///
/// # Examples
///
/// ```
/// use beaker_urls::converters::{Converter, RegexConverter};
/// use beaker_http::SegmentValue;
///
/// let conv = RegexConverter::new("a.*").unwrap();
/// assert_eq!(conv.segment_regex(), "a.*");
/// assert_eq!(
///     conv.to_value("abc").unwrap(),
///     SegmentValue::Str("abc".to_string())
/// );
/// assert_eq!(
///     conv.to_segment(&SegmentValue::from("a b")).unwrap(),
///     "a b"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct RegexConverter {
	pattern: String,
}

impl RegexConverter {
	/// Store the pattern, rejecting regexes that do not compile
	pub fn new(pattern: impl Into<String>) -> ConverterResult<Self> {
		let pattern = pattern.into();
		Regex::new(&pattern)
			.map_err(|e| ConverterError::Pattern(format!("invalid regex {pattern:?}: {e}")))?;
		Ok(Self { pattern })
	}

	pub fn pattern(&self) -> &str {
		&self.pattern
	}
}

impl Converter for RegexConverter {
	fn segment_regex(&self) -> &str {
		&self.pattern
	}

	fn to_value(&self, segment: &str) -> ConverterResult<SegmentValue> {
		Ok(SegmentValue::Str(segment.to_string()))
	}

	fn to_segment(&self, value: &SegmentValue) -> ConverterResult<String> {
		// Identity on purpose: the caller promises the value already fits
		// the pattern, and the matcher gates everything on the way in.
		match value {
			SegmentValue::Str(s) => Ok(s.clone()),
			SegmentValue::Int(i) => Ok(i.to_string()),
			other => Err(ConverterError::Value(format!(
				"regex placeholder cannot encode {other:?}"
			))),
		}
	}
}

/// Converter for `+`-separated token lists
///
/// `<list:usernames>` turns `/user/alice+bruno/` into
/// `SegmentValue::List(["alice", "bruno"])`. Decoding preserves order,
/// duplicates, and empty tokens; policy such as set semantics belongs in
/// handlers. Encoding percent-encodes each token and joins with `+`, except
/// that a plain `Str` is treated as a single token and never split.
///
/// # Examples
///
/// ```
/// use beaker_urls::converters::{Converter, ListConverter};
/// use beaker_http::SegmentValue;
///
/// let conv = ListConverter;
/// assert_eq!(
///     conv.to_value("alice+bruno").unwrap(),
///     SegmentValue::from(vec!["alice", "bruno"])
/// );
/// assert_eq!(
///     conv.to_segment(&SegmentValue::from(vec!["alice", "bruno"])).unwrap(),
///     "alice+bruno"
/// );
/// // A bare string is one token, even if it looks odd
/// assert_eq!(
///     conv.to_segment(&SegmentValue::from("solo")).unwrap(),
///     "solo"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct ListConverter;

/// Token separator inside a list segment
pub const LIST_DELIMITER: char = '+';

impl Converter for ListConverter {
	fn to_value(&self, segment: &str) -> ConverterResult<SegmentValue> {
		Ok(SegmentValue::List(
			segment.split(LIST_DELIMITER).map(str::to_string).collect(),
		))
	}

	fn to_segment(&self, value: &SegmentValue) -> ConverterResult<String> {
		match value {
			SegmentValue::List(items) => Ok(items
				.iter()
				.map(|item| encode_token(item))
				.collect::<Vec<_>>()
				.join("+")),
			SegmentValue::Str(s) => Ok(encode_token(s)),
			SegmentValue::Int(i) => Ok(i.to_string()),
		}
	}
}

/// Factory producing a converter from the placeholder's argument list
pub type ConverterFactory =
	Arc<dyn Fn(&[String]) -> ConverterResult<Arc<dyn Converter>> + Send + Sync>;

/// Name → converter factory table shared by a router
///
/// # Examples
///
/// ```
/// use beaker_urls::converters::{
///     Converter, ConverterError, ConverterRegistry, RegexConverter,
/// };
/// use std::sync::Arc;
///
/// let mut registry = ConverterRegistry::with_defaults();
/// registry.register("regex", |args| {
///     let pattern = args.first().ok_or_else(|| {
///         ConverterError::Arguments("regex converter needs a pattern".to_string())
///     })?;
///     Ok(Arc::new(RegexConverter::new(pattern.as_str())?) as Arc<dyn Converter>)
/// });
///
/// assert!(registry.contains("regex"));
/// assert!(registry.resolve("regex", &["a.*".to_string()]).is_ok());
/// assert!(registry.resolve("nope", &[]).is_err());
/// ```
#[derive(Clone, Default)]
pub struct ConverterRegistry {
	factories: HashMap<String, ConverterFactory>,
}

impl ConverterRegistry {
	/// Empty registry, no names resolve
	pub fn new() -> Self {
		Self::default()
	}

	/// Registry with the built-in converters: `str`, `int`, `path`, `slug`
	pub fn with_defaults() -> Self {
		let mut registry = Self::new();
		registry.register("str", |args| {
			reject_args("str", args)?;
			Ok(Arc::new(StringConverter) as Arc<dyn Converter>)
		});
		registry.register("int", |args| {
			reject_args("int", args)?;
			Ok(Arc::new(IntegerConverter) as Arc<dyn Converter>)
		});
		registry.register("path", |args| {
			reject_args("path", args)?;
			Ok(Arc::new(PathConverter) as Arc<dyn Converter>)
		});
		registry.register("slug", |args| {
			reject_args("slug", args)?;
			Ok(Arc::new(SlugConverter) as Arc<dyn Converter>)
		});
		registry
	}

	/// Register a factory under a name, replacing any previous entry
	pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
	where
		F: Fn(&[String]) -> ConverterResult<Arc<dyn Converter>> + Send + Sync + 'static,
	{
		self.factories.insert(name.into(), Arc::new(factory));
	}

	/// Build the converter for a placeholder
	pub fn resolve(&self, name: &str, args: &[String]) -> ConverterResult<Arc<dyn Converter>> {
		let factory = self
			.factories
			.get(name)
			.ok_or_else(|| ConverterError::UnknownConverter(name.to_string()))?;
		factory(args)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.factories.contains_key(name)
	}

	/// Converter used for bare `<name>` placeholders
	pub fn default_converter(&self) -> ConverterResult<Arc<dyn Converter>> {
		if self.contains("str") {
			self.resolve("str", &[])
		} else {
			Ok(Arc::new(StringConverter))
		}
	}
}

impl std::fmt::Debug for ConverterRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
		names.sort_unstable();
		f.debug_struct("ConverterRegistry")
			.field("names", &names)
			.finish()
	}
}

fn reject_args(name: &str, args: &[String]) -> ConverterResult<()> {
	if args.is_empty() {
		Ok(())
	} else {
		Err(ConverterError::Arguments(format!(
			"converter {name:?} takes no arguments"
		)))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use rstest::rstest;

	#[rstest]
	#[case("alice", "alice")]
	#[case("a b", "a%20b")]
	#[case("a+b", "a%2Bb")]
	#[case("a/b", "a%2Fb")]
	#[case("", "")]
	fn token_encoding(#[case] token: &str, #[case] encoded: &str) {
		assert_eq!(encode_token(token), encoded);
		assert_eq!(decode_token(encoded), token);
	}

	#[rstest]
	fn regex_converter_is_identity_both_ways() {
		let conv = RegexConverter::new("a.*").unwrap();

		let decoded = conv.to_value("a b/c").unwrap();
		assert_eq!(decoded, SegmentValue::Str("a b/c".to_string()));

		let encoded = conv.to_segment(&SegmentValue::from("a b/c")).unwrap();
		assert_eq!(encoded, "a b/c");
	}

	#[rstest]
	fn regex_converter_rejects_bad_pattern() {
		let err = RegexConverter::new("a(").unwrap_err();
		assert!(matches!(err, ConverterError::Pattern(_)));
	}

	#[rstest]
	#[case("a+b+c", vec!["a", "b", "c"])]
	#[case("solo", vec!["solo"])]
	#[case("", vec![""])]
	#[case("a++b", vec!["a", "", "b"])]
	#[case("dup+dup", vec!["dup", "dup"])]
	fn list_decode_splits_on_plus(#[case] segment: &str, #[case] expected: Vec<&str>) {
		let decoded = ListConverter.to_value(segment).unwrap();
		assert_eq!(decoded, SegmentValue::from(expected));
	}

	#[rstest]
	fn list_encode_joins_and_encodes_tokens() {
		let value = SegmentValue::from(vec!["alice", "bo b", "c+d"]);
		let segment = ListConverter.to_segment(&value).unwrap();
		assert_eq!(segment, "alice+bo%20b+c%2Bd");
	}

	#[rstest]
	fn list_encode_treats_str_as_single_token() {
		let segment = ListConverter
			.to_segment(&SegmentValue::from("solo"))
			.unwrap();
		assert_eq!(segment, "solo");
	}

	#[rstest]
	fn integer_converter_decodes_and_rejects() {
		let decoded = IntegerConverter.to_value("42").unwrap();
		assert_eq!(decoded, SegmentValue::Int(42));

		// 20+ digits overflow i64 and must fail decoding
		let err = IntegerConverter.to_value("99999999999999999999").unwrap_err();
		assert!(matches!(err, ConverterError::Segment(_)));

		let err = IntegerConverter
			.to_segment(&SegmentValue::from("abc"))
			.unwrap_err();
		assert!(matches!(err, ConverterError::Value(_)));
	}

	#[rstest]
	fn path_converter_encodes_pieces_not_separators() {
		let segment = PathConverter
			.to_segment(&SegmentValue::from("docs/read me.txt"))
			.unwrap();
		assert_eq!(segment, "docs/read%20me.txt");
	}

	#[rstest]
	fn registry_defaults_and_unknown_names() {
		let registry = ConverterRegistry::with_defaults();

		for name in ["str", "int", "path", "slug"] {
			assert!(registry.contains(name), "missing builtin {name}");
		}
		assert!(matches!(
			registry.resolve("list", &[]),
			Err(ConverterError::UnknownConverter(_))
		));
		assert!(matches!(
			registry.resolve("int", &["8".to_string()]),
			Err(ConverterError::Arguments(_))
		));
	}

	proptest! {
		/// decode(encode(tokens)) == tokens for non-empty plus-free tokens.
		#[test]
		fn list_round_trip(tokens in proptest::collection::vec("[a-zA-Z0-9_.~-]{1,12}", 1..6)) {
			let value = SegmentValue::List(tokens.clone());
			let segment = ListConverter.to_segment(&value).unwrap();
			let decoded = ListConverter.to_value(&segment).unwrap();
			prop_assert_eq!(decoded, SegmentValue::List(tokens));
		}
	}
}
