use std::collections::HashMap;
use std::fmt;

/// A decoded value captured from one path placeholder
///
/// Converters produce these during matching and consume them during URL
/// reversal. The variant carries the type a handler should see: an `int`
/// placeholder yields [`SegmentValue::Int`], a `list` placeholder yields
/// [`SegmentValue::List`], everything else yields [`SegmentValue::Str`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentValue {
	Str(String),
	Int(i64),
	List(Vec<String>),
}

impl SegmentValue {
	/// Borrow the inner string, if this is a `Str`
	pub fn as_str(&self) -> Option<&str> {
		match self {
			SegmentValue::Str(s) => Some(s),
			_ => None,
		}
	}

	/// Return the inner integer, if this is an `Int`
	pub fn as_int(&self) -> Option<i64> {
		match self {
			SegmentValue::Int(i) => Some(*i),
			_ => None,
		}
	}

	/// Borrow the inner token list, if this is a `List`
	pub fn as_list(&self) -> Option<&[String]> {
		match self {
			SegmentValue::List(items) => Some(items),
			_ => None,
		}
	}
}

impl fmt::Display for SegmentValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SegmentValue::Str(s) => f.write_str(s),
			SegmentValue::Int(i) => write!(f, "{i}"),
			SegmentValue::List(items) => f.write_str(&items.join("+")),
		}
	}
}

impl From<&str> for SegmentValue {
	fn from(value: &str) -> Self {
		SegmentValue::Str(value.to_string())
	}
}

impl From<String> for SegmentValue {
	fn from(value: String) -> Self {
		SegmentValue::Str(value)
	}
}

impl From<i64> for SegmentValue {
	fn from(value: i64) -> Self {
		SegmentValue::Int(value)
	}
}

impl From<Vec<String>> for SegmentValue {
	fn from(value: Vec<String>) -> Self {
		SegmentValue::List(value)
	}
}

impl From<Vec<&str>> for SegmentValue {
	fn from(value: Vec<&str>) -> Self {
		SegmentValue::List(value.into_iter().map(str::to_string).collect())
	}
}

/// Typed path parameters extracted by the router
///
/// # Examples
///
/// ```
/// use beaker_http::{PathParams, SegmentValue};
///
/// let mut params = PathParams::new();
/// params.insert("quote_id", SegmentValue::Int(2));
/// params.insert("usernames", SegmentValue::from(vec!["alice", "bruno"]));
///
/// assert_eq!(params.get_int("quote_id"), Some(2));
/// assert_eq!(
///     params.get_list("usernames"),
///     Some(&["alice".to_string(), "bruno".to_string()][..])
/// );
/// assert_eq!(params.get_str("missing"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
	values: HashMap<String, SegmentValue>,
}

impl PathParams {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&mut self, name: impl Into<String>, value: SegmentValue) {
		self.values.insert(name.into(), value);
	}

	pub fn get(&self, name: &str) -> Option<&SegmentValue> {
		self.values.get(name)
	}

	/// Shorthand for `get(name).and_then(SegmentValue::as_str)`
	pub fn get_str(&self, name: &str) -> Option<&str> {
		self.get(name).and_then(SegmentValue::as_str)
	}

	pub fn get_int(&self, name: &str) -> Option<i64> {
		self.get(name).and_then(SegmentValue::as_int)
	}

	pub fn get_list(&self, name: &str) -> Option<&[String]> {
		self.get(name).and_then(SegmentValue::as_list)
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &SegmentValue)> {
		self.values.iter().map(|(k, v)| (k.as_str(), v))
	}
}

impl FromIterator<(String, SegmentValue)> for PathParams {
	fn from_iter<T: IntoIterator<Item = (String, SegmentValue)>>(iter: T) -> Self {
		Self {
			values: iter.into_iter().collect(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn typed_accessors_reject_wrong_variant() {
		let mut params = PathParams::new();
		params.insert("name", SegmentValue::from("abc"));

		assert_eq!(params.get_str("name"), Some("abc"));
		assert_eq!(params.get_int("name"), None);
		assert_eq!(params.get_list("name"), None);
	}

	#[rstest]
	#[case(SegmentValue::from("solo"), "solo")]
	#[case(SegmentValue::Int(42), "42")]
	#[case(SegmentValue::from(vec!["a", "b", "c"]), "a+b+c")]
	fn display_renders_reversal_shape(#[case] value: SegmentValue, #[case] expected: &str) {
		assert_eq!(value.to_string(), expected);
	}

	#[rstest]
	fn collects_from_pairs() {
		let params: PathParams =
			[("id".to_string(), SegmentValue::Int(7))].into_iter().collect();
		assert_eq!(params.len(), 1);
		assert!(!params.is_empty());
	}
}
