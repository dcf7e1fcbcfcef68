//! Route pattern compilation and matching.
//!
//! A [`PathPattern`] parses placeholder syntax (`<name>`, `<conv:name>`,
//! `<conv(args):name>`), compiles it into a single anchored regex with one
//! named capture group per placeholder, and decodes captured segments
//! through the placeholder's converter. A [`PathMatcher`] keeps patterns in
//! registration order and returns the first match, so a route whose regex
//! rejects a path falls through to the next route with the same prefix.

use crate::converters::{Converter, ConverterError, ConverterRegistry, ConverterResult};
use beaker_http::{PathParams, SegmentValue};
use regex::RegexBuilder;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Patterns longer than this are rejected outright.
const MAX_PATTERN_LENGTH: usize = 1024;
/// Cap on `/`-separated segments, matching the request path limit.
const MAX_PATH_SEGMENTS: usize = 32;
/// Compiled regex size limit; keeps hostile converter args from exploding.
const MAX_COMPILED_REGEX_SIZE: usize = 1 << 20;

#[derive(Debug)]
enum Part {
	Literal(String),
	/// Index into `PathPattern::placeholders`
	Placeholder(usize),
}

struct Placeholder {
	name: String,
	converter: Arc<dyn Converter>,
}

impl std::fmt::Debug for Placeholder {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Placeholder")
			.field("name", &self.name)
			.field("regex", &self.converter.segment_regex())
			.finish()
	}
}

/// A compiled route pattern
///
/// # Examples
///
/// ```
/// use beaker_urls::converters::ConverterRegistry;
/// use beaker_urls::pattern::PathPattern;
///
/// let registry = ConverterRegistry::with_defaults();
/// let pattern = PathPattern::new("/user/<username>/<int:quote_id>/", &registry).unwrap();
///
/// let params = pattern.matches("/user/alice/2/").unwrap();
/// assert_eq!(params.get_str("username"), Some("alice"));
/// assert_eq!(params.get_int("quote_id"), Some(2));
/// assert!(pattern.matches("/user/alice/two/").is_none());
/// ```
#[derive(Debug)]
pub struct PathPattern {
	pattern: String,
	regex: regex::Regex,
	parts: Vec<Part>,
	placeholders: Vec<Placeholder>,
}

impl PathPattern {
	/// Parse and compile a pattern, resolving converters from the registry
	pub fn new(pattern: &str, registry: &ConverterRegistry) -> ConverterResult<Self> {
		if pattern.len() > MAX_PATTERN_LENGTH {
			return Err(ConverterError::Pattern(format!(
				"pattern exceeds {MAX_PATTERN_LENGTH} bytes"
			)));
		}
		if pattern.split('/').count() > MAX_PATH_SEGMENTS {
			return Err(ConverterError::Pattern(format!(
				"pattern exceeds {MAX_PATH_SEGMENTS} segments"
			)));
		}

		let (parts, placeholders) = Self::parse(pattern, registry)?;

		let mut regex_str = String::with_capacity(pattern.len() * 2);
		regex_str.push('^');
		for part in &parts {
			match part {
				Part::Literal(text) => regex_str.push_str(&regex::escape(text)),
				Part::Placeholder(idx) => {
					let ph = &placeholders[*idx];
					regex_str.push_str("(?P<");
					regex_str.push_str(&ph.name);
					regex_str.push('>');
					regex_str.push_str(ph.converter.segment_regex());
					regex_str.push(')');
				}
			}
		}
		regex_str.push('$');

		let regex = RegexBuilder::new(&regex_str)
			.size_limit(MAX_COMPILED_REGEX_SIZE)
			.build()
			.map_err(|e| {
				ConverterError::Pattern(format!("pattern {pattern:?} does not compile: {e}"))
			})?;

		Ok(Self {
			pattern: pattern.to_string(),
			regex,
			parts,
			placeholders,
		})
	}

	fn parse(
		pattern: &str,
		registry: &ConverterRegistry,
	) -> ConverterResult<(Vec<Part>, Vec<Placeholder>)> {
		let mut parts = Vec::new();
		let mut placeholders: Vec<Placeholder> = Vec::new();
		let mut seen: HashSet<String> = HashSet::new();
		let mut literal = String::new();
		let mut chars = pattern.char_indices();

		while let Some((start, ch)) = chars.next() {
			if ch != '<' {
				if ch == '>' {
					return Err(ConverterError::Pattern(format!(
						"unmatched '>' at byte {start} in {pattern:?}"
					)));
				}
				literal.push(ch);
				continue;
			}

			// Scan to the closing '>', ignoring any inside quoted args
			let mut end = None;
			let mut in_quotes = false;
			let mut escaped = false;
			for (idx, c) in chars.by_ref() {
				if escaped {
					escaped = false;
					continue;
				}
				match c {
					'\\' if in_quotes => escaped = true,
					'"' => in_quotes = !in_quotes,
					'>' if !in_quotes => {
						end = Some(idx);
						break;
					}
					_ => {}
				}
			}
			let end = end.ok_or_else(|| {
				ConverterError::Pattern(format!("unclosed '<' at byte {start} in {pattern:?}"))
			})?;

			if !literal.is_empty() {
				parts.push(Part::Literal(std::mem::take(&mut literal)));
			}

			let body = &pattern[start + 1..end];
			let (name, converter) = Self::parse_placeholder(body, registry)?;
			if !seen.insert(name.clone()) {
				return Err(ConverterError::Pattern(format!(
					"duplicate placeholder {name:?} in {pattern:?}"
				)));
			}
			parts.push(Part::Placeholder(placeholders.len()));
			placeholders.push(Placeholder { name, converter });
		}

		if !literal.is_empty() {
			parts.push(Part::Literal(literal));
		}
		Ok((parts, placeholders))
	}

	/// Parse one `name` / `conv:name` / `conv(args):name` placeholder body
	fn parse_placeholder(
		body: &str,
		registry: &ConverterRegistry,
	) -> ConverterResult<(String, Arc<dyn Converter>)> {
		let colon = find_top_level_colon(body);
		let (conv_spec, name) = match colon {
			Some(idx) => (Some(&body[..idx]), &body[idx + 1..]),
			None => (None, body),
		};

		let name = name.trim();
		validate_param_name(name)?;

		let converter = match conv_spec {
			None => registry.default_converter()?,
			Some(conv_spec) => {
				let conv_spec = conv_spec.trim();
				let (conv_name, args) = match conv_spec.find('(') {
					None => (conv_spec, Vec::new()),
					Some(paren) => {
						let conv_name = &conv_spec[..paren];
						let rest = &conv_spec[paren..];
						if !rest.ends_with(')') {
							return Err(ConverterError::Pattern(format!(
								"malformed converter arguments in {body:?}"
							)));
						}
						(conv_name, parse_args(&rest[1..rest.len() - 1])?)
					}
				};
				registry.resolve(conv_name, &args)?
			}
		};

		Ok((name.to_string(), converter))
	}

	/// Match a path, decoding captures through their converters
	///
	/// Returns `None` when the regex does not match or a converter rejects
	/// its segment, so callers can fall through to the next route.
	pub fn matches(&self, path: &str) -> Option<PathParams> {
		let caps = self.regex.captures(path)?;
		let mut params = PathParams::new();
		for ph in &self.placeholders {
			let segment = caps.name(&ph.name)?.as_str();
			match ph.converter.to_value(segment) {
				Ok(value) => params.insert(ph.name.clone(), value),
				Err(err) => {
					tracing::debug!(
						pattern = %self.pattern,
						placeholder = %ph.name,
						%segment,
						%err,
						"segment rejected by converter"
					);
					return None;
				}
			}
		}
		Some(params)
	}

	pub fn is_match(&self, path: &str) -> bool {
		self.matches(path).is_some()
	}

	/// Rebuild a concrete path from parameter values
	///
	/// Every placeholder must be present in `params`; each value is encoded
	/// by the placeholder's converter.
	pub fn reverse(&self, params: &HashMap<String, SegmentValue>) -> ConverterResult<String> {
		let mut out = String::with_capacity(self.pattern.len());
		for part in &self.parts {
			match part {
				Part::Literal(text) => out.push_str(text),
				Part::Placeholder(idx) => {
					let ph = &self.placeholders[*idx];
					let value = params.get(&ph.name).ok_or_else(|| {
						ConverterError::Value(format!(
							"missing parameter {:?} for pattern {:?}",
							ph.name, self.pattern
						))
					})?;
					let segment = ph.converter.to_segment(value)?;
					validate_reverse_segment(&ph.name, &segment)?;
					out.push_str(&segment);
				}
			}
		}
		Ok(out)
	}

	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	pub fn param_names(&self) -> Vec<&str> {
		self.placeholders.iter().map(|ph| ph.name.as_str()).collect()
	}
}

/// Ordered pattern table with first-match-wins semantics
#[derive(Debug, Default)]
pub struct PathMatcher {
	patterns: Vec<(PathPattern, usize)>,
}

impl PathMatcher {
	pub fn new() -> Self {
		Self::default()
	}

	/// Append a pattern tagged with the caller's route id
	pub fn add_pattern(&mut self, pattern: PathPattern, route_id: usize) {
		self.patterns.push((pattern, route_id));
	}

	/// First registered pattern that accepts the path
	pub fn match_path(&self, path: &str) -> Option<(usize, PathParams)> {
		self.patterns
			.iter()
			.find_map(|(pattern, id)| pattern.matches(path).map(|params| (*id, params)))
	}

	pub fn len(&self) -> usize {
		self.patterns.len()
	}

	pub fn is_empty(&self) -> bool {
		self.patterns.is_empty()
	}
}

fn find_top_level_colon(body: &str) -> Option<usize> {
	let mut depth = 0usize;
	let mut in_quotes = false;
	let mut escaped = false;
	for (idx, c) in body.char_indices() {
		if escaped {
			escaped = false;
			continue;
		}
		match c {
			'\\' if in_quotes => escaped = true,
			'"' => in_quotes = !in_quotes,
			'(' if !in_quotes => depth += 1,
			')' if !in_quotes => depth = depth.saturating_sub(1),
			':' if !in_quotes && depth == 0 => return Some(idx),
			_ => {}
		}
	}
	None
}

/// Split a converter argument list on top-level commas, unquoting strings
fn parse_args(raw: &str) -> ConverterResult<Vec<String>> {
	let raw = raw.trim();
	if raw.is_empty() {
		return Ok(Vec::new());
	}

	let mut args = Vec::new();
	let mut current = String::new();
	let mut in_quotes = false;
	let mut escaped = false;
	for c in raw.chars() {
		if escaped {
			current.push(c);
			escaped = false;
			continue;
		}
		match c {
			'\\' if in_quotes => escaped = true,
			'"' => in_quotes = !in_quotes,
			',' if !in_quotes => {
				args.push(std::mem::take(&mut current).trim().to_string());
			}
			_ => current.push(c),
		}
	}
	if in_quotes {
		return Err(ConverterError::Pattern(format!(
			"unterminated string in converter arguments: {raw:?}"
		)));
	}
	args.push(current.trim().to_string());
	Ok(args)
}

/// Placeholder names become regex capture group names, so keep them strict
fn validate_param_name(name: &str) -> ConverterResult<()> {
	let mut chars = name.chars();
	let valid = match chars.next() {
		Some(first) => {
			(first.is_ascii_alphabetic() || first == '_')
				&& chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
		}
		None => false,
	};
	if valid {
		Ok(())
	} else {
		Err(ConverterError::Pattern(format!(
			"invalid placeholder name {name:?}"
		)))
	}
}

/// Encoded segments must not smuggle in query or fragment delimiters
fn validate_reverse_segment(name: &str, segment: &str) -> ConverterResult<()> {
	if segment.contains(['?', '#']) || segment.chars().any(char::is_control) {
		return Err(ConverterError::Value(format!(
			"encoded value for {name:?} contains reserved characters"
		)));
	}
	Ok(())
}
