use crate::exception::{Error, Result};
use crate::params::PathParams;
use bytes::Bytes;
use hyper::{HeaderMap, Method, Uri, Version};
use percent_encoding::percent_decode_str;
use std::collections::HashMap;
use std::net::SocketAddr;

/// HTTP request as seen by handlers
///
/// A router fills in [`Request::path_params`] after matching; everything
/// else comes straight from the wire.
#[derive(Debug, Clone)]
pub struct Request {
	pub method: Method,
	pub uri: Uri,
	pub version: Version,
	pub headers: HeaderMap,
	pub body: Bytes,
	pub path_params: PathParams,
	pub remote_addr: Option<SocketAddr>,
	query_params: HashMap<String, String>,
}

impl Request {
	pub fn new(
		method: Method,
		uri: Uri,
		version: Version,
		headers: HeaderMap,
		body: Bytes,
	) -> Self {
		let query_params = Self::parse_query_params(&uri);
		Self {
			method,
			uri,
			version,
			headers,
			body,
			path_params: PathParams::new(),
			remote_addr: None,
			query_params,
		}
	}

	/// Start building a request
	///
	/// # Examples
	///
	/// ```
	/// use beaker_http::Request;
	/// use hyper::Method;
	///
	/// let request = Request::builder()
	///     .method(Method::GET)
	///     .uri("/user/alice/")
	///     .build()
	///     .unwrap();
	///
	/// assert_eq!(request.path(), "/user/alice/");
	/// ```
	pub fn builder() -> RequestBuilder {
		RequestBuilder::default()
	}

	/// Request path, without the query string
	pub fn path(&self) -> &str {
		self.uri.path()
	}

	/// Raw query parameters, split on `&` and the first `=`
	pub fn query_params(&self) -> &HashMap<String, String> {
		&self.query_params
	}

	/// Query parameters with keys and values percent-decoded
	///
	/// # Examples
	///
	/// ```
	/// use beaker_http::Request;
	/// use hyper::Method;
	///
	/// let request = Request::builder()
	///     .method(Method::GET)
	///     .uri("/search?name=John%20Doe")
	///     .build()
	///     .unwrap();
	///
	/// let decoded = request.decoded_query_params();
	/// assert_eq!(decoded.get("name").map(String::as_str), Some("John Doe"));
	/// ```
	pub fn decoded_query_params(&self) -> HashMap<String, String> {
		self.query_params
			.iter()
			.map(|(k, v)| {
				(
					percent_decode_str(k).decode_utf8_lossy().into_owned(),
					percent_decode_str(v).decode_utf8_lossy().into_owned(),
				)
			})
			.collect()
	}

	fn parse_query_params(uri: &Uri) -> HashMap<String, String> {
		uri.query()
			.map(|q| {
				q.split('&')
					.filter_map(|pair| {
						// Split on first '=' only so '=' survives inside values
						let mut parts = pair.splitn(2, '=');
						Some((
							parts.next()?.to_string(),
							parts.next().unwrap_or("").to_string(),
						))
					})
					.collect()
			})
			.unwrap_or_default()
	}
}

/// Builder for [`Request`], mainly used by the server bridge and tests
#[derive(Debug, Default)]
pub struct RequestBuilder {
	method: Option<Method>,
	uri: Option<String>,
	version: Option<Version>,
	headers: HeaderMap,
	body: Bytes,
	remote_addr: Option<SocketAddr>,
}

impl RequestBuilder {
	pub fn method(mut self, method: Method) -> Self {
		self.method = Some(method);
		self
	}

	pub fn uri(mut self, uri: impl Into<String>) -> Self {
		self.uri = Some(uri.into());
		self
	}

	pub fn version(mut self, version: Version) -> Self {
		self.version = Some(version);
		self
	}

	pub fn headers(mut self, headers: HeaderMap) -> Self {
		self.headers = headers;
		self
	}

	pub fn body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	pub fn remote_addr(mut self, addr: SocketAddr) -> Self {
		self.remote_addr = Some(addr);
		self
	}

	pub fn build(self) -> Result<Request> {
		let uri: Uri = self
			.uri
			.ok_or_else(|| Error::BadRequest("request URI is required".into()))?
			.parse()
			.map_err(|e| Error::BadRequest(format!("invalid URI: {e}")))?;
		let mut request = Request::new(
			self.method.unwrap_or(Method::GET),
			uri,
			self.version.unwrap_or(Version::HTTP_11),
			self.headers,
			self.body,
		);
		request.remote_addr = self.remote_addr;
		Ok(request)
	}
}
