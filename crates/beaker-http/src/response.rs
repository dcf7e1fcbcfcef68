use bytes::Bytes;
use hyper::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use hyper::{HeaderMap, StatusCode};

/// HTTP response produced by handlers
#[derive(Debug, Clone)]
pub struct Response {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Bytes,
}

impl Response {
	/// Create a new Response with the given status code
	///
	/// # Examples
	///
	/// ```
	/// use beaker_http::Response;
	/// use hyper::StatusCode;
	///
	/// let response = Response::new(StatusCode::OK);
	/// assert_eq!(response.status, StatusCode::OK);
	/// assert!(response.body.is_empty());
	/// ```
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: Bytes::new(),
		}
	}

	/// HTTP 200 OK
	pub fn ok() -> Self {
		Self::new(StatusCode::OK)
	}

	/// HTTP 404 Not Found
	pub fn not_found() -> Self {
		Self::new(StatusCode::NOT_FOUND)
	}

	/// HTTP 500 Internal Server Error
	pub fn internal_server_error() -> Self {
		Self::new(StatusCode::INTERNAL_SERVER_ERROR)
	}

	/// Replace the body
	pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Set a header, silently skipping values that are not valid header text
	pub fn with_header(mut self, name: &str, value: &str) -> Self {
		if let (Ok(name), Ok(value)) = (
			name.parse::<HeaderName>(),
			HeaderValue::from_str(value),
		) {
			self.headers.insert(name, value);
		}
		self
	}

	/// HTTP 200 with an HTML body
	///
	/// # Examples
	///
	/// ```
	/// use beaker_http::Response;
	/// use hyper::header::CONTENT_TYPE;
	///
	/// let response = Response::html("<h1>hello</h1>");
	/// assert_eq!(
	///     response.headers.get(CONTENT_TYPE).unwrap(),
	///     "text/html; charset=utf-8"
	/// );
	/// ```
	pub fn html(body: impl Into<Bytes>) -> Self {
		let mut response = Self::ok().with_body(body);
		response.headers.insert(
			CONTENT_TYPE,
			HeaderValue::from_static("text/html; charset=utf-8"),
		);
		response
	}

	/// HTTP 200 with a plain-text body
	pub fn text(body: impl Into<Bytes>) -> Self {
		let mut response = Self::ok().with_body(body);
		response.headers.insert(
			CONTENT_TYPE,
			HeaderValue::from_static("text/plain; charset=utf-8"),
		);
		response
	}

	/// Body as UTF-8, lossily decoded
	pub fn body_text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn with_header_ignores_invalid_names() {
		let response = Response::ok().with_header("bad header\n", "x");
		assert!(response.headers.is_empty());
	}

	#[rstest]
	fn html_sets_content_type_and_body() {
		let response = Response::html("<p>ok</p>");
		assert_eq!(response.status, StatusCode::OK);
		assert_eq!(response.body_text(), "<p>ok</p>");
		assert_eq!(
			response.headers.get(CONTENT_TYPE).unwrap(),
			"text/html; charset=utf-8"
		);
	}
}
