use hyper::StatusCode;
use thiserror::Error as ThisError;

/// Framework-level error type
///
/// Handlers and routers return this from every fallible operation. The
/// server layer maps each variant onto an HTTP status via
/// [`Error::status_code`].
#[derive(Debug, ThisError)]
pub enum Error {
	/// No route or resource matched the request
	#[error("not found: {0}")]
	NotFound(String),

	/// The request was understood but carried invalid data
	#[error("validation error: {0}")]
	Validation(String),

	/// A malformed request could not be parsed at all
	#[error("bad request: {0}")]
	BadRequest(String),

	/// Anything that is the server's fault
	#[error("internal error: {0}")]
	Internal(String),
}

impl Error {
	/// HTTP status the server layer should answer with
	///
	/// # Examples
	///
	/// ```
	/// use beaker_http::Error;
	/// use hyper::StatusCode;
	///
	/// let err = Error::NotFound("no route found for /missing".into());
	/// assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
	/// ```
	pub fn status_code(&self) -> StatusCode {
		match self {
			Error::NotFound(_) => StatusCode::NOT_FOUND,
			Error::Validation(_) | Error::BadRequest(_) => StatusCode::BAD_REQUEST,
			Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

/// Convenience alias used throughout the framework
pub type Result<T> = std::result::Result<T, Error>;
