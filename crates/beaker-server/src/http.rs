use beaker_http::{Error, Handler, Request, Response};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::Service;
use hyper_util::rt::TokioIo;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};

/// HTTP server driving a single root [`Handler`]
///
/// The root handler is usually a `DefaultRouter`; handler errors are
/// translated into status responses here, so `Error::NotFound` from an
/// unmatched route becomes a plain 404 page.
pub struct HttpServer {
	pub handler: Arc<dyn Handler>,
}

impl HttpServer {
	/// Create a new server with the given handler
	///
	/// # Examples
	///
	/// ```
	/// use std::sync::Arc;
	/// use beaker_server::HttpServer;
	/// use beaker_http::{FunctionHandler, Request, Response};
	///
	/// let handler = Arc::new(FunctionHandler::new(|_req: Request| async {
	///     Ok(Response::text("hello"))
	/// }));
	/// let server = HttpServer::new(handler);
	/// ```
	pub fn new(handler: Arc<dyn Handler>) -> Self {
		Self { handler }
	}

	/// Bind and accept connections until an error occurs
	///
	/// # Examples
	///
	/// ```no_run
	/// use std::net::SocketAddr;
	/// use std::sync::Arc;
	/// use beaker_server::HttpServer;
	/// use beaker_http::{FunctionHandler, Request, Response};
	///
	/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
	/// let handler = Arc::new(FunctionHandler::new(|_req: Request| async {
	///     Ok(Response::ok())
	/// }));
	/// let addr: SocketAddr = "127.0.0.1:8000".parse()?;
	/// HttpServer::new(handler).listen(addr).await?;
	/// # Ok(())
	/// # }
	/// ```
	pub async fn listen(self, addr: SocketAddr) -> Result<(), Box<dyn std::error::Error>> {
		let listener = TcpListener::bind(addr).await?;
		tracing::info!(%addr, "listening");

		loop {
			let (stream, socket_addr) = listener.accept().await?;
			let handler = self.handler.clone();

			tokio::task::spawn(async move {
				if let Err(err) = Self::handle_connection(stream, socket_addr, handler).await {
					tracing::error!(remote = %socket_addr, ?err, "connection error");
				}
			});
		}
	}

	async fn handle_connection(
		stream: TcpStream,
		socket_addr: SocketAddr,
		handler: Arc<dyn Handler>,
	) -> Result<(), Box<dyn std::error::Error>> {
		let io = TokioIo::new(stream);
		let service = RequestService {
			handler,
			remote_addr: socket_addr,
		};

		http1::Builder::new().serve_connection(io, service).await?;

		Ok(())
	}
}

/// Render a handler error as an HTTP response
fn error_response(err: &Error) -> Response {
	Response::new(err.status_code())
		.with_body(err.to_string())
		.with_header("content-type", "text/plain; charset=utf-8")
}

/// Service implementation for hyper
struct RequestService {
	handler: Arc<dyn Handler>,
	remote_addr: SocketAddr,
}

impl Service<hyper::Request<Incoming>> for RequestService {
	type Response = hyper::Response<Full<Bytes>>;
	type Error = Box<dyn std::error::Error + Send + Sync>;
	type Future =
		Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

	fn call(&self, req: hyper::Request<Incoming>) -> Self::Future {
		let handler = self.handler.clone();
		let remote_addr = self.remote_addr;

		Box::pin(async move {
			let (parts, body) = req.into_parts();
			let body_bytes = body.collect().await?.to_bytes();

			let mut request = Request::new(
				parts.method,
				parts.uri,
				parts.version,
				parts.headers,
				body_bytes,
			);
			request.remote_addr = Some(remote_addr);

			let method = request.method.clone();
			let path = request.path().to_string();

			let response = match handler.handle(request).await {
				Ok(response) => response,
				Err(err) => {
					tracing::debug!(%method, %path, %err, "handler error");
					error_response(&err)
				}
			};
			tracing::info!(%method, %path, status = %response.status, "request");

			let mut hyper_response = hyper::Response::builder().status(response.status);
			for (key, value) in response.headers.iter() {
				hyper_response = hyper_response.header(key, value);
			}

			Ok(hyper_response.body(Full::new(response.body))?)
		})
	}
}

/// Helper function to create and run a server
///
/// # Examples
///
/// ```no_run
/// use std::net::SocketAddr;
/// use std::sync::Arc;
/// use beaker_server::serve;
/// use beaker_http::{FunctionHandler, Request, Response};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let handler = Arc::new(FunctionHandler::new(|_req: Request| async {
///     Ok(Response::text("Hello, World!"))
/// }));
/// let addr: SocketAddr = "127.0.0.1:8000".parse()?;
/// serve(addr, handler).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(
	addr: SocketAddr,
	handler: Arc<dyn Handler>,
) -> Result<(), Box<dyn std::error::Error>> {
	HttpServer::new(handler).listen(addr).await
}

#[cfg(test)]
mod tests {
	use super::*;
	use hyper::StatusCode;
	use rstest::rstest;

	#[rstest]
	fn not_found_error_becomes_404() {
		let response = error_response(&Error::NotFound("no route found for /x".into()));
		assert_eq!(response.status, StatusCode::NOT_FOUND);
		assert_eq!(response.body_text(), "not found: no route found for /x");
	}

	#[rstest]
	fn validation_error_becomes_400() {
		let response = error_response(&Error::Validation("bad segment".into()));
		assert_eq!(response.status, StatusCode::BAD_REQUEST);
	}

	#[rstest]
	fn internal_error_becomes_500() {
		let response = error_response(&Error::Internal("boom".into()));
		assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
	}
}
