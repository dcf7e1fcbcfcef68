use crate::exception::Result;
use crate::request::Request;
use crate::response::Response;
use async_trait::async_trait;
use std::future::Future;

/// Anything that can answer a request
///
/// Routers, middleware, and leaf views all implement this. Handlers are
/// shared as `Arc<dyn Handler>` so a route table can be cloned cheaply.
#[async_trait]
pub trait Handler: Send + Sync {
	async fn handle(&self, request: Request) -> Result<Response>;
}

/// Adapter turning an async function into a [`Handler`]
///
/// # Examples
///
/// ```
/// use beaker_http::{FunctionHandler, Handler, Request, Response};
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
/// let handler = FunctionHandler::new(|_req: Request| async {
///     Ok(Response::text("pong"))
/// });
/// let request = Request::builder().uri("/ping").build().unwrap();
/// let response = handler.handle(request).await.unwrap();
/// assert_eq!(response.body_text(), "pong");
/// # });
/// ```
pub struct FunctionHandler<F> {
	func: F,
}

impl<F> FunctionHandler<F> {
	pub fn new(func: F) -> Self {
		Self { func }
	}
}

#[async_trait]
impl<F, Fut> Handler for FunctionHandler<F>
where
	F: Fn(Request) -> Fut + Send + Sync,
	Fut: Future<Output = Result<Response>> + Send,
{
	async fn handle(&self, request: Request) -> Result<Response> {
		(self.func)(request).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn function_handler_forwards_request() {
		let handler = FunctionHandler::new(|req: Request| async move {
			Ok(Response::text(req.path().to_string()))
		});

		let request = Request::builder().uri("/echo/path").build().unwrap();
		let response = handler.handle(request).await.unwrap();

		assert_eq!(response.body_text(), "/echo/path");
	}
}
