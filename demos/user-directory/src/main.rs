use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
		)
		.init();

	let addr: SocketAddr = std::env::var("USER_DIRECTORY_ADDR")
		.unwrap_or_else(|_| "127.0.0.1:8000".to_string())
		.parse()?;

	let app = user_directory::create_app()?;
	beaker_server::serve(addr, Arc::new(app)).await
}
