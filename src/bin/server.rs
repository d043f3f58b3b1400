//! Standalone relay server binary.

// std
use std::{env, net::SocketAddr};
// crates.io
use tokio::net::TcpListener;
// self
use token_relay::{flows::Relay, serve};

/// Server configuration sourced from the environment.
struct ServerConfig {
	port: u16,
}
impl ServerConfig {
	fn from_env() -> Self {
		Self {
			port: env::var("RELAY_PORT").ok().and_then(|port| port.parse().ok()).unwrap_or(3000),
		}
	}
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
	serve::init_tracing();

	let config = ServerConfig::from_env();
	let router = serve::router(Relay::new());
	let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
	let listener = TcpListener::bind(addr).await?;

	serve::run(listener, router).await
}
