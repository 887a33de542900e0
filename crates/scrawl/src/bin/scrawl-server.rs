//! Scrawl game server.
//!
//! ```text
//! SCRAWL_BIND=0.0.0.0:8080 RUST_LOG=scrawl=debug scrawl-server
//! ```

use scrawl::prelude::*;
use tracing_subscriber::EnvFilter;

const DEFAULT_BIND: &str = "127.0.0.1:8080";

#[tokio::main]
async fn main() -> Result<(), ScrawlError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let bind = std::env::var("SCRAWL_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());

    let server = ScrawlServer::builder().bind(&bind).build().await?;
    tracing::info!(addr = %server.local_addr().map_or(bind, |a| a.to_string()), "listening");
    server.run().await
}
