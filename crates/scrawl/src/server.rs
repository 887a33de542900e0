//! `ScrawlServer` builder and server loop.
//!
//! This is the entry point for running a Scrawl server. It ties together
//! all the layers: transport → protocol → session → room.

use std::sync::Arc;
use std::time::Duration;

use scrawl_protocol::{Codec, JsonCodec};
use scrawl_room::RoomConfig;
use scrawl_session::{GatewayConfig, SessionGateway};
use scrawl_transport::{Transport, WebSocketTransport};
use tokio::sync::Mutex;

use crate::ScrawlError;
use crate::handler::handle_connection;

/// Connections that send nothing for this long are dropped.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared server state passed to each connection handler task.
///
/// Only joins and leaves take the gateway lock; gameplay goes through the
/// room handle each connection caches after joining.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) gateway: Mutex<SessionGateway>,
    pub(crate) codec: C,
    pub(crate) idle_timeout: Duration,
}

/// Builder for configuring and starting a Scrawl server.
///
/// # Example
///
/// ```rust,ignore
/// let server = ScrawlServer::builder()
///     .bind("0.0.0.0:8080")
///     .idle_timeout(Duration::from_secs(60))
///     .build()
///     .await?;
/// server.run().await
/// ```
pub struct ScrawlServerBuilder {
    bind_addr: String,
    idle_timeout: Duration,
    room_config: RoomConfig,
    gateway_config: GatewayConfig,
}

impl ScrawlServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            room_config: RoomConfig::default(),
            gateway_config: GatewayConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// How long a connection may stay silent before it is closed.
    /// Clients keep it alive with `heartbeat`.
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Configuration every new room starts from.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    pub fn gateway_config(mut self, config: GatewayConfig) -> Self {
        self.gateway_config = config;
        self
    }

    /// Binds the listener. Uses `JsonCodec` over `WebSocketTransport`.
    pub async fn build(self) -> Result<ScrawlServer<JsonCodec>, ScrawlError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let state = Arc::new(ServerState {
            gateway: Mutex::new(SessionGateway::new(
                self.gateway_config,
                self.room_config.validated(),
            )),
            codec: JsonCodec,
            idle_timeout: self.idle_timeout,
        });

        Ok(ScrawlServer { transport, state })
    }
}

impl Default for ScrawlServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Scrawl server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct ScrawlServer<C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<C>>,
}

impl ScrawlServer<JsonCodec> {
    /// Creates a new builder.
    pub fn builder() -> ScrawlServerBuilder {
        ScrawlServerBuilder::new()
    }
}

impl<C: Codec> ScrawlServer<C> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the server accept loop.
    ///
    /// Spawns a handler task for each accepted connection. Runs until the
    /// process is terminated.
    pub async fn run(mut self) -> Result<(), ScrawlError> {
        tracing::info!(addr = ?self.local_addr().ok(), "scrawl server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
