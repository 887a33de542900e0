//! # Scrawl
//!
//! Server for a multiplayer drawing-and-guessing game.
//!
//! One player draws a secret word while the others race to guess it. The
//! server is authoritative: rooms, turns, timers, scoring and the canvas
//! log all live here, and clients only send requests.
//!
//! ## Layers
//!
//! ```text
//! scrawl (this crate)   accept loop, per-connection handler
//!     ↕
//! scrawl-session        join validation, who is in which room
//!     ↕
//! scrawl-room           room actors and the room state machine
//!     ↕
//! scrawl-tick           round timer
//!     ↕
//! scrawl-protocol       messages, snapshots, codec
//!     ↕
//! scrawl-transport      WebSocket connections
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scrawl::prelude::*;
//!
//! # async fn run() -> Result<(), ScrawlError> {
//! let server = ScrawlServer::builder()
//!     .bind("0.0.0.0:8080")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;

pub use error::ScrawlError;
pub use server::{ScrawlServer, ScrawlServerBuilder};

pub mod prelude {
    pub use crate::{ScrawlError, ScrawlServer, ScrawlServerBuilder};
    pub use scrawl_protocol::{
        ClientMessage, Codec, Envelope, JsonCodec, Phase, PlayerId, RoomCode, RoomSnapshot,
        ServerMessage, Settings, SettingsUpdate, StrokeSegment,
    };
    pub use scrawl_room::{RoomConfig, RoomError};
    pub use scrawl_session::{GatewayConfig, GatewayError};
    pub use scrawl_tick::TimerConfig;
}
