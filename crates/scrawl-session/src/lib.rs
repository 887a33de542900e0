//! Player sessions for Scrawl.
//!
//! This crate sits between connections and rooms:
//!
//! 1. **Validation**: a join request's room code and username are checked
//!    before any room sees them ([`SessionGateway::join`])
//! 2. **Membership**: each connected player belongs to at most one room,
//!    and the gateway remembers which ([`Session`])
//! 3. **Room codes**: fresh codes that no live room uses
//!    ([`SessionGateway::generate_room_code`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Server (above)  ← one handler per connection, shares the gateway
//!     ↕
//! Session Layer (this crate)  ← who is in which room
//!     ↕
//! Room Layer (below)  ← room actors, state machines, timers
//! ```

mod error;
mod gateway;
mod session;

pub use error::GatewayError;
pub use gateway::SessionGateway;
pub use session::{GatewayConfig, JoinRequest, Session};
