//! Rooms for Scrawl.
//!
//! Each room runs as an isolated Tokio task (actor model) that owns the
//! room's [`RoomStateMachine`] and its round timer.
//!
//! # Key types
//!
//! - [`RoomStateMachine`]: every game rule, synchronous and I/O-free
//! - [`RoomManager`]: creates rooms lazily, keyed by [`RoomCode`]
//! - [`RoomHandle`]: send commands to a running room actor
//! - [`RoomConfig`]: player limits, pauses, word bank
//!
//! The [`stroke`], [`guess`], [`hint`], and [`words`] modules hold the
//! pieces of game logic the state machine is built from.
//!
//! [`RoomCode`]: scrawl_protocol::RoomCode

mod config;
mod error;
mod machine;
mod manager;
mod room;

pub mod guess;
pub mod hint;
pub mod stroke;
pub mod words;

pub use config::RoomConfig;
pub use error::RoomError;
pub use machine::{Effect, Player, RoomStateMachine};
pub use manager::RoomManager;
pub use room::{PlayerAction, PlayerSender, RoomHandle, RoomInfo};
