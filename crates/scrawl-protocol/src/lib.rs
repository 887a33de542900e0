//! Wire protocol for Scrawl.
//!
//! This crate is the vocabulary shared by the server and its clients:
//!
//! - **Identity** ([`PlayerId`], [`RoomCode`]) and delivery targets
//!   ([`Recipient`]).
//! - **Messages** ([`ClientMessage`], [`ServerMessage`]) wrapped in an
//!   [`Envelope`] that carries ordering metadata.
//! - **Snapshots** ([`RoomSnapshot`]): the full, role-appropriate view of
//!   a room that is sent after every state change.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how all of the above
//!   becomes bytes.
//!
//! ```text
//! Transport (frames) → Protocol (Envelope<ClientMessage>) → Room actor
//! ```
//!
//! Nothing here knows about connections, timers, or rooms as running
//! things; it only describes what travels on the wire.

mod codec;
mod error;
mod messages;
mod snapshot;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use messages::{ClientMessage, ServerMessage};
pub use snapshot::{
    Emotion, Phase, PlayerView, RoomSnapshot, RoundResult, Settings,
    SettingsUpdate, Standing, StrokeSegment,
};
pub use types::{Envelope, PlayerId, Recipient, RoomCode};
