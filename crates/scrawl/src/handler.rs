//! Per-connection handler: decode requests, route them, push the room's
//! messages back out.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The connection id doubles as the player id. A single `select!` loop
//! waits on three things at once:
//!   1. the next frame from the client
//!   2. the next message from the player's room (once joined)
//!   3. the idle deadline

use std::future;
use std::sync::Arc;
use std::time::Instant;

use scrawl_protocol::{ClientMessage, Codec, Envelope, PlayerId, ServerMessage};
use scrawl_room::{PlayerAction, RoomError, RoomHandle};
use scrawl_session::JoinRequest;
use scrawl_transport::{Connection, WebSocketConnection};
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::ScrawlError;
use crate::server::ServerState;

/// Drop guard that takes the player out of their room when the handler
/// exits, however it exits.
///
/// `Drop` is synchronous, so the async gateway call runs in a
/// fire-and-forget task.
struct SessionGuard<C: Codec> {
    player_id: PlayerId,
    state: Arc<ServerState<C>>,
}

impl<C: Codec> Drop for SessionGuard<C> {
    fn drop(&mut self) {
        let player_id = self.player_id;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let mut gateway = state.gateway.lock().await;
            if gateway.room_of(player_id).is_some() {
                let _ = gateway.leave(player_id).await;
            }
        });
    }
}

/// Writes server envelopes to one connection, numbering them.
struct Outbox<'a, C: Codec> {
    conn: &'a WebSocketConnection,
    codec: &'a C,
    seq: u64,
    start: Instant,
}

impl<C: Codec> Outbox<'_, C> {
    async fn send(&mut self, msg: &ServerMessage) -> Result<(), ScrawlError> {
        let envelope = Envelope {
            seq: next_seq(&mut self.seq),
            timestamp: self.elapsed_ms(),
            payload: msg,
        };
        let bytes = self.codec.encode(&envelope)?;
        self.conn.send(&bytes).await?;
        Ok(())
    }

    fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// What the connection is attached to, if anything.
#[derive(Default)]
struct Membership {
    room: Option<RoomHandle>,
    outbound: Option<UnboundedReceiver<ServerMessage>>,
}

impl Membership {
    fn clear(&mut self) {
        self.room = None;
        self.outbound = None;
    }

    /// Next message from the room. Pends forever while not in one.
    async fn recv(&mut self) -> Option<ServerMessage> {
        match self.outbound.as_mut() {
            Some(rx) => rx.recv().await,
            None => future::pending().await,
        }
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Codec>(
    conn: WebSocketConnection,
    state: Arc<ServerState<C>>,
) -> Result<(), ScrawlError> {
    let conn_id = conn.id();
    let player_id = PlayerId(conn_id.into_inner());
    tracing::info!(%conn_id, %player_id, "connection opened");

    let _guard = SessionGuard {
        player_id,
        state: Arc::clone(&state),
    };
    let mut outbox = Outbox {
        conn: &conn,
        codec: &state.codec,
        seq: 1,
        start: Instant::now(),
    };
    let mut membership = Membership::default();
    let mut idle_deadline = tokio::time::Instant::now() + state.idle_timeout;

    loop {
        tokio::select! {
            frame = conn.recv() => {
                let data = match frame {
                    Ok(Some(data)) => data,
                    Ok(None) => {
                        tracing::info!(%player_id, "connection closed cleanly");
                        break;
                    }
                    Err(e) => {
                        tracing::debug!(%player_id, error = %e, "recv error");
                        break;
                    }
                };
                idle_deadline = tokio::time::Instant::now() + state.idle_timeout;

                let envelope: Envelope<ClientMessage> = match state.codec.decode(&data) {
                    Ok(env) => env,
                    Err(e) => {
                        tracing::debug!(%player_id, error = %e, "failed to decode envelope");
                        continue;
                    }
                };
                handle_client_message(
                    &state,
                    player_id,
                    envelope.payload,
                    &mut membership,
                    &mut outbox,
                )
                .await?;
            }

            msg = membership.recv() => {
                match msg {
                    Some(ServerMessage::Kicked) => {
                        outbox.send(&ServerMessage::Kicked).await?;
                        state.gateway.lock().await.detach(player_id);
                        membership.clear();
                    }
                    Some(msg) => outbox.send(&msg).await?,
                    None => {
                        // The room let go of us without a kick: it stopped,
                        // or dropped us after a failed delivery.
                        tracing::debug!(%player_id, "room channel closed");
                        state.gateway.lock().await.detach(player_id);
                        membership.clear();
                    }
                }
            }

            _ = tokio::time::sleep_until(idle_deadline) => {
                tracing::info!(%player_id, "connection timed out");
                break;
            }
        }
    }

    let _ = conn.close().await;
    // _guard drops here → leave fires.
    Ok(())
}

/// Routes one client request.
async fn handle_client_message<C: Codec>(
    state: &ServerState<C>,
    player_id: PlayerId,
    msg: ClientMessage,
    membership: &mut Membership,
    outbox: &mut Outbox<'_, C>,
) -> Result<(), ScrawlError> {
    match msg {
        ClientMessage::Heartbeat { client_time } => {
            let server_time = outbox.elapsed_ms();
            outbox
                .send(&ServerMessage::HeartbeatAck {
                    client_time,
                    server_time,
                })
                .await?;
        }

        ClientMessage::JoinRoom {
            username,
            avatar,
            room_id,
        } => {
            // A fresh channel per join, so nothing from a previous room
            // can arrive after this one's messages start.
            let (tx, rx) = mpsc::unbounded_channel();
            let request = JoinRequest {
                username,
                avatar,
                room_id,
            };
            let result = state.gateway.lock().await.join(player_id, request, tx).await;
            match result {
                Ok(handle) => {
                    membership.room = Some(handle);
                    membership.outbound = Some(rx);
                }
                Err(e) => {
                    tracing::debug!(%player_id, error = %e, "join refused");
                    outbox.send(&ServerMessage::error(e.to_string())).await?;
                }
            }
        }

        ClientMessage::LeaveRoom { room_id } => {
            let Some(room) = &membership.room else {
                return Ok(());
            };
            if !room.room_id().matches(&room_id) {
                tracing::debug!(%player_id, %room_id, "leave for another room, ignoring");
                return Ok(());
            }
            if let Err(e) = state.gateway.lock().await.leave(player_id).await {
                tracing::debug!(%player_id, error = %e, "leave failed");
            }
            membership.clear();
        }

        other => {
            let Some(room) = &membership.room else {
                tracing::debug!(%player_id, "gameplay message outside a room, ignoring");
                return Ok(());
            };
            if let Some(target) = other.room_id() {
                if !room.room_id().matches(target) {
                    tracing::debug!(
                        %player_id,
                        room_id = %room.room_id(),
                        requested = target,
                        "message for another room, ignoring"
                    );
                    return Ok(());
                }
            }
            let Some(action) = PlayerAction::from_message(other) else {
                return Ok(());
            };
            match room.act(player_id, action).await {
                Ok(()) => {}
                Err(RoomError::Unavailable(room_id)) => {
                    tracing::debug!(%player_id, %room_id, "room gone");
                    state.gateway.lock().await.detach(player_id);
                    membership.clear();
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
    Ok(())
}

/// Increments and returns the next sequence number.
fn next_seq(seq: &mut u64) -> u64 {
    let current = *seq;
    *seq += 1;
    current
}
