//! WebSocket upgrade handler and per-connection session loop.

use std::sync::Arc;

use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::config::Config;
use crate::error::ProtocolError;
use crate::AppState;

use super::protocol::{self, Command};
use super::session::{ConnState, ConnectionHandle};

/// Normal closure, used when the peer closed without a frame of its own.
const CLOSE_NORMAL: u16 = 1000;
/// Invalid payload data: a set frame carried a malformed body.
const CLOSE_INVALID_PAYLOAD: u16 = 1007;

/// Why a session loop stopped.
enum SessionEnd {
    /// Peer sent a close frame; carried code/reason are echoed back.
    PeerClosed(Option<CloseFrame>),
    /// Transport-level receive or send failure.
    Transport,
    /// A set frame carried a body that failed to decode.
    MalformedPayload(ProtocolError),
}

pub fn router(config: &Config) -> Router<AppState> {
    Router::new().route(&config.ws_path, get(ws_upgrade))
}

async fn ws_upgrade(
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
    State(state): State<AppState>,
) -> Response {
    match ws {
        Ok(upgrade) => upgrade
            .max_message_size(state.config.max_frame_bytes)
            .on_upgrade(move |socket| handle_connection(socket, state))
            .into_response(),
        Err(rejection) => {
            // A plain HTTP request to the WebSocket path is refused outright.
            tracing::debug!(%rejection, "refusing non-upgrade request");
            StatusCode::BAD_REQUEST.into_response()
        }
    }
}

async fn handle_connection(socket: WebSocket, state: AppState) {
    let client_id = beacon_common::id::prefixed_ulid(beacon_common::id::prefix::CONNECTION);
    let (handle, outbound_rx) = ConnectionHandle::new(client_id.clone());

    if let Err(err) = state.registry.add(&client_id, &handle) {
        tracing::warn!(%err, client_id = %client_id, "could not register connection");
        return;
    }

    tracing::info!(
        client_id = %client_id,
        clients = state.registry.len(),
        "session established"
    );

    let (mut ws_tx, ws_rx) = socket.split();
    let end = run_session(&state, &handle, &mut ws_tx, ws_rx, outbound_rx).await;

    // Deregister before the close handshake so the broadcast dispatcher
    // stops seeing this connection immediately.
    handle.set_state(ConnState::Closing);
    state.registry.remove(&client_id);

    let close_frame = match end {
        SessionEnd::PeerClosed(frame) => frame.unwrap_or(CloseFrame {
            code: CLOSE_NORMAL,
            reason: "".into(),
        }),
        SessionEnd::Transport => CloseFrame {
            code: CLOSE_NORMAL,
            reason: "".into(),
        },
        SessionEnd::MalformedPayload(err) => {
            tracing::debug!(?err, client_id = %client_id, "closing session after malformed frame");
            CloseFrame {
                code: CLOSE_INVALID_PAYLOAD,
                reason: "malformed set payload".into(),
            }
        }
    };
    let _ = ws_tx.send(Message::Close(Some(close_frame))).await;
    handle.set_state(ConnState::Closed);

    tracing::info!(
        client_id = %client_id,
        clients = state.registry.len(),
        "session ended"
    );
}

/// Main session loop: decode and dispatch inbound frames, drain queued
/// broadcasts. Frames are processed strictly in receipt order — one command
/// at a time per connection.
async fn run_session(
    state: &AppState,
    handle: &Arc<ConnectionHandle>,
    ws_tx: &mut SplitSink<WebSocket, Message>,
    mut ws_rx: SplitStream<WebSocket>,
    mut outbound_rx: mpsc::UnboundedReceiver<Message>,
) -> SessionEnd {
    loop {
        tokio::select! {
            // Client sends us a frame.
            inbound = ws_rx.next() => {
                match inbound {
                    Some(Ok(Message::Text(text))) => {
                        let payload = protocol::trim_padding(text.as_str());
                        match protocol::decode(payload) {
                            Ok(Command::Get) => {
                                let frame = protocol::encode_value(&state.value.get());
                                if ws_tx.send(Message::Text(frame.into())).await.is_err() {
                                    return SessionEnd::Transport;
                                }
                            }
                            Ok(Command::Set(message)) => {
                                let recipients = state.publish(message);
                                tracing::debug!(
                                    client_id = %handle.client_id(),
                                    recipients,
                                    "shared value updated"
                                );
                                if ws_tx.send(Message::Text(protocol::SET_ACK.into())).await.is_err() {
                                    return SessionEnd::Transport;
                                }
                            }
                            Ok(Command::Echo) => {
                                // Unrecognized tag: the whole frame goes back untouched.
                                if ws_tx.send(Message::Text(text)).await.is_err() {
                                    return SessionEnd::Transport;
                                }
                            }
                            Err(err) => return SessionEnd::MalformedPayload(err),
                        }
                    }
                    // Binary frames are never decoded as commands, only echoed.
                    Some(Ok(Message::Binary(bytes))) => {
                        if ws_tx.send(Message::Binary(bytes)).await.is_err() {
                            return SessionEnd::Transport;
                        }
                    }
                    Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => continue,
                    Some(Ok(Message::Close(frame))) => return SessionEnd::PeerClosed(frame),
                    Some(Err(err)) => {
                        tracing::debug!(?err, client_id = %handle.client_id(), "ws read error");
                        return SessionEnd::Transport;
                    }
                    None => return SessionEnd::PeerClosed(None),
                }
            }

            // A broadcast frame queued for this connection.
            Some(message) = outbound_rx.recv() => {
                if ws_tx.send(message).await.is_err() {
                    return SessionEnd::Transport;
                }
            }
        }
    }
}
