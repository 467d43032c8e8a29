//! WebSocket upgrade handlers for the two live views.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;

use pulseboard_sync::{service, OwnerScope, PublicScope};

use crate::error::AppResult;
use crate::middleware::auth::authenticate_token;
use crate::state::AppState;

/// Query parameters for the owner live view upgrade.
#[derive(Debug, Deserialize)]
pub struct OwnerWsQuery {
    /// Access token; carried as a query parameter because browsers cannot
    /// set headers on a WebSocket upgrade request.
    pub token: String,
}

/// GET /api/v1/ws/projects?token=...
///
/// Owner live feed: each emission is one JSON text frame carrying the full
/// `(project, progress)` list.
pub async fn owner_ws(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(query): Query<OwnerWsQuery>,
) -> AppResult<impl IntoResponse> {
    let owner_id = authenticate_token(&query.token, &state.config.jwt)?;
    let scope = OwnerScope::resolve(Some(owner_id))?;
    Ok(ws.on_upgrade(move |socket| serve_owner(socket, state, scope)))
}

async fn serve_owner(mut socket: WebSocket, state: AppState, scope: OwnerScope) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, owner_id = %scope.owner_id(), "owner live view connected");

    let mut feed = match service::open_owner_feed(&state.store, &scope).await {
        Ok(feed) => feed,
        Err(err) => {
            tracing::warn!(conn_id = %conn_id, error = %err, "failed to open owner feed");
            let _ = socket.close().await;
            return;
        }
    };

    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            update = feed.next_update() => match update {
                Some(items) => {
                    if send_json(&mut sink, &conn_id, &items).await.is_err() {
                        break;
                    }
                }
                None => break,
            },

            incoming = stream.next() => {
                if is_disconnect(&conn_id, incoming) {
                    break;
                }
            }
        }
    }

    // Shutting the feed down cancels every store subscription it held.
    feed.shutdown().await;
    let _ = sink.send(Message::Close(None)).await;
    tracing::info!(conn_id = %conn_id, "owner live view disconnected");
}

/// GET /api/v1/ws/public/projects/{public_id}
///
/// Public live feed for one shared project. The server closes the socket
/// when the project is deleted.
pub async fn public_ws(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Path(public_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let scope = PublicScope::for_token(public_id);
    // Resolve before upgrading so an unknown token is an HTTP 404, not a
    // connection that dies immediately.
    service::resolve_public(&state.store, &scope).await?;
    Ok(ws.on_upgrade(move |socket| serve_public(socket, state, scope)))
}

async fn serve_public(mut socket: WebSocket, state: AppState, scope: PublicScope) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, "public live view connected");

    let mut feed = match service::open_public_feed(&state.store, &scope).await {
        Ok(feed) => feed,
        Err(err) => {
            tracing::warn!(conn_id = %conn_id, error = %err, "failed to open public feed");
            let _ = socket.close().await;
            return;
        }
    };

    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            update = feed.next_update() => match update {
                Some(detail) => {
                    if send_json(&mut sink, &conn_id, &detail).await.is_err() {
                        break;
                    }
                }
                // Feed ended: the observed project was deleted.
                None => break,
            },

            incoming = stream.next() => {
                if is_disconnect(&conn_id, incoming) {
                    break;
                }
            }
        }
    }

    feed.shutdown().await;
    let _ = sink.send(Message::Close(None)).await;
    tracing::info!(conn_id = %conn_id, "public live view disconnected");
}

/// Serialize a feed emission and push it as one text frame.
async fn send_json<T: serde::Serialize>(
    sink: &mut futures::stream::SplitSink<WebSocket, Message>,
    conn_id: &str,
    frame: &T,
) -> Result<(), ()> {
    let json = match serde_json::to_string(frame) {
        Ok(json) => json,
        Err(err) => {
            tracing::error!(conn_id = %conn_id, error = %err, "failed to serialize feed frame");
            return Err(());
        }
    };
    if sink.send(Message::Text(json.into())).await.is_err() {
        tracing::debug!(conn_id = %conn_id, "WebSocket sink closed");
        return Err(());
    }
    Ok(())
}

/// Whether an inbound message means the peer is gone.
fn is_disconnect(conn_id: &str, incoming: Option<Result<Message, axum::Error>>) -> bool {
    match incoming {
        Some(Ok(Message::Close(_))) | None => true,
        Some(Ok(_)) => false,
        Some(Err(err)) => {
            tracing::debug!(conn_id = %conn_id, error = %err, "WebSocket receive error");
            true
        }
    }
}
