// Copyright (c) 2026 Memechain
// Licensed under the Apache License, Version 2.0

//! Gossip transport over WebSocket.
//!
//! Every connection, inbound or outbound, is registered with the [`Node`] and then
//! driven by two tasks: a writer draining the peer's outbound queue and a reader
//! feeding text frames to [`Node::handle_frame`]. The reader deregisters the peer
//! when the socket closes or fails. No reconnection is attempted.

#![forbid(unsafe_code)]

use crate::networking::peers::{PeerId, PeerRx};
use crate::node::Node;
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{accept_async, client_async, WebSocketStream};
use tracing::{debug, info, warn};

const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Network-level failures. Logged by callers, never fatal to the node.
#[derive(Debug, Error)]
pub enum GossipError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("websocket: {0}")]
    Ws(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("unsupported peer url {0:?}")]
    BadUrl(String),
}

/// Bind the gossip listener and spawn its accept loop.
///
/// Returns the bound address (useful when binding port 0) and the loop's handle.
pub async fn listen(
    node: Arc<Node>,
    addr: &str,
) -> Result<(SocketAddr, JoinHandle<()>), GossipError> {
    let listener = TcpListener::bind(addr).await?;
    let local = listener.local_addr()?;
    info!(addr = %local, "listening for gossip");

    let handle = tokio::spawn(async move {
        loop {
            let (stream, remote) = match listener.accept().await {
                Ok(v) => v,
                Err(e) => {
                    warn!(error = %e, "gossip accept failed");
                    // Persistent errors (e.g. EMFILE) would otherwise spin.
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                    continue;
                }
            };
            let node = node.clone();
            tokio::spawn(async move {
                match accept_async(stream).await {
                    Ok(ws) => {
                        attach(node, ws, remote);
                    }
                    Err(e) => warn!(%remote, error = %e, "websocket handshake failed"),
                }
            });
        }
    });
    Ok((local, handle))
}

/// Connect to `url` (`ws://host:port`) and register the peer once the handshake succeeds.
pub async fn connect(node: Arc<Node>, url: &str) -> Result<PeerId, GossipError> {
    let request = url
        .into_client_request()
        .map_err(|_| GossipError::BadUrl(url.to_string()))?;
    let uri = request.uri();
    if uri.scheme_str() != Some("ws") {
        return Err(GossipError::BadUrl(url.to_string()));
    }
    let host = uri
        .host()
        .ok_or_else(|| GossipError::BadUrl(url.to_string()))?
        .trim_start_matches('[')
        .trim_end_matches(']')
        .to_string();
    let port = uri.port_u16().unwrap_or(80);

    let tcp = TcpStream::connect((host.as_str(), port)).await?;
    let remote = tcp.peer_addr()?;
    let (ws, _resp) = client_async(request, tcp).await?;
    Ok(attach(node, ws, remote))
}

/// Fire-and-forget [`connect`]: failures are logged and not retried.
pub fn dial(node: Arc<Node>, url: String) -> JoinHandle<()> {
    tokio::spawn(async move {
        match connect(node, &url).await {
            Ok(id) => debug!(peer = %id, %url, "outbound connection established"),
            Err(e) => warn!(%url, error = %e, "connection to peer failed"),
        }
    })
}

fn attach<S>(node: Arc<Node>, ws: WebSocketStream<S>, remote: SocketAddr) -> PeerId
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let (id, rx) = node.register_peer(remote);
    tokio::spawn(drive(node, id, rx, ws));
    id
}

async fn drive<S>(node: Arc<Node>, id: PeerId, mut rx: PeerRx, ws: WebSocketStream<S>)
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let (mut sink, mut stream) = ws.split();

    // Ends once the registry drops this peer's sender.
    let writer = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let text = match msg.encode() {
                Ok(t) => t,
                Err(e) => {
                    warn!(peer = %id, error = %e, "cannot encode outbound message");
                    continue;
                }
            };
            if let Err(e) = sink.send(WsMessage::Text(text)).await {
                debug!(peer = %id, error = %e, "write failed");
                break;
            }
        }
        let _ = sink.close().await;
    });

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(WsMessage::Text(text)) => node.handle_frame(id, &text),
            Ok(WsMessage::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(peer = %id, error = %e, "connection to peer failed");
                break;
            }
        }
    }

    node.remove_peer(id);
    let _ = writer.await;
}
