// Copyright (c) 2026 Memechain
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//     http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#![forbid(unsafe_code)]

use axum::extract::State;
use futures::{SinkExt, StreamExt};
use memechain::http::list_peers;
use memechain::monitoring::metrics::Metrics;
use memechain::networking::gossip;
use memechain::networking::message::Message;
use memechain::node::Node;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;

fn test_node() -> Arc<Node> {
    Arc::new(Node::new(Arc::new(Metrics::new().expect("metrics"))))
}

async fn wait_until<F: Fn() -> bool>(what: &str, cond: F) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !cond() {
        assert!(tokio::time::Instant::now() < deadline, "timed out waiting for {what}");
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

/// How a scripted peer leaves once signalled.
#[derive(Clone, Copy)]
enum Hangup {
    /// Send a close frame first.
    Close,
    /// Drop the socket without a closing handshake.
    Drop,
}

/// Bare WebSocket peer: records the first frame it receives, then holds the
/// connection open until told to hang up.
async fn scripted_peer(
    hangup: Hangup,
) -> (SocketAddr, oneshot::Receiver<String>, oneshot::Sender<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let (first_tx, first_rx) = oneshot::channel();
    let (close_tx, close_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        let mut ws = accept_async(stream).await.expect("handshake");
        if let Some(Ok(WsMessage::Text(t))) = ws.next().await {
            let _ = first_tx.send(t);
        }
        let _ = close_rx.await;
        match hangup {
            Hangup::Close => {
                let _ = ws.close(None).await;
            }
            Hangup::Drop => drop(ws),
        }
    });
    (addr, first_rx, close_tx)
}

#[tokio::test]
async fn peers_listing_tracks_connections() {
    let node = test_node();
    let (addr_a, first_a, close_a) = scripted_peer(Hangup::Close).await;
    let (addr_b, first_b, _close_b) = scripted_peer(Hangup::Close).await;

    gossip::connect(node.clone(), &format!("ws://{addr_a}"))
        .await
        .expect("connect a");
    gossip::connect(node.clone(), &format!("ws://{addr_b}"))
        .await
        .expect("connect b");

    let peers = list_peers(State(node.clone())).await.0;
    assert_eq!(peers.len(), 2);
    assert!(peers.contains(&addr_a.to_string()));
    assert!(peers.contains(&addr_b.to_string()));

    // Every new connection opens with QUERY_LATEST.
    assert_eq!(first_a.await.expect("frame a"), r#"{"type":0}"#);
    assert_eq!(first_b.await.expect("frame b"), r#"{"type":0}"#);

    close_a.send(()).expect("close a");
    wait_until("peer a removal", || node.peers().len() == 1).await;

    let peers = list_peers(State(node.clone())).await.0;
    assert_eq!(peers, vec![addr_b.to_string()]);
}

#[tokio::test]
async fn abrupt_disconnect_without_close_frame_removes_peer() {
    let node = test_node();
    let (addr_a, first_a, drop_a) = scripted_peer(Hangup::Drop).await;
    let (addr_b, first_b, _keep_b) = scripted_peer(Hangup::Close).await;

    gossip::connect(node.clone(), &format!("ws://{addr_a}"))
        .await
        .expect("connect a");
    gossip::connect(node.clone(), &format!("ws://{addr_b}"))
        .await
        .expect("connect b");
    first_a.await.expect("frame a");
    first_b.await.expect("frame b");
    assert_eq!(list_peers(State(node.clone())).await.0.len(), 2);

    drop_a.send(()).expect("drop a");
    wait_until("peer a removal", || node.peers().len() == 1).await;

    let peers = list_peers(State(node.clone())).await.0;
    assert_eq!(peers, vec![addr_b.to_string()]);
    assert_eq!(node.metrics().peers.get(), 1);

    // The survivor still receives broadcasts.
    let block = node.mine(json!("after drop"), None).expect("mine");
    assert_eq!(node.latest(), block);
    assert_eq!(node.peers().broadcast(&Message::tip(block)), 1);
}

#[tokio::test]
async fn failed_connect_registers_nothing() {
    let node = test_node();
    let unused = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = unused.local_addr().expect("addr");
    drop(unused);

    assert!(gossip::connect(node.clone(), &format!("ws://{addr}")).await.is_err());
    assert!(gossip::connect(node.clone(), "http://127.0.0.1:1").await.is_err());
    assert!(node.peers().is_empty());
}

#[tokio::test]
async fn lagging_node_catches_up_through_full_chain_query() {
    let behind = test_node();
    let (addr, _accept) = gossip::listen(behind.clone(), "127.0.0.1:0")
        .await
        .expect("listen");

    let ahead = test_node();
    ahead.mine(json!("one"), None).expect("mine");
    ahead.mine(json!("two"), Some("alice".into())).expect("mine");

    gossip::connect(ahead.clone(), &format!("ws://{addr}"))
        .await
        .expect("connect");

    wait_until("chain sync", || behind.chain_len() == 3).await;
    assert_eq!(behind.blocks(), ahead.blocks());
    assert_eq!(behind.metrics().chain_replaced_total.get(), 1);
}

#[tokio::test]
async fn mined_tip_reaches_connected_peer() {
    let a = test_node();
    let (addr, _accept) = gossip::listen(a.clone(), "127.0.0.1:0")
        .await
        .expect("listen");
    let b = test_node();
    gossip::connect(b.clone(), &format!("ws://{addr}"))
        .await
        .expect("connect");
    wait_until("inbound registration", || a.peers().len() == 1).await;

    let block = a.mine(json!("fresh"), None).expect("mine");
    wait_until("tip propagation", || b.chain_len() == 2).await;
    assert_eq!(b.latest(), block);
}

#[tokio::test]
async fn garbage_frames_do_not_drop_the_connection() {
    let node = test_node();
    let (addr, _accept) = gossip::listen(node.clone(), "127.0.0.1:0")
        .await
        .expect("listen");

    let url = format!("ws://{addr}");
    let (mut ws, _) = tokio_tungstenite::connect_async(url.as_str())
        .await
        .expect("connect");

    // Node opens with QUERY_LATEST.
    match ws.next().await {
        Some(Ok(WsMessage::Text(t))) => assert_eq!(Message::decode(&t).unwrap(), Message::QueryLatest),
        other => panic!("unexpected {other:?}"),
    }

    ws.send(WsMessage::Text("{\"type\": 42}".into())).await.expect("send");
    ws.send(WsMessage::Text("garbage".into())).await.expect("send");
    ws.send(WsMessage::Text(Message::QueryAll.encode().unwrap())).await.expect("send");

    match ws.next().await {
        Some(Ok(WsMessage::Text(t))) => {
            assert_eq!(Message::decode(&t).unwrap(), Message::ResponseBlockchain(node.blocks()));
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(node.metrics().invalid_msg_total.get(), 2);
    assert_eq!(node.peers().len(), 1);
}
