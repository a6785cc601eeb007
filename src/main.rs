#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Memechain node entrypoint.
//! Starts the gossip listener, dials configured peers and serves the HTTP gateway.

use std::sync::Arc;

use anyhow::Context;
use memechain::core::config::NodeConfig;
use memechain::monitoring::metrics::Metrics;
use memechain::networking::gossip;
use memechain::node::Node;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);
    // LOG_FORMAT=json for log shippers; compact text otherwise.
    let _ = if env("LOG_FORMAT", "text") == "json" {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cfg = NodeConfig::from_env().context("load configuration")?;
    let metrics = Arc::new(Metrics::new().context("metrics init")?);
    let node = Arc::new(Node::new(metrics));

    info!(
        http_port = cfg.http_port,
        p2p_port = cfg.p2p_port,
        peers = cfg.peers.len(),
        "memechain node starting"
    );

    let (_p2p_addr, p2p_task) = gossip::listen(node.clone(), &cfg.p2p_listen_addr())
        .await
        .context("bind gossip listener")?;

    for peer in cfg.peers.iter().cloned() {
        gossip::dial(node.clone(), peer);
    }

    let http_task = tokio::spawn(memechain::http::serve(node, cfg.http_listen_addr()));

    tokio::select! {
        _ = tokio::signal::ctrl_c() => info!("shutdown requested"),
        res = http_task => match res {
            Ok(Ok(())) => warn!("http gateway stopped"),
            Ok(Err(e)) => return Err(e).context("http gateway"),
            Err(e) => return Err(e).context("http task"),
        },
        _ = p2p_task => warn!("gossip listener stopped"),
    }
    Ok(())
}
