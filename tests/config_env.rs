// Copyright (c) 2026 Memechain
// Licensed under the Apache License, Version 2.0

#![forbid(unsafe_code)]

use memechain::core::config::{parse_peer_list, ConfigError, NodeConfig};
use std::collections::HashMap;
use std::fs;

#[test]
fn defaults_match_deployment_contract() {
    let cfg = NodeConfig::default();
    assert_eq!(cfg.http_port, 8080);
    assert_eq!(cfg.p2p_port, 6001);
    assert!(cfg.peers.is_empty());
    assert_eq!(cfg.p2p_listen_addr(), "0.0.0.0:6001");
}

#[test]
fn toml_file_then_env_overrides() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("node.toml");
    fs::write(
        &path,
        "http_port = 3001\nbind_host = \"127.0.0.1\"\npeers = [\"ws://10.0.0.2:6001\"]\n",
    )
    .expect("write");

    let mut cfg = NodeConfig::from_file(path.to_str().unwrap()).expect("load");
    assert_eq!(cfg.http_port, 3001);
    assert_eq!(cfg.p2p_port, 6001);
    assert_eq!(cfg.http_listen_addr(), "127.0.0.1:3001");

    let env: HashMap<&str, &str> = [
        ("P2P_PORT", "6002"),
        ("PEERS", "ws://a:6001, ,ws://b:6001,"),
    ]
    .into_iter()
    .collect();
    cfg.apply_overrides(|k| env.get(k).map(|v| v.to_string()))
        .expect("overrides");

    assert_eq!(cfg.http_port, 3001);
    assert_eq!(cfg.p2p_port, 6002);
    assert_eq!(cfg.peers, vec!["ws://a:6001", "ws://b:6001"]);
}

#[test]
fn bad_port_is_reported() {
    let mut cfg = NodeConfig::default();
    let err = cfg
        .apply_overrides(|k| (k == "HTTP_PORT").then(|| "70000".to_string()))
        .unwrap_err();
    assert!(matches!(err, ConfigError::BadPort { var: "HTTP_PORT", .. }));
}

#[test]
fn missing_file_and_bad_toml_are_errors() {
    assert!(matches!(
        NodeConfig::from_file("/nonexistent/memechain.toml"),
        Err(ConfigError::Read { .. })
    ));
    assert!(matches!(
        NodeConfig::from_toml_str("http_port = \"x\""),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn empty_peer_list_yields_nothing() {
    assert!(parse_peer_list("").is_empty());
    assert!(parse_peer_list(" , ").is_empty());
}
