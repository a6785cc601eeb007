// Copyright (c) 2026 Memechain
// Licensed under the Apache License, Version 2.0

#![forbid(unsafe_code)]

use memechain::core::block::{genesis_block, Block};
use memechain::core::chain::Chain;
use memechain::core::validator::{check_chain, check_link, is_chain_valid, is_link_valid, ChainError};
use proptest::prelude::*;
use serde_json::json;

fn build_chain(payloads: &[(String, Option<String>)]) -> Chain {
    let mut chain = Chain::new();
    for (data, author) in payloads {
        let b = chain.mine_block(json!(data), author.clone());
        chain.append_if_valid(b).expect("mined block links onto tip");
    }
    chain
}

fn arb_payloads(max: usize) -> impl Strategy<Value = Vec<(String, Option<String>)>> {
    proptest::collection::vec(
        ("[a-z0-9 ]{0,16}", proptest::option::of("[a-z]{1,8}")),
        1..max,
    )
}

proptest! {
    #[test]
    fn mined_chains_are_valid(payloads in arb_payloads(20)) {
        let chain = build_chain(&payloads);
        prop_assert_eq!(chain.len(), payloads.len() + 1);
        prop_assert!(is_chain_valid(chain.blocks()));
    }

    #[test]
    fn tampering_any_hashed_field_breaks_the_link(
        payloads in arb_payloads(8),
        pick in any::<prop::sample::Index>(),
        field in 0u8..3,
    ) {
        let chain = build_chain(&payloads);
        let mut blocks = chain.blocks().to_vec();
        let pos = 1 + pick.index(blocks.len() - 1);

        let original: Block = blocks[pos].clone();
        let mut tampered = original.clone();
        match field {
            0 => tampered.data = json!(format!("{}!", data_of(&original))),
            1 => tampered.previous_hash = format!("{}0", original.previous_hash),
            _ => tampered.index += 1,
        }
        prop_assert!(!is_link_valid(&tampered, &blocks[pos - 1]));

        blocks[pos] = tampered;
        prop_assert!(!is_chain_valid(&blocks));
    }
}

fn data_of(b: &Block) -> String {
    b.data.as_str().unwrap_or_default().to_string()
}

#[test]
fn chain_must_start_at_genesis() {
    let chain = build_chain(&[("a".into(), None), ("b".into(), None)]);

    let mut blocks = chain.blocks().to_vec();
    blocks[0].timestamp = 1;
    assert_eq!(check_chain(&blocks), Err(ChainError::BadGenesis));

    let mut blocks = chain.blocks().to_vec();
    blocks[0].data = json!({"title": "Rarest Pepe"});
    assert_eq!(check_chain(&blocks), Err(ChainError::BadGenesis));

    assert_eq!(check_chain(&blocks[1..]), Err(ChainError::BadGenesis));
    assert_eq!(check_chain(&[]), Err(ChainError::Empty));
}

#[test]
fn genesis_alone_is_valid() {
    assert!(is_chain_valid(&[genesis_block()]));
}

#[test]
fn append_rejects_block_built_on_stale_tip() {
    let mut chain = Chain::new();
    let stale = chain.mine_block(json!("first"), None);
    let b1 = chain.mine_block(json!("second"), None);
    chain.append_if_valid(b1).expect("append");

    assert!(chain.append_if_valid(stale).is_err());
    assert_eq!(chain.len(), 2);
    assert!(check_link(chain.latest(), &genesis_block()).is_ok());
}

#[test]
fn author_is_covered_by_the_hash() {
    let mut chain = Chain::new();
    let mut b = chain.mine_block(json!("meme"), Some("alice".into()));
    b.author = Some("mallory".into());
    assert!(chain.append_if_valid(b).is_err());
    assert_eq!(chain.len(), 1);
}
