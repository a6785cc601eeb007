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

#![no_main]
#![forbid(unsafe_code)]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use memechain::core::block::{digest, Block};
use memechain::core::chain::Chain;
use memechain::core::reconcile::reconcile;
use memechain::core::validator::is_chain_valid;

#[derive(Clone, Debug, Arbitrary)]
struct FuzzBlock {
    index: u8,
    prev: u8,
    data: String,
    rehash: bool,
}

#[derive(Clone, Debug, Arbitrary)]
struct Input {
    local: Vec<String>,
    remote: Vec<FuzzBlock>,
}

fuzz_target!(|inp: Input| {
    let mut chain = Chain::new();
    for d in inp.local.iter().take(16) {
        let b = chain.mine_block(serde_json::Value::String(d.clone()), None);
        let _ = chain.append_if_valid(b);
    }

    // Remote blocks may point at any local hash (or garbage) and may or may not carry a correct digest.
    let hashes: Vec<String> = chain.blocks().iter().map(|b| b.hash.clone()).collect();
    let remote: Vec<Block> = inp
        .remote
        .iter()
        .take(32)
        .map(|fb| {
            let previous_hash = hashes
                .get(fb.prev as usize)
                .cloned()
                .unwrap_or_else(|| format!("{:02x}", fb.prev));
            let data = serde_json::Value::String(fb.data.clone());
            let index = fb.index as u64;
            let hash = if fb.rehash {
                digest(index, &previous_hash, &data, None)
            } else {
                "00".repeat(32)
            };
            Block { index, previous_hash, data, author: None, hash, timestamp: 0 }
        })
        .collect();

    let before = chain.len();
    let _ = reconcile(&mut chain, remote);
    assert!(chain.len() >= before);
    assert!(is_chain_valid(chain.blocks()));
});
