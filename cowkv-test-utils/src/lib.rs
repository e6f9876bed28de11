//! Shared helpers for cowkv test binaries and benches.

use std::collections::BTreeMap;
use std::sync::Once;

use cowkv_result::Result;
use cowkv_storage::{BuildConfig, Inode, MemPager, PageId, TreeBuilder};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

static INIT: Once = Once::new();

/// Initialize tracing for test binaries. Safe to call multiple times.
pub fn init_tracing_for_tests() {
    INIT.call_once(|| {
        use tracing_subscriber::filter::EnvFilter;
        use tracing_subscriber::fmt;
        let env = std::env::var("RUST_LOG").ok();
        let filter = match env {
            Some(_) => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            None => EnvFilter::new("info"),
        };
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_test_writer()
            .init();
    });
}

#[cfg(feature = "auto-init")]
mod auto {
    // Use ctor to run at binary init time to avoid having to call init in every test.
    use ctor::ctor;

    #[ctor]
    fn init() {
        super::init_tracing_for_tests();
    }
}

/// Byte alphabet weighted toward the edges of the byte range, so that
/// generated keys exercise carries through 0xFF.
pub const EDGE_ALPHABET: &[u8] = &[0x00, 0x01, b'a', b'b', 0xFE, 0xFF];

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// One random key of length `1..=max_len` drawn from `alphabet`.
pub fn random_key(rng: &mut StdRng, alphabet: &[u8], max_len: usize) -> Vec<u8> {
    let len = rng.random_range(1..=max_len);
    (0..len)
        .map(|_| alphabet[rng.random_range(0..alphabet.len())])
        .collect()
}

/// Up to `count` distinct random keys, sorted ascending, each mapped to its
/// decimal rank. Roughly one in `bucket_every` entries is a bucket leaf
/// (`0` disables buckets).
pub fn random_entries(
    rng: &mut StdRng,
    count: usize,
    alphabet: &[u8],
    max_len: usize,
    bucket_every: u32,
) -> Vec<Inode> {
    let mut keys = BTreeMap::new();
    for _ in 0..count {
        let key = random_key(rng, alphabet, max_len);
        let bucket = bucket_every > 0 && rng.random_range(0..bucket_every) == 0;
        keys.insert(key, bucket);
    }
    keys.into_iter()
        .enumerate()
        .map(|(rank, (key, bucket))| {
            let value = rank.to_string().into_bytes();
            if bucket {
                Inode::bucket(key, value)
            } else {
                Inode::leaf(key, value)
            }
        })
        .collect()
}

/// Leaf inodes for already-sorted `keys`, valued by their position.
pub fn numbered_entries(keys: &[&[u8]]) -> Vec<Inode> {
    keys.iter()
        .enumerate()
        .map(|(i, k)| Inode::leaf(k.to_vec(), i.to_string().into_bytes()))
        .collect()
}

/// Bulk-load `entries` into a fresh in-memory pager.
pub fn build_tree(entries: &[Inode], config: BuildConfig) -> Result<(MemPager, PageId)> {
    let mut pager = MemPager::new(config.page_size);
    let root = TreeBuilder::new(&mut pager, config).build(entries)?;
    Ok((pager, root))
}
