//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use cowkv_result::Result;
use cowkv_storage::{
    BranchEncoder, Inode, KeyValue, MemPager, PageId, PageKind, Pager, encode_opaque,
};

pub use cowkv_test_utils::{
    EDGE_ALPHABET, build_tree, init_tracing_for_tests, numbered_entries, random_entries,
    random_key, seeded_rng,
};

/// Owned copy of a cursor result, comparable after the transaction is gone.
pub type OwnedEntry = Option<(Vec<u8>, Option<Vec<u8>>)>;

pub fn owned(kv: Option<KeyValue<'_>>) -> OwnedEntry {
    kv.map(|(k, v)| (k.to_vec(), v.map(<[u8]>::to_vec)))
}

pub fn key_of(kv: Option<KeyValue<'_>>) -> Option<Vec<u8>> {
    kv.map(|(k, _)| k.to_vec())
}

/// Every distinct non-empty prefix of every key, plus the keys themselves
/// extended by each edge byte, so that absent prefixes are probed too.
pub fn candidate_prefixes(entries: &[Inode]) -> Vec<Vec<u8>> {
    let mut out = std::collections::BTreeSet::new();
    for e in entries {
        for len in 1..=e.key.len() {
            out.insert(e.key[..len].to_vec());
        }
        for &b in EDGE_ALPHABET {
            let mut k = e.key.clone();
            k.push(b);
            out.insert(k);
        }
    }
    for &b in EDGE_ALPHABET {
        out.insert(vec![b]);
        out.insert(vec![b, b]);
    }
    out.into_iter().collect()
}

/// Hand-written branch page routing each key to its child. Returns its id.
pub fn write_branch(pager: &mut MemPager, routes: &[(&[u8], PageId)]) -> Result<PageId> {
    let inodes: Vec<Inode> = routes
        .iter()
        .map(|(key, child)| Inode::branch(key.to_vec(), *child))
        .collect();
    let id = pager.alloc_ids(1)?[0];
    pager.write_page(id, &BranchEncoder { inodes: &inodes }.encode())?;
    Ok(id)
}

pub fn write_freelist(pager: &mut MemPager) -> Result<PageId> {
    let id = pager.alloc_ids(1)?[0];
    pager.write_page(id, &encode_opaque(PageKind::Freelist, &[]))?;
    Ok(id)
}
