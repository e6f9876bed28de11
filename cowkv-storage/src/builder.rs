//! Bulk loader that writes a sorted entry list as a fresh tree.

use crate::config::BuildConfig;
use crate::node::{Inode, check_ascending};
use crate::page::{BranchEncoder, LeafEncoder};
use crate::pager::Pager;
use crate::types::PageId;
use cowkv_result::{Error, Result};
use tracing::debug;

/// Builds a tree bottom-up: leaves first, chained through their sibling ids,
/// then branch levels whose keys are the minimum key of each child, until a
/// single root remains.
pub struct TreeBuilder<'p, P: Pager> {
    pager: &'p mut P,
    config: BuildConfig,
}

impl<'p, P: Pager> TreeBuilder<'p, P> {
    pub fn new(pager: &'p mut P, config: BuildConfig) -> Self {
        Self { pager, config }
    }

    /// Write `entries` (leaf inodes, strictly ascending) and return the root
    /// page id. An empty input produces a single empty leaf.
    pub fn build(&mut self, entries: &[Inode]) -> Result<PageId> {
        self.config.validate()?;
        check_ascending(entries)?;
        if self.pager.page_size_hint().unwrap_or(usize::MAX) < self.config.page_size {
            return Err(Error::invalid_argument(
                "configured page size exceeds the pager's page size",
            ));
        }

        let leaf_chunks: Vec<&[Inode]> = if entries.is_empty() {
            vec![entries]
        } else {
            entries.chunks(self.config.max_leaf_entries).collect()
        };
        let leaf_ids = self.pager.alloc_ids(leaf_chunks.len())?;

        let mut level: Vec<Inode> = Vec::with_capacity(leaf_chunks.len());
        for (i, chunk) in leaf_chunks.iter().enumerate() {
            let bytes = LeafEncoder {
                inodes: chunk,
                next: leaf_ids.get(i + 1).copied(),
            }
            .encode();
            self.write(leaf_ids[i], &bytes)?;
            let min_key = chunk.first().map(|n| n.key.clone()).unwrap_or_default();
            level.push(Inode::branch(min_key, leaf_ids[i]));
        }

        let mut depth = 1usize;
        while level.len() > 1 {
            let chunks: Vec<&[Inode]> = level.chunks(self.config.max_branch_entries).collect();
            let ids = self.pager.alloc_ids(chunks.len())?;
            let mut parents = Vec::with_capacity(chunks.len());
            for (chunk, &id) in chunks.iter().zip(&ids) {
                let bytes = BranchEncoder { inodes: chunk }.encode();
                self.write(id, &bytes)?;
                parents.push(Inode::branch(chunk[0].key.clone(), id));
            }
            level = parents;
            depth += 1;
        }

        let root = level[0].child;
        debug!(
            entries = entries.len(),
            leaves = leaf_ids.len(),
            depth,
            root,
            "bulk-built tree"
        );
        Ok(root)
    }

    fn write(&mut self, id: PageId, bytes: &[u8]) -> Result<()> {
        if bytes.len() > self.config.page_size {
            return Err(Error::PageOverflow {
                size: bytes.len(),
                max: self.config.page_size,
            });
        }
        self.pager.write_page(id, bytes)
    }
}
