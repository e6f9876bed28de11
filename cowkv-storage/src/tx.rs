//! Read transaction context consumed by cursors.

use crate::node::Node;
use crate::pager::Pager;
use crate::source::{EntrySource, PageResolver};
use crate::types::PageId;
use cowkv_result::{Error, Result};
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// A snapshot of one tree: committed pages from the pager plus the node
/// overlays this transaction has materialized.
///
/// Overlays are installed through `&mut self`, so they cannot change while a
/// cursor borrows the transaction. Closing only needs `&self`; cursors
/// observe it on their next seek.
pub struct Tx<'p, P: Pager> {
    pager: &'p P,
    root: PageId,
    nodes: FxHashMap<PageId, Node>,
    closed: AtomicBool,
}

impl<'p, P: Pager> Tx<'p, P> {
    pub fn new(pager: &'p P, root: PageId) -> Self {
        Self {
            pager,
            root,
            nodes: FxHashMap::default(),
            closed: AtomicBool::new(false),
        }
    }

    /// Install `node` as the overlay for its page id. Replaces any previous
    /// overlay for that id.
    pub fn materialize(&mut self, node: Node) {
        debug!(
            page_id = node.id(),
            entries = node.entry_count(),
            "materialize node"
        );
        self.nodes.insert(node.id(), node);
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            debug!(
                root = self.root,
                overlays = self.nodes.len(),
                "transaction closed"
            );
        }
    }
}

impl<P: Pager> PageResolver for Tx<'_, P> {
    #[inline]
    fn root(&self) -> PageId {
        self.root
    }

    fn resolve(&self, id: PageId) -> Option<&dyn EntrySource> {
        if let Some(node) = self.nodes.get(&id) {
            return Some(node);
        }
        self.pager.page(id).map(|page| page as &dyn EntrySource)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            Err(Error::TxClosed)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TreeBuilder;
    use crate::config::BuildConfig;
    use crate::node::Inode;
    use crate::pager::MemPager;

    #[test]
    fn overlay_shadows_committed_page() {
        let mut pager = MemPager::default();
        let root = TreeBuilder::new(&mut pager, BuildConfig::default())
            .build(&[Inode::leaf(b"a".to_vec(), b"committed".to_vec())])
            .unwrap();

        let mut tx = Tx::new(&pager, root);
        assert_eq!(tx.resolve(root).unwrap().value_at(0), b"committed");

        tx.materialize(
            Node::leaf(root, vec![Inode::leaf(b"a".to_vec(), b"dirty".to_vec())]).unwrap(),
        );
        assert_eq!(tx.resolve(root).unwrap().value_at(0), b"dirty");
        assert!(tx.resolve(root + 100).is_none());
    }

    #[test]
    fn materialized_page_keeps_committed_entries() {
        let mut pager = MemPager::default();
        let root = TreeBuilder::new(&mut pager, BuildConfig::default())
            .build(&[Inode::leaf(b"a".to_vec(), b"1".to_vec())])
            .unwrap();
        let mut tx = Tx::new(&pager, root);
        let node = Node::read(pager.page(root).unwrap()).unwrap();
        tx.materialize(node);
        let source = tx.resolve(root).unwrap();
        assert_eq!(source.entry_count(), 1);
        assert_eq!(source.key_at(0), b"a");
    }

    #[test]
    fn close_is_observed() {
        let pager = MemPager::default();
        let tx = Tx::new(&pager, 1);
        assert!(tx.ensure_open().is_ok());
        tx.close();
        tx.close();
        assert!(matches!(tx.ensure_open(), Err(Error::TxClosed)));
    }
}
