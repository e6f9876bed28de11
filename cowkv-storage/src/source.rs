//! Read-only capabilities the cursor consumes from the storage layer.

use crate::types::{PageId, PageKind};
use cowkv_result::Result;

/// An ordered, indexable run of tree entries.
///
/// Implemented by the committed [`Page`](crate::Page) and by the in-memory
/// [`Node`](crate::Node) overlay. Exactly one of the two backs any tree
/// location; the cursor never needs to know which.
///
/// Indices passed to the accessors must be below [`entry_count`]; out of
/// range indices panic.
///
/// [`entry_count`]: EntrySource::entry_count
pub trait EntrySource: Send + Sync {
    fn id(&self) -> PageId;

    fn kind(&self) -> PageKind;

    fn entry_count(&self) -> usize;

    fn key_at(&self, index: usize) -> &[u8];

    /// Value bytes of a leaf entry. Branch entries have an empty value.
    fn value_at(&self, index: usize) -> &[u8];

    /// Per-entry flags, see [`BUCKET_LEAF_FLAG`](crate::BUCKET_LEAF_FLAG).
    fn flags_at(&self, index: usize) -> u32;

    /// Child page of a branch entry. `None` on leaves, and on branch entries
    /// whose child id is unset.
    fn child_at(&self, index: usize) -> Option<PageId>;

    #[inline]
    fn is_leaf(&self) -> bool {
        self.kind() == PageKind::Leaf
    }
}

/// Resolves page ids for a tree inside one transaction.
pub trait PageResolver {
    /// Root page of the tree this resolver serves.
    fn root(&self) -> PageId;

    /// The node overlay for `id` if one is materialized, else the committed
    /// page, else `None`.
    fn resolve(&self, id: PageId) -> Option<&dyn EntrySource>;

    /// Fails once the owning transaction has been closed.
    fn ensure_open(&self) -> Result<()>;
}
