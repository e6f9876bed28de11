use crate::page::Page;
use crate::types::PageId;
use cowkv_result::Result;

pub mod mem;
pub use mem::MemPager;

/// Committed page store contract.
///
/// - Reads hand out already-decoded [`Page`]s; decoding and validation happen
///   once, on write.
/// - Writes take `&mut self`: one writer per store, enforced by the owner.
pub trait Pager {
    /// Committed page `id`, if one was written.
    fn page(&self, id: PageId) -> Option<&Page>;

    /// Allocate `count` new page ids.
    fn alloc_ids(&mut self, count: usize) -> Result<Vec<PageId>>;

    /// Decode, validate and store `bytes` as page `id`.
    fn write_page(&mut self, id: PageId, bytes: &[u8]) -> Result<()>;

    /// Drop pages. Unknown ids are ignored.
    fn free_ids(&mut self, ids: &[PageId]) -> Result<()>;

    /// Optional page-size limit enforced on writes.
    fn page_size_hint(&self) -> Option<usize>;
}
