//! In-memory pager with u64 page ids.
//! Intended for tests, benches, and ephemeral stores.

use crate::page::Page;
use crate::pager::Pager;
use crate::source::EntrySource;
use crate::types::{DEFAULT_PAGE_SIZE, PageId};
use cowkv_result::{Error, Result};
use rustc_hash::FxHashMap;
use tracing::trace;

/// Simple in-memory pager. Not synchronized; share it behind a lock or hand
/// out shared references once writing is finished.
pub struct MemPager {
    page_size: usize,
    pages: FxHashMap<PageId, Page>,
    next_id: PageId,
}

impl Default for MemPager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl MemPager {
    /// Create with a maximum page size (checked on writes).
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size,
            pages: FxHashMap::default(),
            next_id: 1,
        }
    }

    /// Number of pages currently stored (for tests/tools).
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// True if no pages (for tests/tools).
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl Pager for MemPager {
    #[inline]
    fn page(&self, id: PageId) -> Option<&Page> {
        self.pages.get(&id)
    }

    fn alloc_ids(&mut self, count: usize) -> Result<Vec<PageId>> {
        let start = self.next_id;
        // checked add to avoid wrap
        self.next_id = self
            .next_id
            .checked_add(count as u64)
            .ok_or_else(|| Error::Internal("page id space overflow".to_string()))?;
        Ok((start..self.next_id).collect())
    }

    fn write_page(&mut self, id: PageId, bytes: &[u8]) -> Result<()> {
        if bytes.len() > self.page_size {
            return Err(Error::PageOverflow {
                size: bytes.len(),
                max: self.page_size,
            });
        }
        let page = Page::from_bytes(id, bytes)?;
        trace!(page_id = id, kind = ?page.kind(), len = bytes.len(), "write page");
        self.pages.insert(id, page);
        Ok(())
    }

    fn free_ids(&mut self, ids: &[PageId]) -> Result<()> {
        for id in ids {
            self.pages.remove(id);
        }
        Ok(())
    }

    fn page_size_hint(&self) -> Option<usize> {
        Some(self.page_size)
    }
}
