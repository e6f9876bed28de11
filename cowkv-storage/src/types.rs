use cowkv_result::{Error, Result};

/// Identifier of a page in the store. Id 0 is never allocated, so it doubles
/// as "no page" inside encoded branch entries.
pub type PageId = u64;

/// The reserved "no page" id.
pub const NULL_PAGE_ID: PageId = 0;

/// Leaf entry flag: the value slot names a nested bucket rather than data.
pub const BUCKET_LEAF_FLAG: u32 = 0x01;

/// Size of the fixed page header: tag (u8), count (u32), aux length (u32).
pub const PAGE_HEADER_LEN: usize = 9;

/// Leaf index entry: k_off, k_len, v_off, v_len, flags (u32 each).
pub const LEAF_INDEX_ENTRY_LEN: usize = 20;

/// Branch index entry: row offset (u32).
pub const BRANCH_INDEX_ENTRY_LEN: usize = 4;

pub const DEFAULT_PAGE_SIZE: usize = 4096;

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PageKind {
    Branch = 0,
    Leaf = 1,
    Meta = 2,
    Freelist = 3,
}

impl PageKind {
    pub fn from_u8(page_id: PageId, tag: u8) -> Result<Self> {
        match tag {
            0 => Ok(PageKind::Branch),
            1 => Ok(PageKind::Leaf),
            2 => Ok(PageKind::Meta),
            3 => Ok(PageKind::Freelist),
            other => Err(Error::corrupt(page_id, format!("unknown page tag {other}"))),
        }
    }

    /// Branch and leaf pages are the only kinds a tree descent may visit.
    #[inline]
    pub fn is_tree_page(self) -> bool {
        matches!(self, PageKind::Branch | PageKind::Leaf)
    }
}

/// Borrowed key/value pair yielded by a cursor. A `None` value marks a bucket
/// leaf entry.
pub type KeyValue<'a> = (&'a [u8], Option<&'a [u8]>);
