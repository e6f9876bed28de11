//! Immutable encoded pages.
//!
//! Layout (little endian):
//!
//! ```text
//! [tag u8][count u32][aux_len u32][aux][entries ...][index table]
//! ```
//!
//! Leaf pages store keys and values in two contiguous blocks; the index table
//! holds one `(k_off, k_len, v_off, v_len, flags)` record per entry. The leaf
//! aux area is `[u32 next_len][next sibling id]`.
//!
//! Branch pages store rows `[k_len u32][key][child u64]`; the index table holds
//! one row offset per entry.
//!
//! Meta and freelist pages carry an opaque payload in the aux area and no
//! entries.

use crate::codecs::{push_u32, push_u64, read_u32_at, read_u64_at};
use crate::node::Inode;
use crate::source::EntrySource;
use crate::types::{
    BRANCH_INDEX_ENTRY_LEN, LEAF_INDEX_ENTRY_LEN, NULL_PAGE_ID, PAGE_HEADER_LEN, PageId,
    PageKind,
};
use cowkv_result::{Error, Result};
use std::sync::Arc;

#[derive(Clone)]
pub struct Page {
    id: PageId,
    kind: PageKind,
    count: usize,
    bytes: Arc<[u8]>,
    entries_start: usize,
    index_start: usize,
    // Leaf only: start of the values block.
    values_base: usize,
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("count", &self.count)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl Page {
    /// Decode and validate `bytes` as page `id`.
    ///
    /// Every offset in the index table is checked here, so the accessors
    /// afterwards never slice out of bounds.
    pub fn from_bytes(id: PageId, bytes: &[u8]) -> Result<Self> {
        Self::from_shared(id, Arc::from(bytes))
    }

    pub fn from_shared(id: PageId, bytes: Arc<[u8]>) -> Result<Self> {
        let len = bytes.len();
        if len < PAGE_HEADER_LEN {
            return Err(Error::corrupt(id, "page shorter than its header"));
        }
        let kind = PageKind::from_u8(id, bytes[0])?;
        let (count, aux_len) = match (read_u32_at(&bytes, 1), read_u32_at(&bytes, 5)) {
            (Some((count, _)), Some((aux_len, _))) => (count as usize, aux_len as usize),
            _ => return Err(Error::corrupt(id, "truncated page header")),
        };
        let entries_start = PAGE_HEADER_LEN
            .checked_add(aux_len)
            .filter(|&end| end <= len)
            .ok_or_else(|| Error::corrupt(id, "aux area runs past end of page"))?;

        let mut page = Page {
            id,
            kind,
            count,
            bytes,
            entries_start,
            index_start: len,
            values_base: entries_start,
        };
        match kind {
            PageKind::Leaf => page.validate_leaf()?,
            PageKind::Branch => page.validate_branch()?,
            PageKind::Meta | PageKind::Freelist => page.count = 0,
        }
        Ok(page)
    }

    fn index_table_start(&self, entry_len: usize) -> Result<usize> {
        let len = self.bytes.len();
        self.count
            .checked_mul(entry_len)
            .filter(|&index_len| index_len <= len - self.entries_start)
            .map(|index_len| len - index_len)
            .ok_or_else(|| Error::corrupt(self.id, "index table overruns page"))
    }

    fn validate_leaf(&mut self) -> Result<()> {
        self.index_start = self.index_table_start(LEAF_INDEX_ENTRY_LEN)?;

        if self.entries_start > PAGE_HEADER_LEN {
            let aux = &self.bytes[PAGE_HEADER_LEN..self.entries_start];
            let next_len = read_u32_at(aux, 0)
                .map(|(n, _)| n as usize)
                .ok_or_else(|| Error::corrupt(self.id, "truncated leaf aux area"))?;
            if !(next_len == 0 || next_len == 8) || 4 + next_len > aux.len() {
                return Err(Error::corrupt(self.id, "bad sibling id in leaf aux area"));
            }
        }

        let keys_len = match self.count {
            0 => 0,
            n => {
                let (k_off, k_len, ..) = self.leaf_index_fields(n - 1);
                k_off
                    .checked_add(k_len)
                    .ok_or_else(|| Error::corrupt(self.id, "key block length overflow"))?
            }
        };
        self.values_base = self
            .entries_start
            .checked_add(keys_len)
            .filter(|&base| base <= self.index_start)
            .ok_or_else(|| Error::corrupt(self.id, "key block overruns index table"))?;

        let values_len = self.index_start - self.values_base;
        for i in 0..self.count {
            let (k_off, k_len, v_off, v_len, _) = self.leaf_index_fields(i);
            let key_ok = k_off.checked_add(k_len).is_some_and(|end| end <= keys_len);
            let val_ok = v_off.checked_add(v_len).is_some_and(|end| end <= values_len);
            if !key_ok || !val_ok {
                return Err(Error::corrupt(
                    self.id,
                    format!("leaf entry {i} points outside the page"),
                ));
            }
        }
        Ok(())
    }

    fn validate_branch(&mut self) -> Result<()> {
        self.index_start = self.index_table_start(BRANCH_INDEX_ENTRY_LEN)?;
        for i in 0..self.count {
            let row = self.entries_start + self.u32_field(self.index_start + i * 4);
            let row_end = read_u32_at(&self.bytes[..self.index_start], row)
                .and_then(|(k_len, pos)| pos.checked_add(k_len as usize))
                .and_then(|key_end| key_end.checked_add(8));
            if row_end.is_none_or(|end| end > self.index_start) {
                return Err(Error::corrupt(
                    self.id,
                    format!("branch entry {i} points outside the page"),
                ));
            }
        }
        Ok(())
    }

    #[inline]
    fn u32_field(&self, pos: usize) -> usize {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(&self.bytes[pos..pos + 4]);
        u32::from_le_bytes(raw) as usize
    }

    #[inline(always)]
    fn leaf_index_fields(&self, i: usize) -> (usize, usize, usize, usize, u32) {
        let base = self.index_start + i * LEAF_INDEX_ENTRY_LEN;
        (
            self.u32_field(base),
            self.u32_field(base + 4),
            self.u32_field(base + 8),
            self.u32_field(base + 12),
            self.u32_field(base + 16) as u32,
        )
    }

    #[inline]
    fn branch_row(&self, i: usize) -> (usize, usize) {
        let row = self.entries_start + self.u32_field(self.index_start + i * 4);
        let k_len = self.u32_field(row);
        (row + 4, k_len)
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Right sibling recorded in a leaf's aux area.
    pub fn next_leaf(&self) -> Option<PageId> {
        if self.kind != PageKind::Leaf || self.entries_start == PAGE_HEADER_LEN {
            return None;
        }
        let aux = &self.bytes[PAGE_HEADER_LEN..self.entries_start];
        match read_u32_at(aux, 0) {
            Some((8, pos)) => read_u64_at(aux, pos)
                .map(|(id, _)| id)
                .filter(|&id| id != NULL_PAGE_ID),
            _ => None,
        }
    }

    /// Opaque payload of a meta or freelist page.
    pub fn payload(&self) -> &[u8] {
        match self.kind {
            PageKind::Meta | PageKind::Freelist => {
                &self.bytes[PAGE_HEADER_LEN..self.entries_start]
            }
            _ => &[],
        }
    }
}

impl EntrySource for Page {
    #[inline]
    fn id(&self) -> PageId {
        self.id
    }

    #[inline]
    fn kind(&self) -> PageKind {
        self.kind
    }

    #[inline]
    fn entry_count(&self) -> usize {
        self.count
    }

    #[inline]
    fn key_at(&self, index: usize) -> &[u8] {
        assert!(index < self.count, "entry {index} out of range");
        match self.kind {
            PageKind::Leaf => {
                let (k_off, k_len, ..) = self.leaf_index_fields(index);
                let start = self.entries_start + k_off;
                &self.bytes[start..start + k_len]
            }
            _ => {
                let (start, k_len) = self.branch_row(index);
                &self.bytes[start..start + k_len]
            }
        }
    }

    #[inline]
    fn value_at(&self, index: usize) -> &[u8] {
        assert!(index < self.count, "entry {index} out of range");
        if self.kind != PageKind::Leaf {
            return &[];
        }
        let (_, _, v_off, v_len, _) = self.leaf_index_fields(index);
        let start = self.values_base + v_off;
        &self.bytes[start..start + v_len]
    }

    #[inline]
    fn flags_at(&self, index: usize) -> u32 {
        assert!(index < self.count, "entry {index} out of range");
        if self.kind != PageKind::Leaf {
            return 0;
        }
        self.leaf_index_fields(index).4
    }

    #[inline]
    fn child_at(&self, index: usize) -> Option<PageId> {
        assert!(index < self.count, "entry {index} out of range");
        if self.kind != PageKind::Branch {
            return None;
        }
        let (start, k_len) = self.branch_row(index);
        read_u64_at(&self.bytes, start + k_len)
            .map(|(id, _)| id)
            .filter(|&id| id != NULL_PAGE_ID)
    }
}

// ============================== Page encoders ================================

/// Encodes a leaf page from sorted inodes.
pub struct LeafEncoder<'a> {
    pub inodes: &'a [Inode],
    pub next: Option<PageId>,
}

impl LeafEncoder<'_> {
    pub fn encode(&self) -> Vec<u8> {
        let count = self.inodes.len();
        let next_len = if self.next.is_some() { 8 } else { 0 };
        let aux_len = 4 + next_len;

        let mut keys_block = Vec::with_capacity(self.inodes.iter().map(|n| n.key.len()).sum());
        let mut values_block =
            Vec::with_capacity(self.inodes.iter().map(|n| n.value.len()).sum());
        let mut index = Vec::with_capacity(count * LEAF_INDEX_ENTRY_LEN);
        for inode in self.inodes {
            push_u32(&mut index, keys_block.len() as u32);
            push_u32(&mut index, inode.key.len() as u32);
            push_u32(&mut index, values_block.len() as u32);
            push_u32(&mut index, inode.value.len() as u32);
            push_u32(&mut index, inode.flags);
            keys_block.extend_from_slice(&inode.key);
            values_block.extend_from_slice(&inode.value);
        }

        let mut out = Vec::with_capacity(
            PAGE_HEADER_LEN + aux_len + keys_block.len() + values_block.len() + index.len(),
        );
        out.push(PageKind::Leaf as u8);
        push_u32(&mut out, count as u32);
        push_u32(&mut out, aux_len as u32);
        push_u32(&mut out, next_len as u32);
        if let Some(id) = self.next {
            push_u64(&mut out, id);
        }
        out.extend_from_slice(&keys_block);
        out.extend_from_slice(&values_block);
        out.extend_from_slice(&index);
        out
    }
}

/// Encodes a branch page from sorted inodes; each inode's `child` is the
/// subtree it routes to.
pub struct BranchEncoder<'a> {
    pub inodes: &'a [Inode],
}

impl BranchEncoder<'_> {
    pub fn encode(&self) -> Vec<u8> {
        let count = self.inodes.len();
        let rows_len: usize = self.inodes.iter().map(|n| 4 + n.key.len() + 8).sum();
        let mut out = Vec::with_capacity(PAGE_HEADER_LEN + rows_len + 4 * count);
        out.push(PageKind::Branch as u8);
        push_u32(&mut out, count as u32);
        push_u32(&mut out, 0);
        let entries_start = out.len();
        let mut offsets = Vec::with_capacity(count);
        for inode in self.inodes {
            offsets.push((out.len() - entries_start) as u32);
            push_u32(&mut out, inode.key.len() as u32);
            out.extend_from_slice(&inode.key);
            push_u64(&mut out, inode.child);
        }
        for off in offsets {
            push_u32(&mut out, off);
        }
        out
    }
}

/// Encodes a page with no entries and `payload` in its aux area (meta and
/// freelist pages).
pub fn encode_opaque(kind: PageKind, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(PAGE_HEADER_LEN + payload.len());
    out.push(kind as u8);
    push_u32(&mut out, 0);
    push_u32(&mut out, payload.len() as u32);
    out.extend_from_slice(payload);
    out
}
