//! In-memory node overlays.
//!
//! A [`Node`] stands in for a committed page while a transaction holds
//! uncommitted edits to it. It exposes the same ordered entries as a page.

use crate::page::Page;
use crate::source::EntrySource;
use crate::types::{BUCKET_LEAF_FLAG, NULL_PAGE_ID, PageId, PageKind};
use cowkv_result::{Error, Result};

/// One entry of a node. Leaf inodes carry a value; branch inodes carry the
/// child page they route to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Inode {
    pub flags: u32,
    pub key: Vec<u8>,
    pub value: Vec<u8>,
    pub child: PageId,
}

impl Inode {
    pub fn leaf(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            flags: 0,
            key: key.into(),
            value: value.into(),
            child: NULL_PAGE_ID,
        }
    }

    /// A leaf inode whose value slot names a nested bucket.
    pub fn bucket(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            flags: BUCKET_LEAF_FLAG,
            ..Self::leaf(key, value)
        }
    }

    pub fn branch(key: impl Into<Vec<u8>>, child: PageId) -> Self {
        Self {
            flags: 0,
            key: key.into(),
            value: Vec::new(),
            child,
        }
    }

    #[inline]
    pub fn is_bucket(&self) -> bool {
        self.flags & BUCKET_LEAF_FLAG != 0
    }
}

/// Keys must be strictly ascending: sorted with no duplicates.
pub(crate) fn check_ascending(inodes: &[Inode]) -> Result<()> {
    match inodes.windows(2).position(|w| w[0].key >= w[1].key) {
        Some(i) => Err(Error::invalid_argument(format!(
            "keys must be strictly ascending (entry {} >= entry {})",
            i,
            i + 1
        ))),
        None => Ok(()),
    }
}

#[derive(Clone, Debug)]
pub struct Node {
    id: PageId,
    kind: PageKind,
    inodes: Vec<Inode>,
}

impl Node {
    pub fn leaf(id: PageId, inodes: Vec<Inode>) -> Result<Self> {
        check_ascending(&inodes)?;
        Ok(Self {
            id,
            kind: PageKind::Leaf,
            inodes,
        })
    }

    pub fn branch(id: PageId, inodes: Vec<Inode>) -> Result<Self> {
        check_ascending(&inodes)?;
        if inodes.is_empty() {
            return Err(Error::invalid_argument("branch node needs at least one child"));
        }
        if let Some(i) = inodes.iter().position(|n| n.child == NULL_PAGE_ID) {
            return Err(Error::invalid_argument(format!(
                "branch entry {i} has no child page"
            )));
        }
        Ok(Self {
            id,
            kind: PageKind::Branch,
            inodes,
        })
    }

    /// Materialize a committed branch or leaf page.
    pub fn read(page: &Page) -> Result<Self> {
        let id = page.id();
        let count = page.entry_count();
        let mut inodes = Vec::with_capacity(count);
        match page.kind() {
            PageKind::Leaf => {
                for i in 0..count {
                    inodes.push(Inode {
                        flags: page.flags_at(i),
                        key: page.key_at(i).to_vec(),
                        value: page.value_at(i).to_vec(),
                        child: NULL_PAGE_ID,
                    });
                }
            }
            PageKind::Branch => {
                for i in 0..count {
                    let child = page.child_at(i).ok_or_else(|| {
                        Error::corrupt(id, format!("branch entry {i} has no child"))
                    })?;
                    inodes.push(Inode::branch(page.key_at(i), child));
                }
            }
            other => {
                return Err(Error::corrupt(
                    id,
                    format!("cannot materialize a {other:?} page as a node"),
                ));
            }
        }
        Ok(Self {
            id,
            kind: page.kind(),
            inodes,
        })
    }

    #[inline]
    pub fn inodes(&self) -> &[Inode] {
        &self.inodes
    }
}

impl EntrySource for Node {
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
        self.inodes.len()
    }

    #[inline]
    fn key_at(&self, index: usize) -> &[u8] {
        &self.inodes[index].key
    }

    #[inline]
    fn value_at(&self, index: usize) -> &[u8] {
        &self.inodes[index].value
    }

    #[inline]
    fn flags_at(&self, index: usize) -> u32 {
        self.inodes[index].flags
    }

    #[inline]
    fn child_at(&self, index: usize) -> Option<PageId> {
        let inode = &self.inodes[index];
        (self.kind == PageKind::Branch && inode.child != NULL_PAGE_ID).then_some(inode.child)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{BranchEncoder, LeafEncoder};

    #[test]
    fn leaf_rejects_unsorted_and_duplicate_keys() {
        let unsorted = vec![
            Inode::leaf(b"b".to_vec(), b"".to_vec()),
            Inode::leaf(b"a".to_vec(), b"".to_vec()),
        ];
        assert!(matches!(
            Node::leaf(1, unsorted),
            Err(Error::InvalidArgumentError(_))
        ));

        let dup = vec![
            Inode::leaf(b"a".to_vec(), b"1".to_vec()),
            Inode::leaf(b"a".to_vec(), b"2".to_vec()),
        ];
        assert!(Node::leaf(1, dup).is_err());
    }

    #[test]
    fn branch_requires_children() {
        assert!(Node::branch(1, vec![]).is_err());
        let dangling = vec![Inode::branch(b"a".to_vec(), NULL_PAGE_ID)];
        assert!(Node::branch(1, dangling).is_err());
        let node = Node::branch(1, vec![Inode::branch(b"a".to_vec(), 7)]).unwrap();
        assert_eq!(node.child_at(0), Some(7));
        assert!(!node.is_leaf());
    }

    #[test]
    fn read_materializes_leaf_page() {
        let inodes = vec![
            Inode::leaf(b"k1".to_vec(), b"v1".to_vec()),
            Inode::bucket(b"k2".to_vec(), b"sub".to_vec()),
        ];
        let bytes = LeafEncoder {
            inodes: &inodes,
            next: None,
        }
        .encode();
        let page = Page::from_bytes(4, &bytes).unwrap();
        let node = Node::read(&page).unwrap();

        assert_eq!(node.id(), 4);
        assert_eq!(node.inodes(), inodes.as_slice());
        assert!(node.inodes()[1].is_bucket());
    }

    #[test]
    fn read_materializes_branch_page() {
        let inodes = vec![
            Inode::branch(b"a".to_vec(), 2),
            Inode::branch(b"q".to_vec(), 3),
        ];
        let bytes = BranchEncoder { inodes: &inodes }.encode();
        let node = Node::read(&Page::from_bytes(1, &bytes).unwrap()).unwrap();
        assert_eq!(node.kind(), PageKind::Branch);
        assert_eq!(node.inodes(), inodes.as_slice());
    }
}
