//! cowkv: cursors over copy-on-write B+trees.
//!
//! This crate is the entrypoint for the cowkv crates. It re-exports the
//! cursor and the storage collaborators it reads through.
//!
//! # Quick Start
//!
//! Bulk-load a tree, open a read transaction, and find the last key under a
//! prefix:
//!
//! ```rust
//! use cowkv::{BuildConfig, Cursor, Inode, MemPager, TreeBuilder, Tx};
//!
//! let mut pager = MemPager::default();
//! let entries = vec![
//!     Inode::leaf(b"user:1".to_vec(), b"ada".to_vec()),
//!     Inode::leaf(b"user:2".to_vec(), b"grace".to_vec()),
//!     Inode::leaf(b"zone:1".to_vec(), b"eu".to_vec()),
//! ];
//! let root = TreeBuilder::new(&mut pager, BuildConfig::default())
//!     .build(&entries)
//!     .unwrap();
//!
//! let tx = Tx::new(&pager, root);
//! let mut cursor = Cursor::new(&tx);
//! let (key, value) = cursor.seek_last_with_prefix(b"user:").unwrap().unwrap();
//! assert_eq!(key, b"user:2");
//! assert_eq!(value, Some(&b"grace"[..]));
//! ```
//!
//! # Architecture
//!
//! - **Cursor** (`cowkv-cursor`): path-stack cursor, pluggable binary search,
//!   prefix bounds.
//! - **Storage** (`cowkv-storage`): encoded pages, node overlays, the pager
//!   and read transactions.
//! - **Errors** (`cowkv-result`): the shared `Error` / `Result` types.

pub use cowkv_cursor::{
    Cursor, CursorConfig, LowerBound, PrefixBound, PrefixSeek, Probe, SearchFn, SearchOutcome,
    SeekComparator, generalized_search, linear_search, prefix_bound,
};

pub use cowkv_storage::{
    BUCKET_LEAF_FLAG, BuildConfig, EntrySource, Inode, KeyValue, MemPager, Node, PageId,
    PageResolver, Pager, TreeBuilder, Tx,
};

pub mod storage {
    //! Page-level building blocks, for callers that write pages by hand.

    pub use cowkv_storage::{
        BranchEncoder, LeafEncoder, NULL_PAGE_ID, Page, PageKind, encode_opaque,
    };
}

pub use cowkv_result::{Error, Result};
