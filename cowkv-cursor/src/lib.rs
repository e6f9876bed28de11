//! cowkv-cursor: seek and prefix search over cowkv trees.
//!
//! A [`Cursor`] borrows a [`PageResolver`](cowkv_storage::PageResolver)
//! (normally a [`Tx`](cowkv_storage::Tx)) and positions itself with one
//! root-to-leaf descent per seek. Each level is searched by a pluggable
//! [`SearchFn`] driven by a [`SeekComparator`]; branch levels take the floor
//! child, the leaf level lands on the comparator's target.
//!
//! [`Cursor::seek_last_with_prefix`] finds the greatest key carrying a prefix
//! in that single descent. [`Cursor::seek_last_with_prefix_slow`] answers the
//! same question by scanning forward and serves as its reference.

pub mod bound;
pub mod comparator;
pub mod config;
pub mod cursor;
pub mod search;

pub use bound::{PrefixBound, prefix_bound};
pub use comparator::{LowerBound, PrefixSeek, SeekComparator};
pub use config::CursorConfig;
pub use cursor::{Cursor, Frame};
pub use search::{Probe, SearchFn, SearchOutcome, generalized_search, linear_search};
