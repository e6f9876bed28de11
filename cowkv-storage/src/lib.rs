//! cowkv-storage: the page and transaction layer consulted by cowkv cursors.
//!
//! Pages are immutable once written; a transaction can shadow any page with
//! an in-memory [`Node`] overlay. Both expose the same [`EntrySource`]
//! capability, and a [`PageResolver`] picks whichever backs a page id.

pub mod builder;
pub mod codecs;
pub mod config;
pub mod node;
pub mod page;
pub mod pager;
pub mod source;
pub mod tx;
pub mod types;

pub use builder::TreeBuilder;
pub use config::BuildConfig;
pub use node::{Inode, Node};
pub use page::{BranchEncoder, LeafEncoder, Page, encode_opaque};
pub use pager::{MemPager, Pager};
pub use source::{EntrySource, PageResolver};
pub use tx::Tx;
pub use types::*;
