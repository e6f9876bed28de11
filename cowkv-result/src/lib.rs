//! Error types and result definitions for the cowkv store.
//!
//! Every cowkv crate returns [`Result<T>`], whose error variant is the single
//! [`Error`] enum defined here. Errors propagate with the `?` operator from the
//! page decoders up through the cursor to the caller.
//!
//! # Error Categories
//!
//! - **Structural corruption** ([`Error::Corrupt`], [`Error::MissingPage`]): a
//!   tree-consistency invariant is broken somewhere. Never retried.
//! - **Caller errors** ([`Error::InvalidArgumentError`], [`Error::TxClosed`]):
//!   rejected at the API boundary before the tree is touched.
//! - **Builder limits** ([`Error::PageOverflow`]): an encoded page exceeded the
//!   configured page size.
//! - **Internal errors** ([`Error::Internal`]): bugs or unexpected states.
//!
//! A seek that finds nothing is not an error; it returns `Ok(None)`.

pub mod error;
pub mod result;

pub use error::Error;
pub use result::Result;
