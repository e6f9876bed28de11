use std::fmt;
use thiserror::Error;

/// Page identifier as seen by the error layer.
///
/// Mirrors `cowkv_storage::PageId`; kept as a plain integer here so this crate
/// stays at the bottom of the dependency graph.
pub type ErrorPageId = u64;

/// Unified error type for all cowkv operations.
///
/// # Error Handling Strategy
///
/// Errors propagate upward through the call stack using Rust's `?` operator.
/// Corruption variants are terminal for the operation that raised them: the
/// cursor stops descending and hands the error back instead of guessing an
/// answer from an inconsistent tree.
///
/// # Thread Safety
///
/// `Error` implements `Send` and `Sync`, so cursors running on different
/// threads over the same snapshot can hand errors back to a coordinator.
#[derive(Error, Debug)]
pub enum Error {
    /// A page or node failed a structural check.
    ///
    /// Raised when:
    /// - a page carries an unknown kind tag
    /// - a tree descent reaches a page that is neither branch nor leaf
    /// - page bytes are truncated or an offset points outside the page
    /// - a branch entry has no child page
    /// - a descent pushes more frames than the configured maximum depth
    ///
    /// # Recovery
    ///
    /// None. The tree is inconsistent; retrying the seek cannot help.
    #[error("page {page_id} is corrupt: {reason}")]
    Corrupt {
        page_id: ErrorPageId,
        reason: String,
    },

    /// Page id resolved to neither a committed page nor an in-memory node.
    #[error("page {0} resolved to neither a page nor a node")]
    MissingPage(ErrorPageId),

    /// Invalid caller input, such as an empty seek prefix or unsorted
    /// builder entries.
    ///
    /// # Recovery
    ///
    /// Fix the input and retry.
    #[error("Invalid argument: {0}")]
    InvalidArgumentError(String),

    /// The transaction backing a cursor has been closed.
    #[error("transaction closed")]
    TxClosed,

    /// An encoded page is larger than the configured page size.
    #[error("page overflow: {size} bytes exceeds page size {max}")]
    PageOverflow { size: usize, max: usize },

    /// Internal error indicating a bug or unexpected state.
    #[error("An internal operation failed: {0}")]
    Internal(String),
}

impl Error {
    /// Build a [`Error::Corrupt`] for `page_id` from any displayable reason.
    ///
    /// # Examples
    ///
    /// ```
    /// use cowkv_result::Error;
    ///
    /// let err = Error::corrupt(7, "unknown page tag 9");
    /// assert_eq!(err.to_string(), "page 7 is corrupt: unknown page tag 9");
    /// ```
    #[inline]
    pub fn corrupt<R: fmt::Display>(page_id: ErrorPageId, reason: R) -> Self {
        Error::Corrupt {
            page_id,
            reason: reason.to_string(),
        }
    }

    /// Build an [`Error::InvalidArgumentError`] from any displayable message.
    #[inline]
    pub fn invalid_argument<M: fmt::Display>(msg: M) -> Self {
        Error::InvalidArgumentError(msg.to_string())
    }

    /// True for the variants that signal a broken tree.
    #[inline]
    pub fn is_corruption(&self) -> bool {
        matches!(self, Error::Corrupt { .. } | Error::MissingPage(_))
    }
}
