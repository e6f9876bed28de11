use crate::types::DEFAULT_PAGE_SIZE;
use cowkv_result::{Error, Result};

/// Geometry used by [`TreeBuilder`](crate::TreeBuilder) (no hidden constants).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildConfig {
    /// Upper bound on an encoded page, checked by the pager on write.
    pub page_size: usize,
    /// Entries packed into each leaf before starting the next one.
    pub max_leaf_entries: usize,
    /// Children per branch page.
    pub max_branch_entries: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_leaf_entries: 64,
            max_branch_entries: 64,
        }
    }
}

impl BuildConfig {
    /// Small fan-out geometry that yields deep trees from few keys.
    pub fn narrow(max_leaf_entries: usize, max_branch_entries: usize) -> Self {
        Self {
            max_leaf_entries,
            max_branch_entries,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_leaf_entries == 0 {
            return Err(Error::invalid_argument("max_leaf_entries must be at least 1"));
        }
        if self.max_branch_entries < 2 {
            return Err(Error::invalid_argument(
                "max_branch_entries must be at least 2",
            ));
        }
        Ok(())
    }
}
