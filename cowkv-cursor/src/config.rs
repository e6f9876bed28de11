/// Run-time configuration (no hidden constants).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorConfig {
    /// Most frames a single descent may push. A tree deeper than this is
    /// reported as corrupt instead of being walked, which also stops
    /// descents through cyclic child pointers.
    pub max_depth: usize,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self { max_depth: 32 }
    }
}
