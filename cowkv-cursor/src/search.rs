//! Comparator-driven binary search over one page's entries.

/// What a comparator reports about one probed entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Probe {
    /// The entry is at or past the search target. Must be monotonic over a
    /// page: false for a (possibly empty) run of leading entries, true for
    /// the rest.
    pub at_or_past: bool,
    /// The entry lies inside the range the caller is homing in on.
    pub has_prefix: bool,
    /// The entry equals the target exactly.
    pub exact: bool,
}

impl Probe {
    pub const BEFORE: Probe = Probe {
        at_or_past: false,
        has_prefix: false,
        exact: false,
    };

    pub const PAST: Probe = Probe {
        at_or_past: true,
        has_prefix: false,
        exact: false,
    };

    pub const EXACT: Probe = Probe {
        at_or_past: true,
        has_prefix: false,
        exact: true,
    };

    pub const IN_RANGE: Probe = Probe {
        at_or_past: false,
        has_prefix: true,
        exact: false,
    };
}

/// Result of searching `n` entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Smallest index reported `at_or_past`, or `n` if there is none.
    pub index: usize,
    /// The entry at `index` reported `exact`.
    pub exact: bool,
    /// Largest probed index reported `has_prefix`.
    pub last_prefix: Option<usize>,
}

impl SearchOutcome {
    /// Where a leaf search lands: on the rightmost in-range entry when one
    /// was seen, otherwise on the lower bound.
    #[inline]
    pub fn leaf_index(&self) -> usize {
        self.last_prefix.unwrap_or(self.index)
    }

    /// Child slot a branch search descends into. An inexact hit belongs to
    /// the previous child.
    #[inline]
    pub fn branch_index(&self) -> usize {
        if !self.exact && self.index > 0 {
            self.index - 1
        } else {
            self.index
        }
    }
}

/// A pluggable search over `n` entries given a per-index probe.
pub type SearchFn = fn(usize, &mut dyn FnMut(usize) -> Probe) -> SearchOutcome;

/// Lower-bound binary search that also remembers the rightmost in-range
/// probe. Every in-range entry reports `at_or_past == false`, so the
/// in-range run always ends right below `index` and its last entry is
/// among the probes.
pub fn generalized_search(n: usize, probe: &mut dyn FnMut(usize) -> Probe) -> SearchOutcome {
    let (mut lo, mut hi) = (0usize, n);
    let mut exact = false;
    let mut last_prefix: Option<usize> = None;
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        let p = probe(mid);
        if p.has_prefix && last_prefix.is_none_or(|last| mid > last) {
            last_prefix = Some(mid);
        }
        if p.at_or_past {
            hi = mid;
            exact = p.exact;
        } else {
            lo = mid + 1;
        }
    }
    SearchOutcome {
        index: lo,
        exact: lo < n && exact,
        last_prefix,
    }
}

/// Entry-by-entry scan with the same contract as [`generalized_search`].
pub fn linear_search(n: usize, probe: &mut dyn FnMut(usize) -> Probe) -> SearchOutcome {
    let mut last_prefix = None;
    for i in 0..n {
        let p = probe(i);
        if p.at_or_past {
            return SearchOutcome {
                index: i,
                exact: p.exact,
                last_prefix,
            };
        }
        if p.has_prefix {
            last_prefix = Some(i);
        }
    }
    SearchOutcome {
        index: n,
        exact: false,
        last_prefix,
    }
}
