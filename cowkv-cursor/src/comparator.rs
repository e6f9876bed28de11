//! Comparators that drive [`generalized_search`](crate::generalized_search).

use crate::bound::{PrefixBound, prefix_bound};
use crate::search::Probe;
use cowkv_result::Result;

/// Classifies entry keys relative to a seek target.
///
/// A comparator sees the keys of every page the cursor descends through,
/// branch keys included, and may update its own state between probes.
pub trait SeekComparator {
    fn probe(&mut self, key: &[u8]) -> Probe;
}

impl<F> SeekComparator for F
where
    F: FnMut(&[u8]) -> Probe,
{
    #[inline]
    fn probe(&mut self, key: &[u8]) -> Probe {
        self(key)
    }
}

/// Forward seek: the first key `>= target`.
#[derive(Clone, Copy, Debug)]
pub struct LowerBound<'a> {
    target: &'a [u8],
}

impl<'a> LowerBound<'a> {
    pub fn new(target: &'a [u8]) -> Self {
        Self { target }
    }
}

impl SeekComparator for LowerBound<'_> {
    #[inline]
    fn probe(&mut self, key: &[u8]) -> Probe {
        if key < self.target {
            Probe::BEFORE
        } else if key == self.target {
            Probe::EXACT
        } else {
            Probe::PAST
        }
    }
}

/// Reverse prefix seek: homes in on the greatest key carrying `prefix`.
///
/// Keys inside `[prefix, bound)` report `has_prefix` and are never
/// `at_or_past`, so a lower-bound search lands right after the last of
/// them. `seek` starts at the prefix and tightens to each greater in-range
/// key the search observes.
#[derive(Clone, Debug)]
pub struct PrefixSeek<'a> {
    prefix: &'a [u8],
    bound: PrefixBound,
    seek: Vec<u8>,
}

impl<'a> PrefixSeek<'a> {
    pub fn new(prefix: &'a [u8]) -> Result<Self> {
        let bound = prefix_bound(prefix)?;
        Ok(Self {
            prefix,
            bound,
            seek: prefix.to_vec(),
        })
    }

    #[inline]
    pub fn prefix(&self) -> &[u8] {
        self.prefix
    }

    #[inline]
    pub fn bound(&self) -> &PrefixBound {
        &self.bound
    }

    /// Greatest in-range key probed so far, or the prefix itself.
    #[inline]
    pub fn seek(&self) -> &[u8] {
        &self.seek
    }
}

impl SeekComparator for PrefixSeek<'_> {
    fn probe(&mut self, key: &[u8]) -> Probe {
        if self.bound.is_past(key) {
            return Probe::PAST;
        }
        if key < self.prefix {
            return Probe::BEFORE;
        }
        if key > self.seek.as_slice() {
            self.seek.clear();
            self.seek.extend_from_slice(key);
        }
        Probe::IN_RANGE
    }
}
