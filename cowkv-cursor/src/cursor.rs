//! Path-stack cursor over one tree of a transaction.
//!
//! The cursor keeps one [`Frame`] per tree level, root first. Every seek
//! clears the stack and rebuilds it with a single root-to-leaf descent;
//! `next` / `prev` then move the leaf frame, climbing and re-descending
//! through the stack when a page boundary is crossed.
//!
//! Keys and values are borrowed from the transaction, so they outlive the
//! cursor position they were read at.

use crate::comparator::{LowerBound, PrefixSeek, SeekComparator};
use crate::config::CursorConfig;
use crate::search::{SearchFn, SearchOutcome, generalized_search};
use cowkv_result::{Error, Result};
use cowkv_storage::{BUCKET_LEAF_FLAG, EntrySource, KeyValue, PageId, PageKind, PageResolver};
use tracing::{debug, error, trace};

/// One level of the path stack: a page or node and the position in it.
#[derive(Clone, Copy)]
pub struct Frame<'tx> {
    source: &'tx dyn EntrySource,
    index: usize,
}

impl<'tx> Frame<'tx> {
    #[inline]
    pub fn page_id(&self) -> PageId {
        self.source.id()
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn source(&self) -> &'tx dyn EntrySource {
        self.source
    }

    #[inline]
    fn count(&self) -> usize {
        self.source.entry_count()
    }
}

impl std::fmt::Debug for Frame<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("page_id", &self.source.id())
            .field("kind", &self.source.kind())
            .field("index", &self.index)
            .field("count", &self.source.entry_count())
            .finish()
    }
}

pub struct Cursor<'tx, R: PageResolver + ?Sized> {
    tx: &'tx R,
    stack: Vec<Frame<'tx>>,
    config: CursorConfig,
}

impl<'tx, R: PageResolver + ?Sized> Cursor<'tx, R> {
    pub fn new(tx: &'tx R) -> Self {
        Self::with_config(tx, CursorConfig::default())
    }

    pub fn with_config(tx: &'tx R, config: CursorConfig) -> Self {
        Self {
            tx,
            stack: Vec::new(),
            config,
        }
    }

    /// The path stack, root first. Empty until the first seek.
    #[inline]
    pub fn path(&self) -> &[Frame<'tx>] {
        &self.stack
    }

    /// Entry at the current position. `None` when unpositioned or past the
    /// end of the leaf. Bucket leaf entries come back without a value.
    pub fn key_value(&self) -> Option<KeyValue<'tx>> {
        let frame = *self.stack.last()?;
        if !frame.source.is_leaf() || frame.index >= frame.count() {
            return None;
        }
        let key = frame.source.key_at(frame.index);
        if frame.source.flags_at(frame.index) & BUCKET_LEAF_FLAG != 0 {
            Some((key, None))
        } else {
            Some((key, Some(frame.source.value_at(frame.index))))
        }
    }

    pub fn first(&mut self) -> Result<Option<KeyValue<'tx>>> {
        self.tx.ensure_open()?;
        self.stack.clear();
        self.push_frame(self.tx.root())?;
        self.descend_first()?;
        if self.at_leaf_end() {
            return self.next();
        }
        Ok(self.key_value())
    }

    pub fn last(&mut self) -> Result<Option<KeyValue<'tx>>> {
        self.tx.ensure_open()?;
        self.stack.clear();
        self.push_frame(self.tx.root())?;
        self.point_top_at_last();
        self.descend_last()?;
        if self.at_leaf_end() {
            return self.prev();
        }
        Ok(self.key_value())
    }

    /// Step to the successor entry, skipping empty leaves. `None` once the
    /// tree is exhausted; the position is then left where it was.
    pub fn next(&mut self) -> Result<Option<KeyValue<'tx>>> {
        self.tx.ensure_open()?;
        loop {
            let Some(level) = self.stack.iter().rposition(|f| f.index + 1 < f.count()) else {
                return Ok(None);
            };
            self.stack[level].index += 1;
            self.stack.truncate(level + 1);
            self.descend_first()?;
            if !self.at_leaf_end() {
                return Ok(self.key_value());
            }
        }
    }

    /// Step to the predecessor entry, skipping empty leaves.
    pub fn prev(&mut self) -> Result<Option<KeyValue<'tx>>> {
        self.tx.ensure_open()?;
        loop {
            let Some(level) = self.stack.iter().rposition(|f| f.index > 0) else {
                return Ok(None);
            };
            // A leaf frame one past its last entry steps back onto it.
            self.stack[level].index -= 1;
            self.stack.truncate(level + 1);
            self.descend_last()?;
            if !self.at_leaf_end() {
                return Ok(self.key_value());
            }
        }
    }

    /// Position on the first entry with key `>= key`.
    pub fn seek(&mut self, key: &[u8]) -> Result<Option<KeyValue<'tx>>> {
        self.seek_custom(generalized_search, LowerBound::new(key))
    }

    /// Descend with a caller-supplied search and comparator, then normalize a
    /// landing past the end of a leaf onto the next entry.
    pub fn seek_custom<C>(
        &mut self,
        search: SearchFn,
        mut comparator: C,
    ) -> Result<Option<KeyValue<'tx>>>
    where
        C: SeekComparator,
    {
        self.search_custom(search, &mut comparator)?;
        if self.at_leaf_end() {
            return self.next();
        }
        Ok(self.key_value())
    }

    /// The greatest entry whose key starts with `prefix`, found in one
    /// descent. `Ok(None)` when no key carries the prefix.
    pub fn seek_last_with_prefix(&mut self, prefix: &[u8]) -> Result<Option<KeyValue<'tx>>> {
        let mut comparator = PrefixSeek::new(prefix)?;
        let outcome = self.search_custom(generalized_search, &mut comparator)?;

        if outcome.last_prefix.is_none() && outcome.index == 0 {
            // Everything in this leaf is past the range, or it is empty: the
            // last match, if any, is the entry before it.
            self.prev()?;
        } else if self.at_leaf_end() {
            self.next()?;
        }

        let found = self.key_value().filter(|(key, _)| key.starts_with(prefix));
        debug!(
            prefix = ?prefix,
            tightest = ?comparator.seek(),
            found = found.is_some(),
            depth = self.stack.len(),
            "seek last with prefix"
        );
        Ok(found)
    }

    /// Reference scan: seek to `prefix`, then step forward while keys still
    /// carry it. Costs one step per match.
    pub fn seek_last_with_prefix_slow(&mut self, prefix: &[u8]) -> Result<Option<KeyValue<'tx>>> {
        if prefix.is_empty() {
            return Err(Error::invalid_argument("prefix must not be empty"));
        }
        let mut last = None;
        let mut current = self.seek(prefix)?;
        while let Some(entry) = current {
            if !entry.0.starts_with(prefix) {
                break;
            }
            last = Some(entry);
            current = self.next()?;
        }
        Ok(last)
    }

    /// Rebuild the path stack from the root. Branch levels take the floor
    /// child of the search outcome; the leaf frame takes
    /// [`SearchOutcome::leaf_index`]. Returns the leaf-level outcome.
    fn search_custom(
        &mut self,
        search: SearchFn,
        comparator: &mut dyn SeekComparator,
    ) -> Result<SearchOutcome> {
        self.tx.ensure_open()?;
        self.stack.clear();

        let mut page_id = self.tx.root();
        loop {
            let source = self.push_frame(page_id)?;
            let n = source.entry_count();
            let outcome = search(n, &mut |i: usize| comparator.probe(source.key_at(i)));
            if outcome.index > n || outcome.last_prefix.is_some_and(|i| i >= n) {
                return Err(Error::Internal(format!(
                    "search returned {outcome:?} for page {page_id} with {n} entries"
                )));
            }

            if source.is_leaf() {
                let index = outcome.leaf_index();
                self.set_top_index(index);
                trace!(
                    page_id,
                    index,
                    count = n,
                    exact = outcome.exact,
                    "leaf landing"
                );
                return Ok(outcome);
            }

            let index = outcome.branch_index();
            if index >= n {
                return Err(Error::Internal(format!(
                    "search returned {outcome:?} for branch page {page_id} with {n} entries"
                )));
            }
            self.set_top_index(index);
            trace!(
                page_id,
                index,
                count = n,
                exact = outcome.exact,
                "branch floor"
            );
            page_id = self.child_of(source, index)?;
        }
    }

    /// Resolve `page_id` and push it with index 0.
    fn push_frame(&mut self, page_id: PageId) -> Result<&'tx dyn EntrySource> {
        if self.stack.len() >= self.config.max_depth {
            return Err(self.corrupt(
                page_id,
                format!("descent exceeds {} levels", self.config.max_depth),
            ));
        }
        let tx: &'tx R = self.tx;
        let Some(source) = tx.resolve(page_id) else {
            error!(
                page_id,
                depth = self.stack.len(),
                "tree references a missing page"
            );
            return Err(Error::MissingPage(page_id));
        };
        let kind = source.kind();
        if !kind.is_tree_page() {
            return Err(self.corrupt(page_id, format!("{kind:?} page reached inside a tree")));
        }
        if kind == PageKind::Branch && source.entry_count() == 0 {
            return Err(self.corrupt(page_id, "branch page has no entries"));
        }
        self.stack.push(Frame { source, index: 0 });
        trace!(page_id, depth = self.stack.len(), ?kind, "push frame");
        Ok(source)
    }

    fn child_of(&self, source: &dyn EntrySource, index: usize) -> Result<PageId> {
        source.child_at(index).ok_or_else(|| {
            self.corrupt(source.id(), format!("branch entry {index} has no child page"))
        })
    }

    /// Follow the top frame's current child down to a leaf, taking the first
    /// entry at each new level.
    fn descend_first(&mut self) -> Result<()> {
        while let Some(frame) = self.stack.last().copied() {
            if frame.source.is_leaf() {
                break;
            }
            let child = self.child_of(frame.source, frame.index)?;
            self.push_frame(child)?;
        }
        Ok(())
    }

    /// Like [`descend_first`](Self::descend_first), taking the last entry.
    fn descend_last(&mut self) -> Result<()> {
        while let Some(frame) = self.stack.last().copied() {
            if frame.source.is_leaf() {
                break;
            }
            let child = self.child_of(frame.source, frame.index)?;
            self.push_frame(child)?;
            self.point_top_at_last();
        }
        Ok(())
    }

    fn point_top_at_last(&mut self) {
        if let Some(frame) = self.stack.last_mut() {
            frame.index = frame.count().saturating_sub(1);
        }
    }

    fn set_top_index(&mut self, index: usize) {
        if let Some(frame) = self.stack.last_mut() {
            frame.index = index;
        }
    }

    /// The leaf frame has no entry at its index (past the end, or empty).
    fn at_leaf_end(&self) -> bool {
        self.stack
            .last()
            .is_some_and(|f| f.source.is_leaf() && f.index >= f.count())
    }

    fn corrupt(&self, page_id: PageId, reason: impl std::fmt::Display) -> Error {
        let err = Error::corrupt(page_id, reason);
        error!(page_id, depth = self.stack.len(), %err, "tree corruption detected");
        err
    }
}
