use bytes::Bytes;
use rangedb_store::{Db, RawCursor, Txn};
use tracing::{debug, trace};

use crate::{
    comparator::{Comparator, prelude::BytewiseComparator},
    cursor::Cursor,
    error::{Error, Result},
    key_range::{Direction, KeyRange},
};

/// Lifecycle of a [`CursorIterable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Iterating,
    Exhausted,
    Closed,
}

// Where the cursor stands relative to the next produced entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Positioned, stop predicate not yet applied.
    Check,
    /// Positioned on an entry inside the range.
    Ready,
    /// The current entry was handed out; step before the next probe.
    Advance,
}

/// Walks the entries of a [`KeyRange`] through a cursor.
///
/// The iterable hands out at most one sequence, through either [`iter`] or
/// [`iter_owned`]. The cursor is released by [`close`] or on drop.
///
/// [`iter`]: CursorIterable::iter
/// [`iter_owned`]: CursorIterable::iter_owned
/// [`close`]: CursorIterable::close
pub struct CursorIterable<C: Cursor, K: Comparator = BytewiseComparator> {
    cursor: Option<C>,
    range: KeyRange,
    comparator: K,
    phase: Phase,
    step: Step,
    removable: bool,
    issued: bool,
}

impl<C: Cursor, K: Comparator> std::fmt::Debug for CursorIterable<C, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CursorIterable")
            .field("range", &self.range)
            .field("phase", &self.phase)
            .field("step", &self.step)
            .field("issued", &self.issued)
            .finish()
    }
}

impl<C: Cursor> CursorIterable<C> {
    /// Iterates `range` in the store's native key order.
    pub fn new(cursor: C, range: KeyRange) -> Self {
        Self::with_comparator(cursor, range, BytewiseComparator)
    }
}

impl<C: Cursor, K: Comparator> CursorIterable<C, K> {
    /// Iterates `range`, evaluating its bounds with `comparator`.
    ///
    /// Seeks still follow the store's order, so `comparator` has to agree
    /// with it. Otherwise the produced sequence is unspecified.
    pub fn with_comparator(cursor: C, range: KeyRange, comparator: K) -> Self {
        trace!(range = ?range, "cursor iterable created");
        Self {
            cursor: Some(cursor),
            range,
            comparator,
            phase: Phase::NotStarted,
            step: Step::Check,
            removable: false,
            issued: false,
        }
    }

    pub fn range(&self) -> &KeyRange {
        &self.range
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether a sequence has been handed out. Never resets.
    pub fn is_issued(&self) -> bool {
        self.issued
    }

    fn issue(&mut self) -> Result<()> {
        if self.phase == Phase::Closed {
            return Err(Error::InvalidState("cursor iterable is closed"));
        }
        if self.issued {
            return Err(Error::InvalidState("iterator already issued"));
        }
        self.issued = true;
        debug!(range = ?self.range, "iterator issued");
        Ok(())
    }

    /// Hands out the single lending sequence over the range.
    pub fn iter(&mut self) -> Result<CursorIter<'_, C, K>> {
        self.issue()?;
        Ok(CursorIter { inner: self })
    }

    /// Like [`iter`](Self::iter), but yields copied entries through a std
    /// [`Iterator`]. Shares the single-use check with `iter`.
    pub fn iter_owned(&mut self) -> Result<OwnedIter<'_, C, K>> {
        let inner = self.iter()?;
        Ok(OwnedIter { inner, fused: false })
    }

    /// Releases the cursor. Calling it again is a no-op.
    pub fn close(&mut self) {
        if let Some(cursor) = self.cursor.take() {
            drop(cursor);
            debug!(range = ?self.range, "cursor released");
        }
        self.phase = Phase::Closed;
        self.removable = false;
    }

    fn cursor_mut(&mut self) -> Result<&mut C> {
        self.cursor
            .as_mut()
            .ok_or(Error::InvalidState("cursor iterable is closed"))
    }

    fn exhaust(&mut self) {
        self.phase = Phase::Exhausted;
        self.removable = false;
        trace!(range = ?self.range, "range exhausted");
    }

    // Initial seek, then steps over a key the start bound excludes.
    fn position(&mut self) -> Result<bool> {
        let direction = self.range.direction();
        let start = self.range.start().map(Bytes::copy_from_slice);
        let cursor = self.cursor_mut()?;

        let mut positioned = match (direction, &start) {
            (Direction::Forward, None) => cursor.seek_first()?,
            (Direction::Forward, Some(start)) => cursor.seek_ceiling(start)?,
            (Direction::Backward, None) => cursor.seek_last()?,
            (Direction::Backward, Some(start)) => cursor.seek_floor(start)?,
        };

        while positioned {
            let Some(cursor) = self.cursor.as_mut() else {
                return Err(Error::InvalidState("cursor iterable is closed"));
            };
            let skip = match cursor.current() {
                Some((key, _)) => self.range.before_start(&self.comparator, key),
                None => false,
            };
            if !skip {
                break;
            }
            positioned = match direction {
                Direction::Forward => cursor.advance_next()?,
                Direction::Backward => cursor.advance_prev()?,
            };
        }
        Ok(positioned)
    }

    fn advance(&mut self) -> Result<bool> {
        let direction = self.range.direction();
        let cursor = self.cursor_mut()?;
        match direction {
            Direction::Forward => cursor.advance_next(),
            Direction::Backward => cursor.advance_prev(),
        }
    }

    fn probe(&mut self) -> Result<bool> {
        loop {
            match (self.phase, self.step) {
                (Phase::Closed, _) => {
                    return Err(Error::InvalidState("cursor iterable is closed"));
                }
                (Phase::Exhausted, _) => return Ok(false),
                (Phase::NotStarted, _) => {
                    self.phase = Phase::Iterating;
                    if !self.position()? {
                        self.exhaust();
                        return Ok(false);
                    }
                    self.step = Step::Check;
                }
                (Phase::Iterating, Step::Ready) => return Ok(true),
                (Phase::Iterating, Step::Advance) => {
                    self.removable = false;
                    if !self.advance()? {
                        self.exhaust();
                        return Ok(false);
                    }
                    self.step = Step::Check;
                }
                (Phase::Iterating, Step::Check) => {
                    let past = match self.cursor.as_ref().and_then(|c| c.current()) {
                        Some((key, _)) => self.range.past_stop(&self.comparator, key),
                        None => true,
                    };
                    if past {
                        self.exhaust();
                        return Ok(false);
                    }
                    self.step = Step::Ready;
                }
            }
        }
    }

    fn take_current(&mut self) -> Result<KeyVal<'_>> {
        if !self.probe()? {
            return Err(Error::NoSuchElement);
        }
        self.step = Step::Advance;
        self.removable = true;
        let (key, val) = self
            .cursor
            .as_ref()
            .and_then(|c| c.current())
            .ok_or(Error::InvalidState("cursor lost its position"))?;
        Ok(KeyVal { key, val })
    }

    fn remove_current(&mut self) -> Result<()> {
        if !self.removable {
            return Err(Error::InvalidState(
                "remove() must follow next(), once per returned entry",
            ));
        }
        let cursor = self.cursor_mut()?;
        if !cursor.is_writable() {
            return Err(Error::InvalidState("remove() needs a write transaction"));
        }
        cursor.delete_current()?;
        self.removable = false;
        trace!(range = ?self.range, "current entry removed");
        Ok(())
    }
}

impl<C: Cursor, K: Comparator> Drop for CursorIterable<C, K> {
    fn drop(&mut self) {
        self.close();
    }
}

/// The lending sequence of a [`CursorIterable`].
///
/// Each [`KeyVal`] borrows the sequence, so it has to be dropped (or copied
/// out) before the next probe moves the cursor.
pub struct CursorIter<'a, C: Cursor, K: Comparator = BytewiseComparator> {
    inner: &'a mut CursorIterable<C, K>,
}

impl<C: Cursor, K: Comparator> std::fmt::Debug for CursorIter<'_, C, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("CursorIter").field(&self.inner).finish()
    }
}

impl<C: Cursor, K: Comparator> CursorIter<'_, C, K> {
    /// Positions on the next entry inside the range, if any.
    pub fn has_next(&mut self) -> Result<bool> {
        self.inner.probe()
    }

    /// Returns the next entry, or [`Error::NoSuchElement`] past the end.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<KeyVal<'_>> {
        self.inner.take_current()
    }

    /// Deletes the entry last returned by [`next`](Self::next). The
    /// following probe continues with its successor.
    pub fn remove(&mut self) -> Result<()> {
        self.inner.remove_current()
    }
}

/// A std [`Iterator`] over copied entries. It stops after the first error.
pub struct OwnedIter<'a, C: Cursor, K: Comparator = BytewiseComparator> {
    inner: CursorIter<'a, C, K>,
    fused: bool,
}

impl<C: Cursor, K: Comparator> std::fmt::Debug for OwnedIter<'_, C, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OwnedIter")
            .field("inner", &self.inner)
            .field("fused", &self.fused)
            .finish()
    }
}

impl<C: Cursor, K: Comparator> OwnedIter<'_, C, K> {
    pub fn remove(&mut self) -> Result<()> {
        self.inner.remove()
    }
}

impl<C: Cursor, K: Comparator> Iterator for OwnedIter<'_, C, K> {
    type Item = Result<(Bytes, Bytes)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.fused {
            return None;
        }
        let item = match self.inner.has_next() {
            Ok(false) => None,
            Ok(true) => Some(self.inner.next().map(KeyVal::into_owned)),
            Err(e) => Some(Err(e)),
        };
        self.fused = !matches!(item, Some(Ok(_)));
        item
    }
}

/// A key and value as the cursor currently sees them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyVal<'a> {
    key: &'a [u8],
    val: &'a [u8],
}

impl<'a> KeyVal<'a> {
    pub fn key(&self) -> &'a [u8] {
        self.key
    }

    pub fn val(&self) -> &'a [u8] {
        self.val
    }

    pub fn into_owned(self) -> (Bytes, Bytes) {
        (
            Bytes::copy_from_slice(self.key),
            Bytes::copy_from_slice(self.val),
        )
    }
}

/// Range iteration straight from a database handle.
pub trait DbExt {
    fn iterate<'txn>(
        &self,
        txn: &'txn Txn,
        range: KeyRange,
    ) -> Result<CursorIterable<RawCursor<'txn>>>;

    fn iterate_with<'txn, K: Comparator>(
        &self,
        txn: &'txn Txn,
        range: KeyRange,
        comparator: K,
    ) -> Result<CursorIterable<RawCursor<'txn>, K>>;

    fn iter_all<'txn>(&self, txn: &'txn Txn) -> Result<CursorIterable<RawCursor<'txn>>> {
        self.iterate(txn, KeyRange::all())
    }
}

impl DbExt for Db {
    fn iterate<'txn>(
        &self,
        txn: &'txn Txn,
        range: KeyRange,
    ) -> Result<CursorIterable<RawCursor<'txn>>> {
        self.iterate_with(txn, range, BytewiseComparator)
    }

    fn iterate_with<'txn, K: Comparator>(
        &self,
        txn: &'txn Txn,
        range: KeyRange,
        comparator: K,
    ) -> Result<CursorIterable<RawCursor<'txn>, K>> {
        let cursor = txn.open_cursor(*self)?;
        Ok(CursorIterable::with_comparator(cursor, range, comparator))
    }
}
