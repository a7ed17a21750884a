use rangedb_store::RawCursor;

use crate::error::Result;

/// The cursor operations a [`CursorIterable`](crate::cursor_iterable::CursorIterable)
/// drives.
///
/// Every movement reports whether the cursor landed on an entry. Seeks follow
/// the store's native key order regardless of any comparator used above.
pub trait Cursor {
    fn seek_first(&mut self) -> Result<bool>;

    fn seek_last(&mut self) -> Result<bool>;

    /// Positions at the smallest key `>= key`.
    fn seek_ceiling(&mut self, key: &[u8]) -> Result<bool>;

    /// Positions at the largest key `<= key`.
    fn seek_floor(&mut self, key: &[u8]) -> Result<bool>;

    fn advance_next(&mut self) -> Result<bool>;

    fn advance_prev(&mut self) -> Result<bool>;

    fn current(&self) -> Option<(&[u8], &[u8])>;

    /// Deletes the entry the cursor is on. A following `advance_*` moves to
    /// the neighbour of the deleted key.
    fn delete_current(&mut self) -> Result<()>;

    fn is_writable(&self) -> bool;
}

impl Cursor for RawCursor<'_> {
    fn seek_first(&mut self) -> Result<bool> {
        Ok(self.first()?.is_some())
    }

    fn seek_last(&mut self) -> Result<bool> {
        Ok(self.last()?.is_some())
    }

    fn seek_ceiling(&mut self, key: &[u8]) -> Result<bool> {
        Ok(self.seek_ge(key)?.is_some())
    }

    fn seek_floor(&mut self, key: &[u8]) -> Result<bool> {
        Ok(self.seek_le(key)?.is_some())
    }

    fn advance_next(&mut self) -> Result<bool> {
        Ok(RawCursor::next(self)?.is_some())
    }

    fn advance_prev(&mut self) -> Result<bool> {
        Ok(RawCursor::prev(self)?.is_some())
    }

    fn current(&self) -> Option<(&[u8], &[u8])> {
        self.get_current()
    }

    fn delete_current(&mut self) -> Result<()> {
        Ok(self.del()?)
    }

    fn is_writable(&self) -> bool {
        RawCursor::is_writable(self)
    }
}
