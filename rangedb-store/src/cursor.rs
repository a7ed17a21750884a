use std::ops::Bound;

use bytes::Bytes;

use crate::{
    env::{Db, Table},
    error::{Error, Result},
    txn::{PutFlags, Txn},
};

type Entry = (Bytes, Bytes);

/// A positioned handle over one database of a transaction.
///
/// Movements return the entry they land on. The returned slices borrow the
/// cursor, so they stay valid only until the next movement. After
/// [`RawCursor::del`] the cursor has no current entry, but `next`/`prev`
/// still step relative to the deleted key.
pub struct RawCursor<'txn> {
    txn: &'txn Txn,
    db: Db,
    pos: Option<Bytes>,
    current: Option<Entry>,
}

impl std::fmt::Debug for RawCursor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawCursor")
            .field("txn", &self.txn.id())
            .field("db", &self.db)
            .field("pos", &self.pos)
            .finish()
    }
}

impl<'txn> RawCursor<'txn> {
    pub(crate) fn new(txn: &'txn Txn, db: Db) -> Self {
        Self {
            txn,
            db,
            pos: None,
            current: None,
        }
    }

    pub fn db(&self) -> Db {
        self.db
    }

    pub fn txn(&self) -> &'txn Txn {
        self.txn
    }

    fn lookup<F>(&self, f: F) -> Result<Option<Entry>>
    where
        F: FnOnce(&Table) -> Option<(&Bytes, &Bytes)>,
    {
        self.txn.with_state(|state| {
            let table = state.table(self.db)?;
            Ok(f(table).map(|(k, v)| (k.clone(), v.clone())))
        })
    }

    // A miss leaves `pos` where it was, like walking off either end does.
    fn settle(&mut self, entry: Option<Entry>) -> Option<(&[u8], &[u8])> {
        if let Some((key, _)) = &entry {
            self.pos = Some(key.clone());
        }
        self.current = entry;
        self.get_current()
    }

    pub fn first(&mut self) -> Result<Option<(&[u8], &[u8])>> {
        let entry = self.lookup(|t| t.first_key_value())?;
        Ok(self.settle(entry))
    }

    pub fn last(&mut self) -> Result<Option<(&[u8], &[u8])>> {
        let entry = self.lookup(|t| t.last_key_value())?;
        Ok(self.settle(entry))
    }

    /// Positions at the first key at or above `key`.
    pub fn seek_ge(&mut self, key: &[u8]) -> Result<Option<(&[u8], &[u8])>> {
        let entry = self.lookup(|t| {
            t.range::<[u8], _>((Bound::Included(key), Bound::Unbounded))
                .next()
        })?;
        Ok(self.settle(entry))
    }

    /// Positions at the last key at or below `key`.
    pub fn seek_le(&mut self, key: &[u8]) -> Result<Option<(&[u8], &[u8])>> {
        let entry = self.lookup(|t| {
            t.range::<[u8], _>((Bound::Unbounded, Bound::Included(key)))
                .next_back()
        })?;
        Ok(self.settle(entry))
    }

    /// Steps forward. An unpositioned cursor moves to the first entry.
    pub fn next(&mut self) -> Result<Option<(&[u8], &[u8])>> {
        let Some(pos) = self.pos.clone() else {
            return self.first();
        };
        let entry = self.lookup(|t| {
            t.range::<[u8], _>((Bound::Excluded(pos.as_ref()), Bound::Unbounded))
                .next()
        })?;
        Ok(self.settle(entry))
    }

    /// Steps backward. An unpositioned cursor moves to the last entry.
    pub fn prev(&mut self) -> Result<Option<(&[u8], &[u8])>> {
        let Some(pos) = self.pos.clone() else {
            return self.last();
        };
        let entry = self.lookup(|t| {
            t.range::<[u8], _>((Bound::Unbounded, Bound::Excluded(pos.as_ref())))
                .next_back()
        })?;
        Ok(self.settle(entry))
    }

    pub fn get_current(&self) -> Option<(&[u8], &[u8])> {
        self.current
            .as_ref()
            .map(|(k, v)| (k.as_ref(), v.as_ref()))
    }

    /// Deletes the current entry. Requires a write transaction.
    pub fn del(&mut self) -> Result<()> {
        let Some((key, _)) = &self.current else {
            return Err(Error::NotFound);
        };
        self.txn.delete(self.db, key)?;
        self.current = None;
        Ok(())
    }

    /// Stores an entry and positions the cursor on it.
    pub fn put(&mut self, key: &[u8], value: &[u8], flags: PutFlags) -> Result<()> {
        self.txn.put(self.db, key, value, flags)?;
        self.seek_ge(key)?;
        Ok(())
    }

    pub fn is_writable(&self) -> bool {
        !self.txn.is_read_only()
    }
}
