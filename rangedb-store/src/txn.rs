use std::{cell::RefCell, marker::PhantomData, sync::Arc};

use bitflags::bitflags;
use bytes::Bytes;
use parking_lot::{ArcMutexGuard, RawMutex};
use tracing::{debug, trace};

use crate::{
    cursor::RawCursor,
    env::{Db, DbFlags, Env, State},
    error::{Error, Result},
};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PutFlags: u32 {
        /// Fail with [`Error::KeyExist`] instead of replacing a value.
        const NO_OVERWRITE = 0x10;
    }
}

enum TxnKind {
    Read(Arc<State>),
    Write {
        state: RefCell<State>,
        _writer: ArcMutexGuard<RawMutex, ()>,
    },
}

/// A transaction over an [`Env`].
///
/// Read transactions see the state committed when they began. Write
/// transactions hold the environment's writer lock until they are
/// committed, aborted or dropped; dropping without commit discards every
/// change.
///
/// A transaction and the cursors opened from it are confined to the thread
/// that created them.
pub struct Txn {
    env: Env,
    id: u64,
    kind: TxnKind,
    finished: bool,
    _confined: PhantomData<*const ()>,
}

impl std::fmt::Debug for Txn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Txn")
            .field("id", &self.id)
            .field("read_only", &self.is_read_only())
            .finish()
    }
}

impl Txn {
    pub(crate) fn read(env: Env) -> Self {
        let snapshot = env.snapshot();
        let id = env.next_txn_id();
        debug!(txn = id, "begin read txn");
        Self {
            env,
            id,
            kind: TxnKind::Read(snapshot),
            finished: false,
            _confined: PhantomData,
        }
    }

    pub(crate) fn write(env: Env) -> Self {
        let writer = env.inner.writer.lock_arc();
        let state = env.snapshot().as_ref().clone();
        let id = env.next_txn_id();
        debug!(txn = id, "begin write txn");
        Self {
            env,
            id,
            kind: TxnKind::Write {
                state: RefCell::new(state),
                _writer: writer,
            },
            finished: false,
            _confined: PhantomData,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    pub fn is_read_only(&self) -> bool {
        matches!(self.kind, TxnKind::Read(_))
    }

    pub(crate) fn with_state<R>(&self, f: impl FnOnce(&State) -> R) -> R {
        match &self.kind {
            TxnKind::Read(snapshot) => f(snapshot),
            TxnKind::Write { state, .. } => f(&state.borrow()),
        }
    }

    fn with_state_mut<R>(&self, f: impl FnOnce(&mut State) -> Result<R>) -> Result<R> {
        match &self.kind {
            TxnKind::Read(_) => Err(Error::ReadOnly),
            TxnKind::Write { state, .. } => f(&mut state.borrow_mut()),
        }
    }

    /// Looks up a named database, creating it when `flags` contains
    /// [`DbFlags::CREATE`]. A database created here becomes visible to
    /// other transactions on commit.
    pub fn open_db(&self, name: &str, flags: DbFlags) -> Result<Db> {
        if let Some(db) = self.with_state(|state| state.lookup(name)) {
            return Ok(db);
        }
        if !flags.contains(DbFlags::CREATE) {
            return Err(Error::DbNotFound(name.to_owned()));
        }

        let max_dbs = self.env.options().max_dbs;
        let db = self.with_state_mut(|state| state.create(name, max_dbs))?;
        debug!(txn = self.id, name, db = db.id(), "db created");
        Ok(db)
    }

    pub fn get(&self, db: Db, key: &[u8]) -> Result<Option<Bytes>> {
        self.with_state(|state| Ok(state.table(db)?.get(key).cloned()))
    }

    pub fn put(&self, db: Db, key: &[u8], value: &[u8], flags: PutFlags) -> Result<()> {
        let options = self.env.options();
        options.check_key(key)?;
        let map_size = options.map_size;
        self.with_state_mut(|state| {
            state.put(
                db,
                key,
                value,
                flags.contains(PutFlags::NO_OVERWRITE),
                map_size,
            )
        })?;
        trace!(txn = self.id, db = db.id(), key_len = key.len(), "put");
        Ok(())
    }

    /// Removes `key`, returning whether it was present.
    pub fn delete(&self, db: Db, key: &[u8]) -> Result<bool> {
        let removed = self.with_state_mut(|state| state.remove(db, key))?;
        trace!(txn = self.id, db = db.id(), removed, "delete");
        Ok(removed)
    }

    pub fn entries(&self, db: Db) -> Result<usize> {
        self.with_state(|state| Ok(state.table(db)?.len()))
    }

    pub fn open_cursor(&self, db: Db) -> Result<RawCursor<'_>> {
        self.with_state(|state| state.table(db).map(|_| ()))?;
        trace!(txn = self.id, db = db.id(), "cursor opened");
        Ok(RawCursor::new(self, db))
    }

    /// Publishes a write transaction's changes. Committing a read
    /// transaction just ends it.
    pub fn commit(mut self) -> Result<()> {
        self.finished = true;
        if let TxnKind::Write { state, .. } = &self.kind {
            self.env.publish(state.take());
            debug!(txn = self.id, "write txn committed");
        } else {
            debug!(txn = self.id, "read txn finished");
        }
        Ok(())
    }

    pub fn abort(mut self) {
        self.finished = true;
        debug!(txn = self.id, "txn aborted");
    }
}

impl Drop for Txn {
    fn drop(&mut self) {
        if !self.finished && !self.is_read_only() {
            debug!(txn = self.id, "write txn dropped without commit, aborting");
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{env::Env, error::Error, options::EnvOpenOptions};

    use super::PutFlags;

    fn env_with_db() -> anyhow::Result<(Env, crate::Db)> {
        let env = EnvOpenOptions::new().open()?;
        let db = env.create_db("test")?;
        Ok((env, db))
    }

    #[test]
    fn put_get_delete() -> anyhow::Result<()> {
        let (env, db) = env_with_db()?;

        let txn = env.begin_write();
        txn.put(db, b"key1", b"value1", PutFlags::empty())?;
        txn.put(db, b"key2", b"value2", PutFlags::empty())?;
        assert_eq!(txn.get(db, b"key1")?.as_deref(), Some(&b"value1"[..]));
        assert!(txn.delete(db, b"key2")?);
        assert!(!txn.delete(db, b"key2")?);
        assert_eq!(txn.entries(db)?, 1);
        txn.commit()?;

        let txn = env.begin_read();
        assert_eq!(txn.get(db, b"key1")?.as_deref(), Some(&b"value1"[..]));
        assert!(txn.get(db, b"key2")?.is_none());
        Ok(())
    }

    #[test]
    fn no_overwrite() -> anyhow::Result<()> {
        let (env, db) = env_with_db()?;
        let txn = env.begin_write();
        txn.put(db, b"k", b"1", PutFlags::NO_OVERWRITE)?;
        assert!(matches!(
            txn.put(db, b"k", b"2", PutFlags::NO_OVERWRITE),
            Err(Error::KeyExist)
        ));
        txn.put(db, b"k", b"3", PutFlags::empty())?;
        assert_eq!(txn.get(db, b"k")?.as_deref(), Some(&b"3"[..]));
        Ok(())
    }

    #[test]
    fn read_only_rejects_writes() -> anyhow::Result<()> {
        let (env, db) = env_with_db()?;
        let txn = env.begin_read();
        assert!(txn.is_read_only());
        assert!(matches!(
            txn.put(db, b"k", b"v", PutFlags::empty()),
            Err(Error::ReadOnly)
        ));
        assert!(matches!(txn.delete(db, b"k"), Err(Error::ReadOnly)));
        Ok(())
    }

    #[test]
    fn snapshot_isolation() -> anyhow::Result<()> {
        let (env, db) = env_with_db()?;

        let before = env.begin_read();
        let txn = env.begin_write();
        txn.put(db, b"k", b"v", PutFlags::empty())?;
        txn.commit()?;
        let after = env.begin_read();

        assert!(before.get(db, b"k")?.is_none());
        assert!(after.get(db, b"k")?.is_some());
        Ok(())
    }

    #[test]
    fn drop_aborts() -> anyhow::Result<()> {
        let (env, db) = env_with_db()?;
        {
            let txn = env.begin_write();
            txn.put(db, b"k", b"v", PutFlags::empty())?;
        }
        let txn = env.begin_write();
        txn.put(db, b"other", b"v", PutFlags::empty())?;
        txn.abort();

        let txn = env.begin_read();
        assert_eq!(txn.entries(db)?, 0);
        Ok(())
    }

    #[test]
    fn bad_key_and_dbi() -> anyhow::Result<()> {
        let (env, db) = env_with_db()?;
        let txn = env.begin_write();
        assert!(matches!(
            txn.put(db, b"", b"v", PutFlags::empty()),
            Err(Error::BadValSize(0))
        ));
        let long = vec![0u8; 512];
        assert!(matches!(
            txn.put(db, &long, b"v", PutFlags::empty()),
            Err(Error::BadValSize(512))
        ));
        assert!(matches!(
            txn.get(crate::Db(42), b"k"),
            Err(Error::BadDbi(42))
        ));
        assert!(matches!(txn.open_cursor(crate::Db(7)), Err(Error::BadDbi(7))));
        Ok(())
    }
}
