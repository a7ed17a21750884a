use std::{
    collections::BTreeMap,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use bitflags::bitflags;
use bytes::Bytes;
use parking_lot::{Mutex, RwLock};
use tracing::info;

use crate::{
    error::{Error, Result},
    options::{EnvOpenOptions, EnvOptions},
    txn::Txn,
};

pub(crate) type Table = BTreeMap<Bytes, Bytes>;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DbFlags: u32 {
        /// Create the named database if it does not exist.
        const CREATE = 0x4_0000;
    }
}

/// Handle to a named database inside an [`Env`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Db(pub(crate) u32);

impl Db {
    pub fn id(&self) -> u32 {
        self.0
    }
}

/// Everything a transaction can see. Readers share one `Arc<State>`, the
/// writer works on a private clone whose tables are copied on first write.
#[derive(Debug, Clone, Default)]
pub(crate) struct State {
    names: BTreeMap<String, Db>,
    tables: Vec<Arc<Table>>,
    used: usize,
}

impl State {
    pub(crate) fn lookup(&self, name: &str) -> Option<Db> {
        self.names.get(name).copied()
    }

    pub(crate) fn create(&mut self, name: &str, max_dbs: usize) -> Result<Db> {
        if self.tables.len() >= max_dbs {
            return Err(Error::DbsFull(max_dbs));
        }
        let db = Db(self.tables.len() as u32);
        self.tables.push(Arc::default());
        self.names.insert(name.to_owned(), db);
        Ok(db)
    }

    pub(crate) fn names(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(String::as_str)
    }

    pub(crate) fn table(&self, db: Db) -> Result<&Table> {
        self.tables
            .get(db.0 as usize)
            .map(AsRef::as_ref)
            .ok_or(Error::BadDbi(db.0))
    }

    fn table_mut(&mut self, db: Db) -> Result<&mut Table> {
        self.tables
            .get_mut(db.0 as usize)
            .map(Arc::make_mut)
            .ok_or(Error::BadDbi(db.0))
    }

    pub(crate) fn put(
        &mut self,
        db: Db,
        key: &[u8],
        value: &[u8],
        no_overwrite: bool,
        map_size: usize,
    ) -> Result<()> {
        let replaced = self
            .table(db)?
            .get(key)
            .map(|old| key.len() + old.len());
        if no_overwrite && replaced.is_some() {
            return Err(Error::KeyExist);
        }

        let used = self.used - replaced.unwrap_or(0) + key.len() + value.len();
        if used > map_size {
            return Err(Error::MapFull {
                used,
                limit: map_size,
            });
        }

        self.table_mut(db)?.insert(
            Bytes::copy_from_slice(key),
            Bytes::copy_from_slice(value),
        );
        self.used = used;
        Ok(())
    }

    pub(crate) fn remove(&mut self, db: Db, key: &[u8]) -> Result<bool> {
        if !self.table(db)?.contains_key(key) {
            return Ok(false);
        }
        if let Some((k, v)) = self.table_mut(db)?.remove_entry(key) {
            self.used -= k.len() + v.len();
        }
        Ok(true)
    }
}

pub(crate) struct EnvInner {
    pub(crate) options: EnvOptions,
    state: RwLock<Arc<State>>,
    pub(crate) writer: Arc<Mutex<()>>,
    txn_ids: AtomicU64,
}

/// An in-memory environment. Cloning is cheap and yields another handle to
/// the same data.
///
/// Any number of read transactions may be open at once; write transactions
/// are serialized, so opening a second one on the thread that holds the
/// first blocks forever.
#[derive(Clone)]
pub struct Env {
    pub(crate) inner: Arc<EnvInner>,
}

impl std::fmt::Debug for Env {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Env")
            .field("options", &self.inner.options)
            .finish_non_exhaustive()
    }
}

impl Env {
    pub(crate) fn new(options: EnvOptions) -> Self {
        info!(
            max_dbs = options.max_dbs,
            map_size = options.map_size,
            "env opened"
        );
        Self {
            inner: Arc::new(EnvInner {
                options,
                state: RwLock::new(Arc::default()),
                writer: Arc::new(Mutex::new(())),
                txn_ids: AtomicU64::new(1),
            }),
        }
    }

    pub fn builder() -> EnvOpenOptions {
        EnvOpenOptions::new()
    }

    pub fn options(&self) -> &EnvOptions {
        &self.inner.options
    }

    pub fn begin_read(&self) -> Txn {
        Txn::read(self.clone())
    }

    pub fn begin_write(&self) -> Txn {
        Txn::write(self.clone())
    }

    /// Opens an existing database.
    pub fn open_db(&self, name: &str) -> Result<Db> {
        self.begin_read().open_db(name, DbFlags::empty())
    }

    /// Opens a database, creating it in its own write transaction when it
    /// does not exist yet.
    pub fn create_db(&self, name: &str) -> Result<Db> {
        let txn = self.begin_write();
        let db = txn.open_db(name, DbFlags::CREATE)?;
        txn.commit()?;
        Ok(db)
    }

    pub fn db_names(&self) -> Vec<String> {
        self.snapshot().names().map(str::to_owned).collect()
    }

    pub(crate) fn next_txn_id(&self) -> u64 {
        self.inner.txn_ids.fetch_add(1, Ordering::Relaxed)
    }

    pub(crate) fn snapshot(&self) -> Arc<State> {
        self.inner.state.read().clone()
    }

    pub(crate) fn publish(&self, state: State) {
        *self.inner.state.write() = Arc::new(state);
    }
}
