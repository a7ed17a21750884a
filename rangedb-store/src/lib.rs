//! A small in-memory, ordered key-value store with named databases,
//! snapshot read transactions, a single writer and cursors.
//!
//! It keeps the LMDB shape (environment, database handles, transactions,
//! cursors) so that layers above it can be written against a real cursor
//! API. Nothing is persisted.

mod cursor;
mod env;
mod error;
mod options;
mod txn;

pub use cursor::RawCursor;
pub use env::{Db, DbFlags, Env};
pub use error::{Error, Result};
pub use options::{EnvOpenOptions, EnvOptions};
pub use txn::{PutFlags, Txn};

pub mod prelude {
    pub use super::{Db, DbFlags, Env, EnvOpenOptions, PutFlags, RawCursor, Txn};
}
