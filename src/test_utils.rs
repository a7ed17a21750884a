use bytes::Bytes;
use itertools::Itertools;
use rangedb_store::{Db, DbFlags, Env, EnvOpenOptions, PutFlags};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    comparator::{Comparator, prelude::BytewiseComparator},
    cursor_iterable::DbExt,
    error::Result,
    key_range::KeyRange,
};

pub fn init_tracing_not_failed() {
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .with(EnvFilter::from_default_env())
        .try_init();
}

/// Big-endian encoding, so byte order matches numeric order.
pub fn bb(value: u32) -> Bytes {
    Bytes::copy_from_slice(&value.to_be_bytes())
}

pub fn int_of(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[..4]);
    u32::from_be_bytes(buf)
}

/// An env whose only database holds `{2: 3, 4: 5, 6: 7, 8: 9}`.
pub fn fixture() -> anyhow::Result<(Env, Db)> {
    let env = EnvOpenOptions::new()
        .max_dbs(2)
        .map_size(400 * 1024)
        .open()?;

    let txn = env.begin_write();
    let db = txn.open_db("db-1", DbFlags::CREATE)?;
    {
        let mut cursor = txn.open_cursor(db)?;
        cursor.put(&bb(2), &bb(3), PutFlags::NO_OVERWRITE)?;
        for key in [4, 6, 8] {
            cursor.put(&bb(key), &bb(key + 1), PutFlags::empty())?;
        }
    }
    txn.commit()?;
    Ok((env, db))
}

pub fn verify(env: &Env, db: Db, range: KeyRange, expected: &[u32]) -> anyhow::Result<()> {
    verify_with(env, db, range, BytewiseComparator, expected)
}

/// Walks `range` in a fresh read txn and checks the produced keys, and that
/// every value is its key plus one.
pub fn verify_with<K: Comparator>(
    env: &Env,
    db: Db,
    range: KeyRange,
    comparator: K,
    expected: &[u32],
) -> anyhow::Result<()> {
    let txn = env.begin_read();
    let pairs = {
        let mut c = db.iterate_with(&txn, range.clone(), comparator)?;
        c.iter_owned()?
            .map_ok(|(k, v)| (int_of(&k), int_of(&v)))
            .collect::<Result<Vec<_>>>()?
    };

    for (key, val) in &pairs {
        assert_eq!(*val, key + 1, "value of {key} in {range:?}");
    }
    let keys = pairs.iter().map(|(k, _)| *k).collect_vec();
    assert_eq!(keys, expected, "{range:?}");
    Ok(())
}
