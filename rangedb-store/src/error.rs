#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("MDB_KEYEXIST: Key/data pair already exists")]
    KeyExist,

    #[error("MDB_NOTFOUND: No matching key/data pair found")]
    NotFound,

    #[error("MDB_NOTFOUND: No database named {0:?}")]
    DbNotFound(String),

    #[error("MDB_DBS_FULL: Environment maxdbs limit reached ({0})")]
    DbsFull(usize),

    #[error("MDB_MAP_FULL: Environment mapsize limit reached ({used} of {limit} bytes)")]
    MapFull { used: usize, limit: usize },

    #[error("MDB_BAD_VALSIZE: Unsupported size of key/DB name/data ({0} bytes)")]
    BadValSize(usize),

    #[error("MDB_BAD_DBI: The specified DBI handle ({0}) was closed/changed unexpectedly")]
    BadDbi(u32),

    #[error("MDB_CORRUPTED: Located page was wrong type")]
    Corrupted,

    #[error("EACCES: Write operation in a read-only transaction")]
    ReadOnly,

    #[error("Invalid options: {0}")]
    InvalidOptions(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
