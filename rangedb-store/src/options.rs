use crate::{
    env::Env,
    error::{Error, Result},
};

/// Validated environment settings, fixed for the lifetime of an [`Env`].
#[derive(Debug, Clone)]
pub struct EnvOptions {
    pub(crate) max_dbs: usize,

    pub(crate) max_key_size: usize,

    pub(crate) map_size: usize,
}

impl EnvOptions {
    pub fn max_dbs(&self) -> usize {
        self.max_dbs
    }

    pub fn max_key_size(&self) -> usize {
        self.max_key_size
    }

    pub fn map_size(&self) -> usize {
        self.map_size
    }

    pub(crate) fn check_key(&self, key: &[u8]) -> Result<()> {
        if key.is_empty() || key.len() > self.max_key_size {
            return Err(Error::BadValSize(key.len()));
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct EnvOpenOptions {
    max_dbs: usize,

    max_key_size: usize,

    map_size: usize,
}

impl Default for EnvOpenOptions {
    fn default() -> Self {
        Self {
            max_dbs: 16,
            max_key_size: 511,
            map_size: 10 << 20,
        }
    }
}

impl EnvOpenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of named databases the environment may hold.
    pub fn max_dbs(&mut self, n: usize) -> &mut Self {
        self.max_dbs = n;
        self
    }

    /// Longest accepted key, in bytes.
    pub fn max_key_size(&mut self, size: usize) -> &mut Self {
        self.max_key_size = size;
        self
    }

    /// Upper limit on the bytes held by all keys and values together.
    pub fn map_size(&mut self, size: usize) -> &mut Self {
        self.map_size = size;
        self
    }

    pub fn build(&self) -> Result<EnvOptions> {
        if self.max_dbs == 0 {
            return Err(Error::InvalidOptions("max_dbs must be positive".into()));
        }
        if self.max_key_size == 0 {
            return Err(Error::InvalidOptions(
                "max_key_size must be positive".into(),
            ));
        }
        Ok(EnvOptions {
            max_dbs: self.max_dbs,
            max_key_size: self.max_key_size,
            map_size: self.map_size,
        })
    }

    pub fn open(&self) -> Result<Env> {
        Ok(Env::new(self.build()?))
    }
}
