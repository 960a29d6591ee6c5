//! Blocking facade over the async core.
//!
//! For callers without an async executor of their own. [`BlockingDb`] owns
//! a small current-thread runtime and drives the same operations the async
//! API exposes; there is exactly one implementation of the semantics.

use std::future::Future;

use crate::config::DbConfig;
use crate::db::Db;
use crate::error::DataError;

/// Synchronous database handle.
pub struct BlockingDb {
    db: Db,
    rt: tokio::runtime::Runtime,
}

impl std::fmt::Debug for BlockingDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingDb")
            .field("db", &self.db)
            .finish_non_exhaustive()
    }
}

impl BlockingDb {
    /// Connect using the given configuration.
    ///
    /// Must not be called from within an async runtime; use [`Db`] there
    /// instead.
    ///
    /// # Errors
    /// Returns [`DataError::Config`] if the runtime cannot be built,
    /// [`DataError::Storage`] if the connection fails.
    pub fn connect(cfg: &DbConfig) -> Result<Self, DataError> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| DataError::Config(format!("runtime: {e}")))?;
        let db = rt.block_on(Db::connect(cfg))?;
        Ok(Self { db, rt })
    }

    /// The underlying async handle, for composing operation futures.
    #[must_use]
    pub fn db(&self) -> &Db {
        &self.db
    }

    /// Drive one operation future to completion.
    ///
    /// ```ignore
    /// let bdb = BlockingDb::connect(&cfg)?;
    /// let task = bdb.run(ops::get::<task::Entity, _>(bdb.db().conn(), &id, false))?;
    /// ```
    ///
    /// # Errors
    /// Whatever the operation returns.
    pub fn run<T>(&self, fut: impl Future<Output = Result<T, DataError>>) -> Result<T, DataError> {
        self.rt.block_on(fut)
    }

    /// Round-trip health check.
    ///
    /// # Errors
    /// Returns [`DataError::Storage`] if the connection is unusable.
    pub fn ping(&self) -> Result<(), DataError> {
        self.rt.block_on(self.db.ping())
    }
}
