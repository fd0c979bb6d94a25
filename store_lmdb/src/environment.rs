//! LMDB environment setup and the [`KeyValueEngine`] implementation.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{PoisonError, RwLock};

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions, RoTxn};

use xbridge_store::{BatchOp, KeyValueEngine, StoreError};

use crate::integrity::check_data_dir;
use crate::{LmdbConfig, LmdbError};

/// Wraps the LMDB environment and one database handle per storage area.
///
/// Area databases are created by the first write to the area and cached for
/// the lifetime of the environment. Reads of an area that was never written
/// see it as empty and create nothing.
pub struct LmdbEnvironment {
    env: Env,
    databases: RwLock<HashMap<String, Database<Bytes, Bytes>>>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path.
    pub fn open(path: &Path, max_dbs: u32, map_size: usize) -> Result<Self, LmdbError> {
        check_data_dir(path)?;
        std::fs::create_dir_all(path)?;
        // SAFETY: the environment is opened once per path by this process and
        // the memory map is only accessed through heed's transactions.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(max_dbs)
                .open(path)?
        };
        tracing::info!(path = %path.display(), max_dbs, map_size, "opened LMDB environment");
        Ok(Self {
            env,
            databases: RwLock::new(HashMap::new()),
        })
    }

    /// Open the environment described by `config`.
    pub fn from_config(config: &LmdbConfig) -> Result<Self, LmdbError> {
        config.validate()?;
        Self::open(&config.data_dir, config.max_dbs, config.map_size)
    }

    pub(crate) fn env(&self) -> &Env {
        &self.env
    }

    /// Number of entries stored in `area`.
    pub fn entry_count(&self, area: &str) -> Result<u64, LmdbError> {
        let rtxn = self.env.read_txn()?;
        match self.read_database(&rtxn, area)? {
            Some(db) => Ok(db.len(&rtxn)?),
            None => Ok(0),
        }
    }

    /// Flush the memory map to disk.
    pub fn sync(&self) -> Result<(), LmdbError> {
        self.env.force_sync()?;
        Ok(())
    }

    fn cached_database(&self, area: &str) -> Option<Database<Bytes, Bytes>> {
        self.databases
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(area)
            .copied()
    }

    /// Handle for reading `area` within `rtxn`, or `None` if the area was never
    /// written. A handle opened here is only valid inside `rtxn` and is not cached.
    fn read_database(
        &self,
        rtxn: &RoTxn<'_>,
        area: &str,
    ) -> Result<Option<Database<Bytes, Bytes>>, LmdbError> {
        if let Some(db) = self.cached_database(area) {
            return Ok(Some(db));
        }
        // Holding the write lock keeps this open from racing another open or create.
        let databases = self
            .databases
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(db) = databases.get(area) {
            return Ok(Some(*db));
        }
        Ok(self.env.open_database::<Bytes, Bytes>(rtxn, Some(area))?)
    }

    /// Handle for writing `area`, creating its database on first use.
    fn database(&self, area: &str) -> Result<Database<Bytes, Bytes>, LmdbError> {
        if let Some(db) = self.cached_database(area) {
            return Ok(db);
        }

        let mut databases = self
            .databases
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(db) = databases.get(area) {
            return Ok(*db);
        }
        let mut wtxn = self.env.write_txn()?;
        let db = self
            .env
            .create_database::<Bytes, Bytes>(&mut wtxn, Some(area))?;
        wtxn.commit()?;
        databases.insert(area.to_string(), db);
        tracing::debug!(area, "opened area database");
        Ok(db)
    }
}

impl KeyValueEngine for LmdbEnvironment {
    fn get(&self, area: &str, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let Some(db) = self.read_database(&rtxn, area)? else {
            return Ok(None);
        };
        let val = db.get(&rtxn, key).map_err(LmdbError::from)?;
        Ok(val.map(<[u8]>::to_vec))
    }

    fn put(&self, area: &str, key: &[u8], value: &[u8]) -> Result<bool, StoreError> {
        let db = self.database(area)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        db.put(&mut wtxn, key, value).map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(true)
    }

    fn delete(&self, area: &str, key: &[u8]) -> Result<(), StoreError> {
        if self.entry_count(area)? == 0 {
            return Ok(());
        }
        let db = self.database(area)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        db.delete(&mut wtxn, key).map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    /// All ops share one write transaction; an error drops it uncommitted,
    /// which aborts every op in the batch.
    fn write_batch(&self, area: &str, ops: &[BatchOp]) -> Result<bool, StoreError> {
        let db = self.database(area)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        for op in ops {
            match op {
                BatchOp::Put { key, value } => {
                    db.put(&mut wtxn, key, value).map_err(LmdbError::from)?;
                }
                BatchOp::Delete { key } => {
                    db.delete(&mut wtxn, key).map_err(LmdbError::from)?;
                }
            }
        }
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_test_env() -> (tempfile::TempDir, LmdbEnvironment) {
        let dir = tempfile::tempdir().unwrap();
        let env = LmdbEnvironment::open(dir.path(), 8, 1 << 20).unwrap();
        (dir, env)
    }

    #[test]
    fn get_missing_key_is_none() {
        let (_dir, env) = open_test_env();
        assert_eq!(env.get("area", b"missing").unwrap(), None);
    }

    #[test]
    fn put_get_delete() {
        let (_dir, env) = open_test_env();
        assert!(env.put("area", b"k", b"v").unwrap());
        assert_eq!(env.get("area", b"k").unwrap(), Some(b"v".to_vec()));
        env.delete("area", b"k").unwrap();
        assert_eq!(env.get("area", b"k").unwrap(), None);
    }

    #[test]
    fn delete_missing_key_is_ok() {
        let (_dir, env) = open_test_env();
        env.delete("area", b"never-written").unwrap();
    }

    #[test]
    fn reads_do_not_create_area_databases() {
        let (_dir, env) = open_test_env();
        assert_eq!(env.get("cv_eth", b"k").unwrap(), None);
        env.delete("cv_eth", b"k").unwrap();
        assert_eq!(env.entry_count("cv_eth").unwrap(), 0);

        let rtxn = env.env().read_txn().unwrap();
        let db = env
            .env()
            .open_database::<Bytes, Bytes>(&rtxn, Some("cv_eth"))
            .unwrap();
        assert!(db.is_none());
        drop(rtxn);

        env.put("cv_eth", b"k", b"v").unwrap();
        assert_eq!(env.get("cv_eth", b"k").unwrap(), Some(b"v".to_vec()));
    }

    #[test]
    fn reads_after_reopen_find_existing_areas() {
        let dir = tempfile::tempdir().unwrap();
        {
            let env = LmdbEnvironment::open(dir.path(), 8, 1 << 20).unwrap();
            env.put("cv_bsc", b"k", b"v").unwrap();
        }
        let env = LmdbEnvironment::open(dir.path(), 8, 1 << 20).unwrap();
        assert_eq!(env.get("cv_bsc", b"k").unwrap(), Some(b"v".to_vec()));
        assert_eq!(env.entry_count("cv_bsc").unwrap(), 1);
        env.delete("cv_bsc", b"k").unwrap();
        assert_eq!(env.get("cv_bsc", b"k").unwrap(), None);
    }

    #[test]
    fn areas_are_isolated() {
        let (_dir, env) = open_test_env();
        env.put("cv_eth", b"k", b"eth").unwrap();
        env.put("cv_bsc", b"k", b"bsc").unwrap();
        assert_eq!(env.get("cv_eth", b"k").unwrap(), Some(b"eth".to_vec()));
        assert_eq!(env.get("cv_bsc", b"k").unwrap(), Some(b"bsc".to_vec()));
        assert_eq!(env.entry_count("cv_eth").unwrap(), 1);
    }

    #[test]
    fn write_batch_applies_all_ops() {
        let (_dir, env) = open_test_env();
        env.put("area", b"old", b"1").unwrap();
        let ops = [
            BatchOp::put(b"a".to_vec(), b"1".to_vec()),
            BatchOp::put(b"b".to_vec(), b"2".to_vec()),
            BatchOp::delete(b"old".to_vec()),
        ];
        assert!(env.write_batch("area", &ops).unwrap());
        assert_eq!(env.get("area", b"a").unwrap(), Some(b"1".to_vec()));
        assert_eq!(env.get("area", b"b").unwrap(), Some(b"2".to_vec()));
        assert_eq!(env.get("area", b"old").unwrap(), None);
    }

    #[test]
    fn failed_batch_applies_nothing() {
        let (_dir, env) = open_test_env();
        // LMDB rejects empty keys, so the second op fails mid-batch.
        let ops = [
            BatchOp::put(b"a".to_vec(), b"1".to_vec()),
            BatchOp::put(Vec::new(), b"2".to_vec()),
        ];
        assert!(env.write_batch("area", &ops).is_err());
        assert_eq!(env.get("area", b"a").unwrap(), None);
    }

    #[test]
    fn data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let env = LmdbEnvironment::open(dir.path(), 8, 1 << 20).unwrap();
            env.put("area", b"k", b"v").unwrap();
            env.sync().unwrap();
        }
        let env = LmdbEnvironment::open(dir.path(), 8, 1 << 20).unwrap();
        assert_eq!(env.get("area", b"k").unwrap(), Some(b"v".to_vec()));
    }

    #[test]
    fn from_config_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config = LmdbConfig {
            map_size: 1 << 20,
            ..LmdbConfig::at(dir.path().join("nested/data"))
        };
        let env = LmdbEnvironment::from_config(&config).unwrap();
        env.put("area", b"k", b"v").unwrap();
        assert!(config.data_dir.join("data.mdb").exists());
    }
}
