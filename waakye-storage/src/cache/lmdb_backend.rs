//! LMDB-backed cache backend.
//!
//! Uses the heed crate to keep cached vendors in a memory-mapped file that
//! survives process restarts.
//!
//! Value layout is `[expires_at_millis: 8 bytes LE][payload]`. Expired
//! entries read as absent and are removed on the next `get`. A plain miss
//! only takes a read transaction.

use std::path::Path;
use std::time::Duration;

use ::async_trait::async_trait;
use chrono::Utc;
use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use super::traits::{CacheBackend, CacheError, CacheResult};

const EXPIRY_PREFIX_LEN: usize = 8;

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Split a stored value into expiry and payload. `None` for short rows.
fn decode(bytes: &[u8]) -> Option<(i64, &[u8])> {
    let prefix: [u8; EXPIRY_PREFIX_LEN] = bytes.get(..EXPIRY_PREFIX_LEN)?.try_into().ok()?;
    Some((i64::from_le_bytes(prefix), &bytes[EXPIRY_PREFIX_LEN..]))
}

fn encode(expires_at_millis: i64, payload: &[u8]) -> Vec<u8> {
    let mut full = Vec::with_capacity(EXPIRY_PREFIX_LEN + payload.len());
    full.extend_from_slice(&expires_at_millis.to_le_bytes());
    full.extend_from_slice(payload);
    full
}

fn txn_err(e: heed::Error) -> CacheError {
    CacheError::Transaction(e.to_string())
}

/// What a read transaction found under a key.
#[derive(Debug, PartialEq, Eq)]
enum Lookup {
    Missing,
    /// Expired or too short to decode.
    Stale,
    Live(Vec<u8>),
}

impl Lookup {
    fn into_payload(self) -> Option<Vec<u8>> {
        match self {
            Lookup::Live(payload) => Some(payload),
            Lookup::Missing | Lookup::Stale => None,
        }
    }
}

pub struct LmdbCacheBackend {
    env: Env,
    db: Database<Bytes, Bytes>,
}

impl LmdbCacheBackend {
    /// Open (or create) the cache under `path`, capped at `max_size_mb`.
    pub fn new<P: AsRef<Path>>(path: P, max_size_mb: usize) -> Result<Self, CacheError> {
        std::fs::create_dir_all(&path)?;

        // SAFETY: the environment directory is owned by this process and is
        // not opened twice with different options.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(max_size_mb * 1024 * 1024)
                .max_dbs(1)
                .open(path.as_ref())
        }
        .map_err(|e| CacheError::EnvOpen(e.to_string()))?;

        let mut wtxn = env.write_txn().map_err(txn_err)?;
        let db: Database<Bytes, Bytes> = env
            .create_database(&mut wtxn, None)
            .map_err(|e| CacheError::DbOpen(e.to_string()))?;
        wtxn.commit().map_err(txn_err)?;

        Ok(Self { env, db })
    }

    fn lookup(&self, key: &str) -> CacheResult<Lookup> {
        let rtxn = self.env.read_txn().map_err(txn_err)?;
        let found = match self.db.get(&rtxn, key.as_bytes()).map_err(txn_err)? {
            None => Lookup::Missing,
            Some(bytes) => match decode(bytes) {
                Some((expires_at, payload)) if now_millis() < expires_at => {
                    Lookup::Live(payload.to_vec())
                }
                _ => Lookup::Stale,
            },
        };
        Ok(found)
    }

    fn remove(&self, key: &str) -> CacheResult<bool> {
        let mut wtxn = self.env.write_txn().map_err(txn_err)?;
        let deleted = self.db.delete(&mut wtxn, key.as_bytes()).map_err(txn_err)?;
        wtxn.commit().map_err(txn_err)?;
        Ok(deleted)
    }
}

#[async_trait]
impl CacheBackend for LmdbCacheBackend {
    fn name(&self) -> &'static str {
        "lmdb"
    }

    async fn exists(&self, key: &str) -> CacheResult<bool> {
        Ok(matches!(self.lookup(key)?, Lookup::Live(_)))
    }

    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        let found = self.lookup(key)?;
        if found == Lookup::Stale {
            self.remove(key)?;
        }
        Ok(found.into_payload())
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> CacheResult<()> {
        let ttl_millis = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        let full = encode(now_millis().saturating_add(ttl_millis), &value);

        let mut wtxn = self.env.write_txn().map_err(txn_err)?;
        self.db
            .put(&mut wtxn, key.as_bytes(), &full)
            .map_err(txn_err)?;
        wtxn.commit().map_err(txn_err)?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.remove(key).map(|_| ())
    }

    async fn ping(&self) -> CacheResult<()> {
        self.env.read_txn().map(|_| ()).map_err(txn_err)
    }
}
