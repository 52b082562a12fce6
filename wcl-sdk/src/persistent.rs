// ABOUTME: On-disk store for cached query bodies, shared across process runs
// ABOUTME: SQLite table of gzip-compressed JSON bodies keyed by cache key

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::Result;

const CREATE_RESPONSE_TABLE: &str =
    "CREATE TABLE IF NOT EXISTS response (key TEXT PRIMARY KEY, body BLOB NOT NULL)";
const SELECT_RESPONSE: &str = "SELECT body FROM response WHERE key = ?1";
const UPSERT_RESPONSE: &str = "INSERT OR REPLACE INTO response (key, body) VALUES (?1, ?2)";
const DELETE_RESPONSES: &str = "DELETE FROM response";
const COUNT_RESPONSES: &str = "SELECT COUNT(*) FROM response";

/// SQLite-backed body store. Calls block briefly on the database lock.
pub struct DiskStore {
    path: PathBuf,
    connection: Mutex<Connection>,
}

impl DiskStore {
    /// Opens or creates the database at `path`, creating parent directories as needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let connection = Connection::open(path)?;
        connection.execute(CREATE_RESPONSE_TABLE, ())?;
        log::debug!("opened query cache at {}", path.display());

        Ok(Self {
            path: path.to_path_buf(),
            connection: Mutex::new(connection),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self, key: &str) -> Result<Option<Value>> {
        let body: Option<Vec<u8>> = self
            .connection
            .lock()
            .query_row(SELECT_RESPONSE, (key,), |row| row.get(0))
            .optional()?;

        match body {
            Some(body) => Ok(Some(serde_json::from_slice(&decompress(&body)?)?)),
            None => Ok(None),
        }
    }

    pub fn store(&self, key: &str, value: &Value) -> Result<()> {
        let raw = serde_json::to_vec(value)?;
        let body = compress(&raw)?;
        log::debug!("compressed cached body {} -> {} bytes", raw.len(), body.len());

        self.connection.lock().execute(UPSERT_RESPONSE, (key, body))?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        self.connection.lock().execute(DELETE_RESPONSES, ())?;
        Ok(())
    }

    pub fn len(&self) -> Result<usize> {
        let count: i64 = self
            .connection
            .lock()
            .query_row(COUNT_RESPONSES, (), |row| row.get(0))?;
        Ok(count.try_into().unwrap_or_default())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl fmt::Debug for DiskStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiskStore").field("path", &self.path).finish()
    }
}

fn compress(raw: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(raw)?;
    Ok(encoder.finish()?)
}

fn decompress(body: &[u8]) -> Result<Vec<u8>> {
    let mut raw = Vec::new();
    GzDecoder::new(body).read_to_end(&mut raw)?;
    Ok(raw)
}
