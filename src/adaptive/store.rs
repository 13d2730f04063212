use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;

use crate::adaptive::fingerprint::{AdaptiveRecord, FORMAT_VERSION};
use crate::errors::{AdaptiveError, Result};

/// Persistence behind the relocation engine: labels mapped to adaptive
/// records. Backends are interchangeable; operations on distinct labels are
/// independent, and concurrent writes to one label are last-writer-wins.
pub trait FingerprintStore: Send + Sync {
    /// Insert or overwrite the record for a label. Atomic per label: on
    /// failure the previous record, if any, remains intact.
    fn put(&self, record: &AdaptiveRecord) -> Result<()>;

    /// `Ok(None)` when the label was never saved. An unreadable persisted
    /// record is a [`MalformedFingerprint`](AdaptiveError::MalformedFingerprint)
    /// error, distinct from absence.
    fn get(&self, label: &str) -> Result<Option<AdaptiveRecord>>;

    fn delete(&self, label: &str) -> Result<()>;

    fn list_labels(&self) -> Result<Vec<String>>;
}

/// Ephemeral backend; a mutex-guarded map.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, AdaptiveRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, AdaptiveRecord>>> {
        self.records
            .lock()
            .map_err(|_| AdaptiveError::StoreUnavailable("store lock poisoned".to_string()))
    }
}

impl FingerprintStore for MemoryStore {
    fn put(&self, record: &AdaptiveRecord) -> Result<()> {
        self.lock()?.insert(record.label.clone(), record.clone());
        Ok(())
    }

    fn get(&self, label: &str) -> Result<Option<AdaptiveRecord>> {
        Ok(self.lock()?.get(label).cloned())
    }

    fn delete(&self, label: &str) -> Result<()> {
        self.lock()?.remove(label);
        Ok(())
    }

    fn list_labels(&self) -> Result<Vec<String>> {
        let mut labels: Vec<String> = self.lock()?.keys().cloned().collect();
        labels.sort();
        Ok(labels)
    }
}

/// Durable backend: one SQLite row per label, fingerprint serialized as
/// JSON, format-versioned so incompatible rows surface as malformed rather
/// than deserializing wrongly.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    /// In-memory SQLite database, useful in tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&self) -> Result<()> {
        self.lock()?.execute(
            "CREATE TABLE IF NOT EXISTS fingerprints (
                label TEXT PRIMARY KEY,
                fingerprint TEXT NOT NULL,
                saved_at TEXT NOT NULL,
                version INTEGER NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| AdaptiveError::StoreUnavailable("store lock poisoned".to_string()))
    }

    fn decode_row(
        label: &str,
        fingerprint_json: &str,
        saved_at: &str,
        version: u32,
    ) -> Result<AdaptiveRecord> {
        if version != FORMAT_VERSION {
            return Err(AdaptiveError::MalformedFingerprint {
                label: label.to_string(),
                reason: format!("unsupported format version {version}"),
            });
        }
        let fingerprint =
            serde_json::from_str(fingerprint_json).map_err(|e| AdaptiveError::MalformedFingerprint {
                label: label.to_string(),
                reason: e.to_string(),
            })?;
        let saved_at = saved_at
            .parse::<DateTime<Utc>>()
            .map_err(|e| AdaptiveError::MalformedFingerprint {
                label: label.to_string(),
                reason: e.to_string(),
            })?;
        Ok(AdaptiveRecord {
            label: label.to_string(),
            fingerprint,
            saved_at,
        })
    }
}

impl FingerprintStore for SqliteStore {
    fn put(&self, record: &AdaptiveRecord) -> Result<()> {
        let fingerprint_json = serde_json::to_string(&record.fingerprint)?;
        // INSERT OR REPLACE keeps the per-label overwrite atomic
        self.lock()?.execute(
            "INSERT OR REPLACE INTO fingerprints (label, fingerprint, saved_at, version)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                record.label,
                fingerprint_json,
                record.saved_at.to_rfc3339(),
                FORMAT_VERSION
            ],
        )?;
        debug!(label = %record.label, "persisted fingerprint");
        Ok(())
    }

    fn get(&self, label: &str) -> Result<Option<AdaptiveRecord>> {
        let row: Option<(String, String, u32)> = self
            .lock()?
            .query_row(
                "SELECT fingerprint, saved_at, version FROM fingerprints WHERE label = ?1",
                [label],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        match row {
            Some((fingerprint_json, saved_at, version)) => {
                Self::decode_row(label, &fingerprint_json, &saved_at, version).map(Some)
            }
            None => Ok(None),
        }
    }

    fn delete(&self, label: &str) -> Result<()> {
        self.lock()?
            .execute("DELETE FROM fingerprints WHERE label = ?1", [label])?;
        Ok(())
    }

    fn list_labels(&self) -> Result<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT label FROM fingerprints ORDER BY label")?;
        let labels = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(labels)
    }
}
