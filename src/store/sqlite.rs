use super::types::{ListKind, KEY_BLOCKED_COUNT};
use rusqlite::{params, Connection, OptionalExtension, Result};
use std::sync::Mutex;
use tracing::info;

/// The persisted key-value store backing the lists and the blocked counter.
/// Values are JSON-encoded strings under a fixed set of keys.
pub struct StoreDb {
    db_path: String,
    conn: Mutex<Connection>,
}

impl StoreDb {
    pub fn open(db_path: impl Into<String>) -> Result<Self> {
        let db_path = db_path.into();
        let conn = Connection::open(&db_path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        Ok(Self {
            db_path,
            conn: Mutex::new(conn),
        })
    }

    /// First-run initialization. Creates missing keys with empty lists and
    /// a zero counter; existing values are never overwritten, so running
    /// this on every startup (including updates) cannot wipe user data.
    pub fn initialize(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "INSERT OR IGNORE INTO kv (key, value) VALUES (?1, ?2)",
            params![ListKind::Whitelist.key(), "[]"],
        )?;
        conn.execute(
            "INSERT OR IGNORE INTO kv (key, value) VALUES (?1, ?2)",
            params![ListKind::Blacklist.key(), "[]"],
        )?;
        conn.execute(
            "INSERT OR IGNORE INTO kv (key, value) VALUES (?1, ?2)",
            params![KEY_BLOCKED_COUNT, "0"],
        )?;

        info!("Store initialized at {}", self.db_path);
        Ok(())
    }

    fn read_raw(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().unwrap();
        let result = conn
            .prepare_cached("SELECT value FROM kv WHERE key = ?1")?
            .query_row(params![key], |row| row.get(0))
            .optional();
        result
    }

    fn write_raw(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.prepare_cached(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )?
        .execute(params![key, value])?;
        Ok(())
    }

    /// Reads a domain list. A missing key or an undecodable value maps to
    /// an empty list.
    pub fn read_list(&self, kind: ListKind) -> Result<Vec<String>> {
        let raw = self.read_raw(kind.key())?;
        Ok(raw
            .and_then(|v| serde_json::from_str(&v).ok())
            .unwrap_or_default())
    }

    pub fn write_list(&self, kind: ListKind, domains: &[String]) -> Result<()> {
        // Serializing a string slice cannot fail.
        let value = serde_json::to_string(domains).unwrap();
        self.write_raw(kind.key(), &value)
    }

    pub fn read_blocked_count(&self) -> Result<u64> {
        let raw = self.read_raw(KEY_BLOCKED_COUNT)?;
        Ok(raw.and_then(|v| v.parse().ok()).unwrap_or(0))
    }

    pub fn write_blocked_count(&self, count: u64) -> Result<()> {
        self.write_raw(KEY_BLOCKED_COUNT, &count.to_string())
    }
}
