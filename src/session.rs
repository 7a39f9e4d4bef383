// Two-key session store: which connector the user picked and the address it
// reported, so the next load can pre-select the same wallet. Never a source
// of truth for identity or balances.

use anyhow::Result;
use rusqlite::{params, Connection};
use std::path::Path;

const KEY_WALLET_KIND: &str = "connected_wallet_kind";
const KEY_WALLET_ADDRESS: &str = "wallet_address";

pub struct SessionStore {
    conn: Connection,
}

impl SessionStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// In-memory store for tests.
    pub fn in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS session (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;
        Ok(Self { conn })
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self.conn.prepare("SELECT value FROM session WHERE key = ?1")?;
        let mut rows = stmt.query_map(params![key], |row| row.get::<_, String>(0))?;
        Ok(rows.next().transpose()?)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO session (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.conn.execute("DELETE FROM session WHERE key = ?1", params![key])?;
        Ok(())
    }

    pub fn wallet_kind(&self) -> Result<Option<String>> {
        self.get(KEY_WALLET_KIND)
    }

    pub fn wallet_address(&self) -> Result<Option<String>> {
        self.get(KEY_WALLET_ADDRESS)
    }

    /// Record the connector the user approved.
    pub fn remember_wallet(&self, kind: &str, address: &str) -> Result<()> {
        self.set(KEY_WALLET_KIND, kind)?;
        self.set(KEY_WALLET_ADDRESS, address)
    }

    /// Explicit disconnect clears both keys.
    pub fn forget_wallet(&self) -> Result<()> {
        self.delete(KEY_WALLET_KIND)?;
        self.delete(KEY_WALLET_ADDRESS)
    }
}
