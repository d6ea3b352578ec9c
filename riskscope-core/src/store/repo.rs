//! Document repository
//!
//! Load/save operations for the two persisted JSON documents, with the
//! corruption-recovery policy: a document that no longer parses is dropped
//! and the caller gets the initial state back.

use crate::error::Result;
use crate::types::{ChatMessage, ChatRole, DashboardData};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Mutex;

/// Storage slot for the risk-assessment session document.
pub const DASHBOARD_SLOT: &str = "dashboard_data";

/// Storage slot for the assistant conversation log.
pub const CHAT_HISTORY_SLOT: &str = "chat_history";

/// Database handle with connection pooling (single connection for now)
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open or create a database at the given path
    pub fn open(path: &PathBuf) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run migrations on this database
    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        super::schema::run_migrations(&conn)
    }

    /// Get the underlying connection (for advanced use)
    pub fn connection(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap()
    }

    // ============================================
    // Generic document operations
    // ============================================

    /// Serialize and store a document, replacing any previous version.
    pub fn save_document<T: Serialize>(&self, slot: &str, document: &T) -> Result<()> {
        let body = serde_json::to_string(document)?;
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO documents (slot, body, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(slot) DO UPDATE SET
                body = excluded.body,
                updated_at = excluded.updated_at
            "#,
            params![slot, body, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Load and parse a document.
    ///
    /// Returns `None` when the slot is empty. A stored body that fails to
    /// parse is treated as corruption: the row is deleted, a warning is
    /// logged, and `None` is returned so the caller starts fresh.
    pub fn load_document<T: DeserializeOwned>(&self, slot: &str) -> Result<Option<T>> {
        let conn = self.conn.lock().unwrap();
        let body: Option<String> = conn
            .query_row("SELECT body FROM documents WHERE slot = ?", [slot], |row| {
                row.get(0)
            })
            .optional()?;

        let Some(body) = body else {
            return Ok(None);
        };

        match serde_json::from_str(&body) {
            Ok(document) => Ok(Some(document)),
            Err(e) => {
                tracing::warn!(slot, error = %e, "Discarding corrupt document");
                conn.execute("DELETE FROM documents WHERE slot = ?", [slot])?;
                Ok(None)
            }
        }
    }

    /// Remove a document.
    pub fn clear_document(&self, slot: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM documents WHERE slot = ?", [slot])?;
        Ok(())
    }

    // ============================================
    // Typed accessors
    // ============================================

    /// Load the dashboard document, or the initial state if absent/corrupt.
    pub fn load_dashboard(&self) -> Result<DashboardData> {
        Ok(self.load_document(DASHBOARD_SLOT)?.unwrap_or_default())
    }

    pub fn save_dashboard(&self, data: &DashboardData) -> Result<()> {
        self.save_document(DASHBOARD_SLOT, data)
    }

    /// Load the chat history, or an empty log if absent/corrupt.
    pub fn load_chat_history(&self) -> Result<Vec<ChatMessage>> {
        Ok(self.load_document(CHAT_HISTORY_SLOT)?.unwrap_or_default())
    }

    /// Persist the chat history in order.
    ///
    /// Transient `loading` placeholders are dropped here; they must never
    /// reach the stored log.
    pub fn save_chat_history(&self, messages: &[ChatMessage]) -> Result<()> {
        let persistable: Vec<&ChatMessage> = messages
            .iter()
            .filter(|m| m.role != ChatRole::Loading)
            .collect();
        self.save_document(CHAT_HISTORY_SLOT, &persistable)
    }

    /// Drop both documents, returning the store to its initial state.
    pub fn reset(&self) -> Result<()> {
        self.clear_document(DASHBOARD_SLOT)?;
        self.clear_document(CHAT_HISTORY_SLOT)
    }
}
