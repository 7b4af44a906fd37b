pub mod demo;
pub mod migrations;
pub mod models;
pub mod queries;

use anyhow::Result;
use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;
use tracing::info;

pub use demo::DemoStore;
use models::{NewUser, UserRow};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("user with this email already exists")]
    DuplicateEmail,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Persistence seam for the user store. The server picks an implementation
/// once at startup: SQLite-backed [`Database`] or the in-memory
/// [`DemoStore`]. Password checking lives on the trait because the demo
/// backend has its own acceptance policy.
///
/// All methods are synchronous and blocking; callers on the async runtime
/// wrap them in `spawn_blocking`.
pub trait UserStore: Send + Sync {
    fn create_user(&self, new: &NewUser) -> Result<UserRow, StoreError>;
    fn find_by_email(&self, email: &str) -> Result<Option<UserRow>, StoreError>;
    fn find_by_id(&self, id: &str) -> Result<Option<UserRow>, StoreError>;
    fn list_users(&self) -> Result<Vec<UserRow>, StoreError>;

    /// Check a candidate password against a stored row. CPU-bound for the
    /// SQLite backend (argon2 verification).
    fn verify_password(&self, user: &UserRow, candidate: &str) -> Result<bool, StoreError>;
}

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // WAL mode for concurrent reads
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        migrations::run(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Private in-memory database, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        migrations::run(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| anyhow::anyhow!("DB lock poisoned: {}", e))?;
        f(&conn)
    }
}
