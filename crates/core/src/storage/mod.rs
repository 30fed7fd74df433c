//! SQLite storage layer for saved halls

mod halls;
mod migrations;
mod parse;
mod preferences;
mod traits;

use uuid::Uuid;

use crate::error::Result;
use crate::models::Hall;
use rusqlite::Connection;
use std::path::Path;
use tracing::instrument;

pub use halls::HallStore;
pub use preferences::{PanelPreferences, PreferencesStore};
pub use traits::HallRepository;

/// Main database handle
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Open in-memory database (for testing)
    #[instrument]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initialize database schema via migrations
    fn init(&self) -> Result<()> {
        migrations::run_migrations(&self.conn)?;
        Ok(())
    }

    /// Get current schema version
    pub fn schema_version(&self) -> u32 {
        self.conn
            .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap_or(0)
    }

    pub fn halls(&self) -> HallStore<'_> {
        HallStore::new(&self.conn)
    }

    /// Get preferences store for planner settings
    pub fn preferences(&self) -> PreferencesStore<'_> {
        PreferencesStore::new(&self.conn)
    }
}

impl HallRepository for Database {
    fn load_halls(&self) -> Result<Vec<Hall>> {
        self.halls().list()
    }

    fn save_hall(&self, hall: &Hall) -> Result<()> {
        self.halls().save(hall)
    }

    fn delete_hall(&self, hall_id: Uuid) -> Result<()> {
        self.halls().delete(hall_id)
    }

    fn find_hall(&self, id: Uuid) -> Result<Option<Hall>> {
        self.halls().find_by_id(id)
    }
}
