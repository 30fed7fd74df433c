//! Planner preferences persistence
//!
//! Remembers the last opened hall and where the overview panel was left.

use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::instrument;
use uuid::Uuid;

use super::parse::OptionalExt;
use crate::error::Result;

const LAST_HALL_KEY: &str = "last_hall_id";
const PANEL_VISIBLE_KEY: &str = "overview.visible";
const PANEL_X_KEY: &str = "overview.x";
const PANEL_Y_KEY: &str = "overview.y";

/// Overview panel state carried between runs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelPreferences {
    pub visible: bool,
    pub x: f64,
    pub y: f64,
}

/// Preferences store
pub struct PreferencesStore<'a> {
    conn: &'a Connection,
}

impl<'a> PreferencesStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Write a raw preference value
    #[instrument(skip(self))]
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO preferences (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Read a raw preference value
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM preferences WHERE key = ?1", params![key])?;
        Ok(())
    }

    pub fn set_last_hall(&self, hall_id: Uuid) -> Result<()> {
        self.set(LAST_HALL_KEY, &hall_id.to_string())
    }

    /// Get the last hall. A malformed stored id reads as none.
    pub fn get_last_hall(&self) -> Result<Option<Uuid>> {
        Ok(self
            .get(LAST_HALL_KEY)?
            .and_then(|s| Uuid::parse_str(&s).ok()))
    }

    /// Clear last hall (e.g., when the hall is deleted)
    pub fn clear_last_hall(&self) -> Result<()> {
        self.remove(LAST_HALL_KEY)
    }

    #[instrument(skip(self))]
    pub fn save_panel(&self, panel: &PanelPreferences) -> Result<()> {
        self.set(PANEL_VISIBLE_KEY, if panel.visible { "1" } else { "0" })?;
        self.set(PANEL_X_KEY, &panel.x.to_string())?;
        self.set(PANEL_Y_KEY, &panel.y.to_string())?;
        Ok(())
    }

    /// Load panel state; `None` until all three values have been saved
    pub fn load_panel(&self) -> Result<Option<PanelPreferences>> {
        let visible = self.get(PANEL_VISIBLE_KEY)?;
        let x = self.get(PANEL_X_KEY)?.and_then(|s| s.parse::<f64>().ok());
        let y = self.get(PANEL_Y_KEY)?.and_then(|s| s.parse::<f64>().ok());

        Ok(match (visible, x, y) {
            (Some(visible), Some(x), Some(y)) if x.is_finite() && y.is_finite() => {
                Some(PanelPreferences {
                    visible: visible == "1",
                    x,
                    y,
                })
            }
            _ => None,
        })
    }
}
