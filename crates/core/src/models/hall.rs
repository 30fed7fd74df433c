//! Hall model - a saved table layout

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Table;

/// A Hall is a named snapshot of a table layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hall {
    pub id: Uuid,
    pub name: String,
    pub tables: Vec<Table>,
    pub created_at: DateTime<Utc>,
}

impl Hall {
    pub fn new(name: String, tables: Vec<Table>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            tables,
            created_at: Utc::now(),
        }
    }

    /// Number of seated people across all tables
    pub fn seated_count(&self) -> usize {
        self.tables.iter().map(|t| t.occupants().count()).sum()
    }
}
