//! Hall storage operations

use chrono::Utc;
use rusqlite::{params, Connection, Row};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{parse_datetime, parse_tables, parse_uuid, OptionalExt};
use crate::error::Result;
use crate::models::Hall;

pub struct HallStore<'a> {
    conn: &'a Connection,
}

impl<'a> HallStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert or replace a Hall, keyed by its id
    #[instrument(skip(self, hall), fields(hall_id = %hall.id, hall_name = %hall.name))]
    pub fn save(&self, hall: &Hall) -> Result<()> {
        let tables_json = serde_json::to_string(&hall.tables)?;

        self.conn.execute(
            "INSERT INTO halls (id, name, tables_json, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                tables_json = excluded.tables_json,
                updated_at = excluded.updated_at",
            params![
                hall.id.to_string(),
                hall.name,
                tables_json,
                hall.created_at.to_rfc3339(),
                Utc::now().to_rfc3339(),
            ],
        )?;
        tracing::info!(tables = hall.tables.len(), "Hall saved");
        Ok(())
    }

    /// Find Hall by ID
    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<Hall>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, tables_json, created_at FROM halls WHERE id = ?1",
        )?;

        let hall = stmt
            .query_row(params![id.to_string()], hall_from_row)
            .optional()?;

        Ok(hall)
    }

    /// List all saved Halls by name
    #[instrument(skip(self))]
    pub fn list(&self) -> Result<Vec<Hall>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, tables_json, created_at FROM halls ORDER BY name, created_at",
        )?;

        let halls = stmt
            .query_map([], hall_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(halls)
    }

    /// Delete Hall. Deleting an unknown id is not an error.
    #[instrument(skip(self))]
    pub fn delete(&self, hall_id: Uuid) -> Result<()> {
        self.conn.execute(
            "DELETE FROM halls WHERE id = ?1",
            params![hall_id.to_string()],
        )?;
        Ok(())
    }
}

fn hall_from_row(row: &Row<'_>) -> rusqlite::Result<Hall> {
    Ok(Hall {
        id: parse_uuid(&row.get::<_, String>(0)?)?,
        name: row.get(1)?,
        tables: parse_tables(&row.get::<_, String>(2)?)?,
        created_at: parse_datetime(&row.get::<_, String>(3)?)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Person, Table, TableId};
    use crate::storage::Database;

    fn sample_hall(name: &str) -> Hall {
        let mut table = Table::new(TableId(1), 3, 100.0, 200.0);
        table.people[1] = Some(Person::new("Ana", "Family"));
        Hall::new(name.to_string(), vec![table, Table::new(TableId(2), 2, 500.0, 100.0)])
    }

    #[test]
    fn test_save_and_find() {
        let db = Database::open_in_memory().unwrap();
        let hall = sample_hall("Main Hall");
        db.halls().save(&hall).unwrap();

        let loaded = db.halls().find_by_id(hall.id).unwrap().unwrap();
        assert_eq!(loaded.name, "Main Hall");
        assert_eq!(loaded.tables, hall.tables);
        assert_eq!(loaded.seated_count(), 1);
        assert_eq!(loaded.created_at.timestamp(), hall.created_at.timestamp());
    }

    #[test]
    fn test_save_overwrites_same_id() {
        let db = Database::open_in_memory().unwrap();
        let mut hall = sample_hall("Draft");
        db.halls().save(&hall).unwrap();

        hall.name = "Final".to_string();
        hall.tables.pop();
        db.halls().save(&hall).unwrap();

        let halls = db.halls().list().unwrap();
        assert_eq!(halls.len(), 1);
        assert_eq!(halls[0].name, "Final");
        assert_eq!(halls[0].tables.len(), 1);
    }

    #[test]
    fn test_list_sorted_and_delete() {
        let db = Database::open_in_memory().unwrap();
        let b = sample_hall("Barn");
        let a = sample_hall("Atrium");
        db.halls().save(&b).unwrap();
        db.halls().save(&a).unwrap();

        let names: Vec<String> = db.halls().list().unwrap().into_iter().map(|h| h.name).collect();
        assert_eq!(names, vec!["Atrium", "Barn"]);

        db.halls().delete(a.id).unwrap();
        db.halls().delete(a.id).unwrap();
        assert!(db.halls().find_by_id(a.id).unwrap().is_none());
        assert_eq!(db.halls().list().unwrap().len(), 1);
    }

    #[test]
    fn test_find_missing() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.halls().find_by_id(Uuid::new_v4()).unwrap().is_none());
    }
}
