//! Round tables and their chairs

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Person;

/// Width and height assumed for a table with no usable size
pub const DEFAULT_TABLE_SIZE: f64 = 300.0;

/// Identifier for a table, unique within a layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableId(pub u64);

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A table on the canvas with a fixed number of chairs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub id: TableId,
    pub chair_count: usize,
    /// One slot per chair, `None` for an empty chair
    pub people: Vec<Option<Person>>,
    pub x: f64,
    pub y: f64,
    #[serde(default = "default_size")]
    pub width: f64,
    #[serde(default = "default_size")]
    pub height: f64,
}

fn default_size() -> f64 {
    DEFAULT_TABLE_SIZE
}

impl Table {
    pub fn new(id: TableId, chair_count: usize, x: f64, y: f64) -> Self {
        Self {
            id,
            chair_count,
            people: vec![None; chair_count],
            x,
            y,
            width: DEFAULT_TABLE_SIZE,
            height: DEFAULT_TABLE_SIZE,
        }
    }

    /// Number of empty chairs
    pub fn free_chairs(&self) -> usize {
        self.people.iter().filter(|slot| slot.is_none()).count()
    }

    /// Seated people in chair order
    pub fn occupants(&self) -> impl Iterator<Item = &Person> {
        self.people.iter().flatten()
    }

    /// Chair index holding the given name
    pub fn chair_of(&self, name: &str) -> Option<usize> {
        self.people
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|p| p.name == name))
    }

    pub fn is_empty(&self) -> bool {
        self.people.iter().all(Option::is_none)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_table_is_empty() {
        let table = Table::new(TableId(1), 4, 0.0, 0.0);
        assert_eq!(table.people.len(), 4);
        assert_eq!(table.free_chairs(), 4);
        assert!(table.is_empty());
    }

    #[test]
    fn test_chair_of() {
        let mut table = Table::new(TableId(1), 3, 0.0, 0.0);
        table.people[2] = Some(Person::new("Ana", "X"));
        assert_eq!(table.chair_of("Ana"), Some(2));
        assert_eq!(table.chair_of("Ben"), None);
        assert_eq!(table.free_chairs(), 2);
    }

    #[test]
    fn test_missing_size_defaults_on_load() {
        let json = r#"{"id":7,"chair_count":1,"people":[null],"x":10.0,"y":20.0}"#;
        let table: Table = serde_json::from_str(json).unwrap();
        assert_eq!(table.id, TableId(7));
        assert_eq!(table.width, DEFAULT_TABLE_SIZE);
        assert_eq!(table.height, DEFAULT_TABLE_SIZE);
    }
}
