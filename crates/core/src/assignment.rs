//! Assignment store - who sits where
//!
//! The single source of truth for the roster and the table layout. Every
//! mutation validates completely before touching state, so an `Err` always
//! leaves the store exactly as it was.
//!
//! A person occupies at most one chair across the whole layout. Names are
//! unique across roster and chairs combined.

use std::collections::HashSet;

use chrono::Utc;
use tracing::{info, instrument};

use crate::error::{Error, Result};
use crate::invariants::assert_store_invariants;
use crate::models::{partition_groups, Group, Person, Table, TableId};

/// Spacing of the default placement grid for new tables
const PLACEMENT_SPACING: f64 = 400.0;
/// Tables per row in the default placement grid
const PLACEMENT_COLUMNS: usize = 4;
/// Offset of the first grid cell from the canvas origin
const PLACEMENT_ORIGIN: f64 = 100.0;

/// Hands out table ids from the wall clock, never repeating or going backwards
#[derive(Debug, Clone, Default)]
struct TableIdSource {
    last: u64,
}

impl TableIdSource {
    fn next(&mut self) -> Result<TableId> {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        let after = self
            .last
            .checked_add(1)
            .ok_or_else(|| Error::InvalidOperation("table ids exhausted".into()))?;
        self.last = now.max(after);
        Ok(TableId(self.last))
    }

    fn observe(&mut self, id: TableId) {
        self.last = self.last.max(id.0);
    }
}

#[derive(Debug, Clone, Default)]
pub struct AssignmentStore {
    roster: Vec<Person>,
    tables: Vec<Table>,
    ids: TableIdSource,
}

impl AssignmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ---------------------------------------------------------------------
    // Roster
    // ---------------------------------------------------------------------

    /// Add an unseated person to the roster
    #[instrument(skip(self))]
    pub fn add_person(&mut self, name: &str, group: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidOperation("person name must not be empty".into()));
        }
        if self.roster_contains(name) || self.seat_of(name).is_some() {
            return Err(Error::DuplicateName(name.to_string()));
        }

        self.roster.push(Person::new(name, group.trim()));
        self.check();
        Ok(())
    }

    /// Remove a person from the roster. Chairs are left alone; absent names are a no-op.
    #[instrument(skip(self))]
    pub fn delete_person(&mut self, name: &str) {
        self.roster.retain(|p| p.name != name);
        self.check();
    }

    /// Clear the person's chair (if any) and drop them from the roster.
    ///
    /// Returns whether anything was removed.
    #[instrument(skip(self))]
    pub fn remove_person_completely(&mut self, name: &str) -> bool {
        let cleared = self.clear_seat(name).is_some();
        let before = self.roster.len();
        self.roster.retain(|p| p.name != name);
        let removed = cleared || self.roster.len() != before;

        if removed {
            info!(name, "Person removed");
        }
        self.check();
        removed
    }

    /// Clear the person's chair and put them back on the roster
    #[instrument(skip(self))]
    pub fn unseat_person(&mut self, name: &str) -> Result<()> {
        match self.clear_seat(name) {
            Some(person) => {
                if !self.roster_contains(&person.name) {
                    self.roster.push(person);
                }
            }
            None if self.roster_contains(name) => {}
            None => return Err(Error::NotFound(format!("person {}", name))),
        }

        self.check();
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Tables
    // ---------------------------------------------------------------------

    /// Create an empty table at the next default position
    #[instrument(skip(self))]
    pub fn add_table(&mut self, chair_count: usize) -> Result<TableId> {
        if chair_count == 0 {
            return Err(Error::InvalidOperation("a table needs at least one chair".into()));
        }

        let id = self.push_table(chair_count)?;
        info!(table_id = %id, chair_count, "Table added");
        self.check();
        Ok(id)
    }

    /// Remove a table. Its occupants are dropped, not returned to the roster.
    #[instrument(skip(self))]
    pub fn delete_table(&mut self, id: TableId) -> Result<Table> {
        let index = self.table_index(id)?;
        let table = self.tables.remove(index);
        info!(table_id = %id, dropped = table.occupants().count(), "Table deleted");
        self.check();
        Ok(table)
    }

    /// Reposition a table on the canvas
    pub fn move_table(&mut self, id: TableId, x: f64, y: f64) -> Result<()> {
        if !(x.is_finite() && y.is_finite()) {
            return Err(Error::InvalidOperation("table position must be finite".into()));
        }
        let index = self.table_index(id)?;
        let table = &mut self.tables[index];
        table.x = x;
        table.y = y;
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Seating
    // ---------------------------------------------------------------------

    /// Seat a group at an existing table, filling empty chairs in order.
    ///
    /// All or nothing: fails with `Capacity` if the group is larger than the
    /// table, with `Conflict` if a member is seated at another table, and with
    /// `Capacity` if the members not already at this table outnumber its free
    /// chairs. Returns how many people were newly seated.
    #[instrument(skip(self, group), fields(group_size = group.len()))]
    pub fn assign_group_to_table(&mut self, table_id: TableId, group: &[Person]) -> Result<usize> {
        let index = self.table_index(table_id)?;
        ensure_distinct(group)?;

        let chair_count = self.tables[index].chair_count;
        if group.len() > chair_count {
            return Err(Error::Capacity {
                table_id,
                requested: group.len(),
                available: self.tables[index].free_chairs(),
            });
        }

        let mut incoming = Vec::with_capacity(group.len());
        for person in group {
            match self.seat_of(&person.name) {
                Some((seated_at, _)) if seated_at == table_id => {}
                Some((seated_at, _)) => {
                    return Err(Error::Conflict {
                        name: person.name.clone(),
                        table_id: seated_at,
                    })
                }
                None => incoming.push(person),
            }
        }

        let available = self.tables[index].free_chairs();
        if incoming.len() > available {
            return Err(Error::Capacity {
                table_id,
                requested: incoming.len(),
                available,
            });
        }

        let table = &mut self.tables[index];
        let empty: Vec<usize> = table
            .people
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_none())
            .map(|(chair, _)| chair)
            .collect();
        for (chair, person) in empty.into_iter().zip(&incoming) {
            table.people[chair] = Some((*person).clone());
        }
        let seated = incoming.len();
        self.roster
            .retain(|p| !incoming.iter().any(|placed| placed.name == p.name));

        info!(table_id = %table_id, seated, "Group seated");
        self.check();
        Ok(seated)
    }

    /// Create a table sized to the group and seat everyone in group order
    #[instrument(skip(self, group), fields(group_size = group.len()))]
    pub fn create_table_from_group(&mut self, group: &[Person]) -> Result<TableId> {
        if group.is_empty() {
            return Err(Error::InvalidOperation("cannot create a table for an empty group".into()));
        }
        ensure_distinct(group)?;
        if let Some((person, (table_id, _))) = group
            .iter()
            .find_map(|p| self.seat_of(&p.name).map(|seat| (p, seat)))
        {
            return Err(Error::Conflict {
                name: person.name.clone(),
                table_id,
            });
        }

        let id = self.push_table(group.len())?;
        if let Some(table) = self.tables.last_mut() {
            for (chair, person) in group.iter().enumerate() {
                table.people[chair] = Some(person.clone());
            }
        }
        self.roster
            .retain(|p| !group.iter().any(|placed| placed.name == p.name));

        info!(table_id = %id, seated = group.len(), "Table created from group");
        self.check();
        Ok(id)
    }

    /// Seat one roster person in a specific empty chair
    #[instrument(skip(self))]
    pub fn seat_person(&mut self, table_id: TableId, chair: usize, name: &str) -> Result<()> {
        let index = self.table_index(table_id)?;
        if let Some((seated_at, _)) = self.seat_of(name) {
            return Err(Error::Conflict {
                name: name.to_string(),
                table_id: seated_at,
            });
        }
        let person = self
            .roster
            .iter()
            .find(|p| p.name == name)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("person {}", name)))?;

        let slot = self.tables[index]
            .people
            .get_mut(chair)
            .ok_or_else(|| Error::NotFound(format!("chair {} at table {}", chair, table_id)))?;
        if slot.is_some() {
            return Err(Error::InvalidOperation(format!(
                "chair {} at table {} is occupied",
                chair, table_id
            )));
        }

        *slot = Some(person);
        self.roster.retain(|p| p.name != name);
        self.check();
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Layout snapshots
    // ---------------------------------------------------------------------

    /// Replace the layout with a saved one.
    ///
    /// Rejects malformed chair vectors and names seated twice. Roster
    /// entries that end up seated are taken off the roster.
    #[instrument(skip(self, tables), fields(tables = tables.len()))]
    pub fn restore(&mut self, tables: Vec<Table>) -> Result<()> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut ids: HashSet<TableId> = HashSet::new();
        for table in &tables {
            if table.chair_count == 0 || table.people.len() != table.chair_count {
                return Err(Error::InvalidOperation(format!(
                    "table {} has {} chair slots for {} chairs",
                    table.id,
                    table.people.len(),
                    table.chair_count
                )));
            }
            if !ids.insert(table.id) {
                return Err(Error::InvalidOperation(format!("duplicate table id {}", table.id)));
            }
            for person in table.occupants() {
                if !seen.insert(person.name.as_str()) {
                    return Err(Error::Conflict {
                        name: person.name.clone(),
                        table_id: table.id,
                    });
                }
            }
        }

        let dropped = self
            .tables
            .iter()
            .flat_map(|t| t.occupants())
            .filter(|p| !seen.contains(p.name.as_str()))
            .count();
        self.roster.retain(|p| !seen.contains(p.name.as_str()));
        for table in &tables {
            self.ids.observe(table.id);
        }
        self.tables = tables;

        info!(tables = self.tables.len(), dropped, "Layout restored");
        self.check();
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn table(&self, id: TableId) -> Option<&Table> {
        self.tables.iter().find(|t| t.id == id)
    }

    /// Full roster, in insertion order
    pub fn roster(&self) -> &[Person] {
        &self.roster
    }

    /// Every occupied chair, in table order then chair order
    pub fn seated_people(&self) -> Vec<Person> {
        self.tables
            .iter()
            .flat_map(|t| t.occupants().cloned())
            .collect()
    }

    /// Roster entries not sitting anywhere
    pub fn unseated_people(&self) -> Vec<Person> {
        let seated: HashSet<&str> = self
            .tables
            .iter()
            .flat_map(|t| t.occupants().map(|p| p.name.as_str()))
            .collect();
        self.roster
            .iter()
            .filter(|p| !seated.contains(p.name.as_str()))
            .cloned()
            .collect()
    }

    /// Groups over roster and seated people, in first-seen order
    pub fn groups(&self) -> Vec<Group> {
        let unseated = self.unseated_people();
        let seated = self.seated_people();
        partition_groups(unseated.iter().chain(seated.iter()))
    }

    /// Current members of one group
    pub fn group(&self, label: &str) -> Option<Group> {
        self.groups().into_iter().find(|g| g.label == label)
    }

    /// Table and chair index a name occupies
    pub fn seat_of(&self, name: &str) -> Option<(TableId, usize)> {
        self.tables
            .iter()
            .find_map(|t| t.chair_of(name).map(|chair| (t.id, chair)))
    }

    fn roster_contains(&self, name: &str) -> bool {
        self.roster.iter().any(|p| p.name == name)
    }

    fn table_index(&self, id: TableId) -> Result<usize> {
        self.tables
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| Error::NotFound(format!("table {}", id)))
    }

    fn clear_seat(&mut self, name: &str) -> Option<Person> {
        let (table_id, chair) = self.seat_of(name)?;
        let index = self.table_index(table_id).ok()?;
        self.tables[index].people[chair].take()
    }

    fn push_table(&mut self, chair_count: usize) -> Result<TableId> {
        let slot = self.tables.len();
        let x = PLACEMENT_ORIGIN + (slot % PLACEMENT_COLUMNS) as f64 * PLACEMENT_SPACING;
        let y = PLACEMENT_ORIGIN + (slot / PLACEMENT_COLUMNS) as f64 * PLACEMENT_SPACING;
        let id = self.ids.next()?;
        self.tables.push(Table::new(id, chair_count, x, y));
        Ok(id)
    }

    fn check(&self) {
        assert_store_invariants(&self.tables, &self.roster);
    }
}

fn ensure_distinct(group: &[Person]) -> Result<()> {
    let mut names = HashSet::new();
    for person in group {
        if !names.insert(person.name.as_str()) {
            return Err(Error::DuplicateName(person.name.clone()));
        }
    }
    Ok(())
}
