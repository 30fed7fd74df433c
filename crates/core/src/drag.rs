//! Drag-and-drop of roster payloads onto tables
//!
//! One gesture at a time: `Idle -> Dragging(payload) -> Idle`. The payload
//! is a snapshot taken when the drag begins; roster changes during the
//! gesture do not reach it. Every drop, valid or not, returns the
//! coordinator to `Idle`.

use tracing::{info, warn};

use crate::assignment::AssignmentStore;
use crate::error::{Error, Result};
use crate::models::{Person, TableId};

/// What is being dragged
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragPayload {
    /// Members of a roster group, in group order
    Group { label: String, members: Vec<Person> },
    /// A single roster person
    Person(Person),
}

/// Where a drag ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// An existing table; accepts groups
    Table(TableId),
    /// The "new table" zone; accepts groups
    NewTable,
    /// A specific chair; accepts single people
    Chair { table_id: TableId, chair: usize },
    /// Anywhere that is not a drop zone
    Outside,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragPayload),
}

/// Result of a completed drop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// People were seated at an existing table
    Seated { table_id: TableId, count: usize },
    /// A new table was created for the group
    TableCreated(TableId),
    /// Nothing happened: no drag, a target outside any zone, or a target
    /// that does not accept the payload
    Ignored,
}

/// Tracks the in-flight roster drag for one session
#[derive(Debug, Default)]
pub struct DragCoordinator {
    state: DragState,
}

impl DragCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn payload(&self) -> Option<&DragPayload> {
        match &self.state {
            DragState::Dragging(payload) => Some(payload),
            DragState::Idle => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Start dragging the current membership of a group
    pub fn begin_group(&mut self, store: &AssignmentStore, label: &str) -> Result<()> {
        let group = store
            .group(label)
            .ok_or_else(|| Error::NotFound(format!("group {}", label)))?;
        self.begin(DragPayload::Group {
            label: group.label,
            members: group.members,
        })
    }

    /// Start dragging one unseated person
    pub fn begin_person(&mut self, store: &AssignmentStore, name: &str) -> Result<()> {
        let person = store
            .unseated_people()
            .into_iter()
            .find(|p| p.name == name)
            .ok_or_else(|| Error::NotFound(format!("unseated person {}", name)))?;
        self.begin(DragPayload::Person(person))
    }

    fn begin(&mut self, payload: DragPayload) -> Result<()> {
        if self.is_dragging() {
            return Err(Error::InvalidOperation("a drag is already in progress".into()));
        }
        self.state = DragState::Dragging(payload);
        Ok(())
    }

    /// Abandon the current drag with no side effects
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }

    /// Finish the drag on a target.
    ///
    /// The coordinator is idle afterwards whatever the outcome. A rejected
    /// assignment comes back as `Err` with the store unchanged.
    pub fn drop_on(&mut self, store: &mut AssignmentStore, target: DropTarget) -> Result<DropOutcome> {
        let DragState::Dragging(payload) = std::mem::take(&mut self.state) else {
            return Ok(DropOutcome::Ignored);
        };

        let result = match (payload, target) {
            (DragPayload::Group { members, .. }, DropTarget::Table(table_id)) => store
                .assign_group_to_table(table_id, &members)
                .map(|count| DropOutcome::Seated { table_id, count }),
            (DragPayload::Group { members, .. }, DropTarget::NewTable) => store
                .create_table_from_group(&members)
                .map(DropOutcome::TableCreated),
            (DragPayload::Person(person), DropTarget::Chair { table_id, chair }) => store
                .seat_person(table_id, chair, &person.name)
                .map(|()| DropOutcome::Seated { table_id, count: 1 }),
            _ => Ok(DropOutcome::Ignored),
        };

        match &result {
            Ok(DropOutcome::Ignored) => {}
            Ok(outcome) => info!(?outcome, "Drop applied"),
            Err(e) => warn!(error = %e, "Drop rejected"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(people: &[(&str, &str)]) -> AssignmentStore {
        let mut store = AssignmentStore::new();
        for (name, group) in people {
            store.add_person(name, group).unwrap();
        }
        store
    }

    #[test]
    fn test_drop_group_on_table() {
        let mut store = store_with(&[("A", "X"), ("B", "X")]);
        let table = store.add_table(2).unwrap();
        let mut drag = DragCoordinator::new();

        drag.begin_group(&store, "X").unwrap();
        assert!(drag.is_dragging());

        let outcome = drag.drop_on(&mut store, DropTarget::Table(table)).unwrap();
        assert_eq!(outcome, DropOutcome::Seated { table_id: table, count: 2 });
        assert!(!drag.is_dragging());

        let seated: Vec<String> = store.seated_people().into_iter().map(|p| p.name).collect();
        assert_eq!(seated, vec!["A", "B"]);
        assert!(store.unseated_people().is_empty());
    }

    #[test]
    fn test_capacity_rejection_resets_drag() {
        let mut store = store_with(&[("A", "X"), ("B", "X"), ("C", "X")]);
        let table = store.add_table(2).unwrap();
        let mut drag = DragCoordinator::new();

        drag.begin_group(&store, "X").unwrap();
        let err = drag.drop_on(&mut store, DropTarget::Table(table)).unwrap_err();
        assert!(matches!(err, Error::Capacity { .. }));
        assert!(!drag.is_dragging());
        assert_eq!(store.unseated_people().len(), 3);
    }

    #[test]
    fn test_drop_group_on_new_table() {
        let mut store = store_with(&[("A", "X"), ("B", "X"), ("C", "X")]);
        let mut drag = DragCoordinator::new();

        drag.begin_group(&store, "X").unwrap();
        let outcome = drag.drop_on(&mut store, DropTarget::NewTable).unwrap();
        let DropOutcome::TableCreated(id) = outcome else {
            panic!("expected a new table, got {:?}", outcome);
        };
        assert_eq!(store.table(id).unwrap().chair_count, 3);
    }

    #[test]
    fn test_drop_outside_is_noop() {
        let mut store = store_with(&[("A", "X")]);
        let mut drag = DragCoordinator::new();

        drag.begin_group(&store, "X").unwrap();
        let outcome = drag.drop_on(&mut store, DropTarget::Outside).unwrap();
        assert_eq!(outcome, DropOutcome::Ignored);
        assert!(!drag.is_dragging());
        assert!(store.tables().is_empty());
        assert_eq!(store.unseated_people().len(), 1);
    }

    #[test]
    fn test_payload_is_snapshot() {
        let mut store = store_with(&[("A", "X"), ("B", "X")]);
        let table = store.add_table(4).unwrap();
        let mut drag = DragCoordinator::new();

        drag.begin_group(&store, "X").unwrap();
        store.add_person("C", "X").unwrap();

        drag.drop_on(&mut store, DropTarget::Table(table)).unwrap();
        let unseated: Vec<String> = store.unseated_people().into_iter().map(|p| p.name).collect();
        assert_eq!(unseated, vec!["C"]);
    }

    #[test]
    fn test_payload_kind_must_match_target() {
        let mut store = store_with(&[("A", "X"), ("B", "")]);
        let table = store.add_table(2).unwrap();
        let mut drag = DragCoordinator::new();

        // a group cannot be dropped on a single chair
        drag.begin_group(&store, "X").unwrap();
        let outcome = drag
            .drop_on(&mut store, DropTarget::Chair { table_id: table, chair: 0 })
            .unwrap();
        assert_eq!(outcome, DropOutcome::Ignored);

        // a person cannot be dropped on a table or the new table zone
        drag.begin_person(&store, "B").unwrap();
        assert_eq!(drag.drop_on(&mut store, DropTarget::NewTable).unwrap(), DropOutcome::Ignored);
        assert!(store.seated_people().is_empty());
    }

    #[test]
    fn test_drop_person_on_chair() {
        let mut store = store_with(&[("A", "X")]);
        let table = store.add_table(3).unwrap();
        let mut drag = DragCoordinator::new();

        drag.begin_person(&store, "A").unwrap();
        let outcome = drag
            .drop_on(&mut store, DropTarget::Chair { table_id: table, chair: 2 })
            .unwrap();
        assert_eq!(outcome, DropOutcome::Seated { table_id: table, count: 1 });
        assert_eq!(store.seat_of("A"), Some((table, 2)));
    }

    #[test]
    fn test_single_drag_at_a_time() {
        let store = store_with(&[("A", "X"), ("B", "Y")]);
        let mut drag = DragCoordinator::new();

        drag.begin_group(&store, "X").unwrap();
        assert!(matches!(drag.begin_group(&store, "Y"), Err(Error::InvalidOperation(_))));
        match drag.payload() {
            Some(DragPayload::Group { label, .. }) => assert_eq!(label, "X"),
            other => panic!("unexpected payload {:?}", other),
        }

        drag.cancel();
        assert_eq!(drag.state(), &DragState::Idle);
        assert!(matches!(drag.begin_group(&store, "Nope"), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_drop_without_drag() {
        let mut store = AssignmentStore::new();
        let mut drag = DragCoordinator::new();
        assert_eq!(drag.drop_on(&mut store, DropTarget::NewTable).unwrap(), DropOutcome::Ignored);
    }
}
