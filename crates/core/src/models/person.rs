//! People and the groups they are partitioned into

use serde::{Deserialize, Serialize};

/// A guest on the roster. Identity is the name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    /// Group label; empty when the person belongs to no group
    #[serde(default)]
    pub group: String,
}

impl Person {
    pub fn new(name: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
        }
    }

    /// Whether this person carries a usable group label
    pub fn has_group(&self) -> bool {
        !self.group.trim().is_empty()
    }
}

/// A derived partition of people sharing a group label.
///
/// Never stored; recomputed from the store on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub label: String,
    pub members: Vec<Person>,
}

impl Group {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Partition people by group label in first-seen order, skipping unlabeled people
pub fn partition_groups<'a>(people: impl IntoIterator<Item = &'a Person>) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();

    for person in people {
        if !person.has_group() {
            continue;
        }
        match groups.iter_mut().find(|g| g.label == person.group) {
            Some(group) => group.members.push(person.clone()),
            None => groups.push(Group {
                label: person.group.clone(),
                members: vec![person.clone()],
            }),
        }
    }

    groups
}
