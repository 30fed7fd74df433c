//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible states during development.
//! These checks are compiled out in release builds.

use std::collections::HashSet;

use crate::models::{Person, Table};

/// Validate that a table's chair vector matches its chair count
pub fn assert_table_invariants(table: &Table) {
    debug_assert!(
        table.chair_count >= 1,
        "Table {} has no chairs",
        table.id
    );

    debug_assert!(
        table.people.len() == table.chair_count,
        "Table {} has {} chair slots but chair_count {}",
        table.id,
        table.people.len(),
        table.chair_count
    );
}

/// Validate the whole layout plus roster
pub fn assert_store_invariants(tables: &[Table], roster: &[Person]) {
    if !cfg!(debug_assertions) {
        return;
    }

    let mut table_ids = HashSet::new();
    let mut seated = HashSet::new();
    for table in tables {
        assert_table_invariants(table);

        debug_assert!(
            table_ids.insert(table.id),
            "Table id {} used twice",
            table.id
        );

        // A person occupies at most one chair hall-wide
        for person in table.occupants() {
            debug_assert!(
                seated.insert(person.name.as_str()),
                "{} is seated in more than one chair",
                person.name
            );
        }
    }

    let mut names = HashSet::new();
    for person in roster {
        debug_assert!(
            names.insert(person.name.as_str()),
            "{} is on the roster twice",
            person.name
        );
    }
}
