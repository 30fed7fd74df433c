//! Seating session context
//!
//! Owns the assignment store, the roster drag and the overview panel for
//! one open layout, and keeps the panel's projection current whenever the
//! table set changes.

use crate::assignment::AssignmentStore;
use crate::canvas::CanvasSurface;
use crate::config::PlannerConfig;
use crate::drag::{DragCoordinator, DropOutcome, DropTarget};
use crate::error::Result;
use crate::models::{Table, TableId};
use crate::overview::{OverviewPanel, OverviewRender, PanelResponse, PointerEvent};

pub struct SeatingSession {
    store: AssignmentStore,
    drag: DragCoordinator,
    overview: OverviewPanel,
}

impl SeatingSession {
    pub fn new(config: &PlannerConfig) -> Self {
        Self {
            store: AssignmentStore::new(),
            drag: DragCoordinator::new(),
            overview: OverviewPanel::new(config),
        }
    }

    pub fn store(&self) -> &AssignmentStore {
        &self.store
    }

    pub fn drag(&self) -> &DragCoordinator {
        &self.drag
    }

    pub fn overview(&self) -> &OverviewPanel {
        &self.overview
    }

    pub fn overview_mut(&mut self) -> &mut OverviewPanel {
        &mut self.overview
    }

    fn tables_changed(&mut self) {
        self.overview.tables_changed(self.store.tables());
    }

    // Roster

    pub fn add_person(&mut self, name: &str, group: &str) -> Result<()> {
        self.store.add_person(name, group)
    }

    pub fn delete_person(&mut self, name: &str) {
        self.store.delete_person(name);
    }

    pub fn remove_person_completely(&mut self, name: &str) -> bool {
        self.store.remove_person_completely(name)
    }

    pub fn unseat_person(&mut self, name: &str) -> Result<()> {
        self.store.unseat_person(name)
    }

    // Tables

    pub fn add_table(&mut self, chair_count: usize) -> Result<TableId> {
        let id = self.store.add_table(chair_count)?;
        self.tables_changed();
        Ok(id)
    }

    pub fn delete_table(&mut self, id: TableId) -> Result<Table> {
        let table = self.store.delete_table(id)?;
        self.tables_changed();
        Ok(table)
    }

    pub fn move_table(&mut self, id: TableId, x: f64, y: f64) -> Result<()> {
        self.store.move_table(id, x, y)?;
        self.tables_changed();
        Ok(())
    }

    /// Replace the layout with a saved one
    pub fn restore(&mut self, tables: Vec<Table>) -> Result<()> {
        self.drag.cancel();
        self.store.restore(tables)?;
        self.tables_changed();
        Ok(())
    }

    // Drag and drop

    pub fn begin_group_drag(&mut self, label: &str) -> Result<()> {
        self.drag.begin_group(&self.store, label)
    }

    pub fn begin_person_drag(&mut self, name: &str) -> Result<()> {
        self.drag.begin_person(&self.store, name)
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    pub fn drop_on(&mut self, target: DropTarget) -> Result<DropOutcome> {
        let outcome = self.drag.drop_on(&mut self.store, target)?;
        if let DropOutcome::TableCreated(_) = outcome {
            self.tables_changed();
        }
        Ok(outcome)
    }

    // Overview

    pub fn attach_overview<C: CanvasSurface>(&mut self, canvas: &mut C) {
        self.overview.attach(self.store.tables(), canvas);
    }

    pub fn detach_overview<C: CanvasSurface>(&mut self, canvas: &mut C) {
        self.overview.detach(canvas);
    }

    pub fn toggle_overview<C: CanvasSurface>(&mut self, canvas: &C) -> bool {
        self.overview.toggle(self.store.tables(), canvas)
    }

    pub fn set_overview_visible<C: CanvasSurface>(&mut self, visible: bool, canvas: &C) {
        self.overview.set_visible(visible, self.store.tables(), canvas);
    }

    /// Apply queued canvas notifications to the overview
    pub fn sync_canvas<C: CanvasSurface>(&mut self, canvas: &C) -> bool {
        self.overview.sync(canvas)
    }

    pub fn overview_pointer<C: CanvasSurface>(
        &mut self,
        event: PointerEvent,
        canvas: &mut C,
    ) -> PanelResponse {
        self.overview.handle_pointer(event, canvas)
    }

    pub fn render_overview(&self) -> OverviewRender {
        self.overview.render(self.store.tables())
    }
}
