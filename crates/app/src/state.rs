//! Application state management

use std::path::PathBuf;

use directories::ProjectDirs;
use seatplan_core::{
    CanvasSurface, Database, Error, Hall, HallRepository, PanelPreferences, PlannerConfig, Point,
    Result, SeatingSession, VirtualCanvas,
};
use uuid::Uuid;

/// Canvas size used until the first resize
const INITIAL_VIEW: (f64, f64) = (1024.0, 768.0);

/// Main application state
pub struct AppState {
    db: Database,
    session: SeatingSession,
    canvas: VirtualCanvas,
    current_hall: Option<Hall>,
}

impl AppState {
    pub fn new(config: PlannerConfig) -> Result<Self> {
        let db_path = Self::data_path()?.join("seatplan.db");

        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&db_path)?;
        Self::with_database(db, config)
    }

    /// Build state on an already opened database, restoring saved preferences
    pub fn with_database(db: Database, config: PlannerConfig) -> Result<Self> {
        let mut canvas = VirtualCanvas::new(config.canvas.clone(), INITIAL_VIEW.0, INITIAL_VIEW.1);
        let mut session = SeatingSession::new(&config);

        if let Some(panel) = db.preferences().load_panel()? {
            session.overview_mut().set_position(Point::new(panel.x, panel.y));
            session.set_overview_visible(panel.visible, &canvas);
        }
        session.attach_overview(&mut canvas);

        let mut state = Self {
            db,
            session,
            canvas,
            current_hall: None,
        };

        if let Some(hall_id) = state.db.preferences().get_last_hall()? {
            match state.open_hall(hall_id) {
                Ok(hall) => tracing::info!(hall = %hall.name, "Reopened last hall"),
                Err(e) => {
                    tracing::warn!(error = %e, "Could not reopen last hall");
                    state.db.preferences().clear_last_hall()?;
                }
            }
        }

        Ok(state)
    }

    fn data_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "onyx", "seatplan").ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine data directory",
            ))
        })?;

        Ok(dirs.data_dir().to_path_buf())
    }

    pub fn session(&self) -> &SeatingSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SeatingSession {
        &mut self.session
    }

    pub fn canvas(&self) -> &VirtualCanvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut VirtualCanvas {
        &mut self.canvas
    }

    /// Session and canvas borrowed together, for overview calls
    pub fn parts_mut(&mut self) -> (&mut SeatingSession, &mut VirtualCanvas) {
        (&mut self.session, &mut self.canvas)
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn current_hall(&self) -> Option<&Hall> {
        self.current_hall.as_ref()
    }

    /// End of an input frame: fold queued canvas notifications into the overview
    pub fn frame(&mut self) -> bool {
        self.session.sync_canvas(&self.canvas)
    }

    /// Save the current layout. A name starts a new hall; no name overwrites
    /// the open one.
    pub fn save_hall(&mut self, name: Option<&str>) -> Result<Hall> {
        let tables = self.session.store().tables().to_vec();
        let hall = match (name, &self.current_hall) {
            (Some(name), _) => Hall::new(name.to_string(), tables),
            (None, Some(open)) => Hall {
                tables,
                ..open.clone()
            },
            (None, None) => {
                return Err(Error::InvalidOperation(
                    "no hall is open; give the hall a name".into(),
                ))
            }
        };

        self.db.save_hall(&hall)?;
        self.db.preferences().set_last_hall(hall.id)?;
        self.current_hall = Some(hall.clone());
        Ok(hall)
    }

    /// Replace the session layout with a saved hall
    pub fn open_hall(&mut self, hall_id: Uuid) -> Result<Hall> {
        let hall = self
            .db
            .find_hall(hall_id)?
            .ok_or_else(|| Error::NotFound(format!("hall {}", hall_id)))?;

        self.session.restore(hall.tables.clone())?;
        self.db.preferences().set_last_hall(hall.id)?;
        self.current_hall = Some(hall.clone());
        Ok(hall)
    }

    pub fn delete_hall(&mut self, hall_id: Uuid) -> Result<()> {
        self.db.delete_hall(hall_id)?;
        if self.db.preferences().get_last_hall()? == Some(hall_id) {
            self.db.preferences().clear_last_hall()?;
        }
        if self.current_hall.as_ref().map(|h| h.id) == Some(hall_id) {
            self.current_hall = None;
        }
        Ok(())
    }

    /// Find a saved hall by id or by exact name
    pub fn resolve_hall(&self, key: &str) -> Result<Hall> {
        if let Ok(id) = Uuid::parse_str(key) {
            if let Some(hall) = self.db.find_hall(id)? {
                return Ok(hall);
            }
        }
        self.db
            .load_halls()?
            .into_iter()
            .find(|h| h.name == key)
            .ok_or_else(|| Error::NotFound(format!("hall {}", key)))
    }

    /// Remember the overview panel for the next run
    pub fn persist_panel(&self) -> Result<()> {
        let overview = self.session.overview();
        let position = overview.position();
        self.db.preferences().save_panel(&PanelPreferences {
            visible: overview.is_visible(),
            x: position.x,
            y: position.y,
        })
    }

    pub fn shutdown(&mut self) -> Result<()> {
        self.persist_panel()?;
        self.session.detach_overview(&mut self.canvas);
        tracing::debug!(listeners = self.canvas.events().listener_count(), "Session closed");
        Ok(())
    }
}
