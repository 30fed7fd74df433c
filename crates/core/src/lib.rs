//! Seatplan Core Library
//!
//! Hall layout geometry, the overview minimap, guest-to-table assignment,
//! roster drag-and-drop, and storage for saved halls.

pub mod assignment;
pub mod canvas;
pub mod config;
pub mod drag;
pub mod error;
pub mod geometry;
pub mod invariants;
pub mod models;
pub mod overview;
pub mod session;
pub mod storage;
pub mod viewport;

pub use assignment::AssignmentStore;
pub use canvas::{CanvasEvent, CanvasEvents, CanvasSubscription, CanvasSurface, VirtualCanvas};
pub use config::{CanvasConfig, ConfigError, GeometryConfig, OverviewConfig, PlannerConfig};
pub use drag::{DragCoordinator, DragPayload, DragState, DropOutcome, DropTarget};
pub use error::{Error, Result};
pub use geometry::{ContentBounds, Rect};
pub use models::*;
pub use overview::{
    OverviewFrame, OverviewPanel, OverviewRender, PanelResponse, Point, PointerEvent, PointerKind,
};
pub use session::SeatingSession;
pub use storage::{Database, HallRepository, PanelPreferences, PreferencesStore};
pub use viewport::{CanvasMetrics, ScrollTarget, TableGlyph, ViewportProjector, ViewportRect};
