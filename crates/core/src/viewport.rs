//! Mapping between the seating canvas and overview panel pixels
//!
//! Forward: canvas scroll/zoom state to the viewport outline drawn on the
//! overview. Inverse: a click on the overview to the canvas scroll position
//! that centers the view on the clicked point.

use serde::{Deserialize, Serialize};

use crate::config::{GeometryConfig, OverviewConfig};
use crate::geometry::{
    clamp_scale, compute_bounds_with, compute_scale_factor, table_size, ContentBounds, Rect,
};
use crate::models::{Table, TableId};

/// Outline of the visible canvas region, in overview pixel space
pub type ViewportRect = Rect;

/// Live scroll and size state of the seating canvas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasMetrics {
    pub scroll_x: f64,
    pub scroll_y: f64,
    /// Visible size of the canvas element in screen pixels
    pub view_width: f64,
    pub view_height: f64,
    pub zoom: f64,
}

impl Default for CanvasMetrics {
    fn default() -> Self {
        Self {
            scroll_x: 0.0,
            scroll_y: 0.0,
            view_width: 0.0,
            view_height: 0.0,
            zoom: 1.0,
        }
    }
}

impl CanvasMetrics {
    /// Zoom with zero, negative and non-finite values treated as 1:1
    pub fn effective_zoom(&self) -> f64 {
        if self.zoom.is_finite() && self.zoom > 0.0 {
            self.zoom
        } else {
            1.0
        }
    }
}

/// Canvas scroll position to jump to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollTarget {
    pub x: f64,
    pub y: f64,
}

/// A table projected onto the overview
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableGlyph {
    pub id: TableId,
    pub rect: Rect,
}

/// Project the visible canvas region onto the overview
pub fn project_viewport(metrics: &CanvasMetrics, bounds: &ContentBounds, scale: f64) -> ViewportRect {
    let zoom = metrics.effective_zoom();
    let visible_width = metrics.view_width / zoom;
    let visible_height = metrics.view_height / zoom;

    Rect {
        x: (metrics.scroll_x - bounds.min_x) * scale,
        y: (metrics.scroll_y - bounds.min_y) * scale,
        width: visible_width * scale,
        height: visible_height * scale,
    }
}

/// Canvas scroll position that centers the current viewport on an overview click.
///
/// `click_x`/`click_y` are relative to the overview content area.
pub fn unproject_click(
    click_x: f64,
    click_y: f64,
    viewport: &ViewportRect,
    bounds: &ContentBounds,
    scale: f64,
) -> ScrollTarget {
    let scale = clamp_scale(scale);
    let world_x = click_x / scale + bounds.min_x;
    let world_y = click_y / scale + bounds.min_y;

    ScrollTarget {
        x: world_x - (viewport.width / scale) / 2.0,
        y: world_y - (viewport.height / scale) / 2.0,
    }
}

/// Cached projection state for one overview panel.
///
/// Holds only values derived from the table list and canvas metrics; both
/// are pushed in by the owner whenever they change.
#[derive(Debug, Clone)]
pub struct ViewportProjector {
    geometry: GeometryConfig,
    panel_width: f64,
    panel_height: f64,
    scale_cap: f64,
    bounds: ContentBounds,
    scale: f64,
    metrics: CanvasMetrics,
    viewport: ViewportRect,
}

impl ViewportProjector {
    pub fn new(geometry: GeometryConfig, overview: &OverviewConfig) -> Self {
        let mut projector = Self {
            geometry,
            panel_width: overview.width,
            panel_height: overview.height,
            scale_cap: overview.scale_cap,
            bounds: ContentBounds {
                min_x: 0.0,
                min_y: 0.0,
                max_x: 0.0,
                max_y: 0.0,
            },
            scale: 0.0,
            metrics: CanvasMetrics::default(),
            viewport: Rect::default(),
        };
        projector.set_tables(&[]);
        projector
    }

    /// Recompute bounds and scale after the table set changed
    pub fn set_tables(&mut self, tables: &[Table]) {
        self.bounds = compute_bounds_with(tables, &self.geometry);
        self.rescale();
    }

    /// Recompute the viewport after a canvas scroll, resize or zoom
    pub fn set_canvas(&mut self, metrics: CanvasMetrics) {
        self.metrics = metrics;
        self.viewport = project_viewport(&self.metrics, &self.bounds, self.scale);
    }

    /// Change the overview content size
    pub fn resize_panel(&mut self, width: f64, height: f64) {
        self.panel_width = width;
        self.panel_height = height;
        self.rescale();
    }

    fn rescale(&mut self) {
        self.scale = compute_scale_factor(
            &self.bounds,
            self.panel_width,
            self.panel_height,
            self.scale_cap,
        );
        self.viewport = project_viewport(&self.metrics, &self.bounds, self.scale);
    }

    pub fn bounds(&self) -> &ContentBounds {
        &self.bounds
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn metrics(&self) -> &CanvasMetrics {
        &self.metrics
    }

    pub fn viewport(&self) -> ViewportRect {
        self.viewport
    }

    /// Overview rectangle for a table
    pub fn project_table(&self, table: &Table) -> TableGlyph {
        let s = self.scale;
        TableGlyph {
            id: table.id,
            rect: Rect {
                x: (table.x - self.bounds.min_x) * s,
                y: (table.y - self.bounds.min_y) * s,
                width: table_size(table.width, &self.geometry) * s,
                height: table_size(table.height, &self.geometry) * s,
            },
        }
    }

    /// Scroll target for a click inside the overview content area
    pub fn scroll_target(&self, click_x: f64, click_y: f64) -> ScrollTarget {
        unproject_click(click_x, click_y, &self.viewport, &self.bounds, self.scale)
    }
}
