//! Content bounds and overview scale.
//!
//! Pure functions over the table collection. Bounds are recomputed in full
//! on every table-set change.

use serde::{Deserialize, Serialize};

use crate::config::GeometryConfig;
use crate::models::Table;

/// Smallest scale factor handed out. Guards the inverse projection against
/// division by zero when bounds or panel size are degenerate.
pub const MIN_SCALE: f64 = 1e-6;

/// Axis-aligned rectangle in whatever space the caller is working in.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Half-open containment check
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }
}

/// Bounding box of the canvas content, padded and floored to a minimum span
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContentBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl ContentBounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Bounds for the given tables using the default geometry settings
pub fn compute_bounds(tables: &[Table]) -> ContentBounds {
    compute_bounds_with(tables, &GeometryConfig::default())
}

/// Bounds for the given tables.
///
/// With no tables the result is a `min_span` square centered on the origin.
/// Otherwise the tightest box around every table is padded by `margin` and
/// each axis is widened to `min_span` by moving its max edge only.
pub fn compute_bounds_with(tables: &[Table], config: &GeometryConfig) -> ContentBounds {
    if tables.is_empty() {
        let half = config.min_span / 2.0;
        return ContentBounds {
            min_x: -half,
            min_y: -half,
            max_x: half,
            max_y: half,
        };
    }

    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for table in tables {
        let width = table_size(table.width, config);
        let height = table_size(table.height, config);
        min_x = min_x.min(table.x);
        min_y = min_y.min(table.y);
        max_x = max_x.max(table.x + width);
        max_y = max_y.max(table.y + height);
    }

    let mut bounds = ContentBounds {
        min_x: min_x - config.margin,
        min_y: min_y - config.margin,
        max_x: max_x + config.margin,
        max_y: max_y + config.margin,
    };

    if bounds.width() < config.min_span {
        bounds.max_x = bounds.min_x + config.min_span;
    }
    if bounds.height() < config.min_span {
        bounds.max_y = bounds.min_y + config.min_span;
    }

    bounds
}

pub(crate) fn table_size(value: f64, config: &GeometryConfig) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        config.default_table_size
    }
}

/// Scale mapping content units onto panel pixels.
///
/// `min(panel_width / content_width, panel_height / content_height, hard_cap)`,
/// clamped to [`MIN_SCALE`] when the result is zero, negative or not finite.
pub fn compute_scale_factor(
    bounds: &ContentBounds,
    panel_width: f64,
    panel_height: f64,
    hard_cap: f64,
) -> f64 {
    let scale = (panel_width / bounds.width())
        .min(panel_height / bounds.height())
        .min(hard_cap);
    clamp_scale(scale)
}

/// Replace a degenerate scale with [`MIN_SCALE`]
pub fn clamp_scale(scale: f64) -> f64 {
    if scale.is_finite() && scale >= MIN_SCALE {
        scale
    } else {
        tracing::debug!(scale, "Clamping degenerate overview scale");
        MIN_SCALE
    }
}
