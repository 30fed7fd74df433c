//! Overview panel ("minimap") driver
//!
//! The panel has two pointer regions: a title strip (chrome) that drags the
//! panel around the screen, and a content area where a click recenters the
//! seating canvas. Canvas notifications arrive through a
//! [`CanvasSubscription`] held for as long as the panel is attached.

use serde::{Deserialize, Serialize};

use crate::canvas::{CanvasSubscription, CanvasSurface};
use crate::config::PlannerConfig;
use crate::geometry::Rect;
use crate::models::Table;
use crate::viewport::{ScrollTarget, TableGlyph, ViewportProjector, ViewportRect};

/// Screen position of the panel's top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Part of the panel a screen point falls on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelRegion {
    Chrome,
    Content,
    Outside,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
    Click,
}

/// Pointer input in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub x: f64,
    pub y: f64,
}

impl PointerEvent {
    pub const fn new(kind: PointerKind, x: f64, y: f64) -> Self {
        Self { kind, x, y }
    }
}

/// What the panel did with a pointer event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelResponse {
    Ignored,
    DragStarted,
    Moved(Point),
    DragEnded,
    Navigated(ScrollTarget),
}

/// Everything needed to draw the panel
#[derive(Debug, Clone, PartialEq)]
pub enum OverviewRender {
    /// Only the re-show affordance is drawn
    Hidden { position: Point },
    Visible(OverviewFrame),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverviewFrame {
    pub position: Point,
    /// Content area, relative to the panel position
    pub content: Rect,
    pub tables: Vec<TableGlyph>,
    pub viewport: ViewportRect,
}

#[derive(Debug, Clone, Copy)]
struct PanelDrag {
    pointer_start: Point,
    panel_start: Point,
}

pub struct OverviewPanel {
    width: f64,
    height: f64,
    chrome_height: f64,
    visible: bool,
    position: Point,
    drag: Option<PanelDrag>,
    projector: ViewportProjector,
    subscription: Option<CanvasSubscription>,
    /// Set when changes were skipped while hidden
    stale: bool,
}

impl OverviewPanel {
    pub fn new(config: &PlannerConfig) -> Self {
        let overview = &config.overview;
        Self {
            width: overview.width,
            height: overview.height,
            chrome_height: overview.chrome_height.max(0.0),
            visible: overview.visible,
            position: Point::new(overview.x, overview.y),
            drag: None,
            projector: ViewportProjector::new(config.geometry.clone(), overview),
            subscription: None,
            stale: true,
        }
    }

    /// Start listening to the canvas and take an initial reading
    pub fn attach<C: CanvasSurface>(&mut self, tables: &[Table], canvas: &mut C) {
        if self.subscription.is_none() {
            self.subscription = Some(canvas.events().subscribe());
        }
        self.refresh(tables, canvas);
    }

    /// Stop listening to the canvas
    pub fn detach<C: CanvasSurface>(&mut self, canvas: &mut C) {
        if let Some(subscription) = self.subscription.take() {
            canvas.events().unsubscribe(subscription);
        }
        self.drag = None;
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub fn projector(&self) -> &ViewportProjector {
        &self.projector
    }

    /// Flip visibility. Showing the panel catches up on anything skipped while hidden.
    pub fn toggle<C: CanvasSurface>(&mut self, tables: &[Table], canvas: &C) -> bool {
        self.set_visible(!self.visible, tables, canvas);
        self.visible
    }

    pub fn set_visible<C: CanvasSurface>(&mut self, visible: bool, tables: &[Table], canvas: &C) {
        self.visible = visible;
        if visible {
            self.refresh(tables, canvas);
        } else {
            self.drag = None;
        }
        tracing::debug!(visible, "Overview visibility changed");
    }

    /// Recompute bounds, scale and viewport from scratch
    pub fn refresh<C: CanvasSurface>(&mut self, tables: &[Table], canvas: &C) {
        if let Some(subscription) = &self.subscription {
            subscription.drain();
        }
        if !self.visible {
            self.stale = true;
            return;
        }
        self.projector.set_tables(tables);
        self.projector.set_canvas(canvas.metrics());
        self.stale = false;
    }

    /// The table set changed
    pub fn tables_changed(&mut self, tables: &[Table]) {
        if !self.visible {
            self.stale = true;
            return;
        }
        self.projector.set_tables(tables);
    }

    /// Apply pending canvas notifications.
    ///
    /// Any number of queued scroll/resize/zoom events collapse into a single
    /// reading of the current metrics. Returns whether the viewport was
    /// recomputed.
    pub fn sync<C: CanvasSurface>(&mut self, canvas: &C) -> bool {
        let pending = match &self.subscription {
            Some(subscription) => subscription.drain(),
            None => return false,
        };
        if pending.is_empty() {
            return false;
        }
        if !self.visible {
            self.stale = true;
            return false;
        }
        if pending.len() > 1 {
            tracing::debug!(coalesced = pending.len(), "Coalesced canvas events");
        }
        self.projector.set_canvas(canvas.metrics());
        true
    }

    /// Whether a refresh is owed from changes skipped while hidden
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Which part of the panel a screen point falls on
    pub fn hit_test(&self, x: f64, y: f64) -> PanelRegion {
        let chrome = Rect::new(self.position.x, self.position.y, self.width, self.chrome_height);
        if chrome.contains(x, y) {
            return PanelRegion::Chrome;
        }
        if self.content_rect().contains(x, y) {
            return PanelRegion::Content;
        }
        PanelRegion::Outside
    }

    /// Content area in screen coordinates
    fn content_rect(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y + self.chrome_height,
            self.width,
            self.height,
        )
    }

    /// Route a pointer event to self-drag or click-to-navigate
    pub fn handle_pointer<C: CanvasSurface>(
        &mut self,
        event: PointerEvent,
        canvas: &mut C,
    ) -> PanelResponse {
        if !self.visible {
            return PanelResponse::Ignored;
        }
        let pointer = Point::new(event.x, event.y);

        match (event.kind, self.drag) {
            (PointerKind::Move, Some(drag)) => {
                self.position = Point::new(
                    drag.panel_start.x + (pointer.x - drag.pointer_start.x),
                    drag.panel_start.y + (pointer.y - drag.pointer_start.y),
                );
                PanelResponse::Moved(self.position)
            }
            (PointerKind::Up, Some(_)) => {
                self.drag = None;
                tracing::debug!(x = self.position.x, y = self.position.y, "Overview moved");
                PanelResponse::DragEnded
            }
            (_, Some(_)) => PanelResponse::Ignored,
            (PointerKind::Down, None) if self.hit_test(event.x, event.y) == PanelRegion::Chrome => {
                self.drag = Some(PanelDrag {
                    pointer_start: pointer,
                    panel_start: self.position,
                });
                PanelResponse::DragStarted
            }
            (PointerKind::Click, None)
                if self.hit_test(event.x, event.y) == PanelRegion::Content =>
            {
                let content = self.content_rect();
                let target = self
                    .projector
                    .scroll_target(event.x - content.x, event.y - content.y);
                canvas.scroll_to(target);
                self.sync(canvas);

                // report where the canvas actually landed after its own clamping
                let metrics = canvas.metrics();
                let landed = ScrollTarget {
                    x: metrics.scroll_x,
                    y: metrics.scroll_y,
                };
                tracing::debug!(x = landed.x, y = landed.y, "Overview navigation");
                PanelResponse::Navigated(landed)
            }
            _ => PanelResponse::Ignored,
        }
    }

    /// Drawing data for the current state
    pub fn render(&self, tables: &[Table]) -> OverviewRender {
        if !self.visible {
            return OverviewRender::Hidden {
                position: self.position,
            };
        }

        OverviewRender::Visible(OverviewFrame {
            position: self.position,
            content: Rect::new(0.0, self.chrome_height, self.width, self.height),
            tables: tables.iter().map(|t| self.projector.project_table(t)).collect(),
            viewport: self.projector.viewport(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::VirtualCanvas;
    use crate::config::CanvasConfig;
    use crate::models::TableId;

    fn setup() -> (OverviewPanel, VirtualCanvas, Vec<Table>) {
        let config = PlannerConfig::default();
        let mut canvas = VirtualCanvas::new(CanvasConfig::default(), 800.0, 600.0);
        let tables = vec![
            Table::new(TableId(1), 4, 0.0, 0.0),
            Table::new(TableId(2), 8, 2500.0, 1200.0),
        ];
        let mut panel = OverviewPanel::new(&config);
        panel.attach(&tables, &mut canvas);
        (panel, canvas, tables)
    }

    #[test]
    fn test_attach_and_detach() {
        let (mut panel, mut canvas, _) = setup();
        assert!(panel.is_attached());
        assert_eq!(canvas.events().listener_count(), 1);

        panel.detach(&mut canvas);
        assert!(!panel.is_attached());
        assert_eq!(canvas.events().listener_count(), 0);
    }

    #[test]
    fn test_dropping_panel_releases_subscription() {
        let (panel, mut canvas, _) = setup();
        drop(panel);
        canvas.scroll_by(5.0, 5.0);
        assert_eq!(canvas.events().listener_count(), 0);
    }

    #[test]
    fn test_sync_coalesces_scrolls() {
        let (mut panel, mut canvas, _) = setup();
        let before = panel.projector().viewport();

        canvas.scroll_by(100.0, 0.0);
        canvas.scroll_by(100.0, 0.0);
        canvas.scroll_by(100.0, 50.0);
        assert!(panel.sync(&canvas));
        assert!(!panel.sync(&canvas));

        let after = panel.projector().viewport();
        let scale = panel.projector().scale();
        assert!((after.x - before.x - 300.0 * scale).abs() < 1e-9);
        assert!((after.y - before.y - 50.0 * scale).abs() < 1e-9);
    }

    #[test]
    fn test_chrome_drag_moves_panel() {
        let (mut panel, mut canvas, _) = setup();
        let start = panel.position();

        let down = PointerEvent::new(PointerKind::Down, start.x + 10.0, start.y + 5.0);
        assert_eq!(panel.handle_pointer(down, &mut canvas), PanelResponse::DragStarted);
        assert!(panel.is_dragging());

        let moved = PointerEvent::new(PointerKind::Move, start.x + 60.0, start.y + 105.0);
        assert_eq!(
            panel.handle_pointer(moved, &mut canvas),
            PanelResponse::Moved(Point::new(start.x + 50.0, start.y + 100.0))
        );

        // a click while dragging never navigates
        let click = PointerEvent::new(PointerKind::Click, start.x + 60.0, start.y + 105.0);
        assert_eq!(panel.handle_pointer(click, &mut canvas), PanelResponse::Ignored);

        let up = PointerEvent::new(PointerKind::Up, start.x + 60.0, start.y + 105.0);
        assert_eq!(panel.handle_pointer(up, &mut canvas), PanelResponse::DragEnded);
        assert!(!panel.is_dragging());
        assert_eq!(panel.position(), Point::new(start.x + 50.0, start.y + 100.0));
    }

    #[test]
    fn test_content_down_does_not_drag() {
        let (mut panel, mut canvas, _) = setup();
        let pos = panel.position();
        let down = PointerEvent::new(PointerKind::Down, pos.x + 10.0, pos.y + 100.0);
        assert_eq!(panel.handle_pointer(down, &mut canvas), PanelResponse::Ignored);
        assert!(!panel.is_dragging());
    }

    #[test]
    fn test_click_navigates_canvas() {
        let (mut panel, mut canvas, tables) = setup();
        let pos = panel.position();
        let content_top = pos.y + PlannerConfig::default().overview.chrome_height;

        // click on the projected center of table 2
        let glyph = panel.projector().project_table(&tables[1]);
        let click = PointerEvent::new(
            PointerKind::Click,
            pos.x + glyph.rect.x + glyph.rect.width / 2.0,
            content_top + glyph.rect.y + glyph.rect.height / 2.0,
        );

        let response = panel.handle_pointer(click, &mut canvas);
        let PanelResponse::Navigated(target) = response else {
            panic!("expected navigation, got {:?}", response);
        };

        let metrics = canvas.metrics();
        assert_eq!(metrics.scroll_x, target.x);
        assert_eq!(metrics.scroll_y, target.y);
        // the canvas view is now centered on the table
        let center_x = metrics.scroll_x + metrics.view_width / 2.0;
        let center_y = metrics.scroll_y + metrics.view_height / 2.0;
        assert!((center_x - 2650.0).abs() < 1.0);
        assert!((center_y - 1350.0).abs() < 1.0);
        // the viewport outline followed
        assert_eq!(panel.projector().metrics().scroll_x, metrics.scroll_x);
    }

    #[test]
    fn test_navigation_reports_clamped_scroll() {
        let (mut panel, mut canvas, _) = setup();
        let pos = panel.position();
        let content_top = pos.y + PlannerConfig::default().overview.chrome_height;

        // top-left corner of the content maps to a negative scroll target
        let click = PointerEvent::new(PointerKind::Click, pos.x + 1.0, content_top + 1.0);
        let response = panel.handle_pointer(click, &mut canvas);
        assert_eq!(response, PanelResponse::Navigated(ScrollTarget { x: 0.0, y: 0.0 }));
        assert_eq!(canvas.metrics().scroll_x, 0.0);
        assert_eq!(canvas.metrics().scroll_y, 0.0);
    }

    #[test]
    fn test_chrome_click_does_not_navigate() {
        let (mut panel, mut canvas, _) = setup();
        let pos = panel.position();
        let click = PointerEvent::new(PointerKind::Click, pos.x + 5.0, pos.y + 5.0);
        assert_eq!(panel.handle_pointer(click, &mut canvas), PanelResponse::Ignored);
        assert_eq!(canvas.metrics().scroll_x, 0.0);
    }

    #[test]
    fn test_hidden_panel_skips_work() {
        let (mut panel, mut canvas, tables) = setup();
        assert!(!panel.toggle(&tables, &canvas));

        canvas.scroll_by(400.0, 400.0);
        assert!(!panel.sync(&canvas));
        assert!(panel.is_stale());
        assert!(matches!(panel.render(&tables), OverviewRender::Hidden { .. }));

        let pos = panel.position();
        let down = PointerEvent::new(PointerKind::Down, pos.x + 5.0, pos.y + 5.0);
        assert_eq!(panel.handle_pointer(down, &mut canvas), PanelResponse::Ignored);

        assert!(panel.toggle(&tables, &canvas));
        assert!(!panel.is_stale());
        assert_eq!(panel.projector().metrics().scroll_x, 400.0);
    }

    #[test]
    fn test_render_frame() {
        let (panel, _canvas, tables) = setup();
        let OverviewRender::Visible(frame) = panel.render(&tables) else {
            panic!("panel should be visible");
        };
        assert_eq!(frame.tables.len(), 2);
        assert_eq!(frame.tables[0].id, TableId(1));
        assert_eq!(frame.content.y, PlannerConfig::default().overview.chrome_height);
        assert!(frame.viewport.width > 0.0);
    }

    #[test]
    fn test_hit_test_regions() {
        let (panel, _canvas, _) = setup();
        let pos = panel.position();
        assert_eq!(panel.hit_test(pos.x + 1.0, pos.y + 1.0), PanelRegion::Chrome);
        assert_eq!(panel.hit_test(pos.x + 1.0, pos.y + 50.0), PanelRegion::Content);
        assert_eq!(panel.hit_test(pos.x - 1.0, pos.y + 50.0), PanelRegion::Outside);
    }
}
