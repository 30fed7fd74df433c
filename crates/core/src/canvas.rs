//! Seating canvas collaborator
//!
//! The canvas owns scroll position, visible size and zoom. Observers learn
//! about changes through [`CanvasEvents`]; a [`CanvasSubscription`] stays
//! registered exactly as long as it is alive.

use std::sync::mpsc::{self, Receiver, Sender};

use crate::config::CanvasConfig;
use crate::viewport::{CanvasMetrics, ScrollTarget};

/// Kind of change the canvas reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasEvent {
    Scrolled,
    Resized,
    Zoomed,
}

/// Scrollable, zoomable canvas the overview panel keeps in sync with
pub trait CanvasSurface {
    /// Current scroll, size and zoom
    fn metrics(&self) -> CanvasMetrics;

    /// Jump to a scroll position
    fn scroll_to(&mut self, target: ScrollTarget);

    /// Change notification hub
    fn events(&mut self) -> &mut CanvasEvents;
}

/// Fan-out of canvas change notifications to live subscriptions
#[derive(Debug, Default)]
pub struct CanvasEvents {
    next_id: u64,
    listeners: Vec<(u64, Sender<CanvasEvent>)>,
}

impl CanvasEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Dropping the returned guard unsubscribes it.
    pub fn subscribe(&mut self) -> CanvasSubscription {
        let (tx, rx) = mpsc::channel();
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push((id, tx));
        tracing::debug!(subscription = id, "Canvas listener subscribed");
        CanvasSubscription { id, rx }
    }

    /// Remove a listener immediately rather than at the next notification
    pub fn unsubscribe(&mut self, subscription: CanvasSubscription) {
        self.listeners.retain(|(id, _)| *id != subscription.id);
        tracing::debug!(subscription = subscription.id, "Canvas listener unsubscribed");
    }

    /// Deliver an event to every live listener, pruning dropped ones
    pub fn notify(&mut self, event: CanvasEvent) {
        self.listeners.retain(|(_, tx)| tx.send(event).is_ok());
    }

    /// Number of listeners still registered
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

/// Scoped registration with a [`CanvasEvents`] hub
#[derive(Debug)]
pub struct CanvasSubscription {
    id: u64,
    rx: Receiver<CanvasEvent>,
}

impl CanvasSubscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Drain pending notifications without blocking
    pub fn drain(&self) -> Vec<CanvasEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }
}

/// In-memory canvas used by the planner shell and in tests
#[derive(Debug)]
pub struct VirtualCanvas {
    config: CanvasConfig,
    metrics: CanvasMetrics,
    events: CanvasEvents,
}

impl VirtualCanvas {
    pub fn new(config: CanvasConfig, view_width: f64, view_height: f64) -> Self {
        Self {
            config,
            metrics: CanvasMetrics {
                scroll_x: 0.0,
                scroll_y: 0.0,
                view_width,
                view_height,
                zoom: 1.0,
            },
            events: CanvasEvents::new(),
        }
    }

    /// Scroll by a delta in canvas units
    pub fn scroll_by(&mut self, dx: f64, dy: f64) {
        self.scroll_to(ScrollTarget {
            x: self.metrics.scroll_x + dx,
            y: self.metrics.scroll_y + dy,
        });
    }

    /// Change the visible size
    pub fn resize(&mut self, view_width: f64, view_height: f64) {
        if !(view_width.is_finite() && view_height.is_finite()) {
            tracing::debug!(view_width, view_height, "Ignoring non-finite canvas size");
            return;
        }
        self.metrics.view_width = view_width.max(0.0);
        self.metrics.view_height = view_height.max(0.0);
        self.events.notify(CanvasEvent::Resized);
    }

    /// Wheel zoom around a pointer position given in view pixels.
    ///
    /// Positive notches zoom in. The canvas point under the pointer stays put.
    pub fn wheel_zoom(&mut self, notches: f64, pointer_x: f64, pointer_y: f64) {
        if !(notches.is_finite() && pointer_x.is_finite() && pointer_y.is_finite()) {
            tracing::debug!(notches, pointer_x, pointer_y, "Ignoring non-finite wheel input");
            return;
        }
        let old_zoom = self.metrics.zoom;
        let new_zoom = (old_zoom * (1.0 + self.config.wheel_step * notches))
            .clamp(self.config.min_zoom, self.config.max_zoom);
        if (new_zoom - old_zoom).abs() < f64::EPSILON {
            return;
        }

        let anchor_x = self.metrics.scroll_x + pointer_x / old_zoom;
        let anchor_y = self.metrics.scroll_y + pointer_y / old_zoom;
        self.metrics.zoom = new_zoom;
        self.metrics.scroll_x = (anchor_x - pointer_x / new_zoom).max(0.0);
        self.metrics.scroll_y = (anchor_y - pointer_y / new_zoom).max(0.0);
        self.events.notify(CanvasEvent::Zoomed);
    }
}

impl CanvasSurface for VirtualCanvas {
    fn metrics(&self) -> CanvasMetrics {
        self.metrics
    }

    fn scroll_to(&mut self, target: ScrollTarget) {
        if !(target.x.is_finite() && target.y.is_finite()) {
            tracing::debug!(x = target.x, y = target.y, "Ignoring non-finite scroll target");
            return;
        }
        // scroll position never goes negative
        self.metrics.scroll_x = target.x.max(0.0);
        self.metrics.scroll_y = target.y.max(0.0);
        self.events.notify(CanvasEvent::Scrolled);
    }

    fn events(&mut self) -> &mut CanvasEvents {
        &mut self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscription_receives_events() {
        let mut canvas = VirtualCanvas::new(CanvasConfig::default(), 800.0, 600.0);
        let sub = canvas.events().subscribe();

        canvas.scroll_by(10.0, 20.0);
        canvas.resize(400.0, 300.0);

        assert_eq!(sub.drain(), vec![CanvasEvent::Scrolled, CanvasEvent::Resized]);
        assert!(sub.drain().is_empty());
    }

    #[test]
    fn test_dropped_subscription_is_pruned() {
        let mut canvas = VirtualCanvas::new(CanvasConfig::default(), 800.0, 600.0);
        let sub = canvas.events().subscribe();
        let _other = canvas.events().subscribe();
        assert_eq!(canvas.events().listener_count(), 2);

        drop(sub);
        canvas.scroll_by(1.0, 1.0);
        assert_eq!(canvas.events().listener_count(), 1);
    }

    #[test]
    fn test_explicit_unsubscribe() {
        let mut canvas = VirtualCanvas::new(CanvasConfig::default(), 800.0, 600.0);
        let sub = canvas.events().subscribe();
        canvas.events().unsubscribe(sub);
        assert_eq!(canvas.events().listener_count(), 0);
    }

    #[test]
    fn test_scroll_clamped_non_negative() {
        let mut canvas = VirtualCanvas::new(CanvasConfig::default(), 800.0, 600.0);
        canvas.scroll_to(ScrollTarget { x: -50.0, y: 30.0 });
        let m = canvas.metrics();
        assert_eq!(m.scroll_x, 0.0);
        assert_eq!(m.scroll_y, 30.0);
    }

    #[test]
    fn test_wheel_zoom_keeps_anchor() {
        let mut canvas = VirtualCanvas::new(CanvasConfig::default(), 800.0, 600.0);
        canvas.scroll_to(ScrollTarget { x: 1000.0, y: 1000.0 });

        let before = canvas.metrics();
        let anchor_x = before.scroll_x + 400.0 / before.zoom;

        canvas.wheel_zoom(2.0, 400.0, 300.0);
        let after = canvas.metrics();
        assert!(after.zoom > before.zoom);
        assert!((after.scroll_x + 400.0 / after.zoom - anchor_x).abs() < 1e-9);
    }

    #[test]
    fn test_wheel_zoom_clamped() {
        let config = CanvasConfig {
            min_zoom: 0.5,
            max_zoom: 1.5,
            wheel_step: 0.5,
        };
        let mut canvas = VirtualCanvas::new(config, 800.0, 600.0);
        let sub = canvas.events().subscribe();

        for _ in 0..10 {
            canvas.wheel_zoom(1.0, 0.0, 0.0);
        }
        assert_eq!(canvas.metrics().zoom, 1.5);

        // only real changes notify
        assert_eq!(sub.drain(), vec![CanvasEvent::Zoomed]);
    }

    #[test]
    fn test_non_finite_input_ignored() {
        let mut canvas = VirtualCanvas::new(CanvasConfig::default(), 800.0, 600.0);
        let sub = canvas.events().subscribe();

        canvas.wheel_zoom(f64::NAN, 0.0, 0.0);
        canvas.wheel_zoom(1.0, f64::INFINITY, 0.0);
        canvas.scroll_by(f64::INFINITY, 0.0);
        canvas.scroll_to(ScrollTarget { x: 10.0, y: f64::NAN });
        canvas.resize(f64::INFINITY, 300.0);
        assert!(sub.drain().is_empty());
        assert_eq!(canvas.metrics(), VirtualCanvas::new(CanvasConfig::default(), 800.0, 600.0).metrics());

        // later valid input still works
        canvas.wheel_zoom(2.0, 0.0, 0.0);
        canvas.wheel_zoom(2.0, 0.0, 0.0);
        let m = canvas.metrics();
        assert!(m.zoom.is_finite() && m.zoom > 1.0);
        canvas.scroll_by(25.0, 0.0);
        assert_eq!(canvas.metrics().scroll_x, 25.0);
    }
}
