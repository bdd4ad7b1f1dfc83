//! View transform engine: pan, zoom and pinch over the logical canvas
//!
//! The transform maps a logical point `p` to the screen point
//! `offset + p * scale`, with the screen origin at the viewport's top-left
//! corner. All gesture inputs are screen coordinates relative to that corner.
//!
//! Invalid input (NaN or infinite coordinates, non-positive factors) leaves
//! the state unchanged. Zoom requests past the scale bounds saturate.

use serde::{Deserialize, Serialize};

use super::geometry::{Point, Size};

/// Smallest allowed zoom factor
pub const MIN_SCALE: f32 = 0.3;
/// Largest allowed zoom factor
pub const MAX_SCALE: f32 = 4.0;

fn clamp_scale(scale: f32) -> f32 {
    scale.clamp(MIN_SCALE, MAX_SCALE)
}

/// Pan offset and zoom scale applied to the logical canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    offset_x: f32,
    offset_y: f32,
    scale: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ViewTransform {
    /// The initial view: no pan, scale 1
    pub const IDENTITY: ViewTransform = ViewTransform {
        offset_x: 0.0,
        offset_y: 0.0,
        scale: 1.0,
    };

    pub fn offset_x(&self) -> f32 {
        self.offset_x
    }

    pub fn offset_y(&self) -> f32 {
        self.offset_y
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Map a logical point to viewport coordinates
    pub fn to_screen(&self, logical: Point) -> Point {
        Point::new(
            self.offset_x + logical.x * self.scale,
            self.offset_y + logical.y * self.scale,
        )
    }

    /// Map a viewport point back to logical coordinates
    pub fn to_logical(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.offset_x) / self.scale,
            (screen.y - self.offset_y) / self.scale,
        )
    }
}

/// Where the toolbar zoom buttons zoom around
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ZoomPivot {
    /// Keep offsets, so the canvas grows from the viewport's top-left corner
    #[default]
    TopLeft,
    /// Keep the logical point at the viewport center fixed
    ViewportCenter,
}

/// Snapshot taken when a drag starts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    /// Pointer position at gesture start
    pub start: Point,
    /// Offsets at gesture start
    pub offset_x: f32,
    pub offset_y: f32,
}

/// Two-finger gesture in progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchState {
    /// Finger distance seen by the previous update
    pub previous_distance: f32,
}

/// Owns the view transform and the transient gesture state
#[derive(Debug, Clone, Default)]
pub struct TransformEngine {
    transform: ViewTransform,
    drag: Option<DragState>,
    pinch: Option<PinchState>,
}

impl TransformEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn is_pinching(&self) -> bool {
        self.pinch.is_some()
    }

    /// Start a drag at `screen`. Returns false when ignored (a drag is
    /// already active or the position is invalid).
    pub fn begin_pan(&mut self, screen: Point) -> bool {
        if self.drag.is_some() || !screen.is_finite() {
            return false;
        }
        self.drag = Some(DragState {
            start: screen,
            offset_x: self.transform.offset_x,
            offset_y: self.transform.offset_y,
        });
        true
    }

    /// Move the active drag to `screen`. Panning is unbounded.
    pub fn update_pan(&mut self, screen: Point) -> bool {
        let Some(drag) = self.drag else {
            return false;
        };
        if !screen.is_finite() {
            return false;
        }
        let next = ViewTransform {
            offset_x: drag.offset_x + (screen.x - drag.start.x),
            offset_y: drag.offset_y + (screen.y - drag.start.y),
            ..self.transform
        };
        self.replace(next)
    }

    /// Finish the active drag, if any
    pub fn end_pan(&mut self) {
        self.drag = None;
    }

    /// Zoom by `factor`, keeping the logical point under `cursor` fixed
    pub fn zoom_at(&mut self, cursor: Point, factor: f32) -> bool {
        if !cursor.is_finite() || !factor.is_finite() || factor <= 0.0 {
            return false;
        }
        let t = self.transform;
        let scale = clamp_scale(t.scale * factor);
        let ratio = scale / t.scale;
        self.replace(ViewTransform {
            offset_x: cursor.x - (cursor.x - t.offset_x) * ratio,
            offset_y: cursor.y - (cursor.y - t.offset_y) * ratio,
            scale,
        })
    }

    /// Toolbar zoom; see [`ZoomPivot`] for the pivot choice
    pub fn zoom_button(&mut self, factor: f32, pivot: ZoomPivot, viewport: Size) -> bool {
        match pivot {
            ZoomPivot::TopLeft => self.zoom_in_place(factor),
            ZoomPivot::ViewportCenter => self.zoom_at(viewport.center(), factor),
        }
    }

    /// Feed the current two-finger distance. The first call of a gesture only
    /// records the baseline; later calls scale in place by the distance ratio.
    pub fn pinch_update(&mut self, distance: f32) -> bool {
        if !distance.is_finite() || distance <= 0.0 {
            return false;
        }
        let previous = self.pinch.replace(PinchState {
            previous_distance: distance,
        });
        match previous {
            Some(p) => self.zoom_in_place(distance / p.previous_distance),
            None => false,
        }
    }

    /// Forget the pinch baseline
    pub fn pinch_end(&mut self) {
        self.pinch = None;
    }

    /// Back to the identity view
    pub fn reset(&mut self) -> bool {
        self.replace(ViewTransform::IDENTITY)
    }

    fn zoom_in_place(&mut self, factor: f32) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            return false;
        }
        self.replace(ViewTransform {
            scale: clamp_scale(self.transform.scale * factor),
            ..self.transform
        })
    }

    /// Install `next` unless it has a non-finite field
    fn replace(&mut self, next: ViewTransform) -> bool {
        if !(next.offset_x.is_finite() && next.offset_y.is_finite() && next.scale.is_finite()) {
            return false;
        }
        let changed = next != self.transform;
        self.transform = next;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f32 = 1e-3;

    fn assert_close(a: Point, b: Point) {
        assert!(
            (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS,
            "{a:?} != {b:?}"
        );
    }

    #[test]
    fn test_initial_transform_is_identity() {
        let engine = TransformEngine::new();
        assert_eq!(engine.transform(), ViewTransform::IDENTITY);
        assert!(!engine.is_dragging());
        assert!(!engine.is_pinching());
    }

    #[test]
    fn test_zoom_at_keeps_cursor_point() {
        let mut engine = TransformEngine::new();
        let cursor = Point::new(500.0, 300.0);
        let logical = engine.transform().to_logical(cursor);

        assert!(engine.zoom_at(cursor, 1.1));

        let t = engine.transform();
        assert!((t.scale() - 1.1).abs() < 1e-6);
        assert_close(t.to_screen(logical), cursor);
        assert!((t.offset_x() - -50.0).abs() < EPS);
        assert!((t.offset_y() - -30.0).abs() < EPS);
    }

    #[test]
    fn test_zoom_at_uses_applied_scale_when_clamped() {
        let mut engine = TransformEngine::new();
        let cursor = Point::new(200.0, 100.0);
        let logical = engine.transform().to_logical(cursor);

        engine.zoom_at(cursor, 100.0);

        let t = engine.transform();
        assert_eq!(t.scale(), MAX_SCALE);
        // The ratio uses the clamped scale, so the point stays put anyway
        assert_close(t.to_screen(logical), cursor);
    }

    #[test]
    fn test_zoom_at_saturated_bound_is_noop() {
        let mut engine = TransformEngine::new();
        engine.zoom_at(Point::new(10.0, 10.0), 0.01);
        let before = engine.transform();
        assert_eq!(before.scale(), MIN_SCALE);
        assert!(!engine.zoom_at(Point::new(700.0, 20.0), 0.5));
        assert_eq!(engine.transform(), before);
    }

    #[test]
    fn test_zoom_button_reaches_floor_exactly() {
        let mut engine = TransformEngine::new();
        let viewport = Size::new(960.0, 480.0);
        for _ in 0..20 {
            engine.zoom_button(0.9, ZoomPivot::TopLeft, viewport);
        }
        assert_eq!(engine.transform().scale(), MIN_SCALE);
        engine.zoom_button(0.9, ZoomPivot::TopLeft, viewport);
        assert_eq!(engine.transform().scale(), MIN_SCALE);
        assert_eq!(engine.transform().offset_x(), 0.0);
        assert_eq!(engine.transform().offset_y(), 0.0);
    }

    #[test]
    fn test_zoom_button_viewport_center_pivot() {
        let mut engine = TransformEngine::new();
        let viewport = Size::new(960.0, 480.0);
        let center = viewport.center();
        let logical = engine.transform().to_logical(center);

        engine.zoom_button(1.2, ZoomPivot::ViewportCenter, viewport);

        assert!((engine.transform().scale() - 1.2).abs() < 1e-6);
        assert_close(engine.transform().to_screen(logical), center);
    }

    #[test]
    fn test_pan_then_inverse_pan_returns_to_origin() {
        let mut engine = TransformEngine::new();
        engine.begin_pan(Point::new(0.0, 0.0));
        engine.update_pan(Point::new(37.5, -12.0));
        engine.end_pan();
        assert_eq!(engine.transform().offset_x(), 37.5);

        engine.begin_pan(Point::new(0.0, 0.0));
        engine.update_pan(Point::new(-37.5, 12.0));
        engine.end_pan();

        assert_eq!(engine.transform(), ViewTransform::IDENTITY);
    }

    #[test]
    fn test_pan_is_relative_to_drag_start() {
        let mut engine = TransformEngine::new();
        engine.begin_pan(Point::new(100.0, 100.0));
        engine.update_pan(Point::new(110.0, 90.0));
        engine.update_pan(Point::new(150.0, 160.0));
        let t = engine.transform();
        assert_eq!((t.offset_x(), t.offset_y()), (50.0, 60.0));
    }

    #[test]
    fn test_begin_pan_while_dragging_is_ignored() {
        let mut engine = TransformEngine::new();
        assert!(engine.begin_pan(Point::new(0.0, 0.0)));
        assert!(!engine.begin_pan(Point::new(500.0, 500.0)));
        engine.update_pan(Point::new(10.0, 0.0));
        assert_eq!(engine.transform().offset_x(), 10.0);
    }

    #[test]
    fn test_update_without_drag_and_end_pan_idempotent() {
        let mut engine = TransformEngine::new();
        assert!(!engine.update_pan(Point::new(40.0, 40.0)));
        engine.end_pan();
        engine.end_pan();
        assert_eq!(engine.transform(), ViewTransform::IDENTITY);
    }

    #[test]
    fn test_pan_is_unbounded() {
        let mut engine = TransformEngine::new();
        engine.begin_pan(Point::new(0.0, 0.0));
        engine.update_pan(Point::new(-50_000.0, 90_000.0));
        assert_eq!(engine.transform().offset_x(), -50_000.0);
        assert_eq!(engine.transform().offset_y(), 90_000.0);
    }

    #[test]
    fn test_pinch_baseline_then_ratio() {
        let mut engine = TransformEngine::new();
        assert!(!engine.pinch_update(100.0));
        assert_eq!(engine.transform().scale(), 1.0);
        assert!(engine.is_pinching());

        assert!(engine.pinch_update(150.0));
        assert!((engine.transform().scale() - 1.5).abs() < 1e-6);

        // Ratio is against the previous update, not the baseline
        engine.pinch_update(300.0);
        assert!((engine.transform().scale() - 3.0).abs() < 1e-5);
        assert_eq!(engine.transform().offset_x(), 0.0);

        engine.pinch_end();
        assert!(!engine.pinch_update(10.0));
        assert!((engine.transform().scale() - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_pinch_saturates() {
        let mut engine = TransformEngine::new();
        engine.pinch_update(10.0);
        engine.pinch_update(1000.0);
        assert_eq!(engine.transform().scale(), MAX_SCALE);
    }

    #[test]
    fn test_reset_from_any_state() {
        let mut engine = TransformEngine::new();
        engine.zoom_at(Point::new(3.0, 4.0), 2.5);
        engine.begin_pan(Point::new(0.0, 0.0));
        engine.update_pan(Point::new(-80.0, 20.0));
        assert!(engine.reset());
        assert_eq!(engine.transform(), ViewTransform::IDENTITY);
        assert!(!engine.reset());
    }

    #[test]
    fn test_invalid_input_is_ignored() {
        let mut engine = TransformEngine::new();
        engine.zoom_at(Point::new(100.0, 100.0), 1.5);
        let before = engine.transform();

        assert!(!engine.zoom_at(Point::new(f32::NAN, 0.0), 1.1));
        assert!(!engine.zoom_at(Point::new(0.0, 0.0), f32::INFINITY));
        assert!(!engine.zoom_at(Point::new(0.0, 0.0), 0.0));
        assert!(!engine.zoom_at(Point::new(0.0, 0.0), -2.0));
        assert!(!engine.begin_pan(Point::new(f32::NAN, 1.0)));
        assert!(!engine.pinch_update(f32::NAN));
        assert!(!engine.pinch_update(-3.0));
        assert!(!engine.zoom_button(f32::NAN, ZoomPivot::TopLeft, Size::new(1.0, 1.0)));

        engine.begin_pan(Point::new(0.0, 0.0));
        assert!(!engine.update_pan(Point::new(1.0, f32::INFINITY)));

        assert_eq!(engine.transform(), before);
    }

    #[test]
    fn test_overflowing_gesture_is_ignored() {
        let mut engine = TransformEngine::new();
        assert!(engine.begin_pan(Point::new(3e38, 0.0)));
        assert!(!engine.update_pan(Point::new(-3e38, 0.0)));
        assert_eq!(engine.transform(), ViewTransform::IDENTITY);

        engine.end_pan();
        engine.begin_pan(Point::new(0.0, 0.0));
        engine.update_pan(Point::new(-3e38, 0.0));
        let panned = engine.transform();
        assert!(!engine.zoom_at(Point::new(3e38, 0.0), 1.1));
        assert_eq!(engine.transform(), panned);
        assert!(engine.transform().to_logical(Point::new(10.0, 10.0)).is_finite());
    }

    #[test]
    fn test_to_logical_inverts_to_screen() {
        let mut engine = TransformEngine::new();
        engine.zoom_at(Point::new(120.0, 80.0), 2.0);
        let t = engine.transform();
        let p = Point::new(455.0, 312.0);
        assert_close(t.to_logical(t.to_screen(p)), p);
    }

    proptest! {
        #[test]
        fn prop_scale_stays_in_bounds(
            steps in proptest::collection::vec(
                ((-2000.0f32..2000.0), (-2000.0f32..2000.0), (0.05f32..20.0)),
                1..60,
            )
        ) {
            let mut engine = TransformEngine::new();
            for (x, y, factor) in steps {
                engine.zoom_at(Point::new(x, y), factor);
                let s = engine.transform().scale();
                prop_assert!((MIN_SCALE..=MAX_SCALE).contains(&s));
            }
        }

        #[test]
        fn prop_zoom_keeps_point_under_cursor(
            pan_x in -500.0f32..500.0,
            pan_y in -500.0f32..500.0,
            cx in 0.0f32..1200.0,
            cy in 0.0f32..800.0,
            factor in 0.8f32..1.25,
        ) {
            let mut engine = TransformEngine::new();
            engine.begin_pan(Point::new(0.0, 0.0));
            engine.update_pan(Point::new(pan_x, pan_y));
            engine.end_pan();

            let cursor = Point::new(cx, cy);
            let logical = engine.transform().to_logical(cursor);
            engine.zoom_at(cursor, factor);
            let after = engine.transform().to_screen(logical);

            prop_assert!((after.x - cursor.x).abs() < 0.05);
            prop_assert!((after.y - cursor.y).abs() < 0.05);
        }
    }
}
