//! Handlers for viewer messages
//!
//! Gestures go to the transform engine, clicks to the selection. A
//! pointer-down on a selectable component never starts a pan, so the click
//! that follows it selects instead of dragging.

use crate::domain::Point;
use crate::schematic::HitTarget;

use super::messages::{Change, ViewerMsg};
use super::state::Viewer;

/// Dispatch one message
pub fn handle(viewer: &mut Viewer, msg: &ViewerMsg) -> Change {
    match *msg {
        ViewerMsg::PointerDown { x, y } => handle_pointer_down(viewer, Point::new(x, y)),
        ViewerMsg::PointerMove { x, y } => {
            Change::view(viewer.engine.update_pan(Point::new(x, y)))
        }
        ViewerMsg::PointerUp | ViewerMsg::PointerCancel => {
            viewer.engine.end_pan();
            Change::None
        }
        ViewerMsg::Wheel { x, y, delta_y } => handle_wheel(viewer, Point::new(x, y), delta_y),
        ViewerMsg::TouchMove { ref touches } => handle_touch_move(viewer, touches),
        ViewerMsg::TouchEnd => {
            viewer.engine.pinch_end();
            Change::None
        }
        ViewerMsg::Click { x, y } => handle_click(viewer, Point::new(x, y)),
        ViewerMsg::Select { ref id } => handle_select(viewer, id),
        ViewerMsg::ClosePanel => Change::selection(viewer.selection.clear()),
        ViewerMsg::ZoomIn => {
            let factor = viewer.options.button_zoom_in;
            handle_zoom_button(viewer, factor)
        }
        ViewerMsg::ZoomOut => {
            let factor = viewer.options.button_zoom_out;
            handle_zoom_button(viewer, factor)
        }
        ViewerMsg::Reset => Change::view(viewer.engine.reset()),
    }
}

fn handle_pointer_down(viewer: &mut Viewer, client: Point) -> Change {
    if !client.is_finite() {
        return Change::None;
    }
    if viewer.target_at(client).component().is_some() {
        // Leave the gesture to the click handler
        return Change::None;
    }
    viewer.engine.begin_pan(client);
    Change::None
}

fn handle_wheel(viewer: &mut Viewer, client: Point, delta_y: f32) -> Change {
    if delta_y.is_nan() {
        return Change::None;
    }
    let factor = if delta_y > 0.0 {
        viewer.options.wheel_zoom_out
    } else {
        viewer.options.wheel_zoom_in
    };
    let cursor = viewer.to_viewport(client);
    Change::view(viewer.engine.zoom_at(cursor, factor))
}

fn handle_touch_move(viewer: &mut Viewer, touches: &[Point]) -> Change {
    let [a, b] = touches else {
        return Change::None;
    };
    Change::view(viewer.engine.pinch_update(a.distance(*b)))
}

fn handle_click(viewer: &mut Viewer, client: Point) -> Change {
    if !client.is_finite() {
        return Change::None;
    }
    let target = match viewer.target_at(client) {
        HitTarget::Component(shape) => Some(shape.id.clone()),
        HitTarget::Empty => None,
        HitTarget::Decoration(_) | HitTarget::Wire(_) => return Change::None,
    };
    match target {
        Some(id) => handle_select(viewer, &id),
        None if viewer.options.clear_selection_on_empty_click => {
            Change::selection(viewer.selection.clear())
        }
        None => Change::None,
    }
}

fn handle_select(viewer: &mut Viewer, id: &str) -> Change {
    Change::selection(viewer.selection.select(id, viewer.schematic.registry()))
}

fn handle_zoom_button(viewer: &mut Viewer, factor: f32) -> Change {
    let pivot = viewer.options.zoom_button_pivot;
    let viewport = viewer.options.viewport;
    Change::view(viewer.engine.zoom_button(factor, pivot, viewport))
}
