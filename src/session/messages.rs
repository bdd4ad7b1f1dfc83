//! Message types for the viewer session
//!
//! Every input the host surface can deliver is one `ViewerMsg`. Gesture
//! scripts are JSON arrays of these messages.

use serde::{Deserialize, Serialize};

use crate::domain::Point;

/// One input event, in client coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ViewerMsg {
    /// Mouse button pressed over the canvas
    PointerDown { x: f32, y: f32 },
    /// Pointer moved
    PointerMove { x: f32, y: f32 },
    /// Mouse button released
    PointerUp,
    /// Pointer capture lost
    PointerCancel,
    /// Wheel notch at the cursor; positive `delta_y` scrolls away (zoom out)
    Wheel { x: f32, y: f32, delta_y: f32 },
    /// Active touch points moved
    TouchMove { touches: Vec<Point> },
    /// A touch ended
    TouchEnd,
    /// Click at a position, resolved by hit-testing
    Click { x: f32, y: f32 },
    /// Click on an element carrying a shape id
    Select { id: String },
    /// Info panel close control
    ClosePanel,
    /// Toolbar "+"
    ZoomIn,
    /// Toolbar "−"
    ZoomOut,
    /// Toolbar "Reset"
    Reset,
}

/// What a message changed, so the host knows whether to re-render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Change {
    #[default]
    None,
    /// Pan offset or zoom scale
    View,
    /// Selected component
    Selection,
}

impl Change {
    pub(crate) fn view(changed: bool) -> Self {
        if changed { Change::View } else { Change::None }
    }

    pub(crate) fn selection(changed: bool) -> Self {
        if changed {
            Change::Selection
        } else {
            Change::None
        }
    }

    pub fn needs_redraw(self) -> bool {
        self != Change::None
    }
}
