use crate::config::ViewerConfig;
use crate::domain::{
    ComponentInfo, Point, Selection, Size, TransformEngine, ViewTransform, ZoomPivot,
};
use crate::schematic::{HitTarget, Schematic};

use super::handlers;
use super::messages::{Change, ViewerMsg};

/// Interaction settings taken from the config
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerOptions {
    pub viewport: Size,
    /// Viewport top-left corner in client coordinates
    pub origin: Point,
    pub wheel_zoom_in: f32,
    pub wheel_zoom_out: f32,
    pub button_zoom_in: f32,
    pub button_zoom_out: f32,
    pub zoom_button_pivot: ZoomPivot,
    pub clear_selection_on_empty_click: bool,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self::from(&ViewerConfig::default())
    }
}

impl From<&ViewerConfig> for ViewerOptions {
    fn from(config: &ViewerConfig) -> Self {
        Self {
            viewport: config.viewport_size(),
            origin: config.viewport_origin(),
            wheel_zoom_in: config.wheel_zoom_in,
            wheel_zoom_out: config.wheel_zoom_out,
            button_zoom_in: config.button_zoom_in,
            button_zoom_out: config.button_zoom_out,
            zoom_button_pivot: config.zoom_button_pivot,
            clear_selection_on_empty_click: config.clear_selection_on_empty_click,
        }
    }
}

/// One interactive viewer over a schematic
///
/// Owns the transform engine and the selection exclusively; both are only
/// reachable through [`Viewer::update`].
#[derive(Debug, Clone)]
pub struct Viewer {
    pub(super) schematic: Schematic,
    pub(super) engine: TransformEngine,
    pub(super) selection: Selection,
    pub(super) options: ViewerOptions,
}

impl Viewer {
    pub fn new(schematic: Schematic, options: ViewerOptions) -> Self {
        Self {
            schematic,
            engine: TransformEngine::new(),
            selection: Selection::default(),
            options,
        }
    }

    /// Apply one message and report what changed
    pub fn update(&mut self, msg: ViewerMsg) -> Change {
        let change = handlers::handle(self, &msg);
        if change.needs_redraw() {
            log::debug!("{msg:?} -> {change:?}");
        } else {
            log::trace!("{msg:?} ignored");
        }
        change
    }

    pub fn schematic(&self) -> &Schematic {
        &self.schematic
    }

    pub fn options(&self) -> &ViewerOptions {
        &self.options
    }

    pub fn transform(&self) -> ViewTransform {
        self.engine.transform()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_dragging(&self) -> bool {
        self.engine.is_dragging()
    }

    /// Info panel content for the current selection
    pub fn current_info(&self) -> Option<&ComponentInfo> {
        self.selection.current(self.schematic.registry())
    }

    /// Convert a client position to viewport coordinates
    pub fn to_viewport(&self, client: Point) -> Point {
        Point::new(client.x - self.options.origin.x, client.y - self.options.origin.y)
    }

    /// What lies under a client position
    pub fn target_at(&self, client: Point) -> HitTarget<'_> {
        let logical = self.engine.transform().to_logical(self.to_viewport(client));
        self.schematic.hit_test(logical)
    }
}
