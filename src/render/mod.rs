//! Schematic rendering
//!
//! This module contains:
//! - Geometry shared between the SVG and raster renderers
//! - SVG scene output
//! - Raster output using tiny-skia (for PNG export)
//! - Plain-text info panel

pub mod geometry;
pub mod image;
pub mod panel;
pub mod svg;

use crate::domain::{Size, ViewTransform};
use crate::schematic::Schematic;
use crate::session::Viewer;

/// Everything a renderer needs: static data plus the current view state
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub schematic: &'a Schematic,
    pub transform: ViewTransform,
    /// Id of the selected shape
    pub selected: Option<&'a str>,
    /// Viewport size in screen pixels
    pub viewport: Size,
    /// Whether to draw the usage hint
    pub show_hint: bool,
}

impl<'a> Scene<'a> {
    /// Snapshot the viewer's current state
    pub fn from_viewer(viewer: &'a Viewer, show_hint: bool) -> Self {
        Self {
            schematic: viewer.schematic(),
            transform: viewer.transform(),
            selected: viewer.selection().selected_id(),
            viewport: viewer.options().viewport,
            show_hint,
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected == Some(id)
    }

    /// Whether a shape shows the "has info" dot (interactive, not selected)
    pub fn shows_indicator(&self, shape: &crate::domain::LayoutShape) -> bool {
        self.schematic.is_interactive(shape) && !self.is_selected(&shape.id)
    }
}
