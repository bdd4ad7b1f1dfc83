//! A validated schematic: component registry plus drawable layout
//!
//! The data is authored once (built in, or loaded from a JSON file) and never
//! changes at runtime. Validation happens when the schematic is built so a
//! clickable shape can never end up without an info entry.

pub mod builtin;
pub mod file;

use std::collections::HashSet;

use anyhow::bail;

use crate::domain::{
    Bounds, ComponentInfo, ComponentRegistry, LayoutShape, NetLabel, PinLabel, Point, Size, Wire,
};

pub use file::SchematicFile;

/// Distance in logical units within which a click counts as hitting a wire
pub const WIRE_HIT_SLOP: f32 = 3.0;

/// What lies under a logical point
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitTarget<'a> {
    /// A shape with component info
    Component(&'a LayoutShape),
    /// A shape without component info
    Decoration(&'a LayoutShape),
    /// A wire, by index
    Wire(usize),
    /// Bare canvas
    Empty,
}

impl<'a> HitTarget<'a> {
    /// The component under the point, if it can be selected
    pub fn component(&self) -> Option<&'a LayoutShape> {
        match self {
            HitTarget::Component(shape) => Some(shape),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Schematic {
    name: String,
    registry: ComponentRegistry,
    shapes: Vec<LayoutShape>,
    wires: Vec<Wire>,
    net_labels: Vec<NetLabel>,
    pins: Vec<PinLabel>,
}

impl Schematic {
    /// Build and validate a schematic. Structural problems are errors; data
    /// that is merely unreachable is logged as a warning.
    pub fn new(
        name: impl Into<String>,
        components: Vec<ComponentInfo>,
        shapes: Vec<LayoutShape>,
        wires: Vec<Wire>,
        net_labels: Vec<NetLabel>,
        pins: Vec<PinLabel>,
    ) -> anyhow::Result<Self> {
        let name = name.into();
        let registry = ComponentRegistry::new(components).inspect_err(|err| {
            log::error!("schematic {name:?}: {err}");
        })?;
        let schematic = Self {
            name,
            registry,
            shapes,
            wires,
            net_labels,
            pins,
        };
        if let Err(err) = schematic.validate() {
            log::error!("schematic {:?}: {err}", schematic.name);
            return Err(err);
        }
        for finding in schematic.findings() {
            log::warn!("schematic {:?}: {finding}", schematic.name);
        }
        Ok(schematic)
    }

    fn validate(&self) -> anyhow::Result<()> {
        let mut ids = HashSet::new();
        for shape in &self.shapes {
            if shape.id.trim().is_empty() {
                bail!("shape at ({}, {}) has an empty id", shape.x, shape.y);
            }
            if !ids.insert(shape.id.as_str()) {
                bail!("duplicate shape id {:?}", shape.id);
            }
            let b = shape.bounds();
            let finite = [b.x, b.y, b.width, b.height].iter().all(|v| v.is_finite());
            if !finite || b.width <= 0.0 || b.height <= 0.0 {
                bail!("shape {:?} has invalid geometry {b:?}", shape.id);
            }
            if shape.clickable && !self.registry.contains(&shape.id) {
                bail!("clickable shape {:?} has no component info", shape.id);
            }
        }
        for pin in &self.pins {
            if !ids.contains(pin.host.as_str()) {
                bail!("pin {:?} refers to unknown shape {:?}", pin.label, pin.host);
            }
            if !pin.y.is_finite() {
                bail!("pin {:?} has a non-finite position", pin.label);
            }
        }
        for label in &self.net_labels {
            if !label.x.is_finite() || !label.y.is_finite() {
                bail!("net label {:?} has a non-finite position", label.text);
            }
        }
        Ok(())
    }

    /// Non-fatal problems: info nobody can open, shapes off the canvas
    pub fn findings(&self) -> Vec<String> {
        let canvas = Bounds::new(0.0, 0.0, Size::logical().width, Size::logical().height);
        let mut findings = Vec::new();
        for info in self.registry.iter() {
            let shown = self
                .shapes
                .iter()
                .any(|s| s.clickable && s.id == info.reference);
            if !shown {
                findings.push(format!(
                    "component {:?} has info but no clickable shape",
                    info.reference
                ));
            }
        }
        for shape in &self.shapes {
            if !shape.bounds().is_within(&canvas) {
                findings.push(format!("shape {:?} extends past the canvas", shape.id));
            }
        }
        findings
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Shapes in draw order (later shapes are on top)
    pub fn shapes(&self) -> &[LayoutShape] {
        &self.shapes
    }

    pub fn wires(&self) -> &[Wire] {
        &self.wires
    }

    pub fn net_labels(&self) -> &[NetLabel] {
        &self.net_labels
    }

    pub fn pins(&self) -> &[PinLabel] {
        &self.pins
    }

    pub fn shape(&self, id: &str) -> Option<&LayoutShape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    /// A shape is interactive when clicking it opens an info panel
    pub fn is_interactive(&self, shape: &LayoutShape) -> bool {
        shape.clickable && self.registry.contains(&shape.id)
    }

    /// Resolve what is under a logical point, topmost shape first
    pub fn hit_test(&self, logical: Point) -> HitTarget<'_> {
        if !logical.is_finite() {
            return HitTarget::Empty;
        }
        if let Some(shape) = self
            .shapes
            .iter()
            .rev()
            .find(|s| s.bounds().contains_point(logical))
        {
            return if self.is_interactive(shape) {
                HitTarget::Component(shape)
            } else {
                HitTarget::Decoration(shape)
            };
        }
        let on_wire = self.wires.iter().position(|wire| {
            wire.path.subpaths().iter().any(|line| {
                line.windows(2)
                    .any(|seg| logical.distance_to_segment(seg[0], seg[1]) <= WIRE_HIT_SLOP)
            })
        });
        match on_wire {
            Some(i) => HitTarget::Wire(i),
            None => HitTarget::Empty,
        }
    }
}
