//! Shared geometry for schematic rendering
//!
//! This module contains constants and symbol math shared between
//! SVG output and image rendering (tiny-skia).

use crate::domain::{Bounds, Color, LayoutShape, PinLabel, PinSide, Point};

/// Canvas background and dot grid
pub mod canvas {
    use crate::domain::Color;

    pub const BACKGROUND: Color = Color::rgb(0x08, 0x0c, 0x10);
    /// Spacing of the background dot grid in logical units
    pub const GRID_SPACING: f32 = 20.0;
    pub const GRID_DOT_RADIUS: f32 = 0.8;
    pub const GRID_DOT_COLOR: Color = Color::rgb(0x1e, 0x29, 0x3b);
}

/// Wire strokes
pub mod wire {
    pub const WIDTH: f32 = 1.5;
}

/// Component shapes, labels, selection glow and indicator dot
pub mod shape {
    use crate::domain::Color;

    pub const STROKE: f32 = 1.5;
    pub const SELECTED_STROKE: f32 = 2.0;
    /// Plate stroke of capacitor symbols
    pub const PLATE_STROKE: f32 = 2.0;
    pub const CORNER_RADIUS: f32 = 4.0;
    /// Fill opacity of boxed shapes (0x18)
    pub const FILL_OPACITY: f32 = 24.0 / 255.0;
    /// Outline opacity of unselected boxed shapes (0x80)
    pub const OUTLINE_OPACITY: f32 = 128.0 / 255.0;
    pub const RESISTOR_FILL: Color = Color::rgb(0x1c, 0x10, 0x08);
    pub const RESISTOR_LEAD: f32 = 6.0;
    pub const RESISTOR_RADIUS: f32 = 2.0;
    /// Half distance between capacitor plates
    pub const PLATE_GAP: f32 = 5.0;
    /// Half size of the LED triangle
    pub const LED_HALF: f32 = 8.0;
    pub const LED_FILL_OPACITY: f32 = 0.3;
    pub const GLOW_PAD: f32 = 4.0;
    pub const GLOW_RADIUS: f32 = 6.0;
    pub const GLOW_OPACITY: f32 = 0.15;
    pub const INDICATOR_RADIUS: f32 = 3.0;
    /// Distance of the indicator dot from the top-right corner
    pub const INDICATOR_INSET: f32 = 6.0;
    pub const INDICATOR_OPACITY: f32 = 0.7;
    pub const REF_LABEL_DY: f32 = 14.0;
    pub const REF_FONT_SIZE: f32 = 10.0;
    pub const VALUE_LABEL_DY: f32 = 26.0;
    pub const VALUE_LINE_HEIGHT: f32 = 12.0;
    pub const VALUE_FONT_SIZE: f32 = 8.0;
    pub const VALUE_COLOR: Color = Color::rgb(0x94, 0xa3, 0xb8);
}

/// IC pin stubs and labels
pub mod pin {
    pub const STUB_LENGTH: f32 = 10.0;
    pub const STROKE: f32 = 1.2;
    pub const FONT_SIZE: f32 = 7.5;
    /// Label baseline above the stub
    pub const LABEL_DY: f32 = 2.0;
}

/// Free-standing net labels
pub mod net_label {
    pub const FONT_SIZE: f32 = 9.0;
    pub const OPACITY: f32 = 0.7;
}

/// Usage hint in the viewport corner
pub mod hint {
    pub const TEXT: &str = "scroll to zoom · drag to pan · click component for info";
    pub const FONT_SIZE: f32 = 10.0;
    pub const MARGIN_X: f32 = 12.0;
    pub const MARGIN_Y: f32 = 8.0;
}

/// A straight line between two logical points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

impl Segment {
    pub const fn new(from: Point, to: Point) -> Self {
        Self { from, to }
    }
}

/// Resistor symbol: two leads and a rounded body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResistorSymbol {
    pub leads: [Segment; 2],
    pub body: Bounds,
}

/// Horizontal resistor filling `b`
pub fn resistor(b: Bounds) -> ResistorSymbol {
    let mid = b.y + b.height * 0.5;
    let lead = shape::RESISTOR_LEAD;
    ResistorSymbol {
        leads: [
            Segment::new(Point::new(b.x, mid), Point::new(b.x + lead, mid)),
            Segment::new(Point::new(b.right() - lead, mid), Point::new(b.right(), mid)),
        ],
        body: Bounds::new(b.x + lead, b.y + 2.0, b.width - lead * 2.0, b.height - 4.0),
    }
}

/// Capacitor symbol: two leads and two plates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapacitorSymbol {
    pub leads: [Segment; 2],
    pub plates: [Segment; 2],
}

/// Vertical capacitor filling `b`
pub fn capacitor(b: Bounds) -> CapacitorSymbol {
    let cx = b.x + b.width * 0.5;
    let mid = b.y + b.height * 0.5;
    let gap = shape::PLATE_GAP;
    let plate = |y: f32| Segment::new(Point::new(b.x + 2.0, y), Point::new(b.right() - 2.0, y));
    CapacitorSymbol {
        leads: [
            Segment::new(Point::new(cx, b.y), Point::new(cx, mid - gap)),
            Segment::new(Point::new(cx, mid + gap), Point::new(cx, b.bottom())),
        ],
        plates: [plate(mid - gap), plate(mid + gap)],
    }
}

/// Diode symbol: triangle pointing right, cathode bar, two leads
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LedSymbol {
    pub triangle: [Point; 3],
    pub bar: Segment,
    pub leads: [Segment; 2],
}

/// LED centred in `b`
pub fn led(b: Bounds) -> LedSymbol {
    let c = b.center();
    let h = shape::LED_HALF;
    LedSymbol {
        triangle: [
            Point::new(c.x - h, c.y - h),
            Point::new(c.x - h, c.y + h),
            Point::new(c.x + h, c.y),
        ],
        bar: Segment::new(Point::new(c.x + h, c.y - h), Point::new(c.x + h, c.y + h)),
        leads: [
            Segment::new(Point::new(b.x, c.y), Point::new(c.x - h, c.y)),
            Segment::new(Point::new(c.x + h, c.y), Point::new(b.right(), c.y)),
        ],
    }
}

/// Box drawn behind a selected shape
pub fn glow_bounds(s: &LayoutShape) -> Bounds {
    s.bounds().inflate(shape::GLOW_PAD)
}

/// Centre of the "has info" dot
pub fn indicator_center(s: &LayoutShape) -> Point {
    let b = s.bounds();
    Point::new(b.right() - shape::INDICATOR_INSET, b.y + shape::INDICATOR_INSET)
}

/// Anchor (horizontal centre, baseline) of the reference label
pub fn ref_label_anchor(s: &LayoutShape) -> Point {
    Point::new(s.x + s.width * 0.5, s.y + shape::REF_LABEL_DY)
}

/// Anchor of the `line`-th value label line
pub fn value_label_anchor(s: &LayoutShape, line: usize) -> Point {
    Point::new(
        s.x + s.width * 0.5,
        s.y + shape::VALUE_LABEL_DY + line as f32 * shape::VALUE_LINE_HEIGHT,
    )
}

/// Stub line of a pin on its host's edge, drawn outward from the body
pub fn pin_stub(host: &LayoutShape, p: &PinLabel) -> Segment {
    let len = pin::STUB_LENGTH;
    match p.side {
        PinSide::Left => Segment::new(Point::new(host.x - len, p.y), Point::new(host.x, p.y)),
        PinSide::Right => {
            let x = host.x + host.width;
            Segment::new(Point::new(x, p.y), Point::new(x + len, p.y))
        }
    }
}

/// Label anchor of a pin: midway along the stub, just above it
pub fn pin_label_anchor(host: &LayoutShape, p: &PinLabel) -> Point {
    let stub = pin_stub(host, p);
    Point::new((stub.from.x + stub.to.x) * 0.5, p.y - pin::LABEL_DY)
}

/// Dot grid positions covering the logical canvas
pub fn grid_points(width: f32, height: f32) -> impl Iterator<Item = Point> {
    let step = canvas::GRID_SPACING;
    let cols = (width / step).floor() as u32;
    let rows = (height / step).floor() as u32;
    (0..=rows).flat_map(move |r| {
        (0..=cols).map(move |c| Point::new(c as f32 * step, r as f32 * step))
    })
}

/// Outline color and width of a boxed shape
pub fn outline_style(color: Color, selected: bool) -> (Color, f32, f32) {
    if selected {
        (color, 1.0, shape::SELECTED_STROKE)
    } else {
        (color, shape::OUTLINE_OPACITY, shape::STROKE)
    }
}
