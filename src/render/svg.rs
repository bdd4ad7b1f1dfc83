//! SVG output of a schematic scene
//!
//! The document is viewport-sized; the schematic sits in a group carrying
//! the view transform, so the file matches what the viewer shows.

use std::borrow::Cow;
use std::fmt::{self, Write};

use super::Scene;
use super::geometry::{self, Segment, canvas, hint, net_label, pin, shape, wire};
use crate::domain::{Color, LayoutShape, PinSide, ShapeKind, Size};

const FONT_FAMILY: &str = "ui-monospace, monospace";

/// Render the scene as a standalone SVG document
pub fn render_svg(scene: &Scene) -> anyhow::Result<String> {
    let mut out = String::new();
    write_document(&mut out, scene).map_err(|_| anyhow::anyhow!("Failed to format SVG"))?;
    Ok(out)
}

fn write_document(out: &mut String, scene: &Scene) -> fmt::Result {
    let Size { width, height } = scene.viewport;
    let t = scene.transform;
    let logical = Size::logical();

    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" font-family="{FONT_FAMILY}">"#
    )?;
    writeln!(out, "<title>{}</title>", escape(scene.schematic.name()))?;
    writeln!(
        out,
        r#"<defs><pattern id="grid" width="{s}" height="{s}" patternUnits="userSpaceOnUse"><circle cx="0" cy="0" r="{r}" fill="{c}"/></pattern></defs>"#,
        s = canvas::GRID_SPACING,
        r = canvas::GRID_DOT_RADIUS,
        c = canvas::GRID_DOT_COLOR,
    )?;
    writeln!(
        out,
        r#"<rect width="{width}" height="{height}" fill="{}"/>"#,
        canvas::BACKGROUND
    )?;
    writeln!(
        out,
        r#"<g transform="translate({} {}) scale({})">"#,
        t.offset_x(),
        t.offset_y(),
        t.scale()
    )?;
    writeln!(
        out,
        r#"<rect width="{}" height="{}" fill="url(#grid)"/>"#,
        logical.width, logical.height
    )?;

    for w in scene.schematic.wires() {
        write!(
            out,
            r#"<path d="{}" fill="none" stroke="{}" stroke-width="{}" stroke-linecap="round" stroke-linejoin="round""#,
            escape(w.path.source()),
            w.color,
            wire::WIDTH
        )?;
        match &w.label {
            Some(label) => writeln!(out, "><title>{}</title></path>", escape(label))?,
            None => writeln!(out, "/>")?,
        }
    }

    for l in scene.schematic.net_labels() {
        writeln!(
            out,
            r#"<text x="{}" y="{}" font-size="{}" fill="{}" opacity="{}">{}</text>"#,
            l.x,
            l.y,
            net_label::FONT_SIZE,
            l.color,
            net_label::OPACITY,
            escape(&l.text)
        )?;
    }

    for p in scene.schematic.pins() {
        let Some(host) = scene.schematic.shape(&p.host) else {
            continue;
        };
        let color = p.net.color();
        write_segment(out, geometry::pin_stub(host, p), color, pin::STROKE)?;
        let anchor = geometry::pin_label_anchor(host, p);
        let text_anchor = match p.side {
            PinSide::Left => "end",
            PinSide::Right => "start",
        };
        writeln!(
            out,
            r#"<text x="{}" y="{}" font-size="{}" fill="{color}" text-anchor="{text_anchor}">{}</text>"#,
            anchor.x,
            anchor.y,
            pin::FONT_SIZE,
            escape(&p.label)
        )?;
    }

    for s in scene.schematic.shapes() {
        write_shape(out, scene, s)?;
    }

    writeln!(out, "</g>")?;

    if scene.show_hint {
        writeln!(
            out,
            r#"<text x="{}" y="{}" font-size="{}" fill="{}" text-anchor="end">{}</text>"#,
            width - hint::MARGIN_X,
            height - hint::MARGIN_Y,
            hint::FONT_SIZE,
            shape::VALUE_COLOR,
            escape(hint::TEXT)
        )?;
    }
    writeln!(out, "</svg>")
}

fn write_shape(out: &mut String, scene: &Scene, s: &LayoutShape) -> fmt::Result {
    let selected = scene.is_selected(&s.id);
    let interactive = scene.schematic.is_interactive(s);
    let class = match (interactive, selected) {
        (true, true) => "component selected",
        (true, false) => "component",
        (false, _) => "decoration",
    };
    writeln!(out, r#"<g data-comp="{}" class="{class}">"#, escape(&s.id))?;

    if selected {
        let g = geometry::glow_bounds(s);
        writeln!(
            out,
            r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}" fill="{}" opacity="{}"/>"#,
            g.x,
            g.y,
            g.width,
            g.height,
            shape::GLOW_RADIUS,
            s.color,
            shape::GLOW_OPACITY
        )?;
    }

    match s.kind {
        ShapeKind::Ic | ShapeKind::Connector => {
            let (color, opacity, width) = geometry::outline_style(s.color, selected);
            writeln!(
                out,
                r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}" fill="{}" fill-opacity="{:.3}" stroke="{color}" stroke-opacity="{:.3}" stroke-width="{width}"/>"#,
                s.x,
                s.y,
                s.width,
                s.height,
                shape::CORNER_RADIUS,
                s.color,
                shape::FILL_OPACITY,
                opacity
            )?;
        }
        ShapeKind::Resistor => {
            let sym = geometry::resistor(s.bounds());
            for lead in sym.leads {
                write_segment(out, lead, s.color, shape::STROKE)?;
            }
            let width = if selected { shape::SELECTED_STROKE } else { shape::STROKE };
            writeln!(
                out,
                r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}" fill="{}" stroke="{}" stroke-width="{width}"/>"#,
                sym.body.x,
                sym.body.y,
                sym.body.width,
                sym.body.height,
                shape::RESISTOR_RADIUS,
                shape::RESISTOR_FILL,
                s.color
            )?;
        }
        ShapeKind::Capacitor => {
            let sym = geometry::capacitor(s.bounds());
            for lead in sym.leads {
                write_segment(out, lead, s.color, shape::STROKE)?;
            }
            for plate in sym.plates {
                write_segment(out, plate, s.color, shape::PLATE_STROKE)?;
            }
        }
        ShapeKind::Led => {
            let sym = geometry::led(s.bounds());
            for lead in sym.leads {
                write_segment(out, lead, s.color, shape::STROKE)?;
            }
            let [a, b, c] = sym.triangle;
            writeln!(
                out,
                r#"<polygon points="{},{} {},{} {},{}" fill="{}" fill-opacity="{}" stroke="{}" stroke-width="{}"/>"#,
                a.x,
                a.y,
                b.x,
                b.y,
                c.x,
                c.y,
                s.color,
                shape::LED_FILL_OPACITY,
                s.color,
                shape::STROKE
            )?;
            write_segment(out, sym.bar, s.color, shape::PLATE_STROKE)?;
        }
    }

    if s.kind.is_boxed() {
        let r = geometry::ref_label_anchor(s);
        writeln!(
            out,
            r#"<text x="{}" y="{}" font-size="{}" font-weight="bold" fill="{}" text-anchor="middle">{}</text>"#,
            r.x,
            r.y,
            shape::REF_FONT_SIZE,
            s.color,
            escape(&s.label_ref)
        )?;
        for (i, line) in s.value_lines().enumerate() {
            let v = geometry::value_label_anchor(s, i);
            writeln!(
                out,
                r#"<text x="{}" y="{}" font-size="{}" fill="{}" text-anchor="middle">{}</text>"#,
                v.x,
                v.y,
                shape::VALUE_FONT_SIZE,
                shape::VALUE_COLOR,
                escape(line)
            )?;
        }
    } else {
        // Discrete parts carry a single label beside the symbol
        let text = match s.value_lines().next() {
            Some(value) => format!("{} {}", s.label_ref, value),
            None => s.label_ref.clone(),
        };
        writeln!(
            out,
            r#"<text x="{}" y="{}" font-size="{}" fill="{}">{}</text>"#,
            s.x + s.width + 4.0,
            s.y + s.height * 0.5 + 3.0,
            shape::VALUE_FONT_SIZE,
            s.color,
            escape(&text)
        )?;
    }

    if scene.shows_indicator(s) {
        let c = geometry::indicator_center(s);
        writeln!(
            out,
            r#"<circle cx="{}" cy="{}" r="{}" fill="{}" opacity="{}"/>"#,
            c.x,
            c.y,
            shape::INDICATOR_RADIUS,
            s.color,
            shape::INDICATOR_OPACITY
        )?;
    }
    writeln!(out, "</g>")
}

fn write_segment(out: &mut String, seg: Segment, color: Color, width: f32) -> fmt::Result {
    writeln!(
        out,
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{color}" stroke-width="{width}" stroke-linecap="round"/>"#,
        seg.from.x, seg.from.y, seg.to.x, seg.to.y
    )
}

/// Escape text for use in SVG content and attributes
pub fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Point, TransformEngine};
    use crate::schematic::builtin;

    fn render(selected: Option<&str>, engine: &TransformEngine, show_hint: bool) -> String {
        let schematic = builtin::foc_driver().unwrap();
        let scene = Scene {
            schematic: &schematic,
            transform: engine.transform(),
            selected,
            viewport: Size::new(960.0, 480.0),
            show_hint,
        };
        render_svg(&scene).unwrap()
    }

    #[test]
    fn test_document_shape() {
        let svg = render(None, &TransformEngine::new(), true);
        assert!(svg.starts_with("<svg "));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains(r#"width="960" height="480""#));
        assert!(svg.contains(r#"<g transform="translate(0 0) scale(1)">"#));
        assert!(svg.contains("scroll to zoom · drag to pan · click component for info"));
        assert!(svg.contains(r#"data-comp="U1""#));
        assert!(svg.contains(">DRV8313PWP</text>"));
    }

    #[test]
    fn test_transform_is_applied_to_group() {
        let mut engine = TransformEngine::new();
        engine.begin_pan(Point::new(0.0, 0.0));
        engine.update_pan(Point::new(-40.0, 25.0));
        engine.zoom_at(Point::new(0.0, 0.0), 2.0);
        let svg = render(None, &engine, false);
        assert!(svg.contains(r#"<g transform="translate(-80 50) scale(2)">"#));
        assert!(!svg.contains("scroll to zoom"));
    }

    #[test]
    fn test_selection_glow_replaces_indicator() {
        let idle = render(None, &TransformEngine::new(), false);
        let selected = render(Some("U1"), &TransformEngine::new(), false);
        assert!(!idle.contains("component selected"));
        assert!(selected.contains(r#"<g data-comp="U1" class="component selected">"#));
        assert!(selected.contains(r#"<rect x="376" y="106" width="228" height="408" rx="6""#));
        // U1's indicator dot at (594, 116) disappears while selected
        assert!(idle.contains(r#"<circle cx="594" cy="116""#));
        assert!(!selected.contains(r#"<circle cx="594" cy="116""#));
    }

    #[test]
    fn test_pins_are_labelled() {
        let svg = render(None, &TransformEngine::new(), false);
        assert!(svg.contains(r#"x1="370""#));
        assert!(svg.contains(r#"text-anchor="end">INH1</text>"#));
    }

    #[test]
    fn test_escape() {
        assert!(matches!(escape("1kΩ"), Cow::Borrowed(_)));
        assert_eq!(escape(r#"<a & "b">"#), "&lt;a &amp; &quot;b&quot;&gt;");
    }
}
