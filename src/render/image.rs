//! Raster rendering of a schematic scene using tiny-skia
//!
//! Produces an RgbaImage for PNG export. Text is not rasterized; labels are
//! only present in SVG output.

use anyhow::Context;
use image::RgbaImage;
use image::imageops::FilterType;
use tiny_skia::{FillRule, LineCap, LineJoin, Paint, Path, PathBuilder, Pixmap, Stroke, Transform};

use super::Scene;
use super::geometry::{self, Segment, canvas, pin, shape, wire};
use crate::domain::{Bounds, Color, LayoutShape, ShapeKind, Size};

/// Largest pixmap side, including supersampling
const MAX_PIXMAP_SIDE: u32 = 16384;

/// Render the scene at viewport size. With `supersample > 1` the scene is
/// drawn at that multiple and scaled back down.
pub fn render_image(scene: &Scene, supersample: u32) -> anyhow::Result<RgbaImage> {
    let (width, height) = pixel_size(scene.viewport)?;
    let ss = supersample_for(width, height, supersample);
    let mut pixmap = Pixmap::new(width * ss, height * ss)
        .with_context(|| format!("Cannot allocate {}x{} pixmap", width * ss, height * ss))?;
    pixmap.fill(tiny_skia_color(canvas::BACKGROUND, 1.0));

    let t = scene.transform;
    let k = ss as f32;
    let ts = Transform::from_row(
        t.scale() * k,
        0.0,
        0.0,
        t.scale() * k,
        t.offset_x() * k,
        t.offset_y() * k,
    );
    draw_scene(&mut pixmap, scene, ts);

    let img = to_rgba_image(&pixmap);
    if ss == 1 {
        return Ok(img);
    }
    Ok(image::imageops::resize(&img, width, height, FilterType::Lanczos3))
}

/// Requested supersampling, lowered until the pixmap fits `MAX_PIXMAP_SIDE`
fn supersample_for(width: u32, height: u32, requested: u32) -> u32 {
    let requested = requested.clamp(1, 4);
    let fits = (MAX_PIXMAP_SIDE / width.max(height)).max(1);
    if requested > fits {
        log::warn!("Supersampling {width}x{height} by {requested} is too large, using {fits}");
        return fits;
    }
    requested
}

fn pixel_size(viewport: Size) -> anyhow::Result<(u32, u32)> {
    let w = viewport.width.round();
    let h = viewport.height.round();
    let max = MAX_PIXMAP_SIDE as f32;
    if !(w >= 1.0 && h >= 1.0 && w <= max && h <= max) {
        anyhow::bail!("Invalid image size {}x{}", viewport.width, viewport.height);
    }
    Ok((w as u32, h as u32))
}

/// Copy a pixmap out as straight-alpha RGBA
fn to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, px) in img.pixels_mut().zip(pixmap.pixels()) {
        let c = px.demultiply();
        *dst = image::Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    img
}

fn draw_scene(pixmap: &mut Pixmap, scene: &Scene, ts: Transform) {
    let logical = Size::logical();
    if let Some(rect) = tiny_skia::Rect::from_xywh(0.0, 0.0, logical.width, logical.height) {
        pixmap.fill_rect(rect, &paint(canvas::BACKGROUND, 1.0), ts, None);
    }

    // Dot grid
    let dot = paint(canvas::GRID_DOT_COLOR, 1.0);
    for p in geometry::grid_points(logical.width, logical.height) {
        if let Some(path) = PathBuilder::from_circle(p.x, p.y, canvas::GRID_DOT_RADIUS) {
            pixmap.fill_path(&path, &dot, FillRule::Winding, ts, None);
        }
    }

    for w in scene.schematic.wires() {
        let mut pb = PathBuilder::new();
        for line in w.path.subpaths() {
            let Some((first, rest)) = line.split_first() else {
                continue;
            };
            pb.move_to(first.x, first.y);
            for p in rest {
                pb.line_to(p.x, p.y);
            }
        }
        if let Some(path) = pb.finish() {
            pixmap.stroke_path(&path, &paint(w.color, 1.0), &stroke(wire::WIDTH), ts, None);
        }
    }

    for p in scene.schematic.pins() {
        let Some(host) = scene.schematic.shape(&p.host) else {
            continue;
        };
        draw_segments(pixmap, &[geometry::pin_stub(host, p)], p.net.color(), pin::STROKE, ts);
    }

    for s in scene.schematic.shapes() {
        let selected = scene.is_selected(&s.id);
        if selected {
            draw_glow(pixmap, s, ts);
        }
        draw_shape(pixmap, s, selected, ts);
        if scene.shows_indicator(s) {
            let c = geometry::indicator_center(s);
            if let Some(path) = PathBuilder::from_circle(c.x, c.y, shape::INDICATOR_RADIUS) {
                let fill = paint(s.color, shape::INDICATOR_OPACITY);
                pixmap.fill_path(&path, &fill, FillRule::Winding, ts, None);
            }
        }
    }
}

fn draw_glow(pixmap: &mut Pixmap, s: &LayoutShape, ts: Transform) {
    let b = geometry::glow_bounds(s);
    if let Some(path) = build_rounded_rect(b, shape::GLOW_RADIUS) {
        let fill = paint(s.color, shape::GLOW_OPACITY);
        pixmap.fill_path(&path, &fill, FillRule::Winding, ts, None);
    }
}

fn draw_shape(pixmap: &mut Pixmap, s: &LayoutShape, selected: bool, ts: Transform) {
    match s.kind {
        ShapeKind::Ic | ShapeKind::Connector => {
            let Some(path) = build_rounded_rect(s.bounds(), shape::CORNER_RADIUS) else {
                return;
            };
            pixmap.fill_path(
                &path,
                &paint(s.color, shape::FILL_OPACITY),
                FillRule::Winding,
                ts,
                None,
            );
            let (color, opacity, width) = geometry::outline_style(s.color, selected);
            pixmap.stroke_path(&path, &paint(color, opacity), &stroke(width), ts, None);
        }
        ShapeKind::Resistor => {
            let sym = geometry::resistor(s.bounds());
            draw_segments(pixmap, &sym.leads, s.color, shape::STROKE, ts);
            if let Some(body) = build_rounded_rect(sym.body, shape::RESISTOR_RADIUS) {
                let fill = paint(shape::RESISTOR_FILL, 1.0);
                pixmap.fill_path(&body, &fill, FillRule::Winding, ts, None);
                let width = if selected { shape::SELECTED_STROKE } else { shape::STROKE };
                pixmap.stroke_path(&body, &paint(s.color, 1.0), &stroke(width), ts, None);
            }
        }
        ShapeKind::Capacitor => {
            let sym = geometry::capacitor(s.bounds());
            draw_segments(pixmap, &sym.leads, s.color, shape::STROKE, ts);
            draw_segments(pixmap, &sym.plates, s.color, shape::PLATE_STROKE, ts);
        }
        ShapeKind::Led => {
            let sym = geometry::led(s.bounds());
            draw_segments(pixmap, &sym.leads, s.color, shape::STROKE, ts);
            let [a, b, c] = sym.triangle;
            let mut pb = PathBuilder::new();
            pb.move_to(a.x, a.y);
            pb.line_to(b.x, b.y);
            pb.line_to(c.x, c.y);
            pb.close();
            if let Some(path) = pb.finish() {
                let fill = paint(s.color, shape::LED_FILL_OPACITY);
                pixmap.fill_path(&path, &fill, FillRule::Winding, ts, None);
                pixmap.stroke_path(&path, &paint(s.color, 1.0), &stroke(shape::STROKE), ts, None);
            }
            draw_segments(pixmap, &[sym.bar], s.color, shape::PLATE_STROKE, ts);
        }
    }
}

fn draw_segments(
    pixmap: &mut Pixmap,
    segments: &[Segment],
    color: Color,
    width: f32,
    ts: Transform,
) {
    let mut pb = PathBuilder::new();
    for seg in segments {
        pb.move_to(seg.from.x, seg.from.y);
        pb.line_to(seg.to.x, seg.to.y);
    }
    if let Some(path) = pb.finish() {
        pixmap.stroke_path(&path, &paint(color, 1.0), &stroke(width), ts, None);
    }
}

/// Build a rectangle path with quadratic corners
fn build_rounded_rect(b: Bounds, radius: f32) -> Option<Path> {
    let r = radius.min(b.width * 0.5).min(b.height * 0.5).max(0.0);
    let (l, t, rt, bt) = (b.x, b.y, b.right(), b.bottom());

    let mut pb = PathBuilder::new();
    pb.move_to(l + r, t);
    pb.line_to(rt - r, t);
    pb.quad_to(rt, t, rt, t + r);
    pb.line_to(rt, bt - r);
    pb.quad_to(rt, bt, rt - r, bt);
    pb.line_to(l + r, bt);
    pb.quad_to(l, bt, l, bt - r);
    pb.line_to(l, t + r);
    pb.quad_to(l, t, l + r, t);
    pb.close();
    pb.finish()
}

fn tiny_skia_color(color: Color, opacity: f32) -> tiny_skia::Color {
    let [r, g, b, a] = color.to_rgba_u8(opacity);
    tiny_skia::Color::from_rgba8(r, g, b, a)
}

fn paint(color: Color, opacity: f32) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(tiny_skia_color(color, opacity));
    paint.anti_alias = true;
    paint
}

fn stroke(width: f32) -> Stroke {
    Stroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Selection, TransformEngine};
    use crate::schematic::{Schematic, builtin};

    fn scene<'a>(schematic: &'a Schematic, selected: Option<&'a str>) -> Scene<'a> {
        Scene {
            schematic,
            transform: TransformEngine::new().transform(),
            selected,
            viewport: Size::new(1100.0, 680.0),
            show_hint: false,
        }
    }

    fn pixel(img: &RgbaImage, x: u32, y: u32) -> [u8; 4] {
        img.get_pixel(x, y).0
    }

    #[test]
    fn test_image_matches_viewport() {
        let schematic = builtin::foc_driver().unwrap();
        let img = render_image(&scene(&schematic, None), 1).unwrap();
        assert_eq!(img.dimensions(), (1100, 680));
        // Bare canvas between grid dots
        assert_eq!(pixel(&img, 1010, 610), [0x08, 0x0c, 0x10, 0xff]);
    }

    #[test]
    fn test_ic_body_is_tinted() {
        let schematic = builtin::foc_driver().unwrap();
        let img = render_image(&scene(&schematic, None), 1).unwrap();
        let inside = pixel(&img, 491, 311);
        assert_ne!(inside, [0x08, 0x0c, 0x10, 0xff]);
        assert_eq!(inside[3], 0xff);
    }

    #[test]
    fn test_selection_draws_glow() {
        let schematic = builtin::foc_driver().unwrap();
        let plain = render_image(&scene(&schematic, None), 1).unwrap();
        let mut selection = Selection::default();
        selection.select("U1", schematic.registry());
        let glowing = render_image(&scene(&schematic, selection.selected_id()), 1).unwrap();
        // Just outside the U1 body, inside the glow
        assert_ne!(pixel(&plain, 378, 300), pixel(&glowing, 378, 300));
    }

    #[test]
    fn test_supersampled_keeps_size() {
        let schematic = builtin::foc_driver().unwrap();
        let img = render_image(&scene(&schematic, None), 2).unwrap();
        assert_eq!(img.dimensions(), (1100, 680));
    }

    #[test]
    fn test_supersampling_is_capped() {
        assert_eq!(supersample_for(1100, 680, 4), 4);
        assert_eq!(supersample_for(16384, 16384, 4), 1);
        assert_eq!(supersample_for(9000, 100, 2), 1);
        assert_eq!(supersample_for(5000, 300, 4), 3);
        assert_eq!(supersample_for(100, 100, 0), 1);
    }

    #[test]
    fn test_wide_viewport_renders_without_supersampling() {
        let schematic = builtin::foc_driver().unwrap();
        let mut scene = scene(&schematic, None);
        scene.viewport = Size::new(9000.0, 40.0);
        let img = render_image(&scene, 2).unwrap();
        assert_eq!(img.dimensions(), (9000, 40));
    }

    #[test]
    fn test_zero_viewport_is_an_error() {
        let schematic = builtin::foc_driver().unwrap();
        let mut scene = scene(&schematic, None);
        scene.viewport = Size::new(0.0, 10.0);
        assert!(render_image(&scene, 1).is_err());
    }
}
