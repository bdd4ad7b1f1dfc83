//! Drawable layout: shapes, wires, net labels and IC pins
//!
//! Everything is in logical canvas coordinates.

use serde::{Deserialize, Serialize};

use super::color::Color;
use super::geometry::{Bounds, Point};

/// Symbol used to draw a shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    /// Integrated circuit (outlined box)
    Ic,
    Resistor,
    Capacitor,
    Led,
    /// Header or terminal block (outlined box)
    Connector,
}

impl ShapeKind {
    /// Kinds drawn as a plain outlined box
    pub fn is_boxed(self) -> bool {
        matches!(self, ShapeKind::Ic | ShapeKind::Connector)
    }
}

fn default_clickable() -> bool {
    true
}

/// A component symbol placed on the canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutShape {
    /// Unique id; equals a registry reference when the shape is clickable
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: Color,
    pub kind: ShapeKind,
    /// Reference label drawn at the top of the symbol
    pub label_ref: String,
    /// Value label, `\n` separates lines
    #[serde(default)]
    pub label_value: String,
    /// Whether clicking the shape opens its info panel
    #[serde(default = "default_clickable")]
    pub clickable: bool,
}

impl LayoutShape {
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.width, self.height)
    }

    /// Value label split into display lines
    pub fn value_lines(&self) -> impl Iterator<Item = &str> {
        self.label_value.split('\n').filter(|l| !l.is_empty())
    }
}

/// Parsed SVG path data, kept alongside its source text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PathData {
    source: String,
    subpaths: Vec<Vec<Point>>,
}

impl PathData {
    /// Parse absolute/relative `M`, `L`, `H`, `V` and `Z` commands
    pub fn parse(source: &str) -> anyhow::Result<Self> {
        let subpaths = parse_polylines(source)?;
        Ok(Self {
            source: source.to_string(),
            subpaths,
        })
    }

    /// Original path string (the SVG `d` attribute)
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Polylines, one per `M` command
    pub fn subpaths(&self) -> &[Vec<Point>] {
        &self.subpaths
    }
}

impl TryFrom<String> for PathData {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        PathData::parse(&value).map_err(|e| e.to_string())
    }
}

impl From<PathData> for String {
    fn from(p: PathData) -> Self {
        p.source
    }
}

/// A decorative wire path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wire {
    #[serde(rename = "d")]
    pub path: PathData,
    pub color: Color,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Free-standing net name drawn on the canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetLabel {
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub color: Color,
}

/// Net class of an IC pin, which decides its stub color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetClass {
    Pwm,
    En,
    Ctrl,
    Phase,
    Pwr,
    Gnd,
    Fault,
}

impl NetClass {
    pub fn color(self) -> Color {
        match self {
            NetClass::Pwm => Color::rgb(0x94, 0xa3, 0xb8),
            NetClass::En => Color::rgb(0x64, 0x74, 0x8b),
            NetClass::Ctrl | NetClass::Gnd => Color::rgb(0x6b, 0x72, 0x80),
            NetClass::Phase => Color::rgb(0x22, 0xd3, 0xee),
            NetClass::Pwr => Color::rgb(0xef, 0x44, 0x44),
            NetClass::Fault => Color::rgb(0xf4, 0x3f, 0x5e),
        }
    }
}

/// Which edge of the host IC a pin sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinSide {
    Left,
    Right,
}

/// A labelled pin stub on the edge of an IC shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinLabel {
    /// Id of the shape the pin belongs to
    pub host: String,
    pub side: PinSide,
    pub y: f32,
    pub label: String,
    pub net: NetClass,
}

fn parse_polylines(source: &str) -> anyhow::Result<Vec<Vec<Point>>> {
    let tokens = tokenize(source)?;
    let mut subpaths: Vec<Vec<Point>> = Vec::new();
    let mut current: Vec<Point> = Vec::new();
    let mut pen = Point::default();
    let mut start = Point::default();
    let mut command: Option<char> = None;
    let mut i = 0;

    let number = |i: &mut usize| -> anyhow::Result<f32> {
        match tokens.get(*i) {
            Some(Token::Number(n)) => {
                *i += 1;
                Ok(*n)
            }
            _ => anyhow::bail!("path {source:?}: expected a number"),
        }
    };

    while i < tokens.len() {
        if let Token::Command(c) = tokens[i] {
            command = Some(c);
            i += 1;
            if matches!(c, 'Z' | 'z') {
                if let Some(&first) = current.first() {
                    current.push(first);
                }
                pen = start;
                continue;
            }
        }
        let Some(c) = command else {
            anyhow::bail!("path {source:?} must start with a command");
        };
        let relative = c.is_ascii_lowercase();
        let origin = if relative { pen } else { Point::default() };
        match c.to_ascii_uppercase() {
            'M' => {
                let p = Point::new(origin.x + number(&mut i)?, origin.y + number(&mut i)?);
                if current.len() > 1 {
                    subpaths.push(std::mem::take(&mut current));
                } else {
                    current.clear();
                }
                current.push(p);
                pen = p;
                start = p;
                // Extra coordinate pairs after a move are implicit line-tos
                command = Some(if relative { 'l' } else { 'L' });
            }
            'L' => {
                let p = Point::new(origin.x + number(&mut i)?, origin.y + number(&mut i)?);
                current.push(p);
                pen = p;
            }
            'H' => {
                let x = number(&mut i)?;
                pen = Point::new(if relative { pen.x + x } else { x }, pen.y);
                current.push(pen);
            }
            'V' => {
                let y = number(&mut i)?;
                pen = Point::new(pen.x, if relative { pen.y + y } else { y });
                current.push(pen);
            }
            'Z' => anyhow::bail!("path {source:?}: unexpected number after close"),
            other => anyhow::bail!("path {source:?}: unsupported command {other:?}"),
        }
    }

    if current.len() > 1 {
        subpaths.push(current);
    }
    if subpaths.is_empty() {
        anyhow::bail!("path {source:?} draws nothing");
    }
    if subpaths.iter().flatten().any(|p| !p.is_finite()) {
        anyhow::bail!("path {source:?} has non-finite coordinates");
    }
    Ok(subpaths)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Command(char),
    Number(f32),
}

fn tokenize(source: &str) -> anyhow::Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();
    while let Some(&(start, c)) = chars.peek() {
        if c.is_whitespace() || c == ',' {
            chars.next();
        } else if c.is_ascii_alphabetic() && !matches!(c, 'e' | 'E') {
            tokens.push(Token::Command(c));
            chars.next();
        } else if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') {
            let mut end = start;
            let mut prev = None;
            while let Some(&(idx, d)) = chars.peek() {
                let sign_ok = matches!(d, '-' | '+')
                    && (idx == start || matches!(prev, Some('e' | 'E')));
                if d.is_ascii_digit() || d == '.' || matches!(d, 'e' | 'E') || sign_ok {
                    end = idx + d.len_utf8();
                    prev = Some(d);
                    chars.next();
                } else {
                    break;
                }
            }
            let text = &source[start..end];
            let n: f32 = text
                .parse()
                .map_err(|_| anyhow::anyhow!("path {source:?}: bad number {text:?}"))?;
            tokens.push(Token::Number(n));
        } else {
            anyhow::bail!("path {source:?}: unexpected character {c:?}");
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_absolute_polyline() {
        let path = PathData::parse("M 380 210 L 208 210 L 208 290").unwrap();
        assert_eq!(
            path.subpaths(),
            &[vec![
                Point::new(380.0, 210.0),
                Point::new(208.0, 210.0),
                Point::new(208.0, 290.0)
            ]]
        );
        assert_eq!(path.source(), "M 380 210 L 208 210 L 208 290");
    }

    #[test]
    fn test_parse_relative_and_axis_commands() {
        let path = PathData::parse("m10,10 h20 v-5 l-5,-5 M0 0 H4 V4 z").unwrap();
        let subpaths = path.subpaths();
        assert_eq!(subpaths.len(), 2);
        assert_eq!(
            subpaths[0],
            vec![
                Point::new(10.0, 10.0),
                Point::new(30.0, 10.0),
                Point::new(30.0, 5.0),
                Point::new(25.0, 0.0)
            ]
        );
        assert_eq!(subpaths[1].last(), Some(&Point::new(0.0, 0.0)));
    }

    #[test]
    fn test_implicit_lineto_after_move() {
        let path = PathData::parse("M0 0 10 0 10 10").unwrap();
        assert_eq!(path.subpaths()[0].len(), 3);
    }

    #[test]
    fn test_reject_malformed_paths() {
        assert!(PathData::parse("").is_err());
        assert!(PathData::parse("M 10").is_err());
        assert!(PathData::parse("10 10 L 20 20").is_err());
        assert!(PathData::parse("M 0 0 C 1 1 2 2 3 3").is_err());
        assert!(PathData::parse("M 0 0").is_err());
    }

    #[test]
    fn test_wire_serde_uses_d_attribute() {
        let json = r##"{"d": "M 60 55 L 1040 55", "color": "#ef4444", "label": "VCC"}"##;
        let wire: Wire = serde_json::from_str(json).unwrap();
        assert_eq!(wire.label.as_deref(), Some("VCC"));
        let json = serde_json::to_value(&wire).unwrap();
        assert_eq!(json["d"], "M 60 55 L 1040 55");
    }

    #[test]
    fn test_shape_defaults_to_clickable() {
        let shape: LayoutShape = serde_json::from_str(
            r##"{"id": "R1", "x": 0, "y": 0, "width": 36, "height": 20,
                "color": "#d97706", "kind": "resistor", "label_ref": "R1"}"##,
        )
        .unwrap();
        assert!(shape.clickable);
        assert_eq!(shape.value_lines().count(), 0);
    }

    #[test]
    fn test_value_lines_split() {
        let shape = LayoutShape {
            id: "J3".into(),
            x: 430.0,
            y: 590.0,
            width: 140.0,
            height: 52.0,
            color: Color::rgb(0x16, 0xa3, 0x4a),
            kind: ShapeKind::Connector,
            label_ref: "J3".into(),
            label_value: "Motor Phases\nTB001-500-03BE".into(),
            clickable: true,
        };
        let lines: Vec<_> = shape.value_lines().collect();
        assert_eq!(lines, ["Motor Phases", "TB001-500-03BE"]);
    }
}
