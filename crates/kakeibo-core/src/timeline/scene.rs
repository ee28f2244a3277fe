//! Minimal vector scene graph.
//!
//! Layout code builds a [`Scene`] out of typed shapes; [`super::svg`] turns
//! it into markup. Tests assert on shapes directly.

use crate::gradient::Rgb;

/// Fill or stroke color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Rgb(Rgb),
    /// Any CSS color literal (`none`, `transparent`, `rgba(...)`).
    Css(&'static str),
}

impl From<Rgb> for Paint {
    fn from(rgb: Rgb) -> Self {
        Self::Rgb(rgb)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub paint: Paint,
    pub width: f64,
}

impl Stroke {
    pub fn new(paint: impl Into<Paint>, width: f64) -> Self {
        Self {
            paint: paint.into(),
            width,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rx: f64,
    pub fill: Paint,
    pub fill_opacity: Option<f64>,
    pub stroke: Option<Stroke>,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            rx: 0.0,
            fill: Paint::Css("none"),
            fill_opacity: None,
            stroke: None,
        }
    }

    pub fn rounded(mut self, rx: f64) -> Self {
        self.rx = rx;
        self
    }

    pub fn fill(mut self, paint: impl Into<Paint>) -> Self {
        self.fill = paint.into();
        self
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.fill_opacity = Some(opacity);
        self
    }

    pub fn stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = Some(stroke);
        self
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke: Stroke,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    pub fill: Paint,
}

/// Embedded raster image, usually a `data:` URI.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub href: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub x: f64,
    pub y: f64,
    pub content: String,
    pub size: f64,
    pub weight: Option<u16>,
    pub fill: Paint,
    pub anchor: Option<Anchor>,
    /// Drawn behind the fill (`paint-order="stroke fill"`).
    pub outline: Option<Stroke>,
    pub family: Option<&'static str>,
}

impl Text {
    pub fn new(x: f64, y: f64, content: impl Into<String>, size: f64) -> Self {
        Self {
            x,
            y,
            content: content.into(),
            size,
            weight: None,
            fill: Paint::Css("currentColor"),
            anchor: None,
            outline: None,
            family: None,
        }
    }

    pub fn weight(mut self, weight: u16) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn fill(mut self, paint: impl Into<Paint>) -> Self {
        self.fill = paint.into();
        self
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn outline(mut self, stroke: Stroke) -> Self {
        self.outline = Some(stroke);
        self
    }

    pub fn family(mut self, family: &'static str) -> Self {
        self.family = Some(family);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect(Rect),
    Line(Line),
    Circle(Circle),
    Image(Image),
    Text(Text),
    /// Children with an optional hover tooltip.
    Group {
        title: Option<String>,
        children: Vec<Shape>,
    },
}

impl From<Rect> for Shape {
    fn from(r: Rect) -> Self {
        Self::Rect(r)
    }
}

impl From<Line> for Shape {
    fn from(l: Line) -> Self {
        Self::Line(l)
    }
}

impl From<Circle> for Shape {
    fn from(c: Circle) -> Self {
        Self::Circle(c)
    }
}

impl From<Image> for Shape {
    fn from(i: Image) -> Self {
        Self::Image(i)
    }
}

impl From<Text> for Shape {
    fn from(t: Text) -> Self {
        Self::Text(t)
    }
}

/// Fixed logical canvas. Rendered with a `viewBox` so it scales to its container.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub shapes: Vec<Shape>,
}

impl Scene {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            shapes: Vec::new(),
        }
    }

    pub fn push(&mut self, shape: impl Into<Shape>) {
        self.shapes.push(shape.into());
    }

    /// Depth-first walk over every shape, groups included.
    pub fn walk(&self) -> Vec<&Shape> {
        fn visit<'a>(shapes: &'a [Shape], out: &mut Vec<&'a Shape>) {
            for shape in shapes {
                out.push(shape);
                if let Shape::Group { children, .. } = shape {
                    visit(children, out);
                }
            }
        }
        let mut out = Vec::new();
        visit(&self.shapes, &mut out);
        out
    }
}
