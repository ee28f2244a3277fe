//! SVG serialization for [`Scene`].

use std::fmt::Write;

use super::scene::{Paint, Scene, Shape, Stroke, Text};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Serialize a scene as a self-contained SVG document.
///
/// Output is deterministic: the same scene always yields the same bytes.
pub fn to_svg(scene: &Scene) -> String {
    let mut out = String::with_capacity(4096 + scene.shapes.len() * 160);
    let _ = writeln!(
        out,
        r#"<svg viewBox="0 0 {w} {h}" width="100%" height="auto" xmlns="{SVG_NS}">"#,
        w = num(scene.width),
        h = num(scene.height),
    );
    for shape in &scene.shapes {
        write_shape(&mut out, shape, 1);
    }
    out.push_str("</svg>\n");
    out
}

fn write_shape(out: &mut String, shape: &Shape, depth: usize) {
    let indent = "  ".repeat(depth);
    out.push_str(&indent);
    match shape {
        Shape::Rect(r) => {
            let _ = write!(
                out,
                r#"<rect x="{}" y="{}" width="{}" height="{}""#,
                num(r.x),
                num(r.y),
                num(r.width),
                num(r.height)
            );
            if r.rx > 0.0 {
                let _ = write!(out, r#" rx="{}""#, num(r.rx));
            }
            let _ = write!(out, r#" fill="{}""#, paint(&r.fill));
            if let Some(o) = r.fill_opacity {
                let _ = write!(out, r#" fill-opacity="{}""#, num(o));
            }
            if let Some(s) = &r.stroke {
                write_stroke(out, s);
            }
            out.push_str("/>\n");
        }
        Shape::Line(l) => {
            let _ = write!(
                out,
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}""#,
                num(l.x1),
                num(l.y1),
                num(l.x2),
                num(l.y2)
            );
            write_stroke(out, &l.stroke);
            out.push_str("/>\n");
        }
        Shape::Circle(c) => {
            let _ = writeln!(
                out,
                r#"<circle cx="{}" cy="{}" r="{}" fill="{}"/>"#,
                num(c.cx),
                num(c.cy),
                num(c.r),
                paint(&c.fill)
            );
        }
        Shape::Image(i) => {
            let _ = writeln!(
                out,
                r#"<image href="{}" x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="xMidYMid meet"/>"#,
                escape(&i.href),
                num(i.x),
                num(i.y),
                num(i.width),
                num(i.height)
            );
        }
        Shape::Text(t) => write_text(out, t),
        Shape::Group { title, children } => {
            out.push_str("<g>");
            if let Some(title) = title {
                let _ = write!(out, "<title>{}</title>", escape(title));
            }
            out.push('\n');
            for child in children {
                write_shape(out, child, depth + 1);
            }
            out.push_str(&indent);
            out.push_str("</g>\n");
        }
    }
}

fn write_text(out: &mut String, t: &Text) {
    let _ = write!(
        out,
        r#"<text x="{}" y="{}" font-size="{}""#,
        num(t.x),
        num(t.y),
        num(t.size)
    );
    if let Some(w) = t.weight {
        let _ = write!(out, r#" font-weight="{w}""#);
    }
    if let Some(a) = t.anchor {
        let _ = write!(out, r#" text-anchor="{}""#, a.as_str());
    }
    match &t.outline {
        Some(s) => {
            // Outline-only pass; the caller layers a fill pass on top.
            write_stroke(out, s);
            let _ = write!(out, r#" fill="{}" paint-order="stroke fill""#, paint(&t.fill));
        }
        None => {
            let _ = write!(out, r#" fill="{}""#, paint(&t.fill));
        }
    }
    if let Some(f) = t.family {
        let _ = write!(out, r#" font-family="{}""#, escape(f));
    }
    let _ = writeln!(out, ">{}</text>", escape(&t.content));
}

fn write_stroke(out: &mut String, s: &Stroke) {
    let _ = write!(
        out,
        r#" stroke="{}" stroke-width="{}""#,
        paint(&s.paint),
        num(s.width)
    );
}

fn paint(p: &Paint) -> String {
    match p {
        Paint::Rgb(rgb) => rgb.to_hex(),
        Paint::Css(css) => (*css).to_string(),
    }
}

/// Two decimals at most, trailing zeros dropped.
pub(crate) fn num(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" || s.is_empty() {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// Escape text for use in XML content and attribute values.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
