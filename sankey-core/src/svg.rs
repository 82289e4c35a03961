//! SVG implementation of [`Canvas`]

use std::fmt::Write;

use crate::canvas::{Anchor, Canvas, Color, TextStyle};
use crate::theme::Theme;

/// Canvas that serializes every primitive into an SVG document
#[derive(Debug, Clone)]
pub struct SvgCanvas {
    width: f64,
    height: f64,
    font_family: String,
    background: Option<Color>,
    title: Option<String>,
    body: String,
}

impl SvgCanvas {
    /// Transparent canvas with a generic font
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            font_family: "sans-serif".to_string(),
            background: None,
            title: None,
            body: String::new(),
        }
    }

    /// Canvas painted with the theme's background and font
    pub fn with_theme(width: f64, height: f64, theme: &Theme) -> Self {
        Self {
            font_family: theme.font_family.clone(),
            background: Some(theme.background),
            ..Self::new(width, height)
        }
    }

    /// Document title (`<title>` element)
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Close the document and return it
    pub fn finish(self) -> String {
        let mut svg = String::with_capacity(self.body.len() + 512);

        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}" shape-rendering="crispEdges">"#,
            w = px(self.width),
            h = px(self.height)
        );
        if let Some(title) = &self.title {
            let _ = writeln!(svg, "<title>{}</title>", escape_xml(title));
        }
        if let Some(background) = self.background {
            let _ = writeln!(
                svg,
                r#"<rect x="0" y="0" width="100%" height="100%" fill="{}"/>"#,
                background.to_hex()
            );
        }
        svg.push_str(&self.body);
        svg.push_str("</svg>\n");
        svg
    }
}

impl Canvas for SvgCanvas {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        // SVG rejects negative sizes; normalize to the same covered area
        let (x, width) = if width < 0.0 { (x + width, -width) } else { (x, width) };
        let (y, height) = if height < 0.0 { (y + height, -height) } else { (y, height) };
        let _ = writeln!(
            self.body,
            r#"<rect x="{x}" y="{y}" width="{w}" height="{h}" fill="{fill}"/>"#,
            x = px(x),
            y = px(y),
            w = px(width),
            h = px(height),
            fill = color.to_hex()
        );
    }

    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: Color) {
        let _ = writeln!(
            self.body,
            r#"<line x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}" stroke="{stroke}" stroke-width="1"/>"#,
            x1 = px(x1),
            y1 = px(y1),
            x2 = px(x2),
            y2 = px(y2),
            stroke = color.to_hex()
        );
    }

    fn draw_text(&mut self, x: f64, y: f64, text: &str, style: &TextStyle) {
        let anchor = match style.anchor {
            Anchor::Center => "middle",
            Anchor::East => "end",
            Anchor::West => "start",
        };
        let _ = writeln!(
            self.body,
            r#"<text x="{x}" y="{y}" font-family="{font}" font-size="{size}px" fill="{fill}" text-anchor="{anchor}" dominant-baseline="middle">{t}</text>"#,
            x = px(x),
            y = px(y),
            font = escape_xml(&self.font_family),
            size = px(style.font_size),
            fill = style.color.to_hex(),
            anchor = anchor,
            t = escape_xml(text)
        );
    }
}

/// Round to hundredths so band columns don't print 17 significant digits
fn px(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    // avoid "-0"
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
