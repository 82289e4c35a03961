//! Drawing surface abstraction consumed by the renderer

use std::fmt;

/// An 8-bit RGB color, already clamped to the displayable range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const LIGHT_GRAY: Color = Color::new(211, 211, 211);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb` form
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Which point of the text box sits on the given coordinate.
///
/// All anchors center the text vertically on `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    /// Text centered on `x`
    #[default]
    Center,
    /// Text ends at `x` (right-aligned)
    East,
    /// Text starts at `x` (left-aligned)
    West,
}

/// How a piece of text is drawn
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub anchor: Anchor,
    pub font_size: f64,
    pub color: Color,
}

/// A fixed-size surface that accepts the renderer's primitives.
///
/// Coordinates are in pixels with the origin at the top-left corner.
pub trait Canvas {
    fn width(&self) -> f64;
    fn height(&self) -> f64;
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color);
    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: Color);
    fn draw_text(&mut self, x: f64, y: f64, text: &str, style: &TextStyle);
}

/// One primitive call captured by [`RecordingCanvas`]
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Color,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: Color,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        style: TextStyle,
    },
}

/// Canvas that records every call instead of drawing it
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    width: f64,
    height: f64,
    pub commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn rects(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillRect { .. }))
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
    }

    pub fn texts(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Text { .. }))
    }
}

impl Canvas for RecordingCanvas {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        self.commands.push(DrawCommand::FillRect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: Color) {
        self.commands.push(DrawCommand::Line {
            x1,
            y1,
            x2,
            y2,
            color,
        });
    }

    fn draw_text(&mut self, x: f64, y: f64, text: &str, style: &TextStyle) {
        self.commands.push(DrawCommand::Text {
            x,
            y,
            text: text.to_string(),
            style: style.clone(),
        });
    }
}
